//! Data Services
//!
//! One service per data source. Each validates its inputs, builds the cache
//! key and hands the provider call to the shared [`CacheAsideFetcher`].
//! Input errors are raised before the cache or the provider is touched.

mod crypto;
mod exchange;
mod health;
mod news;
mod refresh;
mod stocks;
mod weather;

pub use crypto::CryptoService;
pub use exchange::ExchangeService;
pub use health::HealthService;
pub use news::NewsService;
pub use refresh::RefreshService;
pub use stocks::{normalize_symbol, StocksService};
pub use weather::{normalize_city, WeatherService};

use crate::fetch::CacheAsideFetcher;
use crate::upstream::Providers;

/// Every service, wired to one fetcher and one provider set.
#[derive(Clone)]
pub struct Services {
    pub crypto: CryptoService,
    pub stocks: StocksService,
    pub weather: WeatherService,
    pub news: NewsService,
    pub exchange: ExchangeService,
    pub refresh: RefreshService,
    pub health: HealthService,
}

impl Services {
    pub fn new(fetcher: CacheAsideFetcher, providers: Providers) -> Self {
        let crypto = CryptoService::new(fetcher.clone(), providers.crypto.clone());
        let stocks = StocksService::new(fetcher.clone(), providers.stocks.clone());
        let weather = WeatherService::new(fetcher.clone(), providers.weather.clone());
        let news = NewsService::new(fetcher.clone(), providers.news.clone());
        let exchange = ExchangeService::new(fetcher.clone(), providers.exchange.clone());

        let refresh = RefreshService {
            fetcher: fetcher.clone(),
            crypto: crypto.clone(),
            stocks: stocks.clone(),
            weather: weather.clone(),
            news: news.clone(),
            exchange: exchange.clone(),
        };
        let health = HealthService::new(fetcher.cache().clone(), providers);

        Self {
            crypto,
            stocks,
            weather,
            news,
            exchange,
            refresh,
            health,
        }
    }
}
