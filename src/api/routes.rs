//! API Routes
//!
//! Configures the Axum router with all DataPulse endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    crypto_handler, exchange_handler, health_handler, history_handler, markets_handler,
    news_handler, refresh_all_handler, refresh_source_handler, root_handler, stats_handler,
    stock_handler, weather_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, the dashboard is served from a different host
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/crypto", get(crypto_handler))
        .route("/crypto/markets", get(markets_handler))
        .route("/stocks", get(stock_handler))
        .route("/stocks/historical/:symbol", get(history_handler))
        .route("/weather", get(weather_handler))
        .route("/news", get(news_handler))
        .route("/exchange-rate", get(exchange_handler))
        .route("/refresh", post(refresh_all_handler))
        .route("/refresh/:source", post(refresh_source_handler));

    Router::new()
        .route("/", get(root_handler))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
