//! Headlines, overall and per category.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::fetch::{keys, CacheAsideFetcher, FetchPolicy, Fetched, Source};
use crate::models::{Headline, Topic};
use crate::upstream::NewsProvider;

const HEADLINES: FetchPolicy<Vec<Headline>> =
    FetchPolicy::new(Source::News).with_validator(|headlines| !headlines.is_empty());

const MAX_CATEGORY_BYTES: usize = 64;

#[derive(Clone)]
pub struct NewsService {
    fetcher: CacheAsideFetcher,
    provider: Arc<dyn NewsProvider>,
}

impl NewsService {
    pub fn new(fetcher: CacheAsideFetcher, provider: Arc<dyn NewsProvider>) -> Self {
        Self { fetcher, provider }
    }

    pub async fn top_headlines(&self) -> Result<Fetched<Vec<Headline>>> {
        self.fetcher
            .fetch(keys::NEWS_TOP, &HEADLINES, || self.provider.top_headlines())
            .await
    }

    /// Headlines for a category.
    ///
    /// The category as given keys the cache and labels each headline; only
    /// the provider query maps it onto a topic, with unknown ones asking for
    /// general news.
    pub async fn by_category(&self, category: &str) -> Result<Fetched<Vec<Headline>>> {
        let category = normalize_category(category)?;
        let topic = Topic::parse(&category)?;

        self.fetcher
            .fetch(&keys::news_category(&category), &HEADLINES, || async {
                self.provider
                    .by_topic(topic)
                    .await
                    .map(|headlines| labelled(headlines, &category))
            })
            .await
    }

    /// Dispatches on whether a category was given.
    pub async fn headlines(&self, category: Option<&str>) -> Result<Fetched<Vec<Headline>>> {
        match category {
            Some(category) => self.by_category(category).await,
            None => self.top_headlines().await,
        }
    }
}

/// Trims a category, rejecting blank, oversized or control-laden input.
pub fn normalize_category(raw: &str) -> Result<String> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(AppError::InvalidInput("Category cannot be empty".to_string()));
    }
    if category.len() > MAX_CATEGORY_BYTES || category.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(format!("Invalid category: {category}")));
    }
    Ok(category.to_string())
}

fn labelled(headlines: Vec<Headline>, category: &str) -> Vec<Headline> {
    headlines
        .into_iter()
        .map(|headline| Headline {
            category: Some(category.to_string()),
            ..headline
        })
        .collect()
}
