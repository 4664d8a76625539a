//! GNews top-headlines client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

use super::http::{get_json, require_key};
use super::NewsProvider;
use crate::error::UpstreamError;
use crate::models::{Headline, Topic};

const PROVIDER: &str = "GNews";
const BASE_URL: &str = "https://gnews.io/api/v4/top-headlines";
/// Headlines kept for the dashboard's front page
const TOP_HEADLINES: usize = 5;
/// Articles requested per topic carousel
const TOPIC_PAGE_SIZE: &str = "10";

#[derive(Clone)]
pub struct GNewsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GNewsClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, extra: &[(&str, &str)]) -> Result<Vec<Article>, UpstreamError> {
        let token = require_key(PROVIDER, &self.api_key)?;
        let request = self
            .client
            .get(&self.base_url)
            .query(&[("lang", "en"), ("token", token)])
            .query(extra);

        let body: Articles = get_json(PROVIDER, request).await?;
        if let Some(errors) = body.errors {
            let first = errors.first().cloned().unwrap_or_else(|| "Unknown API error".into());
            error!("GNews API error: {}", first);
            return Err(UpstreamError::InvalidResponse(first));
        }
        Ok(body.articles)
    }
}

#[derive(Deserialize)]
struct Articles {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct Article {
    title: String,
    url: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    source: ArticleSource,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct ArticleSource {
    name: String,
}

impl Article {
    fn into_headline(self) -> Headline {
        Headline {
            title: self.title,
            source: self.source.name,
            url: self.url,
            published_at: self.published_at,
            image: self.image,
            description: None,
            category: None,
        }
    }
}

#[async_trait]
impl NewsProvider for GNewsClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn top_headlines(&self) -> Result<Vec<Headline>, UpstreamError> {
        let articles = self.fetch(&[]).await?;
        Ok(articles
            .into_iter()
            .take(TOP_HEADLINES)
            .map(Article::into_headline)
            .collect())
    }

    async fn by_topic(&self, topic: Topic) -> Result<Vec<Headline>, UpstreamError> {
        let articles = self
            .fetch(&[("topic", topic.as_str()), ("max", TOPIC_PAGE_SIZE)])
            .await?;

        Ok(articles
            .into_iter()
            .map(|article| {
                let description = article.description.clone().unwrap_or_default();
                Headline {
                    description: Some(description),
                    category: Some(topic.as_str().to_string()),
                    ..article.into_headline()
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_mapping() {
        let body: Articles = serde_json::from_str(
            r#"{"totalArticles":1,"articles":[{
                "title":"Rust 2.0","url":"https://example.com/a","publishedAt":"2024-01-01T00:00:00Z",
                "source":{"name":"Example","url":"https://example.com"},"image":null
            }]}"#,
        )
        .unwrap();

        let headline = body.articles.into_iter().next().unwrap().into_headline();
        assert_eq!(headline.source, "Example");
        assert_eq!(headline.image, None);
        assert_eq!(headline.description, None);
    }

    #[test]
    fn test_errors_body_parses() {
        let body: Articles =
            serde_json::from_str(r#"{"errors":["You have reached your request limit"]}"#).unwrap();
        assert!(body.articles.is_empty());
        assert_eq!(body.errors.unwrap().len(), 1);
    }
}
