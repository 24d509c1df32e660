use super::{Article, NewsFetch};
use crate::config::ConfigStore;
use crate::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const NEWS_API_URL: &str = "https://newsapi.org/v2/top-headlines";
const TIMEOUT: Duration = Duration::from_secs(10);
const PAGE_SIZE: u32 = 10;

/// NewsAPI top-headlines client.
pub struct NewsApiClient {
    http: reqwest::Client,
    store: Arc<ConfigStore>,
    base_url: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Deserialize)]
struct ApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source: Option<ApiSource>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct ApiSource {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiClient {
    pub fn new(http: reqwest::Client, store: Arc<ConfigStore>) -> Self {
        Self {
            http,
            store,
            base_url: NEWS_API_URL.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl NewsFetch for NewsApiClient {
    async fn top_headlines(
        &self,
        category: &str,
        country: &str,
    ) -> Result<Vec<Article>, FetchError> {
        let api_key = self.store.secret("NEWS_API_KEY");
        if api_key.is_empty() {
            tracing::warn!("no NEWS_API_KEY set, returning empty headline list");
            return Ok(Vec::new());
        }

        let page_size = PAGE_SIZE.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apiKey", api_key.as_str()),
                ("category", category),
                ("country", country),
                ("pageSize", page_size.as_str()),
            ])
            .timeout(TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| FetchError::Request {
                service: "newsapi".into(),
                message: e.to_string(),
            })?;

        let data: ApiResponse = response.json().await.map_err(|e| FetchError::Decode {
            service: "newsapi".into(),
            message: e.to_string(),
        })?;

        let articles = data
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title.filter(|t| !t.trim().is_empty())?;
                Some(Article {
                    title,
                    source: a.source.and_then(|s| s.name),
                    published_at: a.published_at,
                    url: a.url,
                })
            })
            .collect();
        Ok(articles)
    }
}
