use super::QuoteFetch;
use crate::config::{ConfigStore, QuoteRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const QUOTES_API_URL: &str = "https://api.api-ninjas.com/v2/randomquotes";
const TIMEOUT: Duration = Duration::from_secs(10);

/// API Ninjas random-quote client. Every failure path collapses to `None`;
/// the previous quote stays on the mirror.
pub struct ApiNinjasClient {
    http: reqwest::Client,
    store: Arc<ConfigStore>,
    base_url: String,
}

#[derive(Deserialize)]
struct ApiQuote {
    #[serde(default)]
    quote: String,
    #[serde(default)]
    author: Option<String>,
}

impl ApiNinjasClient {
    pub fn new(http: reqwest::Client, store: Arc<ConfigStore>) -> Self {
        Self {
            http,
            store,
            base_url: QUOTES_API_URL.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl QuoteFetch for ApiNinjasClient {
    async fn random(&self, categories: &[String]) -> Option<QuoteRecord> {
        let api_key = self.store.secret("API_NINJAS_KEY");
        if api_key.is_empty() {
            tracing::warn!("no API_NINJAS_KEY set, skipping quote fetch");
            return None;
        }

        let mut request = self
            .http
            .get(&self.base_url)
            .header("X-Api-Key", api_key)
            .timeout(TIMEOUT);
        if !categories.is_empty() {
            request = request.query(&[("category", categories.join(","))]);
        }

        let response = match request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
        {
            Ok(r) => r,
            Err(error) => {
                tracing::warn!(error = %error, "quote fetch failed");
                return None;
            }
        };

        let data: Vec<ApiQuote> = match response.json().await {
            Ok(d) => d,
            Err(error) => {
                tracing::warn!(error = %error, "quote decode failed");
                return None;
            }
        };

        let first = data.into_iter().next()?;
        if first.quote.is_empty() {
            return None;
        }
        Some(QuoteRecord {
            quote: first.quote,
            author: first.author.filter(|a| !a.is_empty()),
            category: None,
        })
    }
}
