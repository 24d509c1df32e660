pub mod news;
pub mod quotes;
pub mod stocks;
pub mod weather;

pub use news::NewsApiClient;
pub use quotes::ApiNinjasClient;
pub use stocks::FinnhubClient;
pub use weather::OpenWeatherClient;

use crate::config::QuoteRecord;
use crate::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ── Normalized records ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub temperature_f: f64,
    pub description: String,
    pub symbol: String,
}

/// One watchlist entry. Price fields are independently nullable: a failed
/// per-symbol lookup yields an entry with empty values, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix seconds.
    pub t: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ── Collaborator seams ───────────────────────────────────────────
//
// Implemented over HTTP in this module; tests substitute in-process mocks.
// Failures never propagate raw past the call site: the snapshot builder and
// quote refresh convert them to typed fallbacks.

#[async_trait]
pub trait WeatherFetch: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, FetchError>;
}

#[async_trait]
pub trait StockFetch: Send + Sync {
    /// One entry per requested symbol, same order.
    async fn quotes(&self, symbols: &[String]) -> Vec<StockQuote>;

    /// Recent daily closes for sparklines; `None` when unavailable.
    async fn history(&self, symbol: &str, points: usize) -> Option<Vec<PricePoint>>;
}

#[async_trait]
pub trait NewsFetch: Send + Sync {
    async fn top_headlines(
        &self,
        category: &str,
        country: &str,
    ) -> Result<Vec<Article>, FetchError>;
}

#[async_trait]
pub trait QuoteFetch: Send + Sync {
    /// A random quote for the given categories; `None` on any failure.
    async fn random(&self, categories: &[String]) -> Option<QuoteRecord>;
}
