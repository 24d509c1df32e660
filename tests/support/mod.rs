#![allow(dead_code)]

use async_trait::async_trait;
use lookingglass::actions::SpeakSink;
use lookingglass::config::{ConfigStore, MirrorConfig, QuoteRecord};
use lookingglass::error::FetchError;
use lookingglass::fetch::{
    Article, NewsFetch, PricePoint, QuoteFetch, StockFetch, StockQuote, WeatherFetch,
    WeatherReport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Config fixtures ──────────────────────────────────────────────

/// A store over a temp directory, seeded with the given document.
pub fn seeded_store(dir: &TempDir, doc: &MirrorConfig) -> Arc<ConfigStore> {
    let store = ConfigStore::new(dir.path().join("config.json"));
    store.save(doc).unwrap();
    Arc::new(store)
}

pub fn default_store(dir: &TempDir) -> Arc<ConfigStore> {
    seeded_store(dir, &MirrorConfig::default())
}

// ── Speak capture ────────────────────────────────────────────────

#[derive(Default)]
pub struct CapturingSpeaker {
    lines: Mutex<Vec<String>>,
}

impl CapturingSpeaker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl SpeakSink for CapturingSpeaker {
    fn speak(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

// ── Mock collaborators ───────────────────────────────────────────

pub struct StaticWeather(pub WeatherReport);

impl StaticWeather {
    pub fn sunny() -> Arc<Self> {
        Arc::new(Self(WeatherReport {
            temperature_f: 68.0,
            description: "Clear sky".into(),
            symbol: "☀️".into(),
        }))
    }
}

#[async_trait]
impl WeatherFetch for StaticWeather {
    async fn current(&self, _city: &str) -> Result<WeatherReport, FetchError> {
        Ok(self.0.clone())
    }
}

pub struct FailingWeather;

#[async_trait]
impl WeatherFetch for FailingWeather {
    async fn current(&self, _city: &str) -> Result<WeatherReport, FetchError> {
        Err(FetchError::Request {
            service: "openweather".into(),
            message: "connection refused".into(),
        })
    }
}

pub struct StaticStocks {
    pub quotes: Vec<StockQuote>,
    pub history: Option<Vec<PricePoint>>,
}

impl StaticStocks {
    pub fn with_quotes(quotes: Vec<StockQuote>) -> Arc<Self> {
        Arc::new(Self {
            quotes,
            history: None,
        })
    }
}

#[async_trait]
impl StockFetch for StaticStocks {
    async fn quotes(&self, _symbols: &[String]) -> Vec<StockQuote> {
        self.quotes.clone()
    }

    async fn history(&self, _symbol: &str, _points: usize) -> Option<Vec<PricePoint>> {
        self.history.clone()
    }
}

/// Provider outage: every symbol comes back with empty values.
pub struct DownStocks;

#[async_trait]
impl StockFetch for DownStocks {
    async fn quotes(&self, symbols: &[String]) -> Vec<StockQuote> {
        symbols
            .iter()
            .map(|symbol| StockQuote {
                symbol: symbol.clone(),
                price: None,
                change_percent: None,
            })
            .collect()
    }

    async fn history(&self, _symbol: &str, _points: usize) -> Option<Vec<PricePoint>> {
        None
    }
}

pub struct StaticNews(pub Vec<Article>);

impl StaticNews {
    pub fn with_titles(titles: &[&str]) -> Arc<Self> {
        Arc::new(Self(
            titles
                .iter()
                .map(|title| Article {
                    title: (*title).to_string(),
                    source: None,
                    published_at: None,
                    url: None,
                })
                .collect(),
        ))
    }
}

#[async_trait]
impl NewsFetch for StaticNews {
    async fn top_headlines(
        &self,
        _category: &str,
        _country: &str,
    ) -> Result<Vec<Article>, FetchError> {
        Ok(self.0.clone())
    }
}

pub struct FailingNews;

#[async_trait]
impl NewsFetch for FailingNews {
    async fn top_headlines(
        &self,
        _category: &str,
        _country: &str,
    ) -> Result<Vec<Article>, FetchError> {
        Err(FetchError::Request {
            service: "newsapi".into(),
            message: "rate limited".into(),
        })
    }
}

/// Returns a canned quote (or nothing) and records the categories of every
/// call.
pub struct StaticQuotes {
    pub result: Option<QuoteRecord>,
    pub calls: AtomicUsize,
    pub seen_categories: Mutex<Vec<Vec<String>>>,
}

impl StaticQuotes {
    pub fn with_quote(quote: &str, author: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            result: Some(QuoteRecord {
                quote: quote.to_string(),
                author: author.map(str::to_string),
                category: None,
            }),
            calls: AtomicUsize::new(0),
            seen_categories: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: AtomicUsize::new(0),
            seen_categories: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteFetch for StaticQuotes {
    async fn random(&self, categories: &[String]) -> Option<QuoteRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_categories
            .lock()
            .unwrap()
            .push(categories.to_vec());
        self.result.clone()
    }
}
