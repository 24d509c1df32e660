use crate::config::{ConfigStore, OsMode, QuoteRecord, TodayItem};
use crate::error::Result;
use crate::fetch::{Article, NewsFetch, PricePoint, StockFetch, StockQuote, WeatherFetch};
use crate::state::AgentStateHandle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Daily bars embedded per symbol for sparklines.
const HISTORY_POINTS: usize = 40;

// ── Snapshot shape ───────────────────────────────────────────────

/// Point-in-time read-only aggregate of document state plus freshly fetched
/// external data, used to ground narrated answers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub os_mode: OsMode,
    pub widgets: SnapshotWidgets,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotWidgets {
    pub weather: WeatherSnapshot,
    pub stocks: StocksSnapshot,
    pub news: NewsSnapshot,
    pub today: TodaySnapshot,
    pub quotes: QuotesSnapshot,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StocksSnapshot {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<String>,
    /// One entry per symbol, independently nullable per-symbol.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub watchlist: Vec<StockQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<BTreeMap<String, Vec<PricePoint>>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSnapshot {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headlines: Vec<Article>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<TodayItem>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesSnapshot {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_quote: Option<QuoteRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

// ── Builder ──────────────────────────────────────────────────────

/// Assembles the grounded snapshot. Each widget fetch is isolated: a
/// collaborator failure marks that one widget `{enabled:false, error}` and
/// never aborts the others. Partial data must not become a total read
/// failure.
pub struct SnapshotBuilder {
    store: Arc<ConfigStore>,
    agent_state: AgentStateHandle,
    weather: Arc<dyn WeatherFetch>,
    stocks: Arc<dyn StockFetch>,
    news: Arc<dyn NewsFetch>,
}

impl SnapshotBuilder {
    pub fn new(
        store: Arc<ConfigStore>,
        agent_state: AgentStateHandle,
        weather: Arc<dyn WeatherFetch>,
        stocks: Arc<dyn StockFetch>,
        news: Arc<dyn NewsFetch>,
    ) -> Self {
        Self {
            store,
            agent_state,
            weather,
            stocks,
            news,
        }
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        let config = self.store.load()?;

        let weather = if config.widgets.weather {
            match self.weather.current(&config.location).await {
                Ok(report) => WeatherSnapshot {
                    enabled: true,
                    error: None,
                    city: Some(config.location.clone()),
                    temperature_f: Some(report.temperature_f),
                    description: Some(report.description),
                    symbol: Some(report.symbol),
                },
                Err(error) => {
                    tracing::warn!(error = %error, "weather fetch failed for snapshot");
                    WeatherSnapshot {
                        error: Some(error.to_string()),
                        ..WeatherSnapshot::default()
                    }
                }
            }
        } else {
            WeatherSnapshot::default()
        };

        let stocks = if config.widgets.stocks {
            let symbols = config.stock_symbols();
            let watchlist = if symbols.is_empty() {
                Vec::new()
            } else {
                self.stocks.quotes(&symbols).await
            };
            let mut history = BTreeMap::new();
            for symbol in &symbols {
                if let Some(points) = self.stocks.history(symbol, HISTORY_POINTS).await {
                    history.insert(symbol.clone(), points);
                }
            }
            StocksSnapshot {
                enabled: true,
                symbols,
                watchlist,
                history: if history.is_empty() {
                    None
                } else {
                    Some(history)
                },
            }
        } else {
            StocksSnapshot::default()
        };

        let news = if config.widgets.news {
            let category = config
                .news_categories
                .first()
                .map_or("technology", String::as_str);
            match self.news.top_headlines(category, "us").await {
                Ok(headlines) => NewsSnapshot {
                    enabled: true,
                    error: None,
                    headlines,
                },
                Err(error) => {
                    tracing::warn!(error = %error, "news fetch failed for snapshot");
                    NewsSnapshot {
                        error: Some(error.to_string()),
                        ..NewsSnapshot::default()
                    }
                }
            }
        } else {
            NewsSnapshot::default()
        };

        let today = if config.widgets.today {
            TodaySnapshot {
                enabled: true,
                items: config.today_items.clone(),
            }
        } else {
            TodaySnapshot::default()
        };

        let quotes = if config.widgets.quotes {
            QuotesSnapshot {
                enabled: true,
                current_quote: config.current_quote.clone(),
                categories: config.quotes_categories.clone(),
            }
        } else {
            QuotesSnapshot::default()
        };

        Ok(Snapshot {
            timestamp: Utc::now(),
            os_mode: self.agent_state.mode_or(config.os_mode),
            widgets: SnapshotWidgets {
                weather,
                stocks,
                news,
                today,
                quotes,
            },
        })
    }
}
