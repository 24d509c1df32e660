use super::{PricePoint, StockFetch, StockQuote};
use crate::config::ConfigStore;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const FINNHUB_BASE: &str = "https://finnhub.io/api/v1";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Finnhub quote + daily-candle client.
///
/// Per-symbol failures are absorbed into null-valued entries so one bad
/// symbol never sinks the watchlist.
pub struct FinnhubClient {
    http: reqwest::Client,
    store: Arc<ConfigStore>,
    base_url: String,
}

#[derive(Deserialize)]
struct QuoteResponse {
    /// Current price.
    c: Option<f64>,
    /// Percent change.
    dp: Option<f64>,
    /// Previous close.
    pc: Option<f64>,
}

#[derive(Deserialize)]
struct CandleResponse {
    #[serde(default)]
    s: String,
    #[serde(default)]
    c: Vec<Option<f64>>,
    #[serde(default)]
    t: Vec<Option<i64>>,
}

impl FinnhubClient {
    pub fn new(http: reqwest::Client, store: Arc<ConfigStore>) -> Self {
        Self {
            http,
            store,
            base_url: FINNHUB_BASE.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn quote_one(&self, symbol: &str, token: &str) -> anyhow::Result<StockQuote> {
        let response = self
            .http
            .get(format!("{}/quote", self.base_url))
            .query(&[("symbol", symbol), ("token", token)])
            .timeout(TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let quote: QuoteResponse = response.json().await?;

        let Some(price) = quote.c else {
            return Ok(StockQuote {
                symbol: symbol.to_string(),
                price: None,
                change_percent: None,
            });
        };

        // Prefer the provider's percent change; compute from prev close if
        // it is missing.
        let change_percent = match (quote.dp, quote.pc) {
            (Some(dp), _) => Some(dp),
            (None, Some(pc)) if pc != 0.0 => Some((price - pc) / pc * 100.0),
            _ => None,
        };

        Ok(StockQuote {
            symbol: symbol.to_string(),
            price: Some(price),
            change_percent,
        })
    }
}

#[async_trait]
impl StockFetch for FinnhubClient {
    async fn quotes(&self, symbols: &[String]) -> Vec<StockQuote> {
        let token = self.store.secret("FINNHUB_API_KEY");
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            if token.is_empty() {
                out.push(StockQuote {
                    symbol,
                    price: None,
                    change_percent: None,
                });
                continue;
            }
            match self.quote_one(&symbol, &token).await {
                Ok(quote) => out.push(quote),
                Err(error) => {
                    tracing::warn!(symbol = %symbol, error = %error, "stock quote fetch failed");
                    out.push(StockQuote {
                        symbol,
                        price: None,
                        change_percent: None,
                    });
                }
            }
        }
        out
    }

    async fn history(&self, symbol: &str, points: usize) -> Option<Vec<PricePoint>> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }
        let token = self.store.secret("FINNHUB_API_KEY");
        if token.is_empty() {
            return None;
        }

        // Buffer days cover weekends/holidays so `points` bars come back.
        let now = Utc::now();
        let to_ts = now.timestamp().to_string();
        let from_ts = (now - ChronoDuration::days(points as i64 + 14))
            .timestamp()
            .to_string();

        let response = self
            .http
            .get(format!("{}/stock/candle", self.base_url))
            .query(&[
                ("symbol", symbol.as_str()),
                ("resolution", "D"),
                ("from", from_ts.as_str()),
                ("to", to_ts.as_str()),
                ("token", token.as_str()),
            ])
            .timeout(TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        let data: CandleResponse = match response {
            Ok(r) => match r.json().await {
                Ok(d) => d,
                Err(error) => {
                    tracing::warn!(symbol = %symbol, error = %error, "stock history decode failed");
                    return None;
                }
            },
            Err(error) => {
                tracing::warn!(symbol = %symbol, error = %error, "stock history fetch failed");
                return None;
            }
        };

        if data.s.to_lowercase() != "ok" {
            tracing::debug!(symbol = %symbol, status = %data.s, "no stock history data");
            return None;
        }
        if data.c.is_empty() || data.c.len() != data.t.len() {
            tracing::warn!(symbol = %symbol, "invalid stock history payload");
            return None;
        }

        let start = data.c.len().saturating_sub(points);
        let out: Vec<PricePoint> = data.t[start..]
            .iter()
            .zip(&data.c[start..])
            .filter_map(|(t, c)| match (t, c) {
                (Some(t), Some(price)) => Some(PricePoint {
                    t: *t,
                    price: *price,
                }),
                _ => None,
            })
            .collect();

        if out.is_empty() { None } else { Some(out) }
    }
}
