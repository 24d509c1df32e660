use super::events::{Event, EventKind};
use super::planner;
use crate::actions::{Action, Executor};
use crate::snapshot::{Snapshot, SnapshotBuilder};
use crate::state::AgentStateHandle;
use serde_json::{Value, json};
use std::sync::Arc;

const FALLBACK_RESPONSE: &str = "I'm here. What would you like to change?";
const SNAPSHOT_ERROR_RESPONSE: &str =
    "I tried to look at mirror data, but the snapshot looks off.";

/// Data questions answerable from the grounded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataIntent {
    Stocks,
    News,
    Weather,
    Overview,
    QuoteReading,
}

const STOCKS_KEYWORDS: &[&str] = &[
    "tesla",
    "tsla",
    "nvidia",
    "nvda",
    "stock",
    "stocks",
    "portfolio",
    "watchlist",
];
const NEWS_KEYWORDS: &[&str] = &["headline", "headlines", "news"];
const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "rain",
    "raining",
    "hot",
    "cold",
];
const OVERVIEW_KEYWORDS: &[&str] = &[
    "what's going on",
    "whats going on",
    "overview of today",
    "mirror overview",
];
const QUOTE_KEYWORDS: &[&str] = &[
    "read the quote",
    "what's the quote",
    "quote of the day",
    "today's quote",
];

fn detect_data_intent(lower: &str) -> Option<DataIntent> {
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
    if contains_any(STOCKS_KEYWORDS) {
        return Some(DataIntent::Stocks);
    }
    if contains_any(NEWS_KEYWORDS) {
        return Some(DataIntent::News);
    }
    if contains_any(WEATHER_KEYWORDS) {
        return Some(DataIntent::Weather);
    }
    if contains_any(OVERVIEW_KEYWORDS) {
        return Some(DataIntent::Overview);
    }
    if contains_any(QUOTE_KEYWORDS) {
        return Some(DataIntent::QuoteReading);
    }
    None
}

/// Event-driven agent: routes typed events through the planner and executor
/// and answers data questions from the snapshot.
pub struct MirrorAgent {
    state: AgentStateHandle,
    executor: Arc<Executor>,
    snapshots: Arc<SnapshotBuilder>,
}

impl MirrorAgent {
    pub fn new(
        state: AgentStateHandle,
        executor: Arc<Executor>,
        snapshots: Arc<SnapshotBuilder>,
    ) -> Self {
        Self {
            state,
            executor,
            snapshots,
        }
    }

    /// Wire boundary: unknown event kinds are logged and ignored, no
    /// transition happens.
    pub async fn handle_raw(&self, raw: Value) {
        match Event::from_raw(raw) {
            Some(event) => self.handle_event(event).await,
            None => tracing::warn!("unknown or malformed event, ignoring"),
        }
    }

    pub async fn handle_event(&self, event: Event) {
        match event.kind {
            EventKind::Wake { source } => self.on_wake(&source).await,
            EventKind::UserSpoke { text, .. } => {
                self.user_spoke(&text).await;
            }
            EventKind::Tick {} => {
                // reserved for time-driven behaviors (alarms, periodic
                // refresh) driven by external schedulers
                tracing::trace!("tick");
            }
            EventKind::WidgetUpdated { widget, data } => {
                tracing::info!(widget = %widget, data = %data, "widget updated");
            }
        }
    }

    async fn on_wake(&self, source: &str) {
        self.state.mark_wake();
        tracing::info!(source = %source, "wake word detected");
        self.emit(Action::update_widget(
            "system",
            json!({"status": "listening"}),
        ))
        .await;
    }

    /// Full user-turn path: record the utterance, decide, speak, then run
    /// the planned actions in order. Returns the response text.
    pub async fn user_spoke(&self, text: &str) -> String {
        self.state.record_utterance(text);
        tracing::info!(text = %text, "user spoke");

        let (response, actions) = self.think(text).await;
        self.state.record_response(&response);

        self.emit(Action::speak(response.as_str())).await;
        for action in actions {
            self.emit(action).await;
        }
        response
    }

    /// Deterministic planner first; else answer a data question from the
    /// snapshot; else a constant fallback. Never re-invokes live fetches
    /// directly: the snapshot already embeds them.
    pub async fn think(&self, text: &str) -> (String, Vec<Action>) {
        if let Some(plan) = planner::plan(text) {
            if !plan.actions.is_empty() {
                return (plan.response, plan.actions);
            }
        }

        let lower = text.to_lowercase();
        if let Some(intent) = detect_data_intent(&lower) {
            return (self.answer_with_snapshot(intent).await, Vec::new());
        }

        (FALLBACK_RESPONSE.to_string(), Vec::new())
    }

    async fn emit(&self, action: Action) {
        let kind = action.kind();
        if let Err(error) = self.executor.execute(action).await {
            tracing::warn!(action = %kind, error = %error, "action execution failed");
        }
    }

    async fn answer_with_snapshot(&self, intent: DataIntent) -> String {
        let snapshot = match self.snapshots.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(error = %error, "snapshot failed while answering");
                return SNAPSHOT_ERROR_RESPONSE.to_string();
            }
        };
        match intent {
            DataIntent::Weather => answer_weather(&snapshot),
            DataIntent::News => answer_news(&snapshot),
            DataIntent::Stocks => answer_stocks(&snapshot),
            DataIntent::Overview => answer_overview(&snapshot),
            DataIntent::QuoteReading => answer_quote(&snapshot),
        }
    }
}

// ── Per-intent answer templates ──────────────────────────────────

fn answer_weather(snapshot: &Snapshot) -> String {
    let weather = &snapshot.widgets.weather;
    if !weather.enabled {
        return "Weather is turned off on the mirror.".into();
    }
    match (weather.temperature_f, weather.description.as_deref()) {
        (Some(temp), Some(description)) if !description.is_empty() => {
            format!("{description}, about {temp:.0} degrees.")
        }
        (None, Some(description)) if !description.is_empty() => description.to_string(),
        (Some(temp), _) => format!("Around {temp:.0} degrees."),
        _ => "I don't see live weather data on the mirror right now.".into(),
    }
}

fn answer_news(snapshot: &Snapshot) -> String {
    let news = &snapshot.widgets.news;
    if !news.enabled {
        return "News is hidden on the mirror.".into();
    }
    if news.headlines.is_empty() {
        return "No headlines are showing right now.".into();
    }
    let titles: Vec<&str> = news
        .headlines
        .iter()
        .take(2)
        .map(|article| article.title.as_str())
        .collect();
    format!("Top headlines: {}", titles.join("; "))
}

fn answer_stocks(snapshot: &Snapshot) -> String {
    let stocks = &snapshot.widgets.stocks;
    if !stocks.enabled {
        return "Stocks are hidden on the mirror.".into();
    }
    if stocks.watchlist.is_empty() {
        return "I don't see stock quotes on the mirror right now.".into();
    }
    let mut parts: Vec<String> = Vec::new();
    for quote in stocks.watchlist.iter().take(3) {
        let symbol = quote.symbol.to_uppercase();
        let Some(price) = quote.price else { continue };
        match quote.change_percent {
            Some(change) => {
                let direction = if change > 0.0 {
                    "up"
                } else if change < 0.0 {
                    "down"
                } else {
                    "flat"
                };
                parts.push(format!(
                    "{symbol} {direction} {:.1}% at ${price:.2}.",
                    change.abs()
                ));
            }
            None => parts.push(format!("{symbol} at ${price:.2}.")),
        }
    }
    if parts.is_empty() {
        "Stocks are loading, but I don't have clean moves yet.".into()
    } else {
        parts.join(" ")
    }
}

fn answer_overview(snapshot: &Snapshot) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let weather = &snapshot.widgets.weather;
    if weather.enabled {
        if let Some(temp) = weather.temperature_f {
            let description = weather.description.as_deref().unwrap_or("Weather");
            pieces.push(format!("{description} {temp:.0}°."));
        }
    }
    let today = &snapshot.widgets.today;
    if today.enabled && !today.items.is_empty() {
        pieces.push(format!("{} item(s) on Today.", today.items.len()));
    }
    if pieces.is_empty() {
        "Nothing major on the mirror right now.".into()
    } else {
        pieces.join(" ")
    }
}

fn answer_quote(snapshot: &Snapshot) -> String {
    let quotes = &snapshot.widgets.quotes;
    if !quotes.enabled {
        return "Quotes are turned off on the mirror.".into();
    }
    let Some(current) = quotes.current_quote.as_ref().filter(|q| !q.quote.is_empty()) else {
        return "I don't see a quote on the mirror right now.".into();
    };
    match current.author.as_deref() {
        Some(author) if !author.is_empty() => {
            format!("{} That's from {author}.", current.quote)
        }
        _ => current.quote.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_table_order_is_fixed() {
        assert_eq!(detect_data_intent("how is tesla doing"), Some(DataIntent::Stocks));
        assert_eq!(detect_data_intent("any headlines"), Some(DataIntent::News));
        assert_eq!(detect_data_intent("is it raining"), Some(DataIntent::Weather));
        assert_eq!(
            detect_data_intent("whats going on"),
            Some(DataIntent::Overview)
        );
        assert_eq!(
            detect_data_intent("read the quote"),
            Some(DataIntent::QuoteReading)
        );
        assert_eq!(detect_data_intent("open the garage"), None);
        // stocks keywords win when several tables could match
        assert_eq!(
            detect_data_intent("news about nvidia"),
            Some(DataIntent::Stocks)
        );
    }
}
