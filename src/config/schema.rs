use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Widget keys ──────────────────────────────────────────────────

/// Closed set of UI panels the mirror can show.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Widget {
    Clock,
    Weather,
    Today,
    Surf,
    News,
    Stocks,
    Quotes,
    Alarms,
}

impl Widget {
    /// All widgets, in declared order. Resolution and "all" expansion walk
    /// this array so the result is deterministic.
    pub const ALL: [Widget; 8] = [
        Widget::Clock,
        Widget::Weather,
        Widget::Today,
        Widget::Surf,
        Widget::News,
        Widget::Stocks,
        Widget::Quotes,
        Widget::Alarms,
    ];

    pub fn from_name(name: &str) -> Option<Widget> {
        name.trim().to_lowercase().parse().ok()
    }
}

// ── OS mode ──────────────────────────────────────────────────────

/// Named bundle of widget-visibility defaults. The preset effects live in
/// [`crate::modes`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OsMode {
    #[default]
    Default,
    Focus,
    Market,
}

// ── Widget visibility ────────────────────────────────────────────

/// One boolean per widget. Older documents may omit fields; they default on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetVisibility {
    pub clock: bool,
    pub weather: bool,
    pub today: bool,
    pub surf: bool,
    pub news: bool,
    pub stocks: bool,
    pub quotes: bool,
    pub alarms: bool,
}

impl Default for WidgetVisibility {
    fn default() -> Self {
        Self {
            clock: true,
            weather: true,
            today: true,
            surf: true,
            news: true,
            stocks: true,
            quotes: true,
            alarms: true,
        }
    }
}

impl WidgetVisibility {
    pub fn get(&self, widget: Widget) -> bool {
        match widget {
            Widget::Clock => self.clock,
            Widget::Weather => self.weather,
            Widget::Today => self.today,
            Widget::Surf => self.surf,
            Widget::News => self.news,
            Widget::Stocks => self.stocks,
            Widget::Quotes => self.quotes,
            Widget::Alarms => self.alarms,
        }
    }

    pub fn set(&mut self, widget: Widget, enabled: bool) {
        match widget {
            Widget::Clock => self.clock = enabled,
            Widget::Weather => self.weather = enabled,
            Widget::Today => self.today = enabled,
            Widget::Surf => self.surf = enabled,
            Widget::News => self.news = enabled,
            Widget::Stocks => self.stocks = enabled,
            Widget::Quotes => self.quotes = enabled,
            Widget::Alarms => self.alarms = enabled,
        }
    }
}

// ── Display settings ─────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FontStyle {
    Serif,
    Sans,
    Futuristic,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccentColor {
    White,
    Gold,
    Silver,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BackgroundMode {
    Off,
    EdgesStatic,
    TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    /// Theme name, free-form ("midnight", "chrome", "custom", ...).
    pub theme: String,
    pub font_style: FontStyle,
    pub accent_color: AccentColor,
    pub show_borders: bool,
    /// "glass" | "outline" | "minimal"
    pub card_style: String,
    pub background_mode: BackgroundMode,
    /// TTS voice preset for the assistant.
    pub voice_preset: String,
    /// When true the display shows a black screen.
    pub sleep_mode: bool,
    /// Edge glow strength, 0..=1.
    pub ambient_intensity: f64,
    /// "classic" | "minimal" | "infoDense"
    pub layout_preset: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            theme: "midnight".into(),
            font_style: FontStyle::Sans,
            accent_color: AccentColor::Gold,
            show_borders: true,
            card_style: "glass".into(),
            background_mode: BackgroundMode::TimeOfDay,
            voice_preset: "verse".into(),
            sleep_mode: false,
            ambient_intensity: 0.85,
            layout_preset: "classic".into(),
        }
    }
}

// ── Layout ───────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPlacement {
    /// e.g. "topLeft", "middleCenter", or shorthand "top"/"center"/"bottom".
    pub position: String,
    pub size: WidgetSize,
    #[serde(default)]
    pub offset_x: i64,
    #[serde(default)]
    pub offset_y: i64,
}

// ── List items ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayItem {
    #[serde(default)]
    pub time: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub quote: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmItem {
    pub id: String,
    /// "HH:MM", 24-hour.
    pub time: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_true() -> bool {
    true
}

// ── The persisted document ───────────────────────────────────────

/// The single persisted configuration document.
///
/// Unknown fields in older/newer files are ignored; missing fields take the
/// defaults below (in particular `osMode` backfills to "default" for files
/// written before modes existed). Every write replaces the whole document;
/// callers patch an in-memory copy and save it back in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirrorConfig {
    pub os_mode: OsMode,
    pub location: String,
    pub widgets: WidgetVisibility,
    pub display: DisplaySettings,
    pub layouts: Option<BTreeMap<Widget, WidgetPlacement>>,
    pub today_items: Vec<TodayItem>,
    pub stocks_items: Vec<StockItem>,
    pub alarm_items: Vec<AlarmItem>,
    pub quotes_categories: Vec<String>,
    pub current_quote: Option<QuoteRecord>,
    pub news_categories: Vec<String>,
    /// Credential overrides; absent names fall back to the environment.
    pub api_keys: Option<BTreeMap<String, String>>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            os_mode: OsMode::Default,
            location: "San Diego".into(),
            widgets: WidgetVisibility::default(),
            display: DisplaySettings::default(),
            layouts: None,
            today_items: Vec::new(),
            stocks_items: Vec::new(),
            alarm_items: Vec::new(),
            quotes_categories: vec!["inspirational".into(), "wisdom".into()],
            current_quote: None,
            news_categories: vec!["technology".into(), "business".into()],
            api_keys: None,
        }
    }
}

impl MirrorConfig {
    /// Stock symbols, cleaned the way the fetch layer expects them.
    pub fn stock_symbols(&self) -> Vec<String> {
        self.stocks_items
            .iter()
            .filter_map(|item| {
                let sym = item.symbol.trim().to_uppercase();
                if sym.is_empty() { None } else { Some(sym) }
            })
            .collect()
    }
}
