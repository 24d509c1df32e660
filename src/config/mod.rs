pub mod schema;
pub mod store;

pub use schema::{
    AccentColor, AlarmItem, BackgroundMode, DisplaySettings, FontStyle, MirrorConfig, OsMode,
    QuoteRecord, StockItem, TodayItem, Weekday, Widget, WidgetPlacement, WidgetSize,
    WidgetVisibility,
};
pub use store::ConfigStore;
