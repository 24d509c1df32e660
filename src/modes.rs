use crate::config::{ConfigStore, MirrorConfig, OsMode};
use crate::error::{ModeError, Result};

/// Parse a caller-supplied mode string, rejecting anything outside the
/// closed set. This is the one validation failure that surfaces to the
/// caller (bad-request class) instead of being dropped.
pub fn parse_mode(raw: &str) -> Result<OsMode> {
    raw.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| ModeError::Invalid(raw.to_string()).into())
}

/// Apply a mode preset to the document and persist it.
///
/// Presets overwrite exactly six visibility flags (clock, today, weather,
/// surf, news, stocks), never quotes or alarms. This is the only path
/// allowed to overwrite flags rather than merge a caller patch:
///
/// - `focus`:   clock + today only;
/// - `market`:  clock + today + weather + news + stocks, surf off;
/// - `default`: flags untouched, only the mode tag changes.
pub fn apply_mode(store: &ConfigStore, mode: OsMode) -> Result<MirrorConfig> {
    store.update(|doc| {
        match mode {
            OsMode::Focus => {
                doc.widgets.clock = true;
                doc.widgets.today = true;
                doc.widgets.weather = false;
                doc.widgets.surf = false;
                doc.widgets.news = false;
                doc.widgets.stocks = false;
            }
            OsMode::Market => {
                doc.widgets.clock = true;
                doc.widgets.today = true;
                doc.widgets.weather = true;
                doc.widgets.news = true;
                doc.widgets.stocks = true;
                doc.widgets.surf = false;
            }
            OsMode::Default => {}
        }
        doc.os_mode = mode;
    })
}
