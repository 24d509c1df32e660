pub mod executor;

pub use executor::{Executor, LogSpeaker, SpeakSink};

use crate::config::{OsMode, Widget};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Patches ──────────────────────────────────────────────────────

/// Partial display settings. Unknown keys disappear at deserialization;
/// enum-backed fields stay strings here so one invalid value can be dropped
/// without rejecting the rest of the patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayPatch {
    pub theme: Option<String>,
    pub font_style: Option<String>,
    pub accent_color: Option<String>,
    pub show_borders: Option<bool>,
    pub card_style: Option<String>,
    pub background_mode: Option<String>,
    pub voice_preset: Option<String>,
    pub sleep_mode: Option<bool>,
    pub ambient_intensity: Option<f64>,
    pub layout_preset: Option<String>,
}

impl DisplayPatch {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.font_style.is_none()
            && self.accent_color.is_none()
            && self.show_borders.is_none()
            && self.card_style.is_none()
            && self.background_mode.is_none()
            && self.voice_preset.is_none()
            && self.sleep_mode.is_none()
            && self.ambient_intensity.is_none()
            && self.layout_preset.is_none()
    }

    pub fn sleep(on: bool) -> Self {
        Self {
            sleep_mode: Some(on),
            ..Self::default()
        }
    }
}

/// Partial widget placement, merged into the existing layout entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPatch {
    pub position: Option<String>,
    pub size: Option<String>,
    pub offset_x: Option<i64>,
    pub offset_y: Option<i64>,
}

impl LayoutPatch {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.size.is_none()
            && self.offset_x.is_none()
            && self.offset_y.is_none()
    }
}

// ── Actions ──────────────────────────────────────────────────────

fn default_mode_payload() -> String {
    OsMode::Default.to_string()
}

/// Structured command, produced by the planner or issued directly, consumed
/// by the executor. Wire shape is `{"type": ..., "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    Speak {
        #[serde(default)]
        text: String,
    },
    /// Ephemeral per-widget data; the widget name is free-form here.
    UpdateWidget {
        widget: String,
        #[serde(default)]
        data: Value,
    },
    SetTheme {
        theme: String,
    },
    SetMode {
        #[serde(default = "default_mode_payload")]
        mode: String,
    },
    SetWidgetVisibility {
        widget: Widget,
        enabled: bool,
    },
    /// Bulk visibility patch. Kept loosely typed so invalid entries can be
    /// skipped individually instead of rejecting the whole map.
    #[serde(alias = "set_widgets")]
    SetManyWidgets {
        widgets: serde_json::Map<String, Value>,
    },
    SetFontStyle {
        #[serde(rename = "fontStyle")]
        font_style: String,
    },
    SetAccentColor {
        #[serde(rename = "accentColor")]
        accent_color: String,
    },
    SetDisplay {
        display: DisplayPatch,
    },
    SetLayout {
        widget: Widget,
        layout: LayoutPatch,
    },
    ReplaceWidget {
        #[serde(rename = "from")]
        from_widget: Widget,
        #[serde(rename = "to")]
        to_widget: Widget,
    },
    SetQuoteCategories {
        categories: Vec<String>,
    },
    RefreshQuote {},
}

impl Action {
    pub fn speak(text: impl Into<String>) -> Self {
        Action::Speak { text: text.into() }
    }

    pub fn update_widget(widget: impl Into<String>, data: Value) -> Self {
        Action::UpdateWidget {
            widget: widget.into(),
            data,
        }
    }

    pub fn set_mode(mode: OsMode) -> Self {
        Action::SetMode {
            mode: mode.to_string(),
        }
    }

    pub fn set_widget_visibility(widget: Widget, enabled: bool) -> Self {
        Action::SetWidgetVisibility { widget, enabled }
    }

    /// One visibility entry per widget, all set to `enabled` (the planner's
    /// "all"/"everything" expansion).
    pub fn set_all_widgets(enabled: bool) -> Self {
        let mut widgets = serde_json::Map::new();
        for widget in Widget::ALL {
            widgets.insert(widget.to_string(), Value::Bool(enabled));
        }
        Action::SetManyWidgets { widgets }
    }

    pub fn set_display(display: DisplayPatch) -> Self {
        Action::SetDisplay { display }
    }

    pub fn set_quote_categories(categories: Vec<String>) -> Self {
        Action::SetQuoteCategories { categories }
    }

    pub fn refresh_quote() -> Self {
        Action::RefreshQuote {}
    }

    /// Lenient wire boundary: build a typed action from `{type, payload}`
    /// parts. Returns `None` for unknown types or malformed payloads; the
    /// caller logs and ignores.
    pub fn from_raw(kind: &str, payload: Value) -> Option<Action> {
        let wire = serde_json::json!({ "type": kind, "payload": payload });
        serde_json::from_value(wire).ok()
    }

    /// Wire name of this action's type tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Speak { .. } => "speak",
            Action::UpdateWidget { .. } => "update_widget",
            Action::SetTheme { .. } => "set_theme",
            Action::SetMode { .. } => "set_mode",
            Action::SetWidgetVisibility { .. } => "set_widget_visibility",
            Action::SetManyWidgets { .. } => "set_many_widgets",
            Action::SetFontStyle { .. } => "set_font_style",
            Action::SetAccentColor { .. } => "set_accent_color",
            Action::SetDisplay { .. } => "set_display",
            Action::SetLayout { .. } => "set_layout",
            Action::ReplaceWidget { .. } => "replace_widget",
            Action::SetQuoteCategories { .. } => "set_quote_categories",
            Action::RefreshQuote {} => "refresh_quote",
        }
    }
}

// ── Outcomes ─────────────────────────────────────────────────────

/// What the executor actually did with an action. Validation drops are
/// policy, not errors; this makes them observable to callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionOutcome {
    /// State was mutated or the side effect ran.
    Applied,
    /// The payload failed validation and was dropped without mutating.
    Dropped,
    /// Nothing to do (empty patch, unknown action, empty fetch result).
    NoOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_round_trip_keeps_type_and_payload_shape() {
        let action = Action::set_widget_visibility(Widget::Weather, false);
        let wire = serde_json::to_value(&action).unwrap();
        assert_eq!(wire["type"], "set_widget_visibility");
        assert_eq!(wire["payload"]["widget"], "weather");
        assert_eq!(wire["payload"]["enabled"], false);
        let back: Action = serde_json::from_value(wire).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn from_raw_accepts_both_bulk_names() {
        let payload = json!({"widgets": {"news": false}});
        let a = Action::from_raw("set_many_widgets", payload.clone()).unwrap();
        let b = Action::from_raw("set_widgets", payload).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_raw_rejects_unknown_type_and_bad_payload() {
        assert!(Action::from_raw("nonexistent_action", json!({})).is_none());
        assert!(Action::from_raw("set_widget_visibility", json!({"widget": "blinds"})).is_none());
        assert!(
            Action::from_raw("set_widget_visibility", json!({"widget": "news", "enabled": "yes"}))
                .is_none()
        );
    }

    #[test]
    fn from_raw_defaults_missing_mode() {
        let action = Action::from_raw("set_mode", json!({})).unwrap();
        assert_eq!(
            action,
            Action::SetMode {
                mode: "default".into()
            }
        );
    }

    #[test]
    fn replace_widget_uses_from_to_keys() {
        let action = Action::from_raw("replace_widget", json!({"from": "surf", "to": "news"}))
            .unwrap();
        assert_eq!(
            action,
            Action::ReplaceWidget {
                from_widget: Widget::Surf,
                to_widget: Widget::News,
            }
        );
    }

    #[test]
    fn display_patch_drops_unknown_keys() {
        let action =
            Action::from_raw("set_display", json!({"display": {"bogusKey": "x"}})).unwrap();
        match action {
            Action::SetDisplay { display } => assert!(display.is_empty()),
            other => panic!("expected set_display, got {other:?}"),
        }
    }

    #[test]
    fn set_all_widgets_covers_every_widget() {
        match Action::set_all_widgets(false) {
            Action::SetManyWidgets { widgets } => {
                assert_eq!(widgets.len(), Widget::ALL.len());
                assert!(widgets.values().all(|v| v == &json!(false)));
            }
            other => panic!("expected set_many_widgets, got {other:?}"),
        }
    }
}
