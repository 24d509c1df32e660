use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_source() -> String {
    "mirror".into()
}

/// Closed set of event kinds the dispatcher understands. Wire shape is
/// `{"type": ..., "payload": {...}}`; unknown types are rejected at the
/// parse boundary and the caller logs and ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EventKind {
    Wake {
        #[serde(default = "default_source")]
        source: String,
    },
    UserSpoke {
        text: String,
        #[serde(default = "default_source")]
        source: String,
    },
    /// Reserved hook for time-driven behaviors (alarm checks, periodic
    /// refresh) driven by external schedulers.
    Tick {},
    WidgetUpdated {
        widget: String,
        #[serde(default)]
        data: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn wake(source: impl Into<String>) -> Self {
        Self::new(EventKind::Wake {
            source: source.into(),
        })
    }

    pub fn user_spoke(text: impl Into<String>) -> Self {
        Self::new(EventKind::UserSpoke {
            text: text.into(),
            source: default_source(),
        })
    }

    pub fn tick() -> Self {
        Self::new(EventKind::Tick {})
    }

    pub fn widget_updated(widget: impl Into<String>, data: Value) -> Self {
        Self::new(EventKind::WidgetUpdated {
            widget: widget.into(),
            data,
        })
    }

    /// Wire boundary: `None` for unknown kinds or malformed payloads.
    pub fn from_raw(value: Value) -> Option<Event> {
        serde_json::from_value(value).ok()
    }
}
