use crate::config::OsMode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ── Ephemeral widget state ───────────────────────────────────────

/// Process-wide transient per-widget data. Keys are free-form widget names
/// (the "system" listening indicator is not a config widget). Never
/// persisted; reset on restart.
#[derive(Clone, Default)]
pub struct WidgetStateStore {
    inner: Arc<Mutex<HashMap<String, Value>>>,
}

impl WidgetStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, widget: &str, data: Value) {
        self.lock().insert(widget.to_string(), data);
    }

    pub fn get(&self, widget: &str) -> Option<Value> {
        self.lock().get(widget).cloned()
    }

    pub fn all(&self) -> HashMap<String, Value> {
        self.lock().clone()
    }
}

// ── Agent interaction state ──────────────────────────────────────

#[derive(Debug, Default)]
struct AgentState {
    /// None until some entry point applies a mode in this process; the
    /// persisted document's tag is the fallback until then.
    os_mode: Option<OsMode>,
    last_wake: Option<DateTime<Utc>>,
    last_utterance: Option<String>,
    last_response: Option<String>,
}

/// Read-only view of the interaction state for the snapshot builder and any
/// outward surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionView {
    pub os_mode: OsMode,
    pub last_wake: Option<DateTime<Utc>>,
    pub last_utterance: Option<String>,
    pub last_response: Option<String>,
}

/// Cheap-clone handle over the process-wide interaction record.
///
/// The live `os_mode` here is the source of truth; the persisted document's
/// mode tag is the fallback when a fresh process has not applied a mode yet.
#[derive(Clone, Default)]
pub struct AgentStateHandle {
    inner: Arc<Mutex<AgentState>>,
}

impl AgentStateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AgentState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mark_wake(&self) {
        self.lock().last_wake = Some(Utc::now());
    }

    pub fn record_utterance(&self, text: &str) {
        self.lock().last_utterance = Some(text.to_string());
    }

    pub fn record_response(&self, text: &str) {
        self.lock().last_response = Some(text.to_string());
    }

    pub fn set_mode(&self, mode: OsMode) {
        self.lock().os_mode = Some(mode);
    }

    pub fn mode(&self) -> OsMode {
        self.lock().os_mode.unwrap_or_default()
    }

    /// Live mode if one has been applied in this process, else the caller's
    /// fallback (normally the persisted document's tag).
    pub fn mode_or(&self, fallback: OsMode) -> OsMode {
        self.lock().os_mode.unwrap_or(fallback)
    }

    pub fn view(&self) -> InteractionView {
        let state = self.lock();
        InteractionView {
            os_mode: state.os_mode.unwrap_or_default(),
            last_wake: state.last_wake,
            last_utterance: state.last_utterance.clone(),
            last_response: state.last_response.clone(),
        }
    }
}
