use super::{Action, ActionOutcome, DisplayPatch, LayoutPatch};
use crate::config::{
    AccentColor, BackgroundMode, ConfigStore, FontStyle, Widget, WidgetPlacement, WidgetSize,
};
use crate::error::Result;
use crate::fetch::QuoteFetch;
use crate::modes;
use crate::state::{AgentStateHandle, WidgetStateStore};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

// ── Speak output ─────────────────────────────────────────────────

/// Where `speak` actions land. The TTS pipeline is an external collaborator;
/// in-process consumers (CLI, tests) just need the text.
pub trait SpeakSink: Send + Sync {
    fn speak(&self, text: &str);
}

/// Default sink: emit the line to the log.
pub struct LogSpeaker;

impl SpeakSink for LogSpeaker {
    fn speak(&self, text: &str) {
        tracing::info!(text = %text, "speak");
    }
}

// ── Executor ─────────────────────────────────────────────────────

/// Applies structured actions to the configuration document and the
/// ephemeral widget state.
///
/// Malformed payloads are dropped with a log line, never surfaced, since
/// actions originate from best-effort text parsing. The two exceptions, per
/// the error taxonomy: an invalid mode string and document I/O failures,
/// both of which the caller must see.
pub struct Executor {
    store: Arc<ConfigStore>,
    widget_state: WidgetStateStore,
    agent_state: AgentStateHandle,
    quotes: Arc<dyn QuoteFetch>,
    speaker: Arc<dyn SpeakSink>,
}

impl Executor {
    pub fn new(
        store: Arc<ConfigStore>,
        widget_state: WidgetStateStore,
        agent_state: AgentStateHandle,
        quotes: Arc<dyn QuoteFetch>,
        speaker: Arc<dyn SpeakSink>,
    ) -> Self {
        Self {
            store,
            widget_state,
            agent_state,
            quotes,
            speaker,
        }
    }

    /// Wire boundary for untyped callers: unknown types and malformed
    /// payloads are logged and ignored.
    pub async fn execute_raw(&self, kind: &str, payload: Value) -> Result<ActionOutcome> {
        match Action::from_raw(kind, payload) {
            Some(action) => self.execute(action).await,
            None => {
                tracing::warn!(action = %kind, "unknown or malformed action, ignoring");
                Ok(ActionOutcome::NoOp)
            }
        }
    }

    pub async fn execute(&self, action: Action) -> Result<ActionOutcome> {
        match action {
            Action::Speak { text } => {
                self.speaker.speak(&text);
                Ok(ActionOutcome::Applied)
            }

            Action::UpdateWidget { widget, data } => {
                let widget = widget.trim();
                if widget.is_empty() {
                    tracing::debug!("update_widget without a widget name, dropping");
                    return Ok(ActionOutcome::Dropped);
                }
                self.widget_state.set(widget, data);
                Ok(ActionOutcome::Applied)
            }

            Action::SetTheme { theme } => {
                if theme.trim().is_empty() {
                    return Ok(ActionOutcome::Dropped);
                }
                self.store.update(|doc| doc.display.theme = theme)?;
                Ok(ActionOutcome::Applied)
            }

            Action::SetMode { mode } => {
                let mode = modes::parse_mode(&mode)?;
                modes::apply_mode(&self.store, mode)?;
                // keep the live tier aligned with the document
                self.agent_state.set_mode(mode);
                Ok(ActionOutcome::Applied)
            }

            Action::SetWidgetVisibility { widget, enabled } => {
                self.store.update(|doc| doc.widgets.set(widget, enabled))?;
                Ok(ActionOutcome::Applied)
            }

            Action::SetManyWidgets { widgets } => {
                let valid: Vec<(Widget, bool)> = widgets
                    .iter()
                    .filter_map(|(name, value)| {
                        match (Widget::from_name(name), value.as_bool()) {
                            (Some(widget), Some(enabled)) => Some((widget, enabled)),
                            _ => {
                                tracing::debug!(entry = %name, "skipping invalid widget entry");
                                None
                            }
                        }
                    })
                    .collect();
                if valid.is_empty() {
                    return Ok(ActionOutcome::NoOp);
                }
                self.store.update(|doc| {
                    for (widget, enabled) in valid {
                        doc.widgets.set(widget, enabled);
                    }
                })?;
                Ok(ActionOutcome::Applied)
            }

            Action::SetFontStyle { font_style } => {
                let Ok(font) = font_style.trim().to_lowercase().parse::<FontStyle>() else {
                    tracing::warn!(value = %font_style, "invalid font style, dropping");
                    return Ok(ActionOutcome::Dropped);
                };
                self.store.update(|doc| doc.display.font_style = font)?;
                Ok(ActionOutcome::Applied)
            }

            Action::SetAccentColor { accent_color } => {
                let Ok(accent) = accent_color.trim().to_lowercase().parse::<AccentColor>() else {
                    tracing::warn!(value = %accent_color, "invalid accent color, dropping");
                    return Ok(ActionOutcome::Dropped);
                };
                self.store.update(|doc| doc.display.accent_color = accent)?;
                Ok(ActionOutcome::Applied)
            }

            Action::SetDisplay { display } => self.patch_display(display),

            Action::SetLayout { widget, layout } => self.patch_layout(widget, &layout),

            Action::ReplaceWidget {
                from_widget,
                to_widget,
            } => {
                if from_widget == to_widget {
                    tracing::debug!(widget = %from_widget, "replace_widget with identical pair, dropping");
                    return Ok(ActionOutcome::Dropped);
                }
                self.store.update(|doc| {
                    doc.widgets.set(from_widget, false);
                    doc.widgets.set(to_widget, true);
                    // the new widget takes over the old one's spot
                    if let Some(layouts) = doc.layouts.as_mut() {
                        if let Some(placement) = layouts.get(&from_widget).cloned() {
                            layouts.insert(to_widget, placement);
                        }
                    }
                })?;
                Ok(ActionOutcome::Applied)
            }

            Action::SetQuoteCategories { categories } => {
                self.store.update(|doc| doc.quotes_categories = categories)?;
                Ok(ActionOutcome::Applied)
            }

            Action::RefreshQuote {} => {
                let categories = self.store.load()?.quotes_categories;
                match self.quotes.random(&categories).await {
                    Some(quote) => {
                        self.store.update(|doc| doc.current_quote = Some(quote))?;
                        Ok(ActionOutcome::Applied)
                    }
                    None => {
                        // keep showing the previous quote
                        tracing::debug!("quote refresh returned nothing, keeping current quote");
                        Ok(ActionOutcome::NoOp)
                    }
                }
            }
        }
    }

    /// One-level merge into `display`, enum-backed fields validated
    /// individually: an invalid font/accent/background value drops that key,
    /// the rest of the patch still applies.
    fn patch_display(&self, mut patch: DisplayPatch) -> Result<ActionOutcome> {
        let font = match patch.font_style.take() {
            Some(raw) => match raw.trim().to_lowercase().parse::<FontStyle>() {
                Ok(font) => Some(font),
                Err(_) => {
                    tracing::warn!(value = %raw, "invalid font style in display patch, dropping key");
                    None
                }
            },
            None => None,
        };
        let accent = match patch.accent_color.take() {
            Some(raw) => match raw.trim().to_lowercase().parse::<AccentColor>() {
                Ok(accent) => Some(accent),
                Err(_) => {
                    tracing::warn!(value = %raw, "invalid accent color in display patch, dropping key");
                    None
                }
            },
            None => None,
        };
        let background = match patch.background_mode.take() {
            Some(raw) => match raw.trim().parse::<BackgroundMode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    tracing::warn!(value = %raw, "invalid background mode in display patch, dropping key");
                    None
                }
            },
            None => None,
        };

        if patch.is_empty() && font.is_none() && accent.is_none() && background.is_none() {
            return Ok(ActionOutcome::NoOp);
        }

        self.store.update(|doc| {
            let display = &mut doc.display;
            if let Some(theme) = patch.theme {
                display.theme = theme;
            }
            if let Some(font) = font {
                display.font_style = font;
            }
            if let Some(accent) = accent {
                display.accent_color = accent;
            }
            if let Some(show_borders) = patch.show_borders {
                display.show_borders = show_borders;
            }
            if let Some(card_style) = patch.card_style {
                display.card_style = card_style;
            }
            if let Some(background) = background {
                display.background_mode = background;
            }
            if let Some(voice_preset) = patch.voice_preset {
                display.voice_preset = voice_preset;
            }
            if let Some(sleep_mode) = patch.sleep_mode {
                display.sleep_mode = sleep_mode;
            }
            if let Some(intensity) = patch.ambient_intensity {
                display.ambient_intensity = intensity.clamp(0.0, 1.0);
            }
            if let Some(layout_preset) = patch.layout_preset {
                display.layout_preset = layout_preset;
            }
        })?;
        Ok(ActionOutcome::Applied)
    }

    /// Merge a layout patch into the widget's existing placement. A widget
    /// with no placement yet needs at least position and size to create one.
    fn patch_layout(&self, widget: Widget, patch: &LayoutPatch) -> Result<ActionOutcome> {
        if patch.is_empty() {
            return Ok(ActionOutcome::NoOp);
        }
        let size = match patch.size.as_deref() {
            Some(raw) => match raw.trim().to_lowercase().parse::<WidgetSize>() {
                Ok(size) => Some(size),
                Err(_) => {
                    tracing::warn!(value = %raw, "invalid widget size in layout patch, dropping key");
                    None
                }
            },
            None => None,
        };

        let mut outcome = ActionOutcome::Applied;
        self.store.update(|doc| {
            let exists = doc
                .layouts
                .as_ref()
                .is_some_and(|layouts| layouts.contains_key(&widget));
            if !exists {
                match (patch.position.clone(), size) {
                    (Some(position), Some(size)) => {
                        doc.layouts.get_or_insert_with(BTreeMap::new).insert(
                            widget,
                            WidgetPlacement {
                                position,
                                size,
                                offset_x: patch.offset_x.unwrap_or(0),
                                offset_y: patch.offset_y.unwrap_or(0),
                            },
                        );
                    }
                    _ => {
                        tracing::warn!(
                            widget = %widget,
                            "partial layout patch for widget without a placement, dropping"
                        );
                        outcome = ActionOutcome::Dropped;
                    }
                }
                return;
            }
            if let Some(placement) = doc
                .layouts
                .as_mut()
                .and_then(|layouts| layouts.get_mut(&widget))
            {
                if let Some(position) = patch.position.clone() {
                    placement.position = position;
                }
                if let Some(size) = size {
                    placement.size = size;
                }
                if let Some(offset_x) = patch.offset_x {
                    placement.offset_x = offset_x;
                }
                if let Some(offset_y) = patch.offset_y {
                    placement.offset_y = offset_y;
                }
            }
        })?;
        Ok(outcome)
    }
}
