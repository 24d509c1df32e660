mod support;

use lookingglass::actions::{Action, ActionOutcome, Executor};
use lookingglass::config::{
    AccentColor, FontStyle, MirrorConfig, OsMode, Widget, WidgetPlacement, WidgetSize,
};
use lookingglass::state::{AgentStateHandle, WidgetStateStore};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use support::{CapturingSpeaker, StaticQuotes, seeded_store};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    store: Arc<lookingglass::config::ConfigStore>,
    widget_state: WidgetStateStore,
    agent_state: AgentStateHandle,
    speaker: Arc<CapturingSpeaker>,
    quotes: Arc<StaticQuotes>,
    executor: Executor,
}

fn harness() -> Harness {
    harness_with(MirrorConfig::default(), StaticQuotes::empty())
}

fn harness_with(doc: MirrorConfig, quotes: Arc<StaticQuotes>) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir, &doc);
    let widget_state = WidgetStateStore::new();
    let agent_state = AgentStateHandle::new();
    let speaker = CapturingSpeaker::new();
    let executor = Executor::new(
        store.clone(),
        widget_state.clone(),
        agent_state.clone(),
        quotes.clone(),
        speaker.clone(),
    );
    Harness {
        _dir: dir,
        store,
        widget_state,
        agent_state,
        speaker,
        quotes,
        executor,
    }
}

// ── Visibility ───────────────────────────────────────────────────

#[tokio::test]
async fn set_widget_visibility_is_idempotent() {
    let h = harness();
    let action = Action::set_widget_visibility(Widget::Weather, true);
    h.executor.execute(action.clone()).await.unwrap();
    let once = h.store.load().unwrap();
    h.executor.execute(action).await.unwrap();
    let twice = h.store.load().unwrap();
    assert_eq!(once, twice);
}

#[tokio::test]
async fn set_many_widgets_skips_invalid_entries() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw(
            "set_many_widgets",
            json!({"widgets": {"news": false, "blinds": false, "stocks": "nope", "surf": false}}),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);
    let doc = h.store.load().unwrap();
    assert!(!doc.widgets.news);
    assert!(!doc.widgets.surf);
    // invalid value left untouched
    assert!(doc.widgets.stocks);
}

#[tokio::test]
async fn set_widgets_alias_behaves_identically() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw("set_widgets", json!({"widgets": {"clock": false}}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);
    assert!(!h.store.load().unwrap().widgets.clock);
}

#[tokio::test]
async fn bulk_patch_with_no_valid_entries_is_noop() {
    let h = harness();
    let before = h.store.load().unwrap();
    let outcome = h
        .executor
        .execute_raw("set_many_widgets", json!({"widgets": {"blinds": true}}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::NoOp);
    assert_eq!(h.store.load().unwrap(), before);
}

// ── Display patches ──────────────────────────────────────────────

#[tokio::test]
async fn display_patch_merges_one_level_deep() {
    let h = harness();
    h.executor
        .execute_raw("set_display", json!({"display": {"fontStyle": "serif"}}))
        .await
        .unwrap();
    let doc = h.store.load().unwrap();
    assert_eq!(doc.display.font_style, FontStyle::Serif);
    // sibling fields untouched by the patch
    assert_eq!(doc.display.accent_color, AccentColor::Gold);
    assert!(doc.display.show_borders);
    assert_eq!(doc.location, "San Diego");
}

#[tokio::test]
async fn invalid_font_value_is_dropped_key_by_key() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw(
            "set_display",
            json!({"display": {"fontStyle": "comicsans", "showBorders": false}}),
        )
        .await
        .unwrap();
    // the rest of the patch still applies
    assert_eq!(outcome, ActionOutcome::Applied);
    let doc = h.store.load().unwrap();
    assert_eq!(doc.display.font_style, FontStyle::Sans);
    assert!(!doc.display.show_borders);
}

#[tokio::test]
async fn display_patch_of_only_bogus_keys_is_full_noop() {
    let h = harness();
    let before = h.store.load().unwrap();
    let outcome = h
        .executor
        .execute_raw("set_display", json!({"display": {"bogusKey": "x"}}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::NoOp);
    assert_eq!(h.store.load().unwrap(), before);
}

#[tokio::test]
async fn sleep_mode_persists_through_display_patch() {
    let h = harness();
    h.executor
        .execute_raw("set_display", json!({"display": {"sleepMode": true}}))
        .await
        .unwrap();
    assert!(h.store.load().unwrap().display.sleep_mode);
}

#[tokio::test]
async fn set_font_style_action_validates() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw("set_font_style", json!({"fontStyle": "futuristic"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);
    assert_eq!(
        h.store.load().unwrap().display.font_style,
        FontStyle::Futuristic
    );

    let outcome = h
        .executor
        .execute_raw("set_font_style", json!({"fontStyle": "wingdings"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Dropped);
    assert_eq!(
        h.store.load().unwrap().display.font_style,
        FontStyle::Futuristic
    );
}

#[tokio::test]
async fn set_accent_color_action_validates() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw("set_accent_color", json!({"accentColor": "white"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);
    assert_eq!(
        h.store.load().unwrap().display.accent_color,
        AccentColor::White
    );

    let outcome = h
        .executor
        .execute_raw("set_accent_color", json!({"accentColor": "chartreuse"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Dropped);
}

// ── Modes ────────────────────────────────────────────────────────

#[tokio::test]
async fn set_mode_applies_preset_and_syncs_live_state() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw("set_mode", json!({"mode": "focus"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);
    let doc = h.store.load().unwrap();
    assert_eq!(doc.os_mode, OsMode::Focus);
    assert!(doc.widgets.clock && doc.widgets.today);
    assert!(!doc.widgets.weather && !doc.widgets.surf);
    assert!(!doc.widgets.news && !doc.widgets.stocks);
    assert_eq!(h.agent_state.mode(), OsMode::Focus);
}

#[tokio::test]
async fn invalid_mode_surfaces_an_error() {
    let h = harness();
    let result = h
        .executor
        .execute_raw("set_mode", json!({"mode": "party"}))
        .await;
    assert!(result.is_err());
    // nothing changed
    assert_eq!(h.store.load().unwrap().os_mode, OsMode::Default);
}

// ── Layout ───────────────────────────────────────────────────────

#[tokio::test]
async fn layout_patch_merges_into_existing_placement() {
    let mut doc = MirrorConfig::default();
    doc.layouts = Some(BTreeMap::from([(
        Widget::News,
        WidgetPlacement {
            position: "topRight".into(),
            size: WidgetSize::Medium,
            offset_x: 0,
            offset_y: 0,
        },
    )]));
    let h = harness_with(doc, StaticQuotes::empty());

    h.executor
        .execute_raw(
            "set_layout",
            json!({"widget": "news", "layout": {"size": "large", "offsetX": 12}}),
        )
        .await
        .unwrap();

    let doc = h.store.load().unwrap();
    let placement = &doc.layouts.unwrap()[&Widget::News];
    // merged, not replaced
    assert_eq!(placement.position, "topRight");
    assert_eq!(placement.size, WidgetSize::Large);
    assert_eq!(placement.offset_x, 12);
}

#[tokio::test]
async fn partial_layout_patch_without_placement_is_dropped() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw(
            "set_layout",
            json!({"widget": "news", "layout": {"offsetX": 12}}),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Dropped);
}

// ── Replace ──────────────────────────────────────────────────────

#[tokio::test]
async fn replace_widget_swaps_visibility_and_migrates_layout() {
    let mut doc = MirrorConfig::default();
    doc.widgets.weather = false;
    doc.layouts = Some(BTreeMap::from([(
        Widget::Clock,
        WidgetPlacement {
            position: "topLeft".into(),
            size: WidgetSize::Small,
            offset_x: 0,
            offset_y: 0,
        },
    )]));
    let h = harness_with(doc, StaticQuotes::empty());

    let outcome = h
        .executor
        .execute_raw("replace_widget", json!({"from": "clock", "to": "weather"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);

    let doc = h.store.load().unwrap();
    assert!(!doc.widgets.clock);
    assert!(doc.widgets.weather);
    let layouts = doc.layouts.unwrap();
    assert_eq!(layouts[&Widget::Weather].position, "topLeft");
}

#[tokio::test]
async fn replace_widget_identical_pair_is_dropped() {
    let h = harness();
    let outcome = h
        .executor
        .execute_raw("replace_widget", json!({"from": "news", "to": "news"}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Dropped);
    assert!(h.store.load().unwrap().widgets.news);
}

// ── Quotes ───────────────────────────────────────────────────────

#[tokio::test]
async fn set_quote_categories_replaces_wholesale() {
    let h = harness();
    h.executor
        .execute_raw(
            "set_quote_categories",
            json!({"categories": ["philosophy"]}),
        )
        .await
        .unwrap();
    assert_eq!(
        h.store.load().unwrap().quotes_categories,
        vec!["philosophy"]
    );
}

#[tokio::test]
async fn refresh_quote_stores_fetched_quote() {
    let quotes = StaticQuotes::with_quote("Fortune favors the bold.", Some("Virgil"));
    let h = harness_with(MirrorConfig::default(), quotes);

    let outcome = h.executor.execute(Action::refresh_quote()).await.unwrap();
    assert_eq!(outcome, ActionOutcome::Applied);
    assert_eq!(h.quotes.call_count(), 1);
    // fetch saw the document's configured categories
    assert_eq!(
        h.quotes.seen_categories.lock().unwrap()[0],
        vec!["inspirational", "wisdom"]
    );
    let doc = h.store.load().unwrap();
    assert_eq!(doc.current_quote.unwrap().quote, "Fortune favors the bold.");
}

#[tokio::test]
async fn failed_quote_fetch_keeps_previous_quote() {
    let mut doc = MirrorConfig::default();
    doc.current_quote = Some(lookingglass::config::QuoteRecord {
        quote: "Old but gold.".into(),
        author: None,
        category: None,
    });
    let h = harness_with(doc, StaticQuotes::empty());

    let outcome = h.executor.execute(Action::refresh_quote()).await.unwrap();
    assert_eq!(outcome, ActionOutcome::NoOp);
    assert_eq!(
        h.store.load().unwrap().current_quote.unwrap().quote,
        "Old but gold."
    );
}

// ── Ephemeral + side-effect actions ──────────────────────────────

#[tokio::test]
async fn speak_emits_without_touching_state() {
    let h = harness();
    let before = h.store.load().unwrap();
    h.executor
        .execute(Action::speak("Hello there."))
        .await
        .unwrap();
    assert_eq!(h.speaker.spoken(), vec!["Hello there."]);
    assert_eq!(h.store.load().unwrap(), before);
}

#[tokio::test]
async fn update_widget_writes_ephemeral_state_only() {
    let h = harness();
    let before = h.store.load().unwrap();
    h.executor
        .execute(Action::update_widget("system", json!({"status": "listening"})))
        .await
        .unwrap();
    assert_eq!(
        h.widget_state.get("system"),
        Some(json!({"status": "listening"}))
    );
    assert_eq!(h.store.load().unwrap(), before);
}

// ── Unknown / malformed ──────────────────────────────────────────

#[tokio::test]
async fn unknown_action_is_a_harmless_noop() {
    let h = harness();
    let before = h.store.load().unwrap();
    let outcome = h
        .executor
        .execute_raw("nonexistent_action", json!({}))
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::NoOp);
    assert_eq!(h.store.load().unwrap(), before);
    assert!(h.widget_state.all().is_empty());
    assert!(h.speaker.spoken().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_dropped_without_error() {
    let h = harness();
    let before = h.store.load().unwrap();
    let outcome = h
        .executor
        .execute_raw(
            "set_widget_visibility",
            json!({"widget": "weather", "enabled": "definitely"}),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::NoOp);
    assert_eq!(h.store.load().unwrap(), before);
}
