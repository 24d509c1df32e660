//! Deterministic utterance planner.
//!
//! Ordered rule groups over a lower-cased utterance; the first matching
//! group wins and short-circuits. No randomness, no external state: the same
//! input always yields the same plan. `None` tells the caller to fall back
//! to open-ended handling.

use crate::actions::{Action, DisplayPatch};
use crate::config::{OsMode, Widget};

/// A matched response plus the actions that implement it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub response: String,
    pub actions: Vec<Action>,
}

impl Plan {
    fn one(response: impl Into<String>, action: Action) -> Option<Plan> {
        Some(Plan {
            response: response.into(),
            actions: vec![action],
        })
    }
}

type Rule = fn(&str) -> Option<Plan>;

/// Rule groups in priority order. Order is load-bearing: "turn off the
/// display" must hit the sleep rule before the hide rule sees "turn off",
/// and "show the markets" must hit the mode rule before the show rule.
const RULES: [Rule; 11] = [
    rule_sleep,
    rule_wake_display,
    rule_os_mode,
    rule_replace,
    rule_swap,
    rule_remove_or_hide,
    rule_add_or_show,
    rule_font,
    rule_accent,
    rule_quote_categories,
    rule_quote_refresh,
];

pub fn plan(utterance: &str) -> Option<Plan> {
    let lower = utterance.trim().to_lowercase();
    RULES.iter().find_map(|rule| rule(&lower))
}

// ── Widget-name resolution ───────────────────────────────────────

/// Alias → widget, consulted only when no exact widget name is present.
/// First hit wins; table order matters.
const WIDGET_ALIASES: &[(&str, Widget)] = &[
    ("time", Widget::Clock),
    ("temp", Widget::Weather),
    ("temperature", Widget::Weather),
    ("tasks", Widget::Today),
    ("to do", Widget::Today),
    ("todo", Widget::Today),
    ("waves", Widget::Surf),
    ("headlines", Widget::News),
    ("stock", Widget::Stocks),
    ("market", Widget::Stocks),
    ("portfolio", Widget::Stocks),
    ("watchlist", Widget::Stocks),
    ("quote", Widget::Quotes),
    ("inspiration", Widget::Quotes),
    ("wisdom", Widget::Quotes),
    ("alarm", Widget::Alarms),
];

fn match_widget(text: &str) -> Option<Widget> {
    for widget in Widget::ALL {
        if text.contains(&widget.to_string()) {
            return Some(widget);
        }
    }
    for (alias, widget) in WIDGET_ALIASES {
        if text.contains(alias) {
            return Some(*widget);
        }
    }
    None
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn wants_all(text: &str) -> bool {
    text.contains("all") || text.contains("everything")
}

// ── Rule groups ──────────────────────────────────────────────────

const SLEEP_PHRASES: &[&str] = &[
    "go to sleep",
    "sleep mode",
    "sleep now",
    "turn off the display",
    "screen off",
];

fn rule_sleep(lower: &str) -> Option<Plan> {
    if contains_any(lower, SLEEP_PHRASES) {
        return Plan::one("Going to sleep.", Action::set_display(DisplayPatch::sleep(true)));
    }
    None
}

const WAKE_PHRASES: &[&str] = &[
    "wake up",
    "wake",
    "come back on",
    "screen on",
    "turn on the display",
];

fn rule_wake_display(lower: &str) -> Option<Plan> {
    if contains_any(lower, WAKE_PHRASES) {
        return Plan::one("I'm awake.", Action::set_display(DisplayPatch::sleep(false)));
    }
    None
}

fn rule_os_mode(lower: &str) -> Option<Plan> {
    if lower.contains("focus mode") || lower.contains("deep work") {
        return Plan::one("Entering focus mode.", Action::set_mode(OsMode::Focus));
    }
    if lower.contains("market mode") || lower.contains("show the markets") {
        return Plan::one("Switching to market mode.", Action::set_mode(OsMode::Market));
    }
    if contains_any(lower, &["default mode", "normal mode", "back to normal"]) {
        return Plan::one("Back to your default layout.", Action::set_mode(OsMode::Default));
    }
    None
}

fn rule_replace(lower: &str) -> Option<Plan> {
    if !lower.contains("replace") || !lower.contains(" with ") {
        return None;
    }
    let rest = lower.split_once("replace")?.1;
    let (from_text, to_text) = rest.split_once(" with ")?;
    let from = match_widget(from_text)?;
    let to = match_widget(to_text)?;
    if from == to {
        return None;
    }
    Some(Plan {
        response: format!("Replacing {from} with {to}."),
        actions: vec![
            Action::set_widget_visibility(from, false),
            Action::set_widget_visibility(to, true),
        ],
    })
}

fn rule_swap(lower: &str) -> Option<Plan> {
    if !lower.contains("swap") || !lower.contains(" and ") {
        return None;
    }
    let rest = lower.split_once("swap")?.1;
    let (a_text, b_text) = rest.split_once(" and ")?;
    let a = match_widget(a_text)?;
    let b = match_widget(b_text)?;
    if a == b {
        return None;
    }
    Some(Plan {
        response: format!("Swapping {a} and {b}."),
        actions: vec![
            Action::set_widget_visibility(a, true),
            Action::set_widget_visibility(b, true),
        ],
    })
}

const REMOVE_TRIGGERS: &[&str] = &["remove ", "delete ", "get rid of "];
const HIDE_TRIGGERS: &[&str] = &["hide ", "turn off", "disable "];

fn rule_remove_or_hide(lower: &str) -> Option<Plan> {
    let removing = contains_any(lower, REMOVE_TRIGGERS);
    if !removing && !contains_any(lower, HIDE_TRIGGERS) {
        return None;
    }
    if wants_all(lower) {
        let response = if removing {
            "Okay. Removing everything."
        } else {
            "Okay. Hiding everything."
        };
        return Plan::one(response, Action::set_all_widgets(false));
    }
    let widget = match_widget(lower)?;
    let response = if removing {
        format!("Removed {widget}.")
    } else {
        format!("Okay. Hiding {widget}.")
    };
    Plan::one(response, Action::set_widget_visibility(widget, false))
}

const ADD_TRIGGERS: &[&str] = &["add ", "bring back ", "restore "];
const SHOW_TRIGGERS: &[&str] = &["show ", "turn on", "enable "];

fn rule_add_or_show(lower: &str) -> Option<Plan> {
    let adding = contains_any(lower, ADD_TRIGGERS);
    if !adding && !contains_any(lower, SHOW_TRIGGERS) {
        return None;
    }
    if wants_all(lower) {
        return Plan::one("Okay. Showing everything.", Action::set_all_widgets(true));
    }
    let widget = match_widget(lower)?;
    let response = if adding {
        format!("Added {widget}.")
    } else {
        format!("Got it. Showing {widget}.")
    };
    Plan::one(response, Action::set_widget_visibility(widget, true))
}

const ALLOWED_FONTS: &[&str] = &["serif", "sans", "futuristic"];

fn rule_font(lower: &str) -> Option<Plan> {
    if !lower.contains("font") && !lower.contains("typeface") {
        return None;
    }
    let font = ALLOWED_FONTS.iter().find(|f| lower.contains(*f))?;
    Plan::one(
        format!("Font set to {font}."),
        Action::set_display(DisplayPatch {
            font_style: Some((*font).to_string()),
            ..DisplayPatch::default()
        }),
    )
}

const ALLOWED_ACCENTS: &[&str] = &["white", "gold", "silver"];

fn rule_accent(lower: &str) -> Option<Plan> {
    if !lower.contains("accent") {
        return None;
    }
    let accent = ALLOWED_ACCENTS.iter().find(|c| lower.contains(*c))?;
    Plan::one(
        format!("Accent set to {accent}."),
        Action::set_display(DisplayPatch {
            accent_color: Some((*accent).to_string()),
            ..DisplayPatch::default()
        }),
    )
}

/// Keyword → category. Multi-match, collected in table order.
const QUOTE_CATEGORIES: &[(&str, &str)] = &[
    ("inspirational", "inspirational"),
    ("wisdom", "wisdom"),
    ("philosophy", "philosophy"),
    ("life", "life"),
    ("success", "success"),
    ("courage", "courage"),
    ("happiness", "happiness"),
    ("love", "love"),
    ("leadership", "leadership"),
    ("motivational", "inspirational"),
];

fn rule_quote_categories(lower: &str) -> Option<Plan> {
    if !contains_any(lower, &["show me", "add", "change to"]) || !lower.contains("quote") {
        return None;
    }
    let detected: Vec<String> = QUOTE_CATEGORIES
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| (*category).to_string())
        .collect();
    if detected.is_empty() {
        return None;
    }
    Plan::one(
        format!("Switching to {} quotes.", detected.join(", ")),
        Action::set_quote_categories(detected),
    )
}

const QUOTE_REFRESH_PHRASES: &[&str] = &[
    "new quote",
    "another quote",
    "different quote",
    "refresh quote",
    "give me a new quote",
];

fn rule_quote_refresh(lower: &str) -> Option<Plan> {
    if contains_any(lower, QUOTE_REFRESH_PHRASES) {
        return Plan::one("Getting a fresh quote for you.", Action::refresh_quote());
    }
    None
}
