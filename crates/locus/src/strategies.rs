//! Native locator queries built from a selector's direct predicates

use crate::hierarchy::Platform;
use crate::selector::Selector;
use crate::text_pattern::{pattern_body, text_pattern};
use std::fmt;

pub const ANDROID_UIAUTOMATOR: &str = "-android uiautomator";
pub const IOS_PREDICATE: &str = "-ios predicate string";
pub const CLASS_NAME: &str = "class name";

/// One native query expression sent to the automation server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorStrategy {
    pub strategy: String,
    pub value: String,
}

impl LocatorStrategy {
    pub fn new(strategy: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.value)
    }
}

/// Which accessibility property a text query targets.
#[derive(Debug, Clone, Copy)]
enum TextField {
    Text,
    Description,
}

/// Ordered queries for `selector`: text-match then description-match (each
/// combined with the id), the id alone when there is no text, CSS last.
pub fn build_strategies(selector: &Selector, platform: Platform) -> Vec<LocatorStrategy> {
    let id = selector.id_value();
    let mut out = Vec::new();

    match selector.text_value() {
        Some(text) => {
            for field in [TextField::Text, TextField::Description] {
                out.push(native_query(platform, selector, id, Some((field, text))));
            }
        }
        None if id.is_some() || selector.has_state() => {
            out.push(native_query(platform, selector, id, None));
        }
        None => {}
    }

    if let Some(css) = selector.css_value() {
        out.push(LocatorStrategy::new(CLASS_NAME, css));
    }
    out
}

fn native_query(
    platform: Platform,
    selector: &Selector,
    id: Option<&str>,
    text: Option<(TextField, &str)>,
) -> LocatorStrategy {
    match platform {
        Platform::Android => LocatorStrategy::new(ANDROID_UIAUTOMATOR, ui_selector(selector, id, text)),
        Platform::Ios => LocatorStrategy::new(IOS_PREDICATE, ios_predicate(selector, id, text)),
    }
}

fn ui_selector(selector: &Selector, id: Option<&str>, text: Option<(TextField, &str)>) -> String {
    let mut query = String::from("new UiSelector()");
    if let Some(id) = id {
        let pattern = format!(".*{}.*", regex::escape(id));
        query.push_str(&format!(".resourceIdMatches(\"{}\")", java_escape(&pattern)));
    }
    if let Some((field, text)) = text {
        let method = match field {
            TextField::Text => "textMatches",
            TextField::Description => "descriptionMatches",
        };
        query.push_str(&format!(".{method}(\"{}\")", java_escape(&text_pattern(text))));
    }
    for (method, flag) in [
        ("enabled", selector.enabled),
        ("selected", selector.selected),
        ("focused", selector.focused),
        ("checked", selector.checked),
    ] {
        if let Some(flag) = flag {
            query.push_str(&format!(".{method}({flag})"));
        }
    }
    query
}

fn ios_predicate(selector: &Selector, id: Option<&str>, text: Option<(TextField, &str)>) -> String {
    let mut clauses = Vec::new();
    if let Some(id) = id {
        clauses.push(format!("name CONTAINS '{}'", predicate_escape(id)));
    }
    if let Some((field, text)) = text {
        let attribute = match field {
            TextField::Text => "value",
            TextField::Description => "label",
        };
        clauses.push(format!(
            "{attribute} MATCHES[c] '{}'",
            predicate_escape(&pattern_body(text))
        ));
    }
    // XCUITest has no separate checked state; it reads as selected
    for (attribute, flag) in [
        ("enabled", selector.enabled),
        ("selected", selector.selected),
        ("hasFocus", selector.focused),
        ("selected", selector.checked),
    ] {
        if let Some(flag) = flag {
            clauses.push(format!("{attribute} == {}", u8::from(flag)));
        }
    }
    clauses.join(" AND ")
}

fn java_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn predicate_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
