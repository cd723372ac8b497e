//! Non-relative selector predicates

use crate::element::ParsedElement;
use crate::selector::Selector;
use crate::text_pattern::{looks_like_regex, unescape};

/// Size tolerance in pixels when the selector leaves it unset
pub const DEFAULT_TOLERANCE: i32 = 5;

/// True when `elem` satisfies every non-relative predicate `selector` sets.
///
/// Only text, id, css, size and state flags are evaluated; relations and
/// descendants are the filter engine's job. `checked` is compared against
/// the element's `selected` state. Literal text has its escaping backslashes
/// dropped before the contains check.
pub fn matches(elem: &ParsedElement, selector: &Selector) -> bool {
    if let Some(text) = selector.text_value() {
        let needle = if looks_like_regex(text) {
            text.to_lowercase()
        } else {
            unescape(text).to_lowercase()
        };
        if !elem.text.to_lowercase().contains(&needle)
            && !elem.content_desc.to_lowercase().contains(&needle)
        {
            return false;
        }
    }

    if let Some(id) = selector.id_value() {
        if !elem.resource_id.contains(id) {
            return false;
        }
    }

    // same semantics as the native `class name` query
    if let Some(css) = selector.css_value() {
        if elem.class_name != css {
            return false;
        }
    }

    let tolerance = selector.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    if selector.width > 0 && (elem.bounds.width - selector.width).abs() > tolerance {
        return false;
    }
    if selector.height > 0 && (elem.bounds.height - selector.height).abs() > tolerance {
        return false;
    }

    flag_ok(selector.enabled, elem.enabled)
        && flag_ok(selector.selected, elem.selected)
        && flag_ok(selector.focused, elem.focused)
        && flag_ok(selector.checked, elem.selected)
}

fn flag_ok(wanted: Option<bool>, actual: bool) -> bool {
    wanted.map_or(true, |w| w == actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Bounds;

    fn button() -> ParsedElement {
        ParsedElement {
            text: "Sign In".into(),
            resource_id: "com.app:id/login_button".into(),
            bounds: Bounds::new(0, 0, 200, 48),
            enabled: true,
            clickable: true,
            displayed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        assert!(matches(&button(), &Selector::default()));
    }

    #[test]
    fn test_size_within_default_tolerance() {
        assert!(matches(&button(), &Selector::default().size(203, 0)));
        assert!(matches(&button(), &Selector::default().size(195, 53)));
        assert!(!matches(&button(), &Selector::default().size(206, 0)));
        assert!(matches(
            &button(),
            &Selector::default().size(210, 0).tolerance(10)
        ));
    }

    #[test]
    fn test_escaped_literal_text_matches_unescaped() {
        let mut elem = button();
        elem.text = "Log.in".into();
        assert!(matches(&elem, &Selector::text("log\\.IN")));
        assert!(!matches(&button(), &Selector::text("Sign\\.In")));
    }

    #[test]
    fn test_css_compares_class_name() {
        let mut elem = button();
        elem.class_name = "android.widget.Button".into();
        assert!(matches(&elem, &Selector::css("android.widget.Button")));
        assert!(!matches(&elem, &Selector::css("Button")));
    }

    #[test]
    fn test_id_is_case_sensitive() {
        assert!(matches(&button(), &Selector::id("login_button")));
        assert!(!matches(&button(), &Selector::id("LOGIN_BUTTON")));
    }

    #[test]
    fn test_checked_reads_selected_state() {
        let mut elem = button();
        assert!(matches(&elem, &Selector::default().checked(false)));
        elem.selected = true;
        assert!(matches(&elem, &Selector::default().checked(true)));
        assert!(matches(&elem, &Selector::default().selected(true)));
        assert!(!matches(&elem, &Selector::default().enabled(false)));
    }

    #[test]
    fn test_all_predicates_are_anded() {
        let selector = Selector::text("sign").with_id("login").enabled(true);
        assert!(matches(&button(), &selector));
        assert!(!matches(&button(), &selector.clone().focused(true)));
    }
}
