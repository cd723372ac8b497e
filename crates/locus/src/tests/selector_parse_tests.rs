//! Tests for selector construction, parsing and description

use crate::errors::AutomationError;
use crate::selector::{Relation, Selector, SelectorShape};

#[test]
fn test_compact_syntax_simple_keys() {
    let selector: Selector = "text:Sign in && id:login && enabled:true && index:-1"
        .parse()
        .unwrap();
    assert_eq!(selector.text.as_deref(), Some("Sign in"));
    assert_eq!(selector.id.as_deref(), Some("login"));
    assert_eq!(selector.enabled, Some(true));
    assert_eq!(selector.index.as_deref(), Some("-1"));
    assert_eq!(selector.shape(), SelectorShape::Direct);
}

#[test]
fn test_relative_prefix_consumes_remainder() {
    let selector: Selector = "text:Login && below:text:Header && id:top".parse().unwrap();
    let (relation, anchor) = selector.relation().unwrap();
    assert_eq!(relation, Relation::Below);
    assert_eq!(anchor.text.as_deref(), Some("Header"));
    assert_eq!(anchor.id.as_deref(), Some("top"));
    assert!(selector.id.is_none());
    assert_eq!(selector.shape(), SelectorShape::Relative);
}

#[test]
fn test_nested_relative_anchors() {
    let selector: Selector = "text:Price && rightof:text:Total && below:text:Summary"
        .parse()
        .unwrap();
    assert_eq!(selector.nesting_depth(), 2);
    let (_, anchor) = selector.relation().unwrap();
    let (relation, inner) = anchor.relation().unwrap();
    assert_eq!(relation, Relation::Below);
    assert_eq!(inner.text.as_deref(), Some("Summary"));
}

#[test]
fn test_has_adds_descendant() {
    let selector: Selector = "id:card && has:text:Title && has:text:Price".parse().unwrap();
    assert_eq!(selector.contains_descendants.len(), 2);
    assert_eq!(selector.shape(), SelectorShape::Relative);
}

#[test]
fn test_size_shape() {
    let selector: Selector = "width:120 && height:48 && tolerance:2".parse().unwrap();
    assert_eq!(selector.shape(), SelectorShape::Size);
    assert_eq!(selector.tolerance, Some(2));
}

#[test]
fn test_invalid_compact_inputs() {
    for input in [
        "",
        "Login",
        "colour:red",
        "enabled:maybe",
        "width:wide",
        "index:first",
        "text:a && ",
    ] {
        assert!(
            matches!(
                input.parse::<Selector>(),
                Err(AutomationError::InvalidSelector(_))
            ),
            "expected InvalidSelector for {input:?}"
        );
    }
}

#[test]
fn test_index_alone_is_empty() {
    assert!(Selector::default().index(2).is_empty());
    assert!(Selector::text("").is_empty());
    assert!(!Selector::default().checked(false).is_empty());
}

#[test]
fn test_display_describes_selector() {
    let selector = Selector::text("Login").below(Selector::text("Header"));
    assert_eq!(selector.to_string(), r#"text="Login", below(text="Header")"#);
    assert_eq!(Selector::default().to_string(), "<empty selector>");
}

#[test]
fn test_deserialize_flow_shape() {
    let yaml = r#"
text: Continue
index: 1
rightOf:
  id: avatar
containsDescendants:
  - text: Badge
"#;
    let selector: Selector = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(selector.index.as_deref(), Some("1"));
    assert_eq!(
        selector.relation().map(|(r, a)| (r, a.id.clone())),
        Some((Relation::RightOf, Some("avatar".to_string())))
    );
    assert_eq!(selector.contains_descendants[0].text.as_deref(), Some("Badge"));

    let json = r#"{"text":"OK","index":"-2","checked":true}"#;
    let selector: Selector = serde_json::from_str(json).unwrap();
    assert_eq!(selector.index.as_deref(), Some("-2"));
    assert_eq!(selector.checked, Some(true));
}
