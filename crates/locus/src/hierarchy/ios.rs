//! XCUITest page source (`<AppiumAUT><XCUIElementTypeApplication ...>`)

use super::{attributes, parse_bool};
use crate::element::{Bounds, ParsedElement};
use crate::errors::AutomationError;
use quick_xml::events::BytesStart;

/// Element types that respond to taps.
const INTERACTIVE_TYPES: &[&str] = &[
    "XCUIElementTypeButton",
    "XCUIElementTypeCell",
    "XCUIElementTypeLink",
    "XCUIElementTypeTextField",
    "XCUIElementTypeSecureTextField",
    "XCUIElementTypeSearchField",
    "XCUIElementTypeTextView",
    "XCUIElementTypeSwitch",
    "XCUIElementTypeSlider",
    "XCUIElementTypeStepper",
    "XCUIElementTypeSegmentedControl",
    "XCUIElementTypeMenuItem",
    "XCUIElementTypeTab",
    "XCUIElementTypeKey",
    "XCUIElementTypePickerWheel",
];

pub(super) fn element_from(start: &BytesStart) -> Result<ParsedElement, AutomationError> {
    let mut elem = ParsedElement {
        enabled: true,
        displayed: true,
        ..Default::default()
    };
    let mut value = String::new();
    let (mut x, mut y, mut width, mut height) = (0, 0, 0, 0);

    for (key, raw) in attributes(start)? {
        match key.as_str() {
            "type" => elem.class_name = raw,
            "name" => elem.resource_id = raw,
            "label" => elem.content_desc = raw,
            "value" => value = raw,
            "enabled" => elem.enabled = parse_bool(&raw),
            "visible" => elem.displayed = parse_bool(&raw),
            "selected" => elem.selected = parse_bool(&raw),
            "focused" | "hasFocus" => elem.focused = parse_bool(&raw),
            "x" => x = parse_coord(&raw),
            "y" => y = parse_coord(&raw),
            "width" => width = parse_coord(&raw).max(0),
            "height" => height = parse_coord(&raw).max(0),
            _ => {}
        }
    }

    if elem.class_name.is_empty() {
        elem.class_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    }
    elem.text = if value.is_empty() {
        elem.content_desc.clone()
    } else {
        value
    };
    elem.bounds = Bounds::new(x, y, width, height);
    elem.clickable = INTERACTIVE_TYPES.contains(&elem.class_name.as_str());

    Ok(elem)
}

/// Coordinates may be fractional points; anything unparseable is 0.
fn parse_coord(raw: &str) -> i32 {
    raw.trim()
        .parse::<f64>()
        .map(|v| v.round() as i32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use crate::element::Bounds;
    use crate::hierarchy::{Platform, Snapshot};

    const SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AppiumAUT>
  <XCUIElementTypeApplication type="XCUIElementTypeApplication" name="Demo" label="Demo" enabled="true" visible="true" x="0" y="0" width="390" height="844">
    <XCUIElementTypeStaticText type="XCUIElementTypeStaticText" name="title" label="Welcome" enabled="true" visible="true" x="20" y="80" width="350" height="40"/>
    <XCUIElementTypeTextField type="XCUIElementTypeTextField" name="email_field" label="Email" value="jane@example.com" enabled="true" visible="false" x="20.4" y="200" width="350" height="44"/>
  </XCUIElementTypeApplication>
</AppiumAUT>"#;

    #[test]
    fn test_skips_wrapper_and_maps_attributes() {
        let snapshot = Snapshot::parse(Platform::Ios, SOURCE).unwrap();
        assert_eq!(snapshot.len(), 3);

        let app = snapshot.get(0).unwrap();
        assert_eq!(app.depth, 0);
        assert_eq!(app.children, vec![1, 2]);

        let title = snapshot.get(1).unwrap();
        assert_eq!(title.resource_id, "title");
        assert_eq!(title.content_desc, "Welcome");
        assert_eq!(title.text, "Welcome");
        assert!(!title.clickable);
        assert_eq!(title.depth, 1);
    }

    #[test]
    fn test_value_preferred_over_label() {
        let snapshot = Snapshot::parse(Platform::Ios, SOURCE).unwrap();
        let field = snapshot.get(2).unwrap();
        assert_eq!(field.text, "jane@example.com");
        assert_eq!(field.content_desc, "Email");
        assert_eq!(field.bounds, Bounds::new(20, 200, 350, 44));
        assert!(field.clickable);
        assert!(!field.displayed);
    }

    #[test]
    fn test_source_without_wrapper() {
        let raw = r#"<XCUIElementTypeApplication type="XCUIElementTypeApplication" x="0" y="0" width="10" height="10"><XCUIElementTypeButton type="XCUIElementTypeButton" label="Go" x="1" y="1" width="5" height="5"/></XCUIElementTypeApplication>"#;
        let snapshot = Snapshot::parse(Platform::Ios, raw).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(1).unwrap().depth, 1);
        assert!(snapshot.get(1).unwrap().clickable);
    }
}
