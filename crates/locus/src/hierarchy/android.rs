//! UiAutomator hierarchy dump (`<hierarchy><node .../></hierarchy>`)

use super::{attributes, parse_bool};
use crate::element::{Bounds, ParsedElement};
use crate::errors::AutomationError;
use quick_xml::events::BytesStart;

pub(super) fn element_from(start: &BytesStart) -> Result<ParsedElement, AutomationError> {
    let mut elem = ParsedElement {
        enabled: true,
        displayed: true,
        ..Default::default()
    };
    let mut hint = String::new();

    for (key, value) in attributes(start)? {
        match key.as_str() {
            "text" => elem.text = value,
            "hint" => hint = value,
            "resource-id" => elem.resource_id = value,
            "content-desc" => elem.content_desc = value,
            "class" => elem.class_name = value,
            "bounds" => elem.bounds = Bounds::parse(&value),
            "enabled" => elem.enabled = parse_bool(&value),
            "selected" => elem.selected = parse_bool(&value),
            "focused" => elem.focused = parse_bool(&value),
            "displayed" => elem.displayed = parse_bool(&value),
            "clickable" => elem.clickable = parse_bool(&value),
            _ => {}
        }
    }

    // Placeholder text of empty inputs is only exposed as `hint`
    if elem.text.is_empty() && !hint.is_empty() {
        elem.text = hint;
    }
    // Newer dumps name the tag after the widget class instead of `node`
    if elem.class_name.is_empty() {
        let tag = start.name();
        let tag = String::from_utf8_lossy(tag.as_ref());
        if tag != "node" {
            elem.class_name = tag.into_owned();
        }
    }

    Ok(elem)
}
