mod ranking_tests;
mod selector_parse_tests;

use crate::element::{Bounds, ParsedElement};

/// Element with `text` at the given rectangle, otherwise default state.
pub(crate) fn element(text: &str, x: i32, y: i32, width: i32, height: i32) -> ParsedElement {
    ParsedElement {
        text: text.to_string(),
        bounds: Bounds::new(x, y, width, height),
        enabled: true,
        displayed: true,
        ..Default::default()
    }
}

pub(crate) fn clickable(mut elem: ParsedElement) -> ParsedElement {
    elem.clickable = true;
    elem
}

pub(crate) fn at_depth(mut elem: ParsedElement, depth: usize) -> ParsedElement {
    elem.depth = depth;
    elem
}

pub(crate) fn texts(elements: &[&ParsedElement]) -> Vec<String> {
    elements.iter().map(|e| e.text.clone()).collect()
}
