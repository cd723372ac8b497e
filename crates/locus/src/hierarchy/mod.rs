//! UI hierarchy snapshots
//!
//! Each platform's raw hierarchy dump is consumed as-is by its own parser.
//! Both supported formats are XML, so the walk over the document (depth,
//! parent/child links, wrapper skipping) is shared and only the per-node
//! attribute mapping differs.

mod android;
mod ios;

use crate::element::ParsedElement;
use crate::errors::AutomationError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device platform, which determines the hierarchy format and the native
/// locator syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Document-root wrapper tags that are not UI elements themselves
    fn wrapper_tags(&self) -> &'static [&'static [u8]] {
        match self {
            Self::Android => &[b"hierarchy"],
            Self::Ios => &[b"AppiumAUT"],
        }
    }

    fn element_from(&self, start: &BytesStart) -> Result<ParsedElement, AutomationError> {
        match self {
            Self::Android => android::element_from(start),
            Self::Ios => ios::element_from(start),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => f.write_str("android"),
            Self::Ios => f.write_str("ios"),
        }
    }
}

impl FromStr for Platform {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            other => Err(AutomationError::Config(format!(
                "Unknown platform '{other}', expected 'android' or 'ios'"
            ))),
        }
    }
}

/// One immutable, point-in-time parse of the UI hierarchy.
///
/// Elements are stored flat in document order; tree links are indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    elements: Vec<ParsedElement>,
}

impl Snapshot {
    /// Parse a raw hierarchy dump for `platform`.
    pub fn parse(platform: Platform, raw: &str) -> Result<Self, AutomationError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);

        let mut elements: Vec<ParsedElement> = Vec::new();
        // Open XML elements; `None` marks a skipped wrapper
        let mut stack: Vec<Option<usize>> = Vec::new();
        let mut seen_root = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                AutomationError::Parse(format!(
                    "{e} at position {}",
                    reader.error_position()
                ))
            })?;

            match event {
                Event::Start(start) => {
                    let slot = Self::open(platform, &start, &stack, &mut elements, seen_root)?;
                    seen_root = true;
                    stack.push(slot);
                }
                Event::Empty(start) => {
                    Self::open(platform, &start, &stack, &mut elements, seen_root)?;
                    seen_root = true;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(AutomationError::Parse(format!(
                "unexpected end of document with {} unclosed element(s)",
                stack.len()
            )));
        }
        if !seen_root {
            return Err(AutomationError::Parse(
                "document has no root element".to_string(),
            ));
        }

        Ok(Self { elements })
    }

    /// Register a newly opened XML element, returning its arena slot.
    fn open(
        platform: Platform,
        start: &BytesStart,
        stack: &[Option<usize>],
        elements: &mut Vec<ParsedElement>,
        seen_root: bool,
    ) -> Result<Option<usize>, AutomationError> {
        let is_document_root = stack.is_empty();
        if is_document_root && seen_root {
            return Err(AutomationError::Parse(
                "multiple root elements".to_string(),
            ));
        }
        if is_document_root && platform.wrapper_tags().contains(&start.name().as_ref()) {
            return Ok(None);
        }

        let parent = stack.last().copied().flatten();
        let depth = stack.iter().filter(|slot| slot.is_some()).count();

        let mut elem = platform.element_from(start)?;
        elem.index = elements.len();
        elem.depth = depth;
        elem.parent = parent;

        if let Some(parent) = parent {
            elements[parent].children.push(elem.index);
        }
        let index = elem.index;
        elements.push(elem);
        Ok(Some(index))
    }

    /// Build a snapshot from already-constructed elements, renumbering their
    /// flat indices to match their positions.
    pub fn from_elements(mut elements: Vec<ParsedElement>) -> Self {
        for (i, elem) in elements.iter_mut().enumerate() {
            elem.index = i;
        }
        Self { elements }
    }

    pub fn elements(&self) -> &[ParsedElement] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&ParsedElement> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Top-level elements (depth 0).
    pub fn roots(&self) -> impl Iterator<Item = &ParsedElement> {
        self.elements.iter().filter(|e| e.parent.is_none())
    }

    /// Direct children of `elem`.
    pub fn children<'a>(
        &'a self,
        elem: &'a ParsedElement,
    ) -> impl Iterator<Item = &'a ParsedElement> + 'a {
        elem.children.iter().filter_map(|i| self.elements.get(*i))
    }
}

/// Read all attributes of `start` as (key, unescaped value) pairs.
pub(crate) fn attributes(start: &BytesStart) -> Result<Vec<(String, String)>, AutomationError> {
    start
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| AutomationError::Parse(format!("attribute error: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| AutomationError::Parse(format!("attribute '{key}': {e}")))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

/// Boolean-like attribute value ("true"/"1" are true).
pub(crate) fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
