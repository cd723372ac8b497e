//! Element data model: bounds, parsed hierarchy nodes and resolution results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangle in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build bounds from two corner points, clamping inverted corners to zero size.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(
            x1,
            y1,
            x2.saturating_sub(x1).max(0),
            y2.saturating_sub(y1).max(0),
        )
    }

    /// Parse the two-corner textual form `[x1,y1][x2,y2]`.
    ///
    /// Anything malformed yields the zero rectangle.
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_default()
    }

    fn try_parse(raw: &str) -> Option<Self> {
        let rest = raw.trim().strip_prefix('[')?;
        let (first, rest) = rest.split_once("][")?;
        let second = rest.strip_suffix(']')?;
        let (x1, y1) = parse_point(first)?;
        let (x2, y2) = parse_point(second)?;
        // corners whose span does not fit an i32 are malformed
        x2.checked_sub(x1)?;
        y2.checked_sub(y1)?;
        Some(Self::from_corners(x1, y1, x2, y2))
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge, saturating at `i32::MAX`.
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub const fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// True when `other` lies fully inside (or exactly on) these bounds.
    pub const fn contains(&self, other: &Bounds) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}

fn parse_point(raw: &str) -> Option<(i32, i32)> {
    let (x, y) = raw.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// One node of a parsed hierarchy snapshot.
///
/// Nodes live in a flat arena owned by [`crate::hierarchy::Snapshot`]; tree
/// links are indices into that arena.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedElement {
    /// Position in the snapshot's flat, document-ordered list
    pub index: usize,
    pub text: String,
    pub resource_id: String,
    pub content_desc: String,
    pub class_name: String,
    pub bounds: Bounds,
    pub enabled: bool,
    pub selected: bool,
    pub focused: bool,
    pub displayed: bool,
    pub clickable: bool,
    /// Nesting depth, 0 for the top-level nodes under the document root
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl ParsedElement {
    /// Short human-readable label used in logs and tree dumps.
    pub fn label(&self) -> &str {
        if !self.text.is_empty() {
            &self.text
        } else if !self.content_desc.is_empty() {
            &self.content_desc
        } else {
            &self.resource_id
        }
    }
}

/// Opaque element reference returned by the automation server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Result of resolving a selector.
///
/// `handle` is only present when resolution went through a direct locator
/// query; snapshot-based resolution leaves callers with `bounds` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementInfo {
    pub text: String,
    pub bounds: Bounds,
    pub enabled: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<ElementHandle>,
}

impl From<&ParsedElement> for ElementInfo {
    fn from(elem: &ParsedElement) -> Self {
        let text = if elem.text.is_empty() {
            elem.content_desc.clone()
        } else {
            elem.text.clone()
        };
        Self {
            text,
            bounds: elem.bounds,
            enabled: elem.enabled,
            visible: elem.displayed,
            handle: None,
        }
    }
}
