use crate::errors::AutomationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declarative query describing the element(s) a test step targets.
///
/// Every field is optional; set fields are AND-ed together. At most one of the
/// directional/containment relations is expected per selector. When several
/// are set, the first in `Below, Above, LeftOf, RightOf, ChildOf,
/// ContainsChild` order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selector {
    /// Case-insensitive text, matched against text or accessibility description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Case-sensitive substring of the resource id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Web-view fallback, queried as a class name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub width: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Index into the ranked matches; negative values count from the end
    #[serde(
        deserialize_with = "deserialize_index",
        skip_serializing_if = "Option::is_none"
    )]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub below: Option<Box<Selector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub above: Option<Box<Selector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_of: Option<Box<Selector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_of: Option<Box<Selector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_of: Option<Box<Selector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains_child: Option<Box<Selector>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contains_descendants: Vec<Selector>,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

fn deserialize_index<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IndexValue {
        Int(i64),
        Str(String),
    }

    Ok(
        Option::<IndexValue>::deserialize(deserializer)?.map(|v| match v {
            IndexValue::Int(i) => i.to_string(),
            IndexValue::Str(s) => s,
        }),
    )
}

/// Geometric or containment relation between a candidate and its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Below,
    Above,
    LeftOf,
    RightOf,
    ChildOf,
    ContainsChild,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Below,
        Relation::Above,
        Relation::LeftOf,
        Relation::RightOf,
        Relation::ChildOf,
        Relation::ContainsChild,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Below => "below",
            Self::Above => "above",
            Self::LeftOf => "leftOf",
            Self::RightOf => "rightOf",
            Self::ChildOf => "childOf",
            Self::ContainsChild => "containsChild",
        }
    }

    /// Phrase used in user-facing error details ("nothing below ...").
    pub const fn phrase(&self) -> &'static str {
        match self {
            Self::Below => "below",
            Self::Above => "above",
            Self::LeftOf => "left of",
            Self::RightOf => "right of",
            Self::ChildOf => "inside",
            Self::ContainsChild => "containing",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a selector is resolved, decided once per resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorShape {
    /// Snapshot matching plus relative/descendant filtering
    Relative,
    /// Snapshot matching on size (no relative filtering)
    Size,
    /// Native locator queries against the automation server
    Direct,
}

impl Selector {
    /// Selector matching on text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Selector matching on resource id only
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Selector matching on a CSS/class-name query only
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: Some(css.into()),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn tolerance(mut self, tolerance: i32) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = Some(focused);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn index(mut self, index: impl ToString) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn below(self, anchor: Selector) -> Self {
        self.relative(Relation::Below, anchor)
    }

    pub fn above(self, anchor: Selector) -> Self {
        self.relative(Relation::Above, anchor)
    }

    pub fn left_of(self, anchor: Selector) -> Self {
        self.relative(Relation::LeftOf, anchor)
    }

    pub fn right_of(self, anchor: Selector) -> Self {
        self.relative(Relation::RightOf, anchor)
    }

    pub fn child_of(self, anchor: Selector) -> Self {
        self.relative(Relation::ChildOf, anchor)
    }

    pub fn contains_child(self, anchor: Selector) -> Self {
        self.relative(Relation::ContainsChild, anchor)
    }

    pub fn contains_descendant(mut self, descendant: Selector) -> Self {
        self.contains_descendants.push(descendant);
        self
    }

    /// Set the anchor for `relation`, replacing any previous anchor for it.
    pub fn relative(mut self, relation: Relation, anchor: Selector) -> Self {
        *self.relation_slot(relation) = Some(Box::new(anchor));
        self
    }

    fn relation_slot(&mut self, relation: Relation) -> &mut Option<Box<Selector>> {
        match relation {
            Relation::Below => &mut self.below,
            Relation::Above => &mut self.above,
            Relation::LeftOf => &mut self.left_of,
            Relation::RightOf => &mut self.right_of,
            Relation::ChildOf => &mut self.child_of,
            Relation::ContainsChild => &mut self.contains_child,
        }
    }

    fn anchor_for(&self, relation: Relation) -> Option<&Selector> {
        match relation {
            Relation::Below => self.below.as_deref(),
            Relation::Above => self.above.as_deref(),
            Relation::LeftOf => self.left_of.as_deref(),
            Relation::RightOf => self.right_of.as_deref(),
            Relation::ChildOf => self.child_of.as_deref(),
            Relation::ContainsChild => self.contains_child.as_deref(),
        }
    }

    /// The effective relation and its anchor, if any.
    pub fn relation(&self) -> Option<(Relation, &Selector)> {
        Relation::ALL
            .iter()
            .find_map(|rel| self.anchor_for(*rel).map(|anchor| (*rel, anchor)))
    }

    /// Non-empty text predicate, if any.
    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Non-empty id predicate, if any.
    pub fn id_value(&self) -> Option<&str> {
        self.id.as_deref().filter(|t| !t.is_empty())
    }

    /// Non-empty css predicate, if any.
    pub fn css_value(&self) -> Option<&str> {
        self.css.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_relative(&self) -> bool {
        self.relation().is_some() || !self.contains_descendants.is_empty()
    }

    pub fn has_size(&self) -> bool {
        self.width > 0 || self.height > 0
    }

    pub fn has_state(&self) -> bool {
        self.enabled.is_some()
            || self.selected.is_some()
            || self.focused.is_some()
            || self.checked.is_some()
    }

    /// True when no predicate at all is set. `index` alone does not count.
    pub fn is_empty(&self) -> bool {
        self.text_value().is_none()
            && self.id_value().is_none()
            && self.css_value().is_none()
            && !self.has_size()
            && !self.has_state()
            && !self.has_relative()
    }

    pub fn shape(&self) -> SelectorShape {
        if self.has_relative() {
            SelectorShape::Relative
        } else if self.has_size() {
            SelectorShape::Size
        } else {
            SelectorShape::Direct
        }
    }

    /// Deepest chain of nested anchors/descendants below this selector.
    pub fn nesting_depth(&self) -> usize {
        let anchors = Relation::ALL
            .iter()
            .filter_map(|rel| self.anchor_for(*rel))
            .chain(self.contains_descendants.iter());
        anchors.map(|s| 1 + s.nesting_depth()).max().unwrap_or(0)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(text) = self.text_value() {
            parts.push(format!("text={text:?}"));
        }
        if let Some(id) = self.id_value() {
            parts.push(format!("id={id:?}"));
        }
        if let Some(css) = self.css_value() {
            parts.push(format!("css={css:?}"));
        }
        if self.width > 0 {
            parts.push(format!("width={}", self.width));
        }
        if self.height > 0 {
            parts.push(format!("height={}", self.height));
        }
        if let Some(tolerance) = self.tolerance {
            parts.push(format!("tolerance={tolerance}"));
        }
        for (name, flag) in [
            ("enabled", self.enabled),
            ("selected", self.selected),
            ("focused", self.focused),
            ("checked", self.checked),
        ] {
            if let Some(flag) = flag {
                parts.push(format!("{name}={flag}"));
            }
        }
        if let Some(index) = &self.index {
            parts.push(format!("index={index}"));
        }
        for rel in Relation::ALL {
            if let Some(anchor) = self.anchor_for(rel) {
                parts.push(format!("{rel}({anchor})"));
            }
        }
        for descendant in &self.contains_descendants {
            parts.push(format!("has({descendant})"));
        }

        if parts.is_empty() {
            f.write_str("<empty selector>")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Case-insensitive ASCII prefix strip.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let n = prefix.len();
    if s.len() >= n && s.is_char_boundary(n) && s[..n].eq_ignore_ascii_case(prefix) {
        Some(&s[n..])
    } else {
        None
    }
}

const RELATION_PREFIXES: [(&str, Relation); 6] = [
    ("below:", Relation::Below),
    ("above:", Relation::Above),
    ("leftof:", Relation::LeftOf),
    ("rightof:", Relation::RightOf),
    ("childof:", Relation::ChildOf),
    ("containschild:", Relation::ContainsChild),
];

fn parse_flag(key: &str, value: &str) -> Result<bool, AutomationError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AutomationError::InvalidSelector(format!(
            "'{key}' expects true or false, got '{value}'"
        ))),
    }
}

fn parse_pixels(key: &str, value: &str) -> Result<i32, AutomationError> {
    value.parse::<i32>().map_err(|_| {
        AutomationError::InvalidSelector(format!("'{key}' expects a pixel count, got '{value}'"))
    })
}

fn apply_segment(selector: &mut Selector, segment: &str) -> Result<(), AutomationError> {
    let Some((key, value)) = segment.split_once(':') else {
        return Err(AutomationError::InvalidSelector(format!(
            "Unknown selector format: \"{segment}\". Use prefixes like 'text:', 'id:', 'css:', 'index:', 'width:', 'enabled:', 'below:' or 'has:' to specify the selector type."
        )));
    };
    let key = key.trim().to_ascii_lowercase();
    let value = value.trim();

    match key.as_str() {
        "text" => selector.text = Some(value.to_string()),
        "id" => selector.id = Some(value.to_string()),
        "css" => selector.css = Some(value.to_string()),
        "index" | "nth" => {
            if value.parse::<i64>().is_err() {
                return Err(AutomationError::InvalidSelector(format!(
                    "Invalid index: '{value}'"
                )));
            }
            selector.index = Some(value.to_string());
        }
        "width" => selector.width = parse_pixels(&key, value)?,
        "height" => selector.height = parse_pixels(&key, value)?,
        "tolerance" => selector.tolerance = Some(parse_pixels(&key, value)?),
        "enabled" => selector.enabled = Some(parse_flag(&key, value)?),
        "selected" => selector.selected = Some(parse_flag(&key, value)?),
        "focused" => selector.focused = Some(parse_flag(&key, value)?),
        "checked" => selector.checked = Some(parse_flag(&key, value)?),
        "has" => selector.contains_descendants.push(value.parse()?),
        other => {
            return Err(AutomationError::InvalidSelector(format!(
                "Unknown selector key '{other}' in \"{segment}\""
            )))
        }
    }
    Ok(())
}

/// Compact selector syntax: `&&`-joined `key:value` segments.
///
/// Relative prefixes (`below:`, `rightof:`, ...) take the whole remainder of
/// the string as the anchor selector, so `text:Login && below:text:Header`
/// reads as "Login below Header".
impl FromStr for Selector {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut selector = Selector::default();
        let mut rest = s.trim();

        loop {
            if rest.is_empty() {
                return Err(AutomationError::InvalidSelector(format!(
                    "Empty selector segment in \"{s}\""
                )));
            }

            if let Some((relation, tail)) = RELATION_PREFIXES
                .iter()
                .find_map(|(prefix, rel)| strip_prefix_ci(rest, prefix).map(|t| (*rel, t)))
            {
                let anchor: Selector = tail.parse()?;
                return Ok(selector.relative(relation, anchor));
            }

            let (segment, next) = match rest.split_once("&&") {
                Some((head, tail)) => (head.trim(), Some(tail.trim())),
                None => (rest, None),
            };
            apply_segment(&mut selector, segment)?;

            match next {
                Some(tail) => rest = tail,
                None => return Ok(selector),
            }
        }
    }
}

impl TryFrom<&str> for Selector {
    type Error = AutomationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
