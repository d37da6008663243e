//! Shape kinds and the open-ended attribute/style maps carried by every node.
//!
//! Attributes hold geometry and content (`x`, `width`, `points`, `src`, ...),
//! style holds paint properties (`fill`, `stroke`, `opacity`, `display`, ...).
//! Both are ordered maps with unique keys; writing [`AttrValue::Null`] removes
//! a key.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;
use crate::scene::color::Color;

/// The closed set of drawable node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// A square marker at `(x, y)` with side `size`.
    Point,
    /// Axis-aligned rectangle `(x, y, width, height)`.
    Rect,
    /// Segment `(x1, y1) -> (x2, y2)`.
    Line,
    /// Open path through `points`.
    Polyline,
    /// Closed path through `points`.
    Polygon,
    /// Circle at `(cx, cy)` with radius `r`.
    Circle,
    /// Text box `(x, y, width, height)` with content in `text`.
    Text,
    /// Image box `(x, y, width, height)` with source in `src`.
    Image,
    /// Container aggregating its children.
    Group,
}

impl ShapeKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Point,
        Self::Rect,
        Self::Line,
        Self::Polyline,
        Self::Polygon,
        Self::Circle,
        Self::Text,
        Self::Image,
        Self::Group,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Rect => "rect",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Image => "image",
            Self::Group => "group",
        }
    }

    /// Whether nodes of this kind may own children.
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = crate::foundation::error::CanopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| crate::foundation::error::CanopyError::unknown_shape_kind(s))
    }
}

/// One attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Absent value; writing it deletes the key.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value (coordinates, sizes, radii).
    Number(f64),
    /// Text content or a reference such as an image source.
    Text(String),
    /// Vertex list for polylines and polygons.
    Points(Vec<Point>),
}

impl AttrValue {
    /// Numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Vertex payload, if any.
    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            Self::Points(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this value deletes the key it is written to.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Point>> for AttrValue {
    fn from(v: Vec<Point>) -> Self {
        Self::Points(v)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Attribute map of a node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, AttrValue>);

impl Attrs {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.merge(key, value.into());
        self
    }

    /// Insert `value` under `key`, or remove `key` when `value` is null.
    ///
    /// Returns whether the map changed.
    pub fn merge(&mut self, key: impl Into<String>, value: AttrValue) -> bool {
        let key = key.into();
        if value.is_null() {
            return self.0.remove(&key).is_some();
        }
        match self.0.get(&key) {
            Some(existing) if *existing == value => false,
            _ => {
                self.0.insert(key, value);
                true
            }
        }
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Numeric lookup.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(AttrValue::as_f64)
    }

    /// Numeric lookup defaulting to `default` when absent or not numeric.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    /// Text lookup.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(AttrValue::as_str)
    }

    /// Vertex lookup; empty when absent.
    pub fn points(&self, key: &str) -> &[Point] {
        self.0.get(key).and_then(AttrValue::as_points).unwrap_or(&[])
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.merge(k, v.into());
        }
        out
    }
}

/// One style value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Absent value; writing it deletes the key.
    Null,
    /// Numeric value such as `opacity` or `lineWidth`.
    Number(f64),
    /// Any other value, kept verbatim.
    Text(String),
    /// Canonical color (only ever stored under color-valued keys).
    Color(Color),
}

impl StyleValue {
    /// Color payload, if any.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Color> for StyleValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

/// Style keys whose values are normalized to [`Color`] before storage.
pub const COLOR_KEYS: [&str; 2] = ["fill", "stroke"];

/// Style map of a node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Styles(BTreeMap<String, StyleValue>);

impl Styles {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, normalizing color keys.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        let key = key.into();
        let value = normalize_style(&key, value.into());
        self.insert_normalized(key, value);
        self
    }

    /// Insert an already-normalized value, or remove `key` when it is null.
    pub(crate) fn insert_normalized(&mut self, key: String, value: StyleValue) {
        if matches!(value, StyleValue::Null) {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    /// Color lookup.
    pub fn color(&self, key: &str) -> Option<Color> {
        self.0.get(key).and_then(StyleValue::as_color)
    }

    /// Text lookup.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(StyleValue::as_str)
    }

    /// Whether `display: none` is set.
    pub fn is_hidden(&self) -> bool {
        self.text("display") == Some("none")
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-normalize every entry (used for maps that arrived through serde).
    pub(crate) fn normalized(self) -> Self {
        let mut out = Self::new();
        for (k, v) in self.0 {
            let v = normalize_style(&k, v);
            out.insert_normalized(k, v);
        }
        out
    }
}

/// Normalize a style value: color-valued keys are parsed into [`Color`].
///
/// Unparsable colors are kept verbatim so a single bad value never blocks a
/// render; a warning is logged.
pub fn normalize_style(key: &str, value: StyleValue) -> StyleValue {
    if !COLOR_KEYS.contains(&key) {
        return value;
    }
    match value {
        StyleValue::Text(raw) => match Color::parse(&raw) {
            Ok(c) => StyleValue::Color(c),
            Err(err) => {
                tracing::warn!(key, raw = %raw, %err, "keeping unparsable color verbatim");
                StyleValue::Text(raw)
            }
        },
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/attr.rs"]
mod tests;
