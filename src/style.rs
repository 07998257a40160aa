use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calc::{CalcError, reduce};
use crate::props::{Datum, Prop, Truthy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Numbers as-is; text only when it parses as a plain number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn is_invisible(&self) -> bool {
        matches!(self, Self::Text(text) if text == "transparent" || text == "none")
    }
}

impl Truthy for StyleValue {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Number(value) => value.is_truthy(),
            Self::Text(text) => !text.is_empty(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Caller-supplied style; entries may be computed per datum.
pub type Style = IndexMap<String, Prop<StyleValue>>;

/// Style after every computed entry has been evaluated.
pub type ResolvedStyle = IndexMap<String, StyleValue>;

/// A transform given either verbatim or as ordered `name -> argument` pairs.
/// Transform composition is order-sensitive, so the pairs keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transform {
    Raw(String),
    Ops(IndexMap<String, StyleValue>),
}

pub fn to_transform_string(transform: Option<&Transform>) -> Option<String> {
    match transform? {
        Transform::Raw(raw) => Some(raw.clone()),
        Transform::Ops(ops) => Some(
            ops.iter()
                .map(|(name, value)| format!("{name}({value})"))
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

/// Wraps `expr` in `calc()` and folds its constant arithmetic.
pub fn calc(expr: &str, precision: u32) -> Result<String, CalcError> {
    reduce(&format!("calc({expr})"), precision)
}

pub fn evaluate_style(style: &Style, datum: &Datum, active: bool) -> ResolvedStyle {
    style
        .iter()
        .map(|(key, value)| (key.clone(), value.evaluate(datum, active)))
        .collect()
}

/// Copy of `style` without `transparent` / `none` entries.
pub fn remove_invisible(style: &ResolvedStyle) -> ResolvedStyle {
    style
        .iter()
        .filter(|(_, value)| !value.is_invisible())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
