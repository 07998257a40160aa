use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::style::{Style, Transform};

/// The data record a bar represents.
pub type Datum = serde_json::Value;

pub type Evaluator<T> = Arc<dyn Fn(&Datum, bool) -> T + Send + Sync>;

/// A prop that is either a plain value or computed from the current datum and
/// active (highlight) state.
#[derive(Clone)]
pub enum Prop<T> {
    Literal(T),
    Computed(Evaluator<T>),
}

impl<T: Clone> Prop<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Datum, bool) -> T + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    pub fn evaluate(&self, datum: &Datum, active: bool) -> T {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Computed(f) => f(datum, active),
        }
    }
}

/// Values that can be "unset" while still present, like `0` or `""`.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl<T: Truthy> Prop<T> {
    /// Computed props always count as set; literals only when truthy.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Literal(value) => value.is_truthy(),
            Self::Computed(_) => true,
        }
    }
}

impl<T> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Prop<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Literal)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CornerRadiusSpec {
    Uniform(Prop<f64>),
    PerCorner(CornerRadiusMap),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornerRadiusMap {
    pub top: Option<Prop<f64>>,
    pub top_left: Option<Prop<f64>>,
    pub top_right: Option<Prop<f64>>,
    pub bottom: Option<Prop<f64>>,
    pub bottom_left: Option<Prop<f64>>,
    pub bottom_right: Option<Prop<f64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Start,
    #[default]
    Middle,
    End,
}

impl Alignment {
    /// Band edges of a bar of `width` anchored at `center`.
    pub fn band(self, center: f64, width: f64) -> (f64, f64) {
        match self {
            Self::Start => (center, center + width),
            Self::Middle => (center - width / 2.0, center + width / 2.0),
            Self::End => (center - width, center),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleAxis {
    pub range: [f64; 2],
}

impl ScaleAxis {
    /// Length of the range; reversed ranges count the same.
    pub fn extent(&self) -> f64 {
        (self.range[1] - self.range[0]).abs()
    }
}

/// Read-only view of the chart scale. Only the x range feeds bar geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: ScaleAxis,
}

/// Everything a single bar render needs. Built fresh for each render.
///
/// In horizontal mode `y0`/`y` still hold the value-axis positions (now along
/// screen x) and `x` holds the band center (now along screen y). In polar mode
/// `x` is the angle in radians and `y0`/`y` are the inner/outer radii.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarProps {
    pub horizontal: bool,
    pub polar: bool,
    pub alignment: Alignment,
    pub bar_ratio: Option<f64>,
    pub bar_width: Option<Prop<f64>>,
    pub default_bar_width: Option<f64>,
    pub corner_radius: Option<CornerRadiusSpec>,
    pub datum: Datum,
    pub data: Vec<Datum>,
    pub active: bool,
    pub scale: Scale,
    pub style: Style,
    pub x: f64,
    pub y: f64,
    pub y0: f64,
    pub origin: Option<Point>,
    pub transform: Option<Transform>,
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub shape_rendering: Option<String>,
    /// Event name to host handler key; carried through untouched.
    pub events: IndexMap<String, String>,
    pub clip_path: Option<String>,
}
