//! Bar geometry resolution: width, per-corner radius, orientation dispatch and
//! the final render contract handed to the host.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::BarConfig;
use crate::path::{horizontal_bar_path, polar_bar_path, vertical_bar_path};
use crate::props::{BarProps, CornerRadiusMap, CornerRadiusSpec, Datum, Prop, Truthy};
use crate::style::{ResolvedStyle, Style, StyleValue, evaluate_style, to_transform_string};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadius {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerRadius {
    fn set(&mut self, corner: Corner, value: f64) {
        // NaN and negatives both land on 0.
        let value = if value > 0.0 { value } else { 0.0 };
        match corner {
            Corner::TopLeft => self.top_left = value,
            Corner::TopRight => self.top_right = value,
            Corner::BottomLeft => self.bottom_left = value,
            Corner::BottomRight => self.bottom_right = value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CornerKey {
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl CornerRadiusMap {
    fn get(&self, key: CornerKey) -> Option<&Prop<f64>> {
        match key {
            CornerKey::Top => self.top.as_ref(),
            CornerKey::TopLeft => self.top_left.as_ref(),
            CornerKey::TopRight => self.top_right.as_ref(),
            CornerKey::Bottom => self.bottom.as_ref(),
            CornerKey::BottomLeft => self.bottom_left.as_ref(),
            CornerKey::BottomRight => self.bottom_right.as_ref(),
        }
    }
}

/// Applied in order, so a specific corner overrides its side shorthand.
const CORNER_RULES: [(CornerKey, &[Corner]); 6] = [
    (CornerKey::Top, &[Corner::TopLeft, Corner::TopRight]),
    (CornerKey::TopLeft, &[Corner::TopLeft]),
    (CornerKey::TopRight, &[Corner::TopRight]),
    (CornerKey::Bottom, &[Corner::BottomLeft, Corner::BottomRight]),
    (CornerKey::BottomLeft, &[Corner::BottomLeft]),
    (CornerKey::BottomRight, &[Corner::BottomRight]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
    /// Vertical-style sector; there is no horizontal polar variant.
    Polar,
}

impl Orientation {
    pub fn from_props(props: &BarProps) -> Self {
        if props.polar {
            if props.horizontal {
                debug!("horizontal polar bars are not supported; drawing a vertical sector");
            }
            Self::Polar
        } else if props.horizontal {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// What the host attaches to its path element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarElement {
    pub path: String,
    pub style: ResolvedStyle,
    pub transform: Option<String>,
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub shape_rendering: Option<String>,
    pub events: IndexMap<String, String>,
    pub clip_path: Option<String>,
}

/// `{fill, stroke}` defaults under the caller's style, then evaluated. The
/// stroke follows the caller's fill when one is given.
pub fn bar_style(props: &BarProps, config: &BarConfig) -> ResolvedStyle {
    let default_fill = Prop::Literal(StyleValue::from(config.fill.as_str()));
    let stroke = props
        .style
        .get("fill")
        .filter(|fill| fill.is_set())
        .cloned()
        .unwrap_or_else(|| default_fill.clone());

    let mut style = Style::new();
    style.insert("fill".to_string(), default_fill);
    style.insert("stroke".to_string(), stroke);
    for (key, value) in &props.style {
        style.insert(key.clone(), value.clone());
    }
    evaluate_style(&style, &props.datum, props.active)
}

pub fn bar_width(props: &BarProps, style: &ResolvedStyle, config: &BarConfig) -> f64 {
    if let Some(bar_width) = props.bar_width.as_ref().filter(|width| width.is_set()) {
        // Computed widths only see the active state.
        return bar_width.evaluate(&Datum::Null, props.active);
    }
    if let Some(width) = style
        .get("width")
        .filter(|width| width.is_truthy())
        .and_then(StyleValue::as_number)
    {
        return width;
    }

    let extent = props.scale.x.extent();
    let bars = props.data.len() as f64 + 2.0;
    let bar_ratio = resolved_bar_ratio(props, config);
    let base = if props.data.len() < 2 {
        props.default_bar_width.unwrap_or(config.default_bar_width)
    } else {
        extent / bars
    };
    debug!(extent, bars, bar_ratio, base, "default bar width");
    (bar_ratio * base).max(1.0)
}

fn resolved_bar_ratio(props: &BarProps, config: &BarConfig) -> f64 {
    props
        .bar_ratio
        .filter(|ratio| ratio.is_truthy())
        .unwrap_or(config.bar_ratio)
}

pub fn corner_radius(props: &BarProps) -> CornerRadius {
    let mut radius = CornerRadius::default();
    match &props.corner_radius {
        None => {}
        Some(CornerRadiusSpec::Uniform(value)) => {
            if value.is_set() {
                let value = value.evaluate(&props.datum, props.active);
                radius.set(Corner::TopLeft, value);
                radius.set(Corner::TopRight, value);
            }
        }
        Some(CornerRadiusSpec::PerCorner(map)) => {
            for (key, corners) in CORNER_RULES {
                let Some(value) = map.get(key).filter(|value| value.is_set()) else {
                    continue;
                };
                let value = value.evaluate(&props.datum, props.active);
                for corner in corners {
                    radius.set(*corner, value);
                }
            }
        }
    }
    radius
}

pub fn bar_path(
    props: &BarProps,
    orientation: Orientation,
    width: f64,
    radius: &CornerRadius,
    config: &BarConfig,
) -> String {
    match orientation {
        Orientation::Vertical => vertical_bar_path(props, width, radius),
        Orientation::Horizontal => horizontal_bar_path(props, width, radius),
        Orientation::Polar => polar_bar_path(props, radius, resolved_bar_ratio(props, config)),
    }
}

pub fn render_bar(props: &BarProps, config: &BarConfig) -> BarElement {
    let style = bar_style(props, config);
    let width = bar_width(props, &style, config);
    let radius = corner_radius(props);
    let orientation = Orientation::from_props(props);
    let path = bar_path(props, orientation, width, &radius, config);

    let transform = to_transform_string(props.transform.as_ref())
        .filter(|transform| !transform.is_empty())
        .or_else(|| match (orientation, props.origin) {
            (Orientation::Polar, Some(origin)) => {
                Some(format!("translate({}, {})", origin.x, origin.y))
            }
            _ => None,
        });

    BarElement {
        path,
        style,
        transform,
        class_name: props.class_name.clone(),
        role: props.role.clone(),
        shape_rendering: props.shape_rendering.clone(),
        events: props.events.clone(),
        clip_path: props.clip_path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{Point, Scale, ScaleAxis};
    use crate::style::Transform;
    use serde_json::json;

    fn config() -> BarConfig {
        BarConfig::default()
    }

    fn data(len: usize) -> Vec<Datum> {
        (0..len).map(|i| json!({ "x": i, "y": i * 2 })).collect()
    }

    fn scale(start: f64, end: f64) -> Scale {
        Scale {
            x: ScaleAxis { range: [start, end] },
        }
    }

    fn radius(top_left: f64, top_right: f64, bottom_left: f64, bottom_right: f64) -> CornerRadius {
        CornerRadius {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    #[test]
    fn single_datum_uses_default_width() {
        let props = BarProps {
            data: data(1),
            scale: scale(0.0, 100.0),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &ResolvedStyle::new(), &config()), 4.0);
    }

    #[test]
    fn width_splits_range_over_data() {
        let props = BarProps {
            data: data(10),
            scale: scale(0.0, 120.0),
            bar_ratio: Some(0.5),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &ResolvedStyle::new(), &config()), 5.0);
    }

    #[test]
    fn reversed_range_uses_absolute_extent() {
        let props = BarProps {
            data: data(10),
            scale: scale(120.0, 0.0),
            bar_ratio: Some(1.0),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &ResolvedStyle::new(), &config()), 10.0);
    }

    #[test]
    fn width_never_below_one() {
        for len in [0, 1, 2, 50, 10_000] {
            for range in [0.0, 1.0, 10.0, 500.0] {
                let props = BarProps {
                    data: data(len),
                    scale: scale(0.0, range),
                    bar_ratio: Some(0.01),
                    ..Default::default()
                };
                let width = bar_width(&props, &ResolvedStyle::new(), &config());
                assert!(width >= 1.0, "len={len} range={range} width={width}");
            }
        }
    }

    #[test]
    fn explicit_widths_skip_the_clamp() {
        let props = BarProps {
            bar_width: Some(Prop::Literal(0.5)),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &ResolvedStyle::new(), &config()), 0.5);

        let mut style = ResolvedStyle::new();
        style.insert("width".to_string(), StyleValue::Number(0.25));
        assert_eq!(bar_width(&BarProps::default(), &style, &config()), 0.25);
    }

    #[test]
    fn bar_width_prop_wins() {
        let mut style = ResolvedStyle::new();
        style.insert("width".to_string(), StyleValue::Number(30.0));
        let props = BarProps {
            bar_width: Some(Prop::Literal(12.0)),
            data: data(10),
            scale: scale(0.0, 120.0),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &style, &config()), 12.0);
    }

    #[test]
    fn computed_bar_width_sees_active() {
        let props = BarProps {
            bar_width: Some(Prop::computed(|_, active| if active { 20.0 } else { 10.0 })),
            active: true,
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &ResolvedStyle::new(), &config()), 20.0);
    }

    #[test]
    fn zero_bar_width_falls_through_to_style() {
        let mut style = ResolvedStyle::new();
        style.insert("width".to_string(), StyleValue::Number(30.0));
        let props = BarProps {
            bar_width: Some(Prop::Literal(0.0)),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &style, &config()), 30.0);
    }

    #[test]
    fn zero_bar_ratio_uses_default_ratio() {
        let props = BarProps {
            data: data(10),
            scale: scale(0.0, 120.0),
            bar_ratio: Some(0.0),
            ..Default::default()
        };
        assert_eq!(bar_width(&props, &ResolvedStyle::new(), &config()), 5.0);
    }

    #[test]
    fn no_corner_radius_is_all_zero() {
        let props = BarProps {
            data: data(3),
            active: true,
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), CornerRadius::default());
    }

    #[test]
    fn scalar_corner_radius_rounds_top_only() {
        let props = BarProps {
            corner_radius: Some(CornerRadiusSpec::Uniform(Prop::Literal(4.0))),
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), radius(4.0, 4.0, 0.0, 0.0));
    }

    #[test]
    fn computed_scalar_corner_radius() {
        let props = BarProps {
            corner_radius: Some(CornerRadiusSpec::Uniform(Prop::computed(|datum: &Datum, _| {
                datum["r"].as_f64().unwrap_or(0.0)
            }))),
            datum: json!({ "r": 6 }),
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), radius(6.0, 6.0, 0.0, 0.0));
    }

    #[test]
    fn specific_corner_overrides_shorthand() {
        let props = BarProps {
            corner_radius: Some(CornerRadiusSpec::PerCorner(CornerRadiusMap {
                top: Some(Prop::Literal(5.0)),
                top_left: Some(Prop::Literal(2.0)),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), radius(2.0, 5.0, 0.0, 0.0));
    }

    #[test]
    fn bottom_shorthand_and_override() {
        let props = BarProps {
            corner_radius: Some(CornerRadiusSpec::PerCorner(CornerRadiusMap {
                bottom: Some(Prop::Literal(3.0)),
                bottom_right: Some(Prop::computed(|_, active| if active { 9.0 } else { 1.0 })),
                ..Default::default()
            })),
            active: true,
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), radius(0.0, 0.0, 3.0, 9.0));
    }

    #[test]
    fn zero_corner_does_not_override_shorthand() {
        let props = BarProps {
            corner_radius: Some(CornerRadiusSpec::PerCorner(CornerRadiusMap {
                top: Some(Prop::Literal(5.0)),
                top_right: Some(Prop::Literal(0.0)),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), radius(5.0, 5.0, 0.0, 0.0));
    }

    #[test]
    fn negative_radius_normalizes_to_zero() {
        let props = BarProps {
            corner_radius: Some(CornerRadiusSpec::Uniform(Prop::computed(|_, _| -3.0))),
            ..Default::default()
        };
        assert_eq!(corner_radius(&props), CornerRadius::default());
    }

    #[test]
    fn orientation_dispatch() {
        let vertical = BarProps::default();
        let horizontal = BarProps {
            horizontal: true,
            ..Default::default()
        };
        let polar = BarProps {
            polar: true,
            horizontal: true,
            ..Default::default()
        };
        assert_eq!(Orientation::from_props(&vertical), Orientation::Vertical);
        assert_eq!(Orientation::from_props(&horizontal), Orientation::Horizontal);
        assert_eq!(Orientation::from_props(&polar), Orientation::Polar);
    }

    #[test]
    fn default_style_is_black() {
        let style = bar_style(&BarProps::default(), &config());
        assert_eq!(style["fill"], StyleValue::from("black"));
        assert_eq!(style["stroke"], StyleValue::from("black"));
    }

    #[test]
    fn stroke_follows_caller_fill() {
        let mut caller = Style::new();
        caller.insert("fill".to_string(), Prop::computed(|_: &Datum, active| {
            StyleValue::from(if active { "orange" } else { "gray" })
        }));
        caller.insert("opacity".to_string(), Prop::Literal(StyleValue::Number(0.5)));
        let props = BarProps {
            style: caller,
            active: true,
            ..Default::default()
        };
        let style = bar_style(&props, &config());
        let keys: Vec<&str> = style.keys().map(String::as_str).collect();
        assert_eq!(keys, ["fill", "stroke", "opacity"]);
        assert_eq!(style["fill"], StyleValue::from("orange"));
        assert_eq!(style["stroke"], StyleValue::from("orange"));
    }

    #[test]
    fn caller_stroke_wins_over_fill_default() {
        let mut caller = Style::new();
        caller.insert("fill".to_string(), Prop::Literal("red".into()));
        caller.insert("stroke".to_string(), Prop::Literal("blue".into()));
        let props = BarProps {
            style: caller,
            ..Default::default()
        };
        let style = bar_style(&props, &config());
        assert_eq!(style["stroke"], StyleValue::from("blue"));
    }

    #[test]
    fn render_uses_style_width() {
        let mut caller = Style::new();
        caller.insert("width".to_string(), Prop::Literal(StyleValue::Number(20.0)));
        let props = BarProps {
            style: caller,
            x: 100.0,
            y: 0.0,
            y0: 50.0,
            ..Default::default()
        };
        let element = render_bar(&props, &config());
        assert!(element.path.starts_with("M 90 50"), "{}", element.path);
        assert_eq!(element.transform, None);
    }

    #[test]
    fn polar_origin_becomes_translate() {
        let props = BarProps {
            polar: true,
            origin: Some(Point { x: 150.0, y: 75.5 }),
            y: 50.0,
            ..Default::default()
        };
        let element = render_bar(&props, &config());
        assert_eq!(element.transform.as_deref(), Some("translate(150, 75.5)"));
    }

    #[test]
    fn caller_transform_wins() {
        let props = BarProps {
            polar: true,
            origin: Some(Point { x: 1.0, y: 2.0 }),
            transform: Some(Transform::Raw("rotate(45)".to_string())),
            ..Default::default()
        };
        let element = render_bar(&props, &config());
        assert_eq!(element.transform.as_deref(), Some("rotate(45)"));
    }

    #[test]
    fn cartesian_origin_is_ignored() {
        let props = BarProps {
            origin: Some(Point { x: 1.0, y: 2.0 }),
            ..Default::default()
        };
        assert_eq!(render_bar(&props, &config()).transform, None);
    }

    #[test]
    fn render_passes_host_attributes_through() {
        let mut events = IndexMap::new();
        events.insert("onClick".to_string(), "select".to_string());
        let props = BarProps {
            class_name: Some("bar".to_string()),
            role: Some("presentation".to_string()),
            shape_rendering: Some("crispEdges".to_string()),
            clip_path: Some("url(#clip)".to_string()),
            events: events.clone(),
            ..Default::default()
        };
        let element = render_bar(&props, &config());
        assert_eq!(element.class_name.as_deref(), Some("bar"));
        assert_eq!(element.role.as_deref(), Some("presentation"));
        assert_eq!(element.shape_rendering.as_deref(), Some("crispEdges"));
        assert_eq!(element.clip_path.as_deref(), Some("url(#clip)"));
        assert_eq!(element.events, events);
    }
}
