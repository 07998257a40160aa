//! SVG path builders for the three bar orientations.
//!
//! Each corner is emitted as an `A r r 0 0 sweep` arc; a zero radius
//! degenerates to a straight joint.

use crate::bar::CornerRadius;
use crate::props::BarProps;

fn num(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn point(x: f64, y: f64) -> String {
    format!("{} {}", num(x), num(y))
}

fn arc(radius: f64, sweep: bool, x: f64, y: f64) -> String {
    format!(
        "A {r} {r} 0 0 {} {}",
        u8::from(sweep),
        point(x, y),
        r = num(radius)
    )
}

/// Radii limited to half the band width and half the bar length.
fn clamp_corners(radius: &CornerRadius, band: f64, length: f64) -> CornerRadius {
    let max = (band.abs() / 2.0).min(length.abs() / 2.0);
    CornerRadius {
        top_left: radius.top_left.min(max),
        top_right: radius.top_right.min(max),
        bottom_left: radius.bottom_left.min(max),
        bottom_right: radius.bottom_right.min(max),
    }
}

pub fn vertical_bar_path(props: &BarProps, width: f64, radius: &CornerRadius) -> String {
    let (x0, x1) = props.alignment.band(props.x, width);
    let (y0, y1) = (props.y0, props.y);
    let r = clamp_corners(radius, x1 - x0, y0 - y1);
    let sign = if y0 > y1 { 1.0 } else { -1.0 };
    let sweep = sign > 0.0;

    [
        format!("M {}", point(x0 + r.bottom_left, y0)),
        arc(r.bottom_left, sweep, x0, y0 - sign * r.bottom_left),
        format!("L {}", point(x0, y1 + sign * r.top_left)),
        arc(r.top_left, sweep, x0 + r.top_left, y1),
        format!("L {}", point(x1 - r.top_right, y1)),
        arc(r.top_right, sweep, x1, y1 + sign * r.top_right),
        format!("L {}", point(x1, y0 - sign * r.bottom_right)),
        arc(r.bottom_right, sweep, x1 - r.bottom_right, y0),
        "Z".to_string(),
    ]
    .join(" ")
}

/// The vertical bar turned on its side: the value runs along screen x from
/// `y0` to `y`, the band sits around screen y `x`. `top*` corners are at the
/// value end, `*Left` on the upper edge.
pub fn horizontal_bar_path(props: &BarProps, width: f64, radius: &CornerRadius) -> String {
    let (b0, b1) = props.alignment.band(props.x, width);
    let (x0, x1) = (props.y0, props.y);
    let r = clamp_corners(radius, b1 - b0, x1 - x0);
    let sign = if x1 > x0 { 1.0 } else { -1.0 };
    let sweep = sign > 0.0;

    [
        format!("M {}", point(x0, b0 + r.bottom_left)),
        arc(r.bottom_left, sweep, x0 + sign * r.bottom_left, b0),
        format!("L {}", point(x1 - sign * r.top_left, b0)),
        arc(r.top_left, sweep, x1, b0 + r.top_left),
        format!("L {}", point(x1, b1 - r.top_right)),
        arc(r.top_right, sweep, x1 - sign * r.top_right, b1),
        format!("L {}", point(x0 + sign * r.bottom_right, b1)),
        arc(r.bottom_right, sweep, x0, b1 - r.bottom_right),
        "Z".to_string(),
    ]
    .join(" ")
}

fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Annular sector centered on (0, 0); the caller translates it to the chart
/// origin. Angles run clockwise from 12 o'clock. The angular width splits the
/// x range evenly over the data points.
///
/// Only the vertical-style sector exists. Horizontal polar bars (radial
/// bands) are not drawn differently.
pub fn polar_bar_path(props: &BarProps, radius: &CornerRadius, bar_ratio: f64) -> String {
    let slots = props.data.len().max(1) as f64;
    let angular_width = bar_ratio * props.scale.x.extent() / slots;
    let (start, end) = props.alignment.band(props.x, angular_width);
    let inner = props.y0.min(props.y).max(0.0);
    let outer = props.y0.max(props.y).max(0.0);
    let span = end - start;

    let outer_max = ((outer - inner) / 2.0).min(outer * span / 2.0).max(0.0);
    let inner_max = ((outer - inner) / 2.0).min(inner * span / 2.0).max(0.0);
    let top_left = radius.top_left.min(outer_max);
    let top_right = radius.top_right.min(outer_max);
    let bottom_left = radius.bottom_left.min(inner_max);
    let bottom_right = radius.bottom_right.min(inner_max);

    let angle_offset = |r: f64, at: f64| if at > 0.0 { r / at } else { 0.0 };
    let outer_start = start + angle_offset(top_left, outer);
    let outer_end = end - angle_offset(top_right, outer);

    let mut parts = Vec::new();
    if inner > 0.0 {
        let (x, y) = polar(inner + bottom_left, start);
        parts.push(format!("M {}", point(x, y)));
    } else {
        parts.push("M 0 0".to_string());
    }
    let (x, y) = polar(outer - top_left, start);
    parts.push(format!("L {}", point(x, y)));
    let (x, y) = polar(outer, outer_start);
    parts.push(arc(top_left, true, x, y));
    // Two half arcs so a full-turn band keeps distinct endpoints.
    let outer_mid = (outer_start + outer_end) / 2.0;
    let (x, y) = polar(outer, outer_mid);
    parts.push(arc(outer, true, x, y));
    let (x, y) = polar(outer, outer_end);
    parts.push(arc(outer, true, x, y));
    let (x, y) = polar(outer - top_right, end);
    parts.push(arc(top_right, true, x, y));

    if inner > 0.0 {
        let inner_start = start + angle_offset(bottom_left, inner);
        let inner_end = end - angle_offset(bottom_right, inner);
        let (x, y) = polar(inner + bottom_right, end);
        parts.push(format!("L {}", point(x, y)));
        let (x, y) = polar(inner, inner_end);
        parts.push(arc(bottom_right, true, x, y));
        let inner_mid = (inner_start + inner_end) / 2.0;
        let (x, y) = polar(inner, inner_mid);
        parts.push(arc(inner, false, x, y));
        let (x, y) = polar(inner, inner_start);
        parts.push(arc(inner, false, x, y));
        let (x, y) = polar(inner + bottom_left, start);
        parts.push(arc(bottom_left, true, x, y));
    }
    parts.push("Z".to_string());
    parts.join(" ")
}
