use crate::bar::BarElement;
use crate::config::RenderConfig;
use crate::style::ResolvedStyle;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(bars: &[BarElement], config: &RenderConfig) -> String {
    let mut svg = String::new();
    let width = config.width.max(1.0);
    let height = config.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&config.background)
    ));

    for bar in bars {
        svg.push_str(&bar_element_svg(bar));
    }

    svg.push_str("</svg>");
    svg
}

/// A single `<path>` element carrying the bar's geometry and attributes.
/// Event bindings belong to the host and are not serialized.
pub fn bar_element_svg(bar: &BarElement) -> String {
    let mut attrs = vec![format!("d=\"{}\"", escape_xml(&bar.path))];
    if let Some(transform) = &bar.transform {
        attrs.push(format!("transform=\"{}\"", escape_xml(transform)));
    }
    if let Some(class_name) = &bar.class_name {
        attrs.push(format!("class=\"{}\"", escape_xml(class_name)));
    }
    if !bar.style.is_empty() {
        attrs.push(format!("style=\"{}\"", escape_xml(&style_declarations(&bar.style))));
    }
    if let Some(role) = &bar.role {
        attrs.push(format!("role=\"{}\"", escape_xml(role)));
    }
    if let Some(shape_rendering) = &bar.shape_rendering {
        attrs.push(format!("shape-rendering=\"{}\"", escape_xml(shape_rendering)));
    }
    if let Some(clip_path) = &bar.clip_path {
        attrs.push(format!("clip-path=\"{}\"", escape_xml(clip_path)));
    }
    format!("<path {}/>", attrs.join(" "))
}

/// `strokeWidth: 2` becomes `stroke-width:2`.
pub fn style_declarations(style: &ResolvedStyle) -> String {
    style
        .iter()
        .map(|(key, value)| format!("{}:{value}", kebab_case(key)))
        .collect::<Vec<_>>()
        .join(";")
}

fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
