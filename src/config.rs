use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::theme::get_color_scale;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarConfig {
    /// Width used when there are too few data points to derive one.
    pub default_bar_width: f64,
    pub bar_ratio: f64,
    pub fill: String,
    pub calc_precision: u32,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            default_bar_width: 8.0,
            bar_ratio: 0.5,
            fill: "black".to_string(),
            calc_precision: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 200.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub bar: BarConfig,
    pub render: RenderConfig,
    /// Palette cycled over bars that carry no fill of their own.
    pub palette: Option<&'static [&'static str]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    bar: Option<BarConfig>,
    render: Option<RenderConfig>,
    color_scale: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(bar) = parsed.bar {
        config.bar = bar;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }
    if let Some(name) = parsed.color_scale.as_deref() {
        match get_color_scale(Some(name)) {
            Some(colors) => config.palette = Some(colors),
            None => tracing::warn!(
                "Unknown color scale '{name}' in '{}'; bars keep their own fill.",
                path.display()
            ),
        }
    }
    Ok(config)
}
