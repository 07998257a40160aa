use crate::bar::render_bar;
use crate::config::{Config, load_config};
use crate::props::{BarProps, Prop};
use crate::render::{render_svg, write_output_svg};
use crate::style::{StyleValue, calc};
use crate::theme::{color_scale_names, get_color_scale};
use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chartbar", version, about = "Chart bar primitive renderer")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render bar props (a JSON object or an array of them)
    Bar(BarArgs),
    /// Print a named color scale, one color per line
    Palette {
        /// Scale name; greyscale when omitted
        name: Option<String>,
    },
    /// Reduce a CSS calc() expression
    Calc {
        expr: String,

        /// Decimal places kept in the result
        #[arg(short = 'p', long = "precision")]
        precision: Option<u32>,

        /// Config JSON file; supplies the precision when `-p` is omitted
        #[arg(short = 'c', long = "configFile")]
        config: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct BarArgs {
    /// Input props file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Bar(bar_args) => run_bar(bar_args),
        Command::Palette { name } => run_palette(name.as_deref()),
        Command::Calc {
            expr,
            precision,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            println!("{}", reduce_calc(&expr, precision, &config)?);
            Ok(())
        }
    }
}

fn run_bar(args: BarArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let mut bars = parse_props(&input)?;
    if bars.is_empty() {
        return Err(anyhow::anyhow!("No bars found in input"));
    }
    if let Some(palette) = config.palette {
        apply_palette(&mut bars, palette);
    }

    let elements: Vec<_> = bars
        .iter()
        .map(|props| render_bar(props, &config.bar))
        .collect();
    tracing::debug!(count = elements.len(), "rendered bars");
    let svg = render_svg(&elements, &config.render);

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
        OutputFormat::Png => write_png(&svg, args.output.as_deref(), &config),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

/// An explicit precision wins over the configured one.
pub fn reduce_calc(expr: &str, precision: Option<u32>, config: &Config) -> Result<String> {
    let precision = precision.unwrap_or(config.bar.calc_precision);
    Ok(calc(expr, precision)?)
}

fn run_palette(name: Option<&str>) -> Result<()> {
    let Some(colors) = get_color_scale(name) else {
        let known: Vec<&str> = color_scale_names().collect();
        tracing::warn!("Unknown color scale requested: {:?}", name);
        return Err(anyhow::anyhow!(
            "Unknown color scale '{}' (expected one of: {})",
            name.unwrap_or_default(),
            known.join(", ")
        ));
    };
    for color in colors {
        println!("{color}");
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Accepts one props object or an array of them.
pub fn parse_props(input: &str) -> Result<Vec<BarProps>> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| Ok(serde_json::from_value(item)?))
            .collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

/// Gives every bar without its own fill the next palette color.
pub fn apply_palette(bars: &mut [BarProps], palette: &[&str]) {
    if palette.is_empty() {
        return;
    }
    for (idx, props) in bars.iter_mut().enumerate() {
        if props.style.contains_key("fill") {
            continue;
        }
        let color = palette[idx % palette.len()];
        props
            .style
            .insert("fill".to_string(), Prop::Literal(StyleValue::from(color)));
    }
}
