pub mod bar;
pub mod calc;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod path;
pub mod props;
pub mod render;
pub mod style;
pub mod theme;

pub use bar::{BarElement, CornerRadius, Orientation, render_bar};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{BarConfig, Config, RenderConfig, load_config};
pub use props::{BarProps, CornerRadiusSpec, Datum, Prop};
pub use render::render_svg;
pub use style::{calc, remove_invisible, to_transform_string};
pub use theme::get_color_scale;
