pub const DEFAULT_COLOR_SCALE: &str = "greyscale";

const GREYSCALE: [&str; 5] = ["#7d7d7d", "#5e5e5e", "#969696", "#bdbdbd", "#000000"];

const QUALITATIVE: [&str; 10] = [
    "#334D5C", "#45B29D", "#EFC94C", "#E27A3F", "#DF5A49", "#4F7DA1", "#55DBC1", "#EFDA97",
    "#E2A37F", "#DF948A",
];

const HEATMAP: [&str; 5] = ["#428517", "#77D200", "#D6D305", "#EC8E19", "#C92B05"];
const WARM: [&str; 5] = ["#940031", "#C43343", "#DC5429", "#FF821D", "#FFAF55"];
const COOL: [&str; 5] = ["#2746B9", "#0B69D4", "#2794DB", "#31BB76", "#60E83B"];
// The repeated third/fourth shade is part of the published palette.
const RED: [&str; 5] = ["#611310", "#7D1D1D", "#B02928", "#B02928", "#D86B67"];
const BLUE: [&str; 5] = ["#002C61", "#004B8F", "#006BC9", "#3795E5", "#65B4F4"];
const GREEN: [&str; 5] = ["#354722", "#466631", "#649146", "#8AB25C", "#A9C97E"];

pub static COLOR_SCALES: [(&str, &[&str]); 8] = [
    ("greyscale", &GREYSCALE),
    ("qualitative", &QUALITATIVE),
    ("heatmap", &HEATMAP),
    ("warm", &WARM),
    ("cool", &COOL),
    ("red", &RED),
    ("blue", &BLUE),
    ("green", &GREEN),
];

/// Palette lookup. No name (or an empty one) yields greyscale; an unknown
/// name yields `None`.
pub fn get_color_scale(name: Option<&str>) -> Option<&'static [&'static str]> {
    let name = name.filter(|name| !name.is_empty()).unwrap_or(DEFAULT_COLOR_SCALE);
    COLOR_SCALES
        .iter()
        .find(|(scale, _)| *scale == name)
        .map(|(_, colors)| *colors)
}

pub fn color_scale_names() -> impl Iterator<Item = &'static str> {
    COLOR_SCALES.iter().map(|(name, _)| *name)
}
