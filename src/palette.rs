//! Named colour sequences used to colour categories.
//!
//! Qualitative sequences come from the CARTO and ColorBrewer sets, sequential
//! ones are listed dark-to-light or light-to-dark as their `_r` suffix says.

use plotters::style::RGBColor;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteId {
    Pastel,
    Set2,
    Bold,
    Dark2,
    Set3,
    Prism,
    BluesR,
    PlasmaR,
    Magenta,
    YlOrRd,
}

const PASTEL: &[&str] = &[
    "#66c5cc", "#f6cf71", "#f89c74", "#dcb0f2", "#87c55f", "#9eb9f3", "#fe88b1", "#c9db74",
    "#8be0a4", "#b497e7", "#b3b3b3",
];
const SET2: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];
const BOLD: &[&str] = &[
    "#7f3c8d", "#11a579", "#3969ac", "#f2b701", "#e73f74", "#80ba5a", "#e68310", "#008695",
    "#cf1c90", "#f97b72", "#a5aa99",
];
const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];
const SET3: &[&str] = &[
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];
const PRISM: &[&str] = &[
    "#5f4690", "#1d6996", "#38a6a5", "#0f8554", "#73af48", "#edad08", "#e17c05", "#cc503e",
    "#94346e", "#6f4070", "#666666",
];
const BLUES_R: &[&str] = &[
    "#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef", "#deebf7",
    "#f7fbff",
];
const PLASMA_R: &[&str] = &[
    "#f0f921", "#fdca26", "#fb9f3a", "#ed7953", "#d8576b", "#bd3786", "#9c179e", "#7201a8",
    "#46039f", "#0d0887",
];
const MAGENTA: &[&str] = &[
    "#f3cbd3", "#eaa9bd", "#dd88ac", "#ca699d", "#b14d8e", "#91357d", "#6c2167",
];
const YLORRD: &[&str] = &[
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];

impl PaletteId {
    fn hex_codes(self) -> &'static [&'static str] {
        match self {
            PaletteId::Pastel => PASTEL,
            PaletteId::Set2 => SET2,
            PaletteId::Bold => BOLD,
            PaletteId::Dark2 => DARK2,
            PaletteId::Set3 => SET3,
            PaletteId::Prism => PRISM,
            PaletteId::BluesR => BLUES_R,
            PaletteId::PlasmaR => PLASMA_R,
            PaletteId::Magenta => MAGENTA,
            PaletteId::YlOrRd => YLORRD,
        }
    }

    pub fn colors(self) -> Vec<RGBColor> {
        self.hex_codes()
            .iter()
            .filter_map(|hex| parse_hex_color(hex))
            .collect()
    }
}

/// Assigns palette colours to category keys in order of first appearance
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<RGBColor>,
    assigned: HashMap<String, RGBColor>,
    order: Vec<String>,
}

impl ColorPalette {
    pub fn new(id: PaletteId) -> Self {
        Self {
            colors: id.colors(),
            assigned: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// First colour of the sequence, used when nothing is mapped to colour
    pub fn primary(&self) -> RGBColor {
        self.nth(0)
    }

    pub fn nth(&self, idx: usize) -> RGBColor {
        if self.colors.is_empty() {
            return RGBColor(31, 119, 180);
        }
        self.colors[idx % self.colors.len()]
    }

    pub fn color_for(&mut self, key: &str) -> RGBColor {
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }
        let color = self.nth(self.order.len());
        self.assigned.insert(key.to_string(), color);
        self.order.push(key.to_string());
        color
    }

    /// Keys in assignment order with their colours
    pub fn entries(&self) -> Vec<(String, RGBColor)> {
        self.order
            .iter()
            .map(|key| (key.clone(), self.assigned[key]))
            .collect()
    }
}

/// Parse hex color (#RRGGBB or #RGB)
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim().trim_start_matches('#');
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

/// CSS form of a colour, for the HTML legend
pub fn to_css(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_palette_parses() {
        for id in [
            PaletteId::Pastel,
            PaletteId::Set2,
            PaletteId::Bold,
            PaletteId::Dark2,
            PaletteId::Set3,
            PaletteId::Prism,
            PaletteId::BluesR,
            PaletteId::PlasmaR,
            PaletteId::Magenta,
            PaletteId::YlOrRd,
        ] {
            assert_eq!(id.colors().len(), id.hex_codes().len(), "{:?}", id);
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1b9e77"), Some(RGBColor(27, 158, 119)));
        assert_eq!(parse_hex_color("#fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex_color("#12"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_color_for_is_stable_per_key() {
        let mut palette = ColorPalette::new(PaletteId::Dark2);
        let a = palette.color_for("A");
        let b = palette.color_for("B");
        assert_ne!(a, b);
        assert_eq!(palette.color_for("A"), a);
        assert_eq!(a, palette.primary());
        let keys: Vec<String> = palette.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_palette_wraps_around() {
        let palette = ColorPalette::new(PaletteId::Set2);
        assert_eq!(palette.nth(8), palette.nth(0));
    }

    #[test]
    fn test_to_css() {
        assert_eq!(to_css(RGBColor(8, 48, 107)), "#08306b");
    }
}
