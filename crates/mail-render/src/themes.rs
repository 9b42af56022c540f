use plotters::style::RGBColor;

/// Colours used to draw a chart.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub name: &'static str,

    // ── Canvas ───────────────────────────────────────────────────────────────
    pub background: RGBColor,
    /// Titles, axis labels and legend text.
    pub foreground: RGBColor,
    /// Major grid lines.
    pub grid: RGBColor,
    /// Legend box fill.
    pub legend_background: RGBColor,

    // ── Series ───────────────────────────────────────────────────────────────
    /// Line colours, cycled when there are more series than entries.
    pub palette: &'static [RGBColor],
}

/// Colour-blind friendly palette (Okabe–Ito order) for light backgrounds.
const LIGHT_PALETTE: &[RGBColor] = &[
    RGBColor(0, 114, 178),
    RGBColor(213, 94, 0),
    RGBColor(0, 158, 115),
    RGBColor(204, 121, 167),
    RGBColor(230, 159, 0),
    RGBColor(86, 180, 233),
    RGBColor(120, 120, 120),
    RGBColor(160, 60, 60),
];

const DARK_PALETTE: &[RGBColor] = &[
    RGBColor(86, 180, 233),
    RGBColor(240, 228, 66),
    RGBColor(0, 158, 115),
    RGBColor(230, 159, 0),
    RGBColor(204, 121, 167),
    RGBColor(213, 94, 0),
    RGBColor(200, 200, 200),
    RGBColor(130, 200, 130),
];

impl ChartTheme {
    /// Dark lines on a white canvas.
    pub fn light() -> Self {
        Self {
            name: "light",
            background: RGBColor(255, 255, 255),
            foreground: RGBColor(30, 30, 30),
            grid: RGBColor(225, 225, 225),
            legend_background: RGBColor(250, 250, 250),
            palette: LIGHT_PALETTE,
        }
    }

    /// Bright lines on a near-black canvas.
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: RGBColor(24, 26, 31),
            foreground: RGBColor(220, 220, 220),
            grid: RGBColor(60, 63, 70),
            legend_background: RGBColor(40, 43, 50),
            palette: DARK_PALETTE,
        }
    }

    /// Look a theme up by name; unknown names fall back to light.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Colour for the `index`-th series.
    pub fn series_color(&self, index: usize) -> RGBColor {
        self.palette[index % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(ChartTheme::from_name("dark").name, "dark");
        assert_eq!(ChartTheme::from_name("LIGHT").name, "light");
        assert_eq!(ChartTheme::from_name("neon").name, "light");
    }

    #[test]
    fn test_series_color_cycles() {
        let theme = ChartTheme::light();
        let n = theme.palette.len();
        assert_eq!(theme.series_color(0), theme.series_color(n));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_palettes_distinct_from_background() {
        for theme in [ChartTheme::light(), ChartTheme::dark()] {
            assert!(theme.palette.iter().all(|c| *c != theme.background));
        }
    }
}
