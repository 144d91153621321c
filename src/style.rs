//! Chart styling configuration handed to the rendering collaborator.
//!
//! Built explicitly at startup and passed in; nothing here mutates shared
//! global state. Defaults match the publication settings the charts were
//! originally produced with.

use serde::Serialize;

/// Colors for S/I/R series, matching the accessible palette order.
pub const SERIES_COLORS: [&str; 3] = ["#2b8cbe", "#e41a1c", "#4daf4a"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    /// Cycle of line/bar colors, one per region or series.
    pub palette: Vec<String>,
    pub font_family: String,
    pub base_font_size: u32,
    /// On-screen figure resolution.
    pub figure_dpi: u32,
    /// Resolution for saved images.
    pub save_dpi: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            palette: ["#2b8cbe", "#e41a1c", "#4daf4a", "#984ea3", "#ff7f00", "#a65628"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            font_family: "serif".to_string(),
            base_font_size: 12,
            figure_dpi: 120,
            save_dpi: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_complete() {
        let style = ChartStyle::default();
        assert_eq!(style.palette.len(), 6);
        assert_eq!(style.save_dpi, 300);
        assert_eq!(style.font_family, "serif");
    }
}
