//! # Typography and Spacing
//!
//! Fixed layout constants in points (1/72 inch) and the handful of colors the
//! renderer draws with. There is no cascade: every block kind has one look.

use serde::Serialize;

// Heading sizes by level. Levels 5 and 6 fall back to body size.
pub const H1_SIZE_PT: f64 = 14.0;
pub const H2_SIZE_PT: f64 = 12.0;
pub const H3_SIZE_PT: f64 = 11.0;
pub const H4_SIZE_PT: f64 = 10.0;
pub const BODY_SIZE_PT: f64 = 10.0;
pub const CODE_SIZE_PT: f64 = 10.0;

pub const PARAGRAPH_SPACING_PT: f64 = 8.0;
pub const HEADING_TOP_SPACING_PT: f64 = 16.0;
pub const HEADING_BOTTOM_SPACING_PT: f64 = 8.0;
pub const LIST_INDENT_PT: f64 = 24.0;
pub const LIST_ITEM_SPACING_PT: f64 = 4.0;
pub const CODE_BLOCK_PADDING_PT: f64 = 12.0;
pub const CODE_BLOCK_RADIUS_PT: f64 = 4.0;

/// Line pitch multiplier for wrapped prose.
pub const TEXT_LINE_SPACING: f64 = 1.2;
/// Line pitch multiplier for code listings.
pub const CODE_LINE_SPACING: f64 = 1.5;

/// Horizontal offset of the block quote rule from the left margin.
pub const QUOTE_RULE_OFFSET_PT: f64 = 8.0;
pub const QUOTE_RULE_WIDTH_PT: f64 = 2.0;
/// Text indent inside a block quote.
pub const QUOTE_INDENT_PT: f64 = 24.0;

/// Padding above and below a thematic break line.
pub const RULE_PADDING_PT: f64 = 10.0;
pub const RULE_HEIGHT_PT: f64 = RULE_PADDING_PT * 2.0;

/// A code block that would start this close to the top margin gets a full
/// page's worth of lines, not just the space left below the cursor.
pub const CODE_NEAR_TOP_PT: f64 = 50.0;

pub const BULLET_MARKER: &str = "\u{2022}";

/// Font size and top spacing for a heading level.
pub fn heading_metrics(level: u8) -> (f64, f64) {
    match level {
        1 => (H1_SIZE_PT, HEADING_TOP_SPACING_PT),
        2 => (H2_SIZE_PT, HEADING_TOP_SPACING_PT),
        3 => (H3_SIZE_PT, HEADING_TOP_SPACING_PT),
        4 => (H4_SIZE_PT, HEADING_TOP_SPACING_PT),
        _ => (BODY_SIZE_PT, PARAGRAPH_SPACING_PT),
    }
}

/// RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Block quote rule.
    pub const GRAY: Color = Color::rgb(0.533, 0.533, 0.533);
    /// Thematic break line.
    pub const LIGHT_GRAY: Color = Color::rgb(0.8, 0.8, 0.8);
    /// Code block background.
    pub const CODE_BACKGROUND: Color = Color::rgb(0.949, 0.949, 0.949);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_levels() {
        assert_eq!(heading_metrics(1), (14.0, 16.0));
        assert_eq!(heading_metrics(2), (12.0, 16.0));
        assert_eq!(heading_metrics(3), (11.0, 16.0));
        assert_eq!(heading_metrics(4), (10.0, 16.0));
        assert_eq!(heading_metrics(5), (10.0, 8.0));
        assert_eq!(heading_metrics(6), (10.0, 8.0));
    }

    #[test]
    fn grays_are_ordered() {
        assert!(Color::GRAY.r < Color::LIGHT_GRAY.r);
        assert!(Color::LIGHT_GRAY.r < Color::CODE_BACKGROUND.r);
        assert!((Color::CODE_BACKGROUND.r - 242.0 / 255.0).abs() < 1e-3);
    }
}
