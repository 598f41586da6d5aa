//! Overlay text layout and rendering.
//!
//! Up to three lines are stacked above the bottom edge of the image:
//!
//! ```text
//!   model     (bold, 59 pt)     4 rows up, or 3 when there is no place line
//!   place     (medium, 54 pt)   3 rows up
//!   settings  (regular, 49 pt)  2 rows up
//! ```
//!
//! A row is 80 px. Lines are anchored 80 px in from the left edge, or end
//! 80 px before the right edge when right-aligned.

mod fonts;
mod layout;

pub use fonts::FontSet;
pub use layout::{LineKind, PlacedLine, layout, row_multiplier};

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Vertical distance between rows, and the horizontal margin.
pub const ROW_PITCH: u32 = 80;
pub const MARGIN: u32 = 80;
pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Which lines to draw, and on which side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayOptions {
    pub alignment: Alignment,
    pub show_model: bool,
    pub show_location: bool,
    pub show_settings: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::Left,
            show_model: true,
            show_location: true,
            show_settings: true,
        }
    }
}

/// Font weight and size of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTier {
    BoldLarge,
    Medium,
    RegularSmall,
}

impl StyleTier {
    pub fn point_size(self) -> f32 {
        match self {
            Self::BoldLarge => 59.0,
            Self::Medium => 54.0,
            Self::RegularSmall => 49.0,
        }
    }
}

/// Text measurement, needed for right alignment.
pub trait FontMetrics {
    /// Rendered width of `text` in pixels.
    fn measure(&self, text: &str, tier: StyleTier) -> u32;
}

/// Draws text onto a canvas. `x`/`y` is the top-left of the text box.
pub trait TextRenderer: FontMetrics + Send + Sync {
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        tier: StyleTier,
        x: i32,
        y: i32,
        color: Rgba<u8>,
    );
}

/// Burn placed lines into `canvas` in white.
pub fn render_lines(canvas: &mut RgbaImage, lines: &[PlacedLine], renderer: &dyn TextRenderer) {
    for line in lines {
        renderer.draw(canvas, &line.text, line.tier, line.x, line.y, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BlockFont;

    #[test]
    fn tier_sizes() {
        assert_eq!(StyleTier::BoldLarge.point_size(), 59.0);
        assert_eq!(StyleTier::Medium.point_size(), 54.0);
        assert_eq!(StyleTier::RegularSmall.point_size(), 49.0);
    }

    #[test]
    fn options_default_shows_everything_left() {
        let opts = OverlayOptions::default();
        assert_eq!(opts.alignment, Alignment::Left);
        assert!(opts.show_model && opts.show_location && opts.show_settings);
    }

    #[test]
    fn alignment_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Alignment::Right).unwrap(), r#""right""#);
        let a: Alignment = serde_json::from_str(r#""left""#).unwrap();
        assert_eq!(a, Alignment::Left);
    }

    #[test]
    fn render_draws_white_at_positions() {
        let mut canvas = RgbaImage::from_pixel(400, 400, Rgba([0, 0, 0, 255]));
        let lines = vec![PlacedLine {
            kind: LineKind::Settings,
            text: "ab".into(),
            tier: StyleTier::RegularSmall,
            x: 80,
            y: 240,
        }];
        render_lines(&mut canvas, &lines, &BlockFont);

        assert_eq!(*canvas.get_pixel(80, 240), TEXT_COLOR);
        assert_eq!(*canvas.get_pixel(79, 240), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(80, 239), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn render_nothing_leaves_canvas() {
        let mut canvas = RgbaImage::from_pixel(50, 50, Rgba([9, 9, 9, 255]));
        let before = canvas.clone();
        render_lines(&mut canvas, &[], &BlockFont);
        assert_eq!(canvas, before);
    }
}
