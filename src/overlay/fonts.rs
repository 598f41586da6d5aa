use ab_glyph::{Font, FontArc, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

use super::{FontMetrics, StyleTier, TextRenderer};
use crate::config::FontConfig;

/// The three TrueType faces used by the overlay.
#[derive(Clone)]
pub struct FontSet {
    bold: FontArc,
    medium: FontArc,
    regular: FontArc,
}

impl FontSet {
    pub fn from_bytes(bold: Vec<u8>, medium: Vec<u8>, regular: Vec<u8>) -> Result<Self> {
        Ok(Self {
            bold: FontArc::try_from_vec(bold).context("Invalid bold font data")?,
            medium: FontArc::try_from_vec(medium).context("Invalid medium font data")?,
            regular: FontArc::try_from_vec(regular).context("Invalid regular font data")?,
        })
    }

    /// Load the faces named in the config.
    pub fn load(config: &FontConfig) -> Result<Self> {
        Self::from_bytes(
            read_font(&config.bold)?,
            read_font(&config.medium)?,
            read_font(&config.regular)?,
        )
    }

    fn face(&self, tier: StyleTier) -> &FontArc {
        match tier {
            StyleTier::BoldLarge => &self.bold,
            StyleTier::Medium => &self.medium,
            StyleTier::RegularSmall => &self.regular,
        }
    }

    /// Scale at which one em is `point_size` pixels tall.
    ///
    /// `PxScale` measures ascent to descent rather than the em square, so the
    /// size is stretched by that ratio.
    fn scale(&self, tier: StyleTier) -> PxScale {
        let size = tier.point_size();
        let face = self.face(tier);
        match face.units_per_em() {
            Some(units) => PxScale::from(size * face.height_unscaled() / units),
            None => PxScale::from(size),
        }
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))
}

impl FontMetrics for FontSet {
    fn measure(&self, text: &str, tier: StyleTier) -> u32 {
        text_size(self.scale(tier), self.face(tier), text).0
    }
}

impl TextRenderer for FontSet {
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        tier: StyleTier,
        x: i32,
        y: i32,
        color: Rgba<u8>,
    ) {
        draw_text_mut(canvas, color, x, y, self.scale(tier), self.face(tier), text);
    }
}
