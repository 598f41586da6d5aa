//! Upright correction from the EXIF orientation tag.
//!
//! Only the pure rotations are applied:
//!
//! | Tag | Stored as | Correction |
//! |-----|-----------|------------|
//! | 3 | upside down | rotate 180° |
//! | 6 | rotated 90° CCW | rotate 270° counter-clockwise (90° clockwise) |
//! | 8 | rotated 90° CW | rotate 90° counter-clockwise |
//!
//! Any other value, including the mirrored codes and a missing tag, leaves the
//! image untouched. Rotations swap width and height where needed, so nothing
//! is cropped.

use image::DynamicImage;

/// Counter-clockwise rotation applied to bring an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    /// Map an orientation tag value to its correction.
    pub fn from_orientation(tag: Option<u32>) -> Self {
        match tag {
            Some(3) => Self::Ccw180,
            Some(6) => Self::Ccw270,
            Some(8) => Self::Ccw90,
            _ => Self::None,
        }
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        // image-rs rotates clockwise
        match self {
            Self::None => img,
            Self::Ccw90 => img.rotate270(),
            Self::Ccw180 => img.rotate180(),
            Self::Ccw270 => img.rotate90(),
        }
    }
}

/// Rotate `img` upright according to its orientation tag.
pub fn correct_orientation(img: DynamicImage, tag: Option<u32>) -> DynamicImage {
    let rotation = Rotation::from_orientation(tag);
    if rotation != Rotation::None {
        log::debug!("Orientation {tag:?}: applying {rotation:?}");
    }
    rotation.apply(img)
}
