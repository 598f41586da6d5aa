//! Deterministic stand-ins for fonts and geocoders, used by unit tests.

use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;

use crate::geocode::{Address, PlaceResolver};
use crate::overlay::{FontMetrics, StyleTier, TextRenderer};

/// Every glyph is a solid box half the point size wide and the point size tall.
pub struct BlockFont;

impl FontMetrics for BlockFont {
    fn measure(&self, text: &str, tier: StyleTier) -> u32 {
        text.chars().count() as u32 * (tier.point_size() as u32 / 2)
    }
}

impl TextRenderer for BlockFont {
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        tier: StyleTier,
        x: i32,
        y: i32,
        color: Rgba<u8>,
    ) {
        let width = self.measure(text, tier);
        if width == 0 {
            return;
        }
        let rect = Rect::at(x, y).of_size(width, tier.point_size() as u32);
        draw_filled_rect_mut(canvas, rect, color);
    }
}

/// Always answers with the same address.
pub struct FixedResolver(pub Address);

#[async_trait::async_trait]
impl PlaceResolver for FixedResolver {
    fn name(&self) -> &str {
        "Fixed"
    }

    async fn lookup(&self, _latitude: f64, _longitude: f64) -> Result<Address> {
        Ok(self.0.clone())
    }
}

/// Always fails, like an unreachable service.
pub struct FailingResolver;

#[async_trait::async_trait]
impl PlaceResolver for FailingResolver {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn lookup(&self, _latitude: f64, _longitude: f64) -> Result<Address> {
        anyhow::bail!("service unavailable")
    }
}

/// A gradient image so rotations and overlays are visible in pixel data.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
    });
    DynamicImage::ImageRgba8(img)
}

/// PNG-encoded gradient, carrying no metadata.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// JPEG-encoded gradient, carrying no metadata.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .encode_image(&gradient(width, height).to_rgb8())
        .unwrap();
    buf
}

/// One little-endian TIFF directory entry.
pub struct TiffEntry {
    pub tag: u16,
    pub kind: u16,
    pub count: u32,
    pub data: Vec<u8>,
}

impl TiffEntry {
    pub fn byte(tag: u16, value: u8) -> Self {
        Self {
            tag,
            kind: 1,
            count: 1,
            data: vec![value],
        }
    }

    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: 2,
            count: data.len() as u32,
            data,
        }
    }

    pub fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            kind: 3,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: 4,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let data: Vec<u8> = values
            .iter()
            .flat_map(|(n, d)| n.to_le_bytes().into_iter().chain(d.to_le_bytes()))
            .collect();
        Self {
            tag,
            kind: 5,
            count: values.len() as u32,
            data,
        }
    }
}

/// Size of a directory plus the out-of-line values that follow it.
fn ifd_size(entries: &[TiffEntry]) -> u32 {
    let spill: usize = entries
        .iter()
        .filter(|e| e.data.len() > 4)
        .map(|e| e.data.len() + e.data.len() % 2)
        .sum();
    (2 + 12 * entries.len() + 4 + spill) as u32
}

/// Serialise a directory that starts at `offset` within the TIFF block.
fn write_ifd(out: &mut Vec<u8>, entries: &[TiffEntry], offset: u32) {
    let mut spill = Vec::new();
    let spill_start = offset + (2 + 12 * entries.len() + 4) as u32;

    out.extend((entries.len() as u16).to_le_bytes());
    for entry in entries {
        out.extend(entry.tag.to_le_bytes());
        out.extend(entry.kind.to_le_bytes());
        out.extend(entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            out.extend(inline);
        } else {
            out.extend((spill_start + spill.len() as u32).to_le_bytes());
            spill.extend(&entry.data);
            if spill.len() % 2 == 1 {
                spill.push(0);
            }
        }
    }
    out.extend(0u32.to_le_bytes());
    out.extend(spill);
}

/// Little-endian TIFF block with IFD0 and optional Exif and GPS directories.
/// Entries must be given in ascending tag order.
pub fn tiff_block(mut ifd0: Vec<TiffEntry>, exif: Vec<TiffEntry>, gps: Vec<TiffEntry>) -> Vec<u8> {
    // Pointer values are patched below once the directory sizes are known.
    if !exif.is_empty() {
        ifd0.push(TiffEntry::long(0x8769, 0));
    }
    if !gps.is_empty() {
        ifd0.push(TiffEntry::long(0x8825, 0));
    }

    let ifd0_offset = 8;
    let exif_offset = ifd0_offset + ifd_size(&ifd0);
    let gps_offset = exif_offset + if exif.is_empty() { 0 } else { ifd_size(&exif) };
    for entry in &mut ifd0 {
        match entry.tag {
            0x8769 => entry.data = exif_offset.to_le_bytes().to_vec(),
            0x8825 => entry.data = gps_offset.to_le_bytes().to_vec(),
            _ => {}
        }
    }

    let mut out = b"II".to_vec();
    out.extend(42u16.to_le_bytes());
    out.extend(ifd0_offset.to_le_bytes());
    write_ifd(&mut out, &ifd0, ifd0_offset);
    if !exif.is_empty() {
        write_ifd(&mut out, &exif, exif_offset);
    }
    if !gps.is_empty() {
        write_ifd(&mut out, &gps, gps_offset);
    }
    out
}

/// A small JPEG with an APP1 Exif segment built from the given directories.
pub fn jpeg_with_exif(
    ifd0: Vec<TiffEntry>,
    exif: Vec<TiffEntry>,
    gps: Vec<TiffEntry>,
) -> Vec<u8> {
    let tiff = tiff_block(ifd0, exif, gps);
    let mut app1 = vec![0xFF, 0xE1];
    app1.extend(((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend(b"Exif\0\0");
    app1.extend(tiff);

    let jpeg = jpeg_bytes(16, 12);
    let mut out = jpeg[..2].to_vec();
    out.extend(app1);
    out.extend(&jpeg[2..]);
    out
}
