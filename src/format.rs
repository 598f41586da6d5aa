//! Display strings for the overlay lines.
//!
//! This is the only place "unknown" sentinels appear; the record itself
//! stores absence as `None`.

use crate::exif::{ExifRecord, Rational, round2};
use crate::geocode::Place;

pub const UNKNOWN_MAKE: &str = "Unknown make";
pub const UNKNOWN_MODEL: &str = "Unknown model";
pub const UNKNOWN_ISO: &str = "Unknown ISO";
pub const UNKNOWN_FOCAL_LENGTH: &str = "Unknown focal length";
pub const UNKNOWN_F_NUMBER: &str = "Unknown f-number";
pub const UNKNOWN_EXPOSURE_TIME: &str = "Unknown exposure time";

/// Text of the three overlay lines, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLines {
    pub model: String,
    /// `None` when there is no place to show; the line is then omitted.
    pub place: Option<String>,
    pub settings: String,
}

impl DisplayLines {
    pub fn from_record(record: &ExifRecord) -> Self {
        let place = if record.gps.is_some() {
            record.place.as_ref().map(format_place)
        } else {
            None
        };

        Self {
            model: record.model.clone().unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
            place,
            settings: format_settings(record),
        }
    }
}

pub fn format_make(make: Option<&str>) -> String {
    make.unwrap_or(UNKNOWN_MAKE).to_string()
}

pub fn format_iso(iso: Option<u32>) -> String {
    iso.map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_ISO.to_string())
}

pub fn format_focal_length(focal_length: Option<f64>) -> String {
    focal_length
        .map(format_decimal)
        .unwrap_or_else(|| UNKNOWN_FOCAL_LENGTH.to_string())
}

pub fn format_f_number(f_number: Option<f64>) -> String {
    f_number
        .map(format_decimal)
        .unwrap_or_else(|| UNKNOWN_F_NUMBER.to_string())
}

/// Shutter speed as a unit fraction, `1 / n` with `n = round(den / num)`.
///
/// A zero numerator is unknown rather than a division by zero. A zero
/// denominator follows the formula and gives `1 / 0`, as do exposures of
/// two seconds or more.
pub fn format_exposure_time(exposure: Option<Rational>) -> String {
    match exposure {
        Some(r) if r.numerator > 0 => {
            let n = (r.denominator as f64 / r.numerator as f64).round_ties_even();
            format!("1 / {n}")
        }
        _ => UNKNOWN_EXPOSURE_TIME.to_string(),
    }
}

/// `"{city}, {region}, {country}"`; missing parts are left blank.
pub fn format_place(place: &Place) -> String {
    format!(
        "{}, {}, {}",
        place.city.as_deref().unwrap_or_default(),
        place.region.as_deref().unwrap_or_default(),
        place.country.as_deref().unwrap_or_default()
    )
}

/// `ISO {iso} | {focal} mm | f/{f} | {exposure} s`
pub fn format_settings(record: &ExifRecord) -> String {
    format!(
        "ISO {} | {} mm | f/{} | {} s",
        format_iso(record.iso),
        format_focal_length(record.focal_length),
        format_f_number(record.f_number),
        format_exposure_time(record.exposure_time)
    )
}

/// Two-decimal value; whole numbers keep one decimal (`50.0`, `2.8`, `18.12`).
fn format_decimal(value: f64) -> String {
    let value = round2(value);
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
