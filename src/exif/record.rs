use serde::Serialize;

use super::gps::{GpsCoordinate, resolve_coordinates};
use super::reader::*;
use crate::geocode::Place;

/// Typed view of one image's capture metadata.
///
/// Every field is optional; absence is rendered as an "unknown" sentinel at
/// formatting time, never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExifRecord {
    pub make: Option<String>,
    pub model: Option<String>,
    pub iso: Option<u32>,
    /// Millimetres, rounded to 2 decimal places.
    pub focal_length: Option<f64>,
    /// Rounded to 2 decimal places.
    pub f_number: Option<f64>,
    /// Kept as stored; reduced to `1 / n` only for display.
    pub exposure_time: Option<Rational>,
    pub orientation: Option<u32>,
    pub gps: Option<GpsCoordinate>,
    pub place: Option<Place>,
}

impl ExifRecord {
    /// Build the record from decoded metadata. `place` is left empty; it is
    /// filled in by [`ExifRecord::with_place`] once a lookup has run.
    pub fn from_raw(raw: &RawMetadata) -> Self {
        Self {
            make: text(raw.get(TAG_MAKE)),
            model: text(raw.get(TAG_MODEL)),
            iso: integer(raw.get(TAG_ISO)),
            focal_length: decimal(raw.get(TAG_FOCAL_LENGTH)),
            f_number: decimal(raw.get(TAG_F_NUMBER)),
            exposure_time: rational(raw.get(TAG_EXPOSURE_TIME)),
            orientation: integer(raw.get(TAG_ORIENTATION)),
            gps: resolve_coordinates(raw),
            place: None,
        }
    }

    pub fn with_place(self, place: Option<Place>) -> Self {
        Self { place, ..self }
    }
}

/// Round half to even at 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn text(value: Option<&RawValue>) -> Option<String> {
    match value? {
        RawValue::Text(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn integer(value: Option<&RawValue>) -> Option<u32> {
    match value? {
        RawValue::Integer(v) => Some(*v),
        _ => None,
    }
}

fn rational(value: Option<&RawValue>) -> Option<Rational> {
    match value? {
        RawValue::Rational(r) => Some(*r),
        RawValue::Rationals(v) => v.first().copied(),
        _ => None,
    }
}

fn decimal(value: Option<&RawValue>) -> Option<f64> {
    let value = match value? {
        RawValue::Integer(v) => *v as f64,
        other => rational(Some(other))?.to_f64()?,
    };
    Some(round2(value))
}
