use nom_exif::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Cursor;

pub const TAG_MAKE: &str = "Make";
pub const TAG_MODEL: &str = "Model";
pub const TAG_ISO: &str = "ISOSpeedRatings";
pub const TAG_FOCAL_LENGTH: &str = "FocalLength";
pub const TAG_F_NUMBER: &str = "FNumber";
pub const TAG_EXPOSURE_TIME: &str = "ExposureTime";
pub const TAG_ORIENTATION: &str = "Orientation";
pub const TAG_GPS_INFO: &str = "GPSInfo";

pub const GPS_LATITUDE: &str = "GPSLatitude";
pub const GPS_LATITUDE_REF: &str = "GPSLatitudeRef";
pub const GPS_LONGITUDE: &str = "GPSLongitude";
pub const GPS_LONGITUDE_REF: &str = "GPSLongitudeRef";

/// An unsigned EXIF rational, kept exactly as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    /// Floating-point value, or `None` when the denominator is zero.
    pub fn to_f64(self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(self.numerator as f64 / self.denominator as f64)
        }
    }
}

/// A single undecoded tag value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Integer(u32),
    Rational(Rational),
    Rationals(Vec<Rational>),
    /// Nested sub-map, used for the GPS block.
    Group(RawMetadata),
}

/// Tag name → raw value, as found in an image's embedded metadata block.
///
/// Empty when the image carries no metadata (screenshots, edited exports).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawMetadata(BTreeMap<String, RawValue>);

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, value: RawValue) {
        self.0.insert(tag.into(), value);
    }

    pub fn get(&self, tag: &str) -> Option<&RawValue> {
        self.0.get(tag)
    }

    /// The nested GPS block, if any.
    pub fn gps(&self) -> Option<&RawMetadata> {
        match self.get(TAG_GPS_INFO)? {
            RawValue::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawMetadata {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Decode the embedded metadata block of an encoded image.
///
/// Never fails: a missing or unreadable block yields an empty map.
pub fn decode_metadata(bytes: &[u8]) -> RawMetadata {
    let mut parser = MediaParser::new();
    let ms = match MediaSource::seekable(Cursor::new(bytes)) {
        Ok(ms) => ms,
        Err(e) => {
            log::debug!("Unrecognised container, no metadata: {e}");
            return RawMetadata::default();
        }
    };

    if !ms.has_exif() {
        log::debug!("Image carries no EXIF block");
        return RawMetadata::default();
    }

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(e) => {
            log::debug!("Unreadable EXIF block: {e}");
            return RawMetadata::default();
        }
    };

    // Parse GPS info before converting to Exif (consumes the iterator)
    let gps_info = iter.parse_gps_info().ok().flatten();
    let exif: Exif = iter.into();

    let mut raw = RawMetadata::default();
    let tags = [
        (ExifTag::Make, TAG_MAKE),
        (ExifTag::Model, TAG_MODEL),
        (ExifTag::ISOSpeedRatings, TAG_ISO),
        (ExifTag::FocalLength, TAG_FOCAL_LENGTH),
        (ExifTag::FNumber, TAG_F_NUMBER),
        (ExifTag::ExposureTime, TAG_EXPOSURE_TIME),
        (ExifTag::Orientation, TAG_ORIENTATION),
    ];
    for (tag, name) in tags {
        if let Some(value) = exif.get(tag).and_then(entry_to_raw) {
            raw.insert(name, value);
        }
    }

    if let Some(gps) = gps_info.map(|gps| gps_block(&gps)).filter(|b| !b.is_empty()) {
        raw.insert(TAG_GPS_INFO, RawValue::Group(gps));
    }

    log::debug!("Decoded {} metadata tag(s)", raw.len());
    raw
}

/// Convert a nom-exif entry into a raw value; unsupported kinds are dropped.
fn entry_to_raw(val: &EntryValue) -> Option<RawValue> {
    let value = match val {
        EntryValue::Text(s) => {
            let s = s.trim().trim_end_matches('\0').trim();
            if s.is_empty() {
                return None;
            }
            RawValue::Text(s.to_string())
        }
        EntryValue::U8(v) => RawValue::Integer(*v as u32),
        EntryValue::U16(v) => RawValue::Integer(*v as u32),
        EntryValue::U32(v) => RawValue::Integer(*v),
        EntryValue::U16Array(v) => RawValue::Integer(*v.first()? as u32),
        EntryValue::U32Array(v) => RawValue::Integer(*v.first()?),
        EntryValue::URational(r) => RawValue::Rational(Rational::new(r.0, r.1)),
        EntryValue::URationalArray(v) => {
            RawValue::Rationals(v.iter().map(|r| Rational::new(r.0, r.1)).collect())
        }
        _ => return None,
    };
    Some(value)
}

/// Build the GPS group. nom-exif fills an axis it did not find with a `'\0'`
/// ref and `0/0` parts, so such an axis is left out entirely.
fn gps_block(gps: &GPSInfo) -> RawMetadata {
    let mut block = RawMetadata::new();

    if let Some(latitude) = gps_axis(gps.latitude_ref, &gps.latitude) {
        block.insert(GPS_LATITUDE, latitude);
        block.insert(GPS_LATITUDE_REF, RawValue::Text(gps.latitude_ref.to_string()));
    }
    if let Some(longitude) = gps_axis(gps.longitude_ref, &gps.longitude) {
        block.insert(GPS_LONGITUDE, longitude);
        block.insert(GPS_LONGITUDE_REF, RawValue::Text(gps.longitude_ref.to_string()));
    }

    block
}

fn gps_axis(reference: char, latlng: &LatLng) -> Option<RawValue> {
    let parts = [&latlng.0, &latlng.1, &latlng.2];
    if reference == '\0' || parts.iter().any(|r| r.1 == 0) {
        return None;
    }
    Some(RawValue::Rationals(parts.iter().map(|r| Rational::new(r.0, r.1)).collect()))
}
