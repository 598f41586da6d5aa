use serde::Serialize;

use super::reader::{
    GPS_LATITUDE, GPS_LATITUDE_REF, GPS_LONGITUDE, GPS_LONGITUDE_REF, Rational, RawMetadata,
    RawValue,
};

/// Signed decimal degrees. South and west are negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolve the GPS block of `raw` into signed decimal degrees.
///
/// Returns `None` unless latitude, latitude ref, longitude, and longitude ref
/// are all present. Values are not range-checked: a malformed but parseable
/// block produces whatever coordinate the arithmetic gives.
pub fn resolve_coordinates(raw: &RawMetadata) -> Option<GpsCoordinate> {
    let gps = raw.gps()?;

    let latitude = dms_to_decimal(gps.get(GPS_LATITUDE)?)?;
    let latitude_ref = hemisphere(gps.get(GPS_LATITUDE_REF)?)?;
    let longitude = dms_to_decimal(gps.get(GPS_LONGITUDE)?)?;
    let longitude_ref = hemisphere(gps.get(GPS_LONGITUDE_REF)?)?;

    let latitude = if latitude_ref == "N" { latitude } else { -latitude };
    let longitude = if longitude_ref == "E" { longitude } else { -longitude };

    Some(GpsCoordinate { latitude, longitude })
}

/// Convert a degrees/minutes/seconds triple to decimal degrees.
fn dms_to_decimal(value: &RawValue) -> Option<f64> {
    let RawValue::Rationals(parts) = value else {
        return None;
    };
    let [d, m, s] = parts.get(..3)? else {
        return None;
    };

    // Zero denominators are not rejected; they yield inf/NaN like any other
    // malformed input.
    let part = |r: &Rational| r.numerator as f64 / r.denominator as f64;
    Some(part(d) + part(m) / 60.0 + part(s) / 3600.0)
}

fn hemisphere(value: &RawValue) -> Option<&str> {
    match value {
        RawValue::Text(s) => Some(s.as_str()),
        _ => None,
    }
}
