//! EXIF metadata decoding.
//!
//! - [`decode_metadata`] — Read the embedded metadata block into a [`RawMetadata`] map
//! - [`resolve_coordinates`] — Turn the GPS block into signed decimal degrees
//! - [`ExifRecord::from_raw`] — Build the typed record the overlay is formatted from
//!
//! None of these fail: missing or malformed metadata is the normal case for
//! screenshots and edited images, and simply leaves fields empty.

mod gps;
mod reader;
mod record;

pub use gps::{GpsCoordinate, resolve_coordinates};
pub use reader::*;
pub use record::ExifRecord;
pub(crate) use record::round2;
