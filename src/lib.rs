//! # metatagger
//!
//! Burn a photo's capture details onto the photo itself: camera model, place
//! name (reverse-geocoded from GPS), and exposure settings, drawn in white
//! above the bottom edge of the upright image.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full decode → describe → render flow:
//!
//! ```rust,no_run
//! use metatagger::cache::RenderCache;
//! use metatagger::config::Config;
//! use metatagger::pipeline::{TaggerPipeline, collect_images, process_file};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Fonts, alignment, geocoding endpoint, output directory
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!     let pipeline = TaggerPipeline::from_config(&config)?;
//!     let mut cache = RenderCache::new();
//!
//!     for path in collect_images(&[PathBuf::from("./photos")]) {
//!         let result = process_file(&path, &pipeline, &config, &mut cache).await;
//!         match result.error {
//!             Some(err) => eprintln!("Error processing {}: {err}", path.display()),
//!             None => println!("Wrote {:?}", result.output_path),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! Each stage is usable on its own:
//!
//! ```rust,no_run
//! use metatagger::exif::{ExifRecord, decode_metadata};
//! use metatagger::format::DisplayLines;
//! use metatagger::orientation::correct_orientation;
//!
//! # fn main() -> anyhow::Result<()> {
//! let bytes = std::fs::read("photo.jpg")?;
//!
//! // 1. Raw tags → typed record (never fails; missing tags stay `None`)
//! let record = ExifRecord::from_raw(&decode_metadata(&bytes));
//!
//! // 2. Display strings, with "Unknown ..." for missing values
//! let lines = DisplayLines::from_record(&record);
//! println!("{}\n{}", lines.model, lines.settings);
//!
//! // 3. Upright image
//! let upright = correct_orientation(image::load_from_memory(&bytes)?, record.orientation);
//! println!("{}x{}", upright.width(), upright.height());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`exif`] — Metadata decoding, GPS coordinates, and the typed [`exif::ExifRecord`]
//! - [`geocode`] — Place lookup contract and the Nominatim backend
//! - [`orientation`] — Upright correction from the orientation tag
//! - [`format`] — Display strings for the overlay lines
//! - [`overlay`] — Line layout, fonts, and rendering
//! - [`pipeline`] — The end-to-end pipeline and batch helpers
//! - [`cache`] — Caller-owned cache of rendered images
//! - [`config`] — Configuration types and loading/saving

pub mod cache;
pub mod config;
pub mod exif;
pub mod format;
pub mod geocode;
pub mod orientation;
pub mod overlay;
pub mod pipeline;

#[cfg(test)]
mod test_support;
