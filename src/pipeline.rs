use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::RenderCache;
use crate::config::{Config, OutputConfig};
use crate::exif::{self, ExifRecord, RawMetadata};
use crate::format::DisplayLines;
use crate::geocode::{self, NominatimResolver, PlaceResolver};
use crate::orientation::correct_orientation;
use crate::overlay::{self, FontSet, OverlayOptions, TextRenderer};

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif", "bmp", "gif"];

/// A decoded input image together with its raw metadata.
///
/// Decoding is the only fatal step: bytes the `image` crate cannot read are
/// rejected here, before any metadata work starts.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub raw: RawMetadata,
}

impl SourceImage {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("Failed to decode image")?;
        let raw = exif::decode_metadata(bytes);
        Ok(Self { image, raw })
    }
}

/// The upright image with the overlay burned in.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage(RgbaImage);

impl RenderedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self(pixels)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    /// Encode as baseline JPEG. Alpha is dropped.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let rgb = DynamicImage::ImageRgba8(self.0.clone()).to_rgb8();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .encode_image(&rgb)
            .context("Failed to encode JPEG")?;
        Ok(buf)
    }
}

/// What one pipeline run produced: the typed metadata and the image.
#[derive(Debug, Clone)]
pub struct TaggedImage {
    pub record: ExifRecord,
    pub image: RenderedImage,
}

/// decode → GPS → place → format → orient → layout → render.
///
/// Holds no per-image state, so one pipeline can serve any number of images,
/// and rendering the same input with the same options twice gives identical
/// pixels.
///
/// # Example
///
/// ```rust,no_run
/// use metatagger::config::Config;
/// use metatagger::pipeline::TaggerPipeline;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load(Some("config.json".as_ref()))?;
/// let pipeline = TaggerPipeline::from_config(&config)?;
///
/// let bytes = std::fs::read("photo.jpg")?;
/// let tagged = pipeline.tag_bytes(&bytes, &config.overlay_options()).await?;
/// println!("Model: {:?}", tagged.record.model);
/// std::fs::write("processed_photo.jpg", tagged.image.encode_jpeg(95)?)?;
/// # Ok(())
/// # }
/// ```
pub struct TaggerPipeline {
    fonts: Box<dyn TextRenderer>,
    resolver: Option<Box<dyn PlaceResolver>>,
}

impl TaggerPipeline {
    /// A pipeline without place lookups.
    pub fn new(fonts: Box<dyn TextRenderer>) -> Self {
        Self { fonts, resolver: None }
    }

    pub fn with_resolver(mut self, resolver: Box<dyn PlaceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Load fonts and set up geocoding from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fonts = FontSet::load(&config.fonts)?;
        let pipeline = Self::new(Box::new(fonts));

        if !config.geocoding.enabled {
            log::debug!("Geocoding disabled; location line will be omitted");
            return Ok(pipeline);
        }

        Ok(pipeline.with_resolver(Box::new(NominatimResolver::new(
            config.geocoding.endpoint.clone(),
            config.geocoding.user_agent.clone(),
        ))))
    }

    /// Build the typed record, resolving a place when there are coordinates.
    pub async fn describe(&self, raw: &RawMetadata) -> ExifRecord {
        let record = ExifRecord::from_raw(raw);

        let place = match (record.gps, &self.resolver) {
            (Some(coordinate), Some(resolver)) => {
                log::debug!(
                    "GPS {:.5}, {:.5}; looking up place",
                    coordinate.latitude,
                    coordinate.longitude
                );
                geocode::resolve_place(resolver.as_ref(), coordinate).await
            }
            _ => None,
        };

        record.with_place(place)
    }

    /// Render the overlay for one decoded image.
    pub async fn render(&self, source: &SourceImage, options: &OverlayOptions) -> TaggedImage {
        let record = self.describe(&source.raw).await;
        let lines = DisplayLines::from_record(&record);

        let upright = correct_orientation(source.image.clone(), record.orientation);
        let mut canvas = upright.to_rgba8();

        let placed = overlay::layout(canvas.dimensions(), &lines, options, self.fonts.as_ref());
        overlay::render_lines(&mut canvas, &placed, self.fonts.as_ref());
        log::debug!("Rendered {} overlay line(s)", placed.len());

        TaggedImage {
            record,
            image: RenderedImage::new(canvas),
        }
    }

    /// Decode encoded image bytes and render them.
    pub async fn tag_bytes(&self, bytes: &[u8], options: &OverlayOptions) -> Result<TaggedImage> {
        let source = SourceImage::decode(bytes)?;
        Ok(self.render(&source, options).await)
    }
}

/// The result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    pub output_path: Option<PathBuf>,
    /// `None` when the image failed to decode or was served from the cache.
    pub record: Option<ExifRecord>,
    pub written: bool,
    pub cached: bool,
    pub error: Option<String>,
}

impl ProcessResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            output_path: None,
            record: None,
            written: false,
            cached: false,
            error: None,
        }
    }
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks).
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// `{directory}/{prefix}{stem}.jpg`, next to the input when no directory is set.
pub fn output_path(input: &Path, output: &OutputConfig) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{}{}.jpg", output.prefix, stem);
    let dir = output
        .directory
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(name)
}

/// Read, tag, encode, and write one image file.
///
/// Renders already in `cache` for the same file and options are reused.
/// Failures are reported in [`ProcessResult::error`] rather than returned,
/// so a batch keeps going.
pub async fn process_file(
    path: &Path,
    pipeline: &TaggerPipeline,
    config: &Config,
    cache: &mut RenderCache,
) -> ProcessResult {
    let mut result = ProcessResult::new(path);
    let options = config.overlay_options();
    let image_id = std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();

    let rendered = match cache.get(&image_id, &options).cloned() {
        Some(image) => {
            log::debug!("Reusing cached render of {}", path.display());
            result.cached = true;
            image
        }
        None => {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    result.error = Some(format!("Failed to read file: {e}"));
                    return result;
                }
            };

            let tagged = match pipeline.tag_bytes(&bytes, &options).await {
                Ok(tagged) => tagged,
                Err(e) => {
                    result.error = Some(format!("{e:#}"));
                    return result;
                }
            };

            cache.insert(image_id, options, tagged.image.clone());
            result.record = Some(tagged.record);
            tagged.image
        }
    };

    let out = output_path(path, &config.output);
    result.output_path = Some(out.clone());

    if config.output.dry_run {
        return result;
    }

    let encoded = match rendered.encode_jpeg(config.output.jpeg_quality) {
        Ok(encoded) => encoded,
        Err(e) => {
            result.error = Some(format!("{e:#}"));
            return result;
        }
    };

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            result.error = Some(format!("Failed to create {}: {e}", dir.display()));
            return result;
        }
    }

    match std::fs::write(&out, encoded) {
        Ok(()) => result.written = true,
        Err(e) => result.error = Some(format!("Failed to write {}: {e}", out.display())),
    }

    result
}
