//! Render cache owned by the caller (CLI, UI), never by the pipeline.
//!
//! Entries are keyed by image identity *and* the options they were rendered
//! with, so changing an option is a cache miss rather than a stale hit.

use std::collections::HashMap;

use crate::overlay::OverlayOptions;
use crate::pipeline::RenderedImage;

#[derive(Debug, Default)]
pub struct RenderCache {
    entries: HashMap<(String, OverlayOptions), RenderedImage>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, image_id: &str, options: &OverlayOptions) -> Option<&RenderedImage> {
        self.entries.get(&(image_id.to_string(), *options))
    }

    pub fn insert(
        &mut self,
        image_id: impl Into<String>,
        options: OverlayOptions,
        image: RenderedImage,
    ) {
        self.entries.insert((image_id.into(), options), image);
    }

    /// Drop every rendering of one image, whatever its options.
    pub fn invalidate(&mut self, image_id: &str) {
        self.entries.retain(|(id, _), _| id != image_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Alignment;
    use image::{Rgba, RgbaImage};

    fn rendered(shade: u8) -> RenderedImage {
        RenderedImage::new(RgbaImage::from_pixel(2, 2, Rgba([shade, shade, shade, 255])))
    }

    fn right() -> OverlayOptions {
        OverlayOptions {
            alignment: Alignment::Right,
            ..Default::default()
        }
    }

    #[test]
    fn hit_requires_matching_options() {
        let mut cache = RenderCache::new();
        cache.insert("a.jpg", OverlayOptions::default(), rendered(1));

        assert_eq!(cache.get("a.jpg", &OverlayOptions::default()), Some(&rendered(1)));
        assert_eq!(cache.get("a.jpg", &right()), None);
        assert_eq!(cache.get("b.jpg", &OverlayOptions::default()), None);
    }

    #[test]
    fn invalidate_drops_all_options_for_one_image() {
        let mut cache = RenderCache::new();
        cache.insert("a.jpg", OverlayOptions::default(), rendered(1));
        cache.insert("a.jpg", right(), rendered(2));
        cache.insert("b.jpg", right(), rendered(3));
        assert_eq!(cache.len(), 3);

        cache.invalidate("a.jpg");
        assert_eq!(cache.len(), 1);
        assert!(cache.get("b.jpg", &right()).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_replaces() {
        let mut cache = RenderCache::new();
        cache.insert("a.jpg", right(), rendered(1));
        cache.insert("a.jpg", right(), rendered(9));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a.jpg", &right()), Some(&rendered(9)));
    }
}
