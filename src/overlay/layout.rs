use super::{Alignment, FontMetrics, MARGIN, OverlayOptions, ROW_PITCH, StyleTier};
use crate::format::DisplayLines;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Model,
    Place,
    Settings,
}

impl LineKind {
    pub fn tier(self) -> StyleTier {
        match self {
            Self::Model => StyleTier::BoldLarge,
            Self::Place => StyleTier::Medium,
            Self::Settings => StyleTier::RegularSmall,
        }
    }
}

/// One line of text with its top-left pixel position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub kind: LineKind,
    pub text: String,
    pub tier: StyleTier,
    pub x: i32,
    pub y: i32,
}

/// Rows above the bottom edge for a line. Without a place line the model
/// line drops into its row instead of leaving a gap.
pub fn row_multiplier(kind: LineKind, place_enabled: bool) -> u32 {
    match kind {
        LineKind::Model if place_enabled => 4,
        LineKind::Model => 3,
        LineKind::Place => 3,
        LineKind::Settings => 2,
    }
}

/// Position the enabled lines on an image of the given size.
///
/// A line is enabled when its toggle is on; the place line additionally
/// needs text. Disabled lines are left out of the result.
pub fn layout<M: FontMetrics + ?Sized>(
    dimensions: (u32, u32),
    lines: &DisplayLines,
    options: &OverlayOptions,
    metrics: &M,
) -> Vec<PlacedLine> {
    let (width, height) = dimensions;

    let place = lines.place.as_deref().filter(|_| options.show_location);
    let candidates = [
        (LineKind::Model, options.show_model.then_some(lines.model.as_str())),
        (LineKind::Place, place),
        (LineKind::Settings, options.show_settings.then_some(lines.settings.as_str())),
    ];
    let place_enabled = place.is_some();

    candidates
        .into_iter()
        .filter_map(|(kind, text)| {
            let text = text?;
            let tier = kind.tier();
            let rows = row_multiplier(kind, place_enabled);
            let y = height as i32 - (rows * ROW_PITCH) as i32;
            let x = match options.alignment {
                Alignment::Left => MARGIN as i32,
                Alignment::Right => {
                    width as i32 - metrics.measure(text, tier) as i32 - MARGIN as i32
                }
            };
            Some(PlacedLine {
                kind,
                text: text.to_string(),
                tier,
                x,
                y,
            })
        })
        .collect()
}
