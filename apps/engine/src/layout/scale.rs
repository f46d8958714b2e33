//! Viewport scaling — fits a fixed-size page into a variable screen area.
//!
//! Purely presentational: the page is always laid out at full A4 size and
//! the preview applies one uniform transform. The scale never feeds back
//! into measurement or packing.

use serde::{Deserialize, Serialize};

/// Preview container size in px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
}

impl Viewport {
    pub fn new(width_px: f32, height_px: f32) -> Self {
        Viewport {
            width_px,
            height_px,
        }
    }
}

/// Breathing room reserved inside the container (16 px per side).
pub const PREVIEW_PADDING_PX: f32 = 32.0;

/// Floor for the scale so degenerate containers still show a page.
pub const MIN_SCALE: f32 = 0.3;

/// Uniform scale that fits a `page_width_px` × `page_height_px` page into
/// `viewport`: the smaller of the two axis ratios, never above 1.0 (no
/// upscaling, no aspect distortion), never below [`MIN_SCALE`].
pub fn fit_scale(viewport: Viewport, page_width_px: f32, page_height_px: f32) -> f32 {
    let scale_by_width = (viewport.width_px - PREVIEW_PADDING_PX) / page_width_px;
    let scale_by_height = (viewport.height_px - PREVIEW_PADDING_PX) / page_height_px;
    scale_by_width.min(scale_by_height).min(1.0).max(MIN_SCALE)
}
