//! Pagination — greedy forward first-fit packing of atomic blocks into
//! fixed-capacity A4 pages.
//!
//! The packer is a pure function over (ordered blocks, heights, geometry,
//! rules). It never looks at screen size, DPI or templates beyond the
//! already-resolved per-block heights, so identical inputs always produce
//! identical page layouts.

use serde::{Deserialize, Serialize};

use crate::layout::blocks::{BlockKind, ContentBlock};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_TOP_MM: f32 = 20.0;
pub const MARGIN_BOTTOM_MM: f32 = 20.0;

/// mm → px at 96 DPI.
pub const MM_TO_PX: f32 = 3.7795;

/// Fixed page geometry. Margins are identical on every page; capacity is
/// what remains of the page height after them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_width_px: f32,
    pub page_height_px: f32,
    pub margin_top_px: f32,
    pub margin_bottom_px: f32,
    /// Vertical spacing inserted between adjacent blocks on a page. The
    /// block styles already embed their own bottom margins, so this is 0
    /// unless a template opts into extra breathing room.
    pub block_spacing_px: f32,
}

impl PageGeometry {
    /// Portrait A4 with 20 mm top/bottom margins — the only geometry the
    /// four shipped templates use.
    pub fn a4() -> Self {
        PageGeometry {
            page_width_px: PAGE_WIDTH_MM * MM_TO_PX,
            page_height_px: PAGE_HEIGHT_MM * MM_TO_PX,
            margin_top_px: MARGIN_TOP_MM * MM_TO_PX,
            margin_bottom_px: MARGIN_BOTTOM_MM * MM_TO_PX,
            block_spacing_px: 0.0,
        }
    }

    /// Usable content-area height per page (~971 px for A4).
    pub fn usable_height_px(&self) -> f32 {
        self.page_height_px - self.margin_top_px - self.margin_bottom_px
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::a4()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination types
// ────────────────────────────────────────────────────────────────────────────

/// A content block with its resolved height.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredBlock {
    pub block: ContentBlock,
    pub height_px: f32,
}

/// One packed page. `used_height_px` includes inter-block spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 0-based page index.
    pub page_index: usize,
    pub blocks: Vec<MeasuredBlock>,
    pub used_height_px: f32,
}

/// Packing rules that are product decisions rather than geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationRules {
    /// Never leave a section header as the last block of a page; defer it
    /// to the next page with its first entry. Deferral yields to the
    /// capacity invariant: if header + entry together exceed a full page,
    /// the header stays put.
    pub defer_trailing_headers: bool,
}

impl Default for PaginationRules {
    fn default() -> Self {
        PaginationRules {
            defer_trailing_headers: true,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Packing
// ────────────────────────────────────────────────────────────────────────────

/// Packs ordered blocks into pages.
///
/// - Order is preserved; every block lands on exactly one page.
/// - A page's running height (blocks + spacing) never exceeds capacity,
///   except a page holding a single block that is itself taller than a
///   full page (a defined edge case, not an error).
/// - Always returns at least one page, even for an empty stream.
pub fn paginate(
    blocks: Vec<MeasuredBlock>,
    geometry: &PageGeometry,
    rules: &PaginationRules,
) -> Vec<PageLayout> {
    let capacity = geometry.usable_height_px();
    let spacing = geometry.block_spacing_px;

    let mut pages: Vec<PageLayout> = Vec::new();
    let mut current: Vec<MeasuredBlock> = Vec::new();

    for block in blocks {
        let fits = current.is_empty()
            || page_used(&current, spacing) + spacing + block.height_px <= capacity;

        if fits {
            current.push(block);
            continue;
        }

        // Close the current page; maybe pull a trailing header forward.
        let mut carried: Option<MeasuredBlock> = None;
        if rules.defer_trailing_headers
            && current.len() >= 2
            && current.last().map(|b| b.block.kind) == Some(BlockKind::SectionHeader)
        {
            let header = current.last().expect("len checked above");
            if header.height_px + spacing + block.height_px <= capacity {
                carried = current.pop();
            }
        }

        close_page(&mut pages, &mut current, spacing);

        if let Some(header) = carried {
            current.push(header);
        }
        current.push(block);
    }

    close_page(&mut pages, &mut current, spacing);

    if pages.is_empty() {
        pages.push(PageLayout {
            page_index: 0,
            blocks: Vec::new(),
            used_height_px: 0.0,
        });
    }
    pages
}

/// Running height of a page: block heights plus spacing between them.
fn page_used(blocks: &[MeasuredBlock], spacing: f32) -> f32 {
    if blocks.is_empty() {
        return 0.0;
    }
    let heights: f32 = blocks.iter().map(|b| b.height_px).sum();
    heights + spacing * (blocks.len() - 1) as f32
}

fn close_page(pages: &mut Vec<PageLayout>, current: &mut Vec<MeasuredBlock>, spacing: f32) {
    if current.is_empty() {
        return;
    }
    let blocks = std::mem::take(current);
    let used = page_used(&blocks, spacing);
    pages.push(PageLayout {
        page_index: pages.len(),
        blocks,
        used_height_px: used,
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
