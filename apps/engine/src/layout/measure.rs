//! Height measurement — resolves the rendered px height of each content
//! block without a browser.
//!
//! Measurement is an injected capability so the paginator stays
//! platform-agnostic: the default `MetricMeasurer` is backed by the static
//! font tables in `font_metrics`, a host embedding the engine next to a
//! real layout engine can substitute its own.
//!
//! `measure` returning `None` means "unknown yet" — a transient condition,
//! not an error. The session keeps the layout provisional (using the
//! fallback heights below) until every visible block resolves.

use std::collections::HashMap;

use crate::layout::blocks::{BlockPayload, ContentBlock};
use crate::layout::font_metrics::{get_metrics, FontId};
use crate::layout::templates::TemplateId;

// ────────────────────────────────────────────────────────────────────────────
// Style context
// ────────────────────────────────────────────────────────────────────────────

/// The visual settings a measurement depends on. Accent color is absent on
/// purpose: it recolors rules and titles but never moves a pixel of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleContext {
    pub template: TemplateId,
    pub font: FontId,
}

/// Injectable measurement capability.
pub trait HeightMeasure: Send + Sync {
    /// Resolved height of `block` when rendered into a `width_px`-wide
    /// content column, or `None` if the height cannot be determined yet.
    fn measure(&self, block: &ContentBlock, width_px: f32, style: &StyleContext) -> Option<f32>;
}

/// Provisional heights used while a block is still unmeasured.
pub const FALLBACK_HEADER_HEIGHT_PX: f32 = 50.0;
pub const FALLBACK_BLOCK_HEIGHT_PX: f32 = 150.0;

/// Fallback height for a block of the given kind.
pub fn fallback_height(block: &ContentBlock) -> f32 {
    match block.payload {
        BlockPayload::SectionHeader { .. } => FALLBACK_HEADER_HEIGHT_PX,
        _ => FALLBACK_BLOCK_HEIGHT_PX,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block style constants (px)
// ────────────────────────────────────────────────────────────────────────────

// Section titles: 18px caps with an underline rule and breathing room.
const SECTION_TITLE_FONT_PX: f32 = 18.0;
const SECTION_TITLE_LINE_HEIGHT: f32 = 1.2;
const SECTION_TITLE_UNDERLINE_PX: f32 = 10.0; // 8px padding + 2px rule
const SECTION_HEADER_MARGIN_PX: f32 = 24.0;
const SECTION_TITLE_MARGIN_PX: f32 = 16.0; // title inside the profile block

// Profile summary body.
const SUMMARY_FONT_PX: f32 = 15.0;
const SUMMARY_LINE_HEIGHT: f32 = 1.6;
const PROFILE_MARGIN_PX: f32 = 32.0;

// Experience/education entries.
const ROLE_FONT_PX: f32 = 18.0;
const ROLE_LINE_HEIGHT: f32 = 1.2;
const ROLE_MARGIN_PX: f32 = 4.0;
const META_ROW_PX: f32 = 20.0; // company/school + dates, single line
const META_MARGIN_PX: f32 = 8.0;
const DESC_FONT_PX: f32 = 14.0;
const DESC_LINE_HEIGHT: f32 = 1.6;
const ENTRY_MARGIN_PX: f32 = 24.0;
const ENTRY_INDENT_PX: f32 = 16.0; // left rule indent narrows the text column

// ────────────────────────────────────────────────────────────────────────────
// Metric-backed measurer
// ────────────────────────────────────────────────────────────────────────────

/// Default measurer: static font tables + greedy word-wrap, mirroring the
/// block styles the templates render with.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricMeasurer;

impl HeightMeasure for MetricMeasurer {
    fn measure(&self, block: &ContentBlock, width_px: f32, style: &StyleContext) -> Option<f32> {
        let metrics = get_metrics(style.font);
        let height = match &block.payload {
            BlockPayload::SectionHeader { title } => {
                let lines = metrics
                    .wrapped_line_count(title, width_px, SECTION_TITLE_FONT_PX)
                    .max(1);
                lines as f32 * SECTION_TITLE_FONT_PX * SECTION_TITLE_LINE_HEIGHT
                    + SECTION_TITLE_UNDERLINE_PX
                    + SECTION_HEADER_MARGIN_PX
            }
            BlockPayload::Profile { summary } => {
                let title = SECTION_TITLE_FONT_PX * SECTION_TITLE_LINE_HEIGHT
                    + SECTION_TITLE_UNDERLINE_PX
                    + SECTION_TITLE_MARGIN_PX;
                let body = text_lines(summary, width_px, SUMMARY_FONT_PX, metrics.font) as f32
                    * SUMMARY_FONT_PX
                    * SUMMARY_LINE_HEIGHT;
                title + body + PROFILE_MARGIN_PX
            }
            BlockPayload::Experience(entry) => {
                entry_height(&entry.role, &entry.description, width_px, style.font)
            }
            BlockPayload::Education(entry) => entry_height(
                &entry.degree,
                entry.description.as_deref().unwrap_or(""),
                width_px,
                style.font,
            ),
        };
        Some(height)
    }
}

fn entry_height(title: &str, description: &str, width_px: f32, font: FontId) -> f32 {
    let metrics = get_metrics(font);
    let text_width = (width_px - ENTRY_INDENT_PX).max(1.0);
    let title_lines = metrics
        .wrapped_line_count(title, text_width, ROLE_FONT_PX)
        .max(1);
    let desc_lines = text_lines(description, text_width, DESC_FONT_PX, font);

    title_lines as f32 * ROLE_FONT_PX * ROLE_LINE_HEIGHT
        + ROLE_MARGIN_PX
        + META_ROW_PX
        + META_MARGIN_PX
        + desc_lines as f32 * DESC_FONT_PX * DESC_LINE_HEIGHT
        + ENTRY_MARGIN_PX
}

// ────────────────────────────────────────────────────────────────────────────
// Rich-text handling
// ────────────────────────────────────────────────────────────────────────────

/// Total wrapped line count of a rich-text description: tags are stripped,
/// block-level breaks (`<li>`, `<p>`, `<br>`) start fresh lines.
fn text_lines(rich_text: &str, width_px: f32, font_size_px: f32, font: FontId) -> usize {
    let metrics = get_metrics(font);
    plain_text_segments(rich_text)
        .iter()
        .map(|segment| metrics.wrapped_line_count(segment, width_px, font_size_px))
        .sum()
}

/// Splits simple rich-text markup into plain-text segments, one per
/// rendered paragraph/list item. Unknown tags are dropped, a handful of
/// common entities are decoded. Not a general HTML parser and does not try
/// to be: editor descriptions only ever contain this subset.
fn plain_text_segments(rich_text: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = rich_text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '<' {
            let mut tag = String::new();
            for t in chars.by_ref() {
                if t == '>' {
                    break;
                }
                tag.push(t);
            }
            let tag = tag.trim().to_ascii_lowercase();
            let name = tag
                .trim_start_matches('/')
                .split_whitespace()
                .next()
                .unwrap_or("");
            if matches!(name, "li" | "p" | "br" | "ul" | "ol" | "div") {
                flush_segment(&mut segments, &mut current);
            }
        } else {
            current.push(c);
        }
    }
    flush_segment(&mut segments, &mut current);

    segments
}

fn flush_segment(segments: &mut Vec<String>, current: &mut String) {
    let text = decode_entities(current.trim());
    if !text.is_empty() {
        segments.push(text);
    }
    current.clear();
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
}

// ────────────────────────────────────────────────────────────────────────────
// Height cache
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct CacheStyle {
    template: TemplateId,
    font: FontId,
    width_px: f32,
}

/// Per-session height cache. Keys on block id + payload fingerprint, so an
/// edit to one entry invalidates only that block; any change to template,
/// font or column width drops the whole cache.
#[derive(Debug, Default)]
pub struct HeightCache {
    style: Option<CacheStyle>,
    heights: HashMap<String, (u64, f32)>,
}

impl HeightCache {
    pub fn new() -> Self {
        HeightCache::default()
    }

    /// Clears the cache if the style-relevant inputs changed.
    pub fn ensure_style(&mut self, style: &StyleContext, width_px: f32) {
        let key = CacheStyle {
            template: style.template,
            font: style.font,
            width_px,
        };
        if self.style.as_ref() != Some(&key) {
            self.heights.clear();
            self.style = Some(key);
        }
    }

    /// Cached height for this exact block content, if any.
    pub fn get(&self, block: &ContentBlock) -> Option<f32> {
        self.heights
            .get(&block.id)
            .filter(|(fingerprint, _)| *fingerprint == block.fingerprint())
            .map(|(_, height)| *height)
    }

    pub fn insert(&mut self, block: &ContentBlock, height_px: f32) {
        self.heights
            .insert(block.id.clone(), (block.fingerprint(), height_px));
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::BlockKind;
    use crate::models::ExperienceEntry;

    fn style() -> StyleContext {
        StyleContext {
            template: TemplateId::Modern,
            font: FontId::Inter,
        }
    }

    fn header() -> ContentBlock {
        ContentBlock {
            id: "experience-header".to_string(),
            kind: BlockKind::SectionHeader,
            payload: BlockPayload::SectionHeader {
                title: "Work Experience".to_string(),
            },
        }
    }

    fn experience(description: &str) -> ContentBlock {
        ContentBlock {
            id: "experience-0".to_string(),
            kind: BlockKind::ExperienceEntry,
            payload: BlockPayload::Experience(ExperienceEntry {
                role: "Engineer".to_string(),
                company: "Acme".to_string(),
                description: description.to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_header_height_close_to_observed_value() {
        let h = MetricMeasurer
            .measure(&header(), 430.0, &style())
            .expect("metric measurer always resolves");
        // 18px × 1.2 + 10 underline + 24 margin ≈ 55.6
        assert!(
            (h - 55.6).abs() < 1.0,
            "single-line header should be ~55.6px, got {h}"
        );
    }

    #[test]
    fn test_profile_height_grows_with_summary() {
        let short = ContentBlock {
            id: "profile".to_string(),
            kind: BlockKind::Profile,
            payload: BlockPayload::Profile {
                summary: "Engineer.".to_string(),
            },
        };
        let long = ContentBlock {
            id: "profile".to_string(),
            kind: BlockKind::Profile,
            payload: BlockPayload::Profile {
                summary: "Engineer with a decade of experience building layout \
                          engines, typesetting pipelines and print preview \
                          systems for document-heavy products."
                    .to_string(),
            },
        };
        let m = MetricMeasurer;
        let h_short = m.measure(&short, 430.0, &style()).unwrap();
        let h_long = m.measure(&long, 430.0, &style()).unwrap();
        assert!(h_long > h_short);
    }

    #[test]
    fn test_narrower_column_yields_taller_block() {
        let block = experience(
            "Owned the migration of the rendering pipeline to a new engine \
             while shipping weekly releases to three product surfaces.",
        );
        let m = MetricMeasurer;
        let wide = m.measure(&block, 500.0, &style()).unwrap();
        let narrow = m.measure(&block, 280.0, &style()).unwrap();
        assert!(narrow > wide, "narrow {narrow} should exceed wide {wide}");
    }

    #[test]
    fn test_list_markup_counts_items_as_lines() {
        let plain = experience("Shipped a thing");
        let listed = experience("<ul><li>Shipped a thing</li><li>Shipped another</li><li>And one more</li></ul>");
        let m = MetricMeasurer;
        let h_plain = m.measure(&plain, 430.0, &style()).unwrap();
        let h_listed = m.measure(&listed, 430.0, &style()).unwrap();
        assert!(
            h_listed > h_plain,
            "three list items must be taller than one line"
        );
    }

    #[test]
    fn test_plain_text_segments_strip_tags_and_entities() {
        let segments =
            plain_text_segments("<p>Fish &amp; chips</p><ul><li>One</li><li>Two</li></ul>");
        assert_eq!(segments, vec!["Fish & chips", "One", "Two"]);
    }

    #[test]
    fn test_inline_tags_do_not_split_segments() {
        let segments = plain_text_segments("Built <strong>fast</strong> systems");
        assert_eq!(segments, vec!["Built fast systems"]);
    }

    #[test]
    fn test_fallback_heights_by_kind() {
        assert_eq!(fallback_height(&header()), FALLBACK_HEADER_HEIGHT_PX);
        assert_eq!(fallback_height(&experience("x")), FALLBACK_BLOCK_HEIGHT_PX);
    }

    // ── cache ───────────────────────────────────────────────────────────────

    #[test]
    fn test_cache_hit_for_unchanged_block() {
        let mut cache = HeightCache::new();
        cache.ensure_style(&style(), 430.0);
        let block = experience("Stable content");
        cache.insert(&block, 123.0);
        assert_eq!(cache.get(&block), Some(123.0));
    }

    #[test]
    fn test_cache_miss_when_payload_edited() {
        let mut cache = HeightCache::new();
        cache.ensure_style(&style(), 430.0);
        let block = experience("Before edit");
        cache.insert(&block, 123.0);
        let edited = experience("After edit");
        assert_eq!(edited.id, block.id);
        assert_eq!(cache.get(&edited), None);
    }

    #[test]
    fn test_cache_cleared_on_style_change() {
        let mut cache = HeightCache::new();
        cache.ensure_style(&style(), 430.0);
        let block = experience("Content");
        cache.insert(&block, 123.0);

        // Same style again: survives.
        cache.ensure_style(&style(), 430.0);
        assert_eq!(cache.get(&block), Some(123.0));

        // Font flips: everything is stale.
        let serif = StyleContext {
            template: TemplateId::Modern,
            font: FontId::Lora,
        };
        cache.ensure_style(&serif, 430.0);
        assert_eq!(cache.get(&block), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_cleared_on_width_change() {
        let mut cache = HeightCache::new();
        cache.ensure_style(&style(), 430.0);
        let block = experience("Content");
        cache.insert(&block, 123.0);
        cache.ensure_style(&style(), 300.0);
        assert_eq!(cache.get(&block), None);
    }
}
