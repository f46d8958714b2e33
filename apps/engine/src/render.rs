//! Per-page placement — the shared rendering contract.
//!
//! `render_document` turns packed `PageLayout`s into absolute px placements
//! plus the page-0 sidebar chrome. The interactive preview draws exactly
//! this value, and the export request embeds exactly this value, which is
//! what makes preview and exported file pixel-identical by construction.

use serde::{Deserialize, Serialize};

use crate::layout::blocks::BlockKind;
use crate::layout::paginator::{PageGeometry, PageLayout, MM_TO_PX};
use crate::layout::templates::{Section, TemplateSpec, CONTENT_PAD_LEFT_MM};
use crate::models::{CvData, CvSettings, LanguageSkill};

// ────────────────────────────────────────────────────────────────────────────
// Placement types
// ────────────────────────────────────────────────────────────────────────────

/// A content block with its absolute position on a page, px, origin at the
/// page's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    pub id: String,
    pub kind: BlockKind,
    pub x_px: f32,
    pub y_px: f32,
    pub width_px: f32,
    pub height_px: f32,
}

/// One item of sidebar chrome. Chrome renders once (page 0) and is
/// independent of pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "camelCase")]
pub enum ChromeItem {
    Name { text: String },
    JobTitle { text: String },
    Contact { email: String, phone: String, address: String },
    Photo { url: String },
    QrCode { url: String },
    Skills { items: Vec<String> },
    Languages { items: Vec<LanguageSkill> },
}

/// A fully placed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRender {
    pub page_index: usize,
    pub sidebar_width_px: f32,
    /// The accent-colored sidebar background is painted on every page so
    /// later pages stay visually continuous even with empty chrome.
    pub sidebar_background: bool,
    pub chrome: Vec<ChromeItem>,
    pub blocks: Vec<PlacedBlock>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Places every page of a packed layout under the active template.
pub fn render_document(
    pages: &[PageLayout],
    data: &CvData,
    settings: &CvSettings,
    geometry: &PageGeometry,
) -> Vec<PageRender> {
    let template = TemplateSpec::for_id(settings.template);
    pages
        .iter()
        .map(|page| render_page(page, data, settings, template, geometry))
        .collect()
}

/// Places a single page: exactly the blocks the paginator assigned to it,
/// stacked from the top margin in the content column. Page 0 additionally
/// carries the identity/contact/sidebar chrome; later pages keep only the
/// sidebar background unless the template repeats its chrome.
pub fn render_page(
    page: &PageLayout,
    data: &CvData,
    settings: &CvSettings,
    template: &TemplateSpec,
    geometry: &PageGeometry,
) -> PageRender {
    let sidebar_width_px = template.sidebar_width_px(geometry.page_width_px);
    let content_x = sidebar_width_px + CONTENT_PAD_LEFT_MM * MM_TO_PX;
    let content_width = template.content_column_width_px(geometry.page_width_px);

    let mut blocks = Vec::with_capacity(page.blocks.len());
    let mut y = geometry.margin_top_px;
    for measured in &page.blocks {
        blocks.push(PlacedBlock {
            id: measured.block.id.clone(),
            kind: measured.block.kind,
            x_px: content_x,
            y_px: y,
            width_px: content_width,
            height_px: measured.height_px,
        });
        y += measured.height_px + geometry.block_spacing_px;
    }

    let chrome = if page.page_index == 0 || template.sidebar_chrome_every_page {
        build_chrome(data, settings, template)
    } else {
        Vec::new()
    };

    PageRender {
        page_index: page.page_index,
        sidebar_width_px,
        sidebar_background: true,
        chrome,
        blocks,
    }
}

/// Chrome items in sidebar order: identity and contact first, then the
/// template-routed sections that have content.
fn build_chrome(data: &CvData, settings: &CvSettings, template: &TemplateSpec) -> Vec<ChromeItem> {
    let personal = &data.personal;
    let mut chrome = vec![
        ChromeItem::Name {
            text: personal.full_name.clone(),
        },
        ChromeItem::JobTitle {
            text: personal.job_title.clone(),
        },
        ChromeItem::Contact {
            email: personal.email.clone(),
            phone: personal.phone.clone(),
            address: personal.address.clone(),
        },
    ];

    if template.routes_to_sidebar(Section::Photo) && template.supports_photo {
        if let Some(url) = &personal.profile_photo_url {
            chrome.push(ChromeItem::Photo { url: url.clone() });
        }
    }
    if template.routes_to_sidebar(Section::QrCode) && settings.show_qr_code {
        if let Some(url) = &personal.live_cv_url {
            chrome.push(ChromeItem::QrCode { url: url.clone() });
        }
    }
    if template.routes_to_sidebar(Section::Skills) && !data.skills.is_empty() {
        chrome.push(ChromeItem::Skills {
            items: data.skills.clone(),
        });
    }
    if template.routes_to_sidebar(Section::Languages) && !data.languages.is_empty() {
        chrome.push(ChromeItem::Languages {
            items: data.languages.clone(),
        });
    }

    chrome
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
