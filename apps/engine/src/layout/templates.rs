//! Template registry — one shared packing algorithm, four geometry descriptors.
//!
//! A template never gets its own pagination logic. Everything a template is
//! allowed to vary lives in `TemplateSpec`: sidebar width, whether the
//! sidebar chrome repeats past page 0, which sections it absorbs, and the
//! order of the paginated content sections.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Template ids
// ────────────────────────────────────────────────────────────────────────────

/// The four visual templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Modern,
    ClassicSidebar,
    ModernHeader,
    PhotoFocus,
}

impl TemplateId {
    /// Parses a wire id, falling back to `Modern` for unknown values.
    pub fn parse_or_default(id: &str) -> Self {
        match id {
            "classic-sidebar" => TemplateId::ClassicSidebar,
            "modern-header" => TemplateId::ModernHeader,
            "photo-focus" => TemplateId::PhotoFocus,
            _ => TemplateId::Modern,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::ClassicSidebar => "classic-sidebar",
            TemplateId::ModernHeader => "modern-header",
            TemplateId::PhotoFocus => "photo-focus",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// A résumé section as routed by a template: either into the paginated
/// content stream or into the sidebar (rendered once, outside pagination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Profile,
    Experience,
    Education,
    Skills,
    Languages,
    Photo,
    QrCode,
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry descriptor
// ────────────────────────────────────────────────────────────────────────────

/// Per-template geometry and routing. The paginator itself never reads this
/// beyond the content-column width derived from `sidebar_fraction`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSpec {
    pub id: TemplateId,
    pub name: &'static str,
    /// Default accent color, used when the editor supplies none.
    pub default_accent: &'static str,
    pub supports_photo: bool,
    /// Fraction of page width taken by the sidebar column.
    pub sidebar_fraction: f32,
    /// True: identity/contact/sidebar chrome repeats on every page.
    /// False: chrome on page 0 only; later pages keep a background-only
    /// sidebar so already-placed content never re-flows.
    pub sidebar_chrome_every_page: bool,
    /// Sections absorbed by the sidebar — excluded from the content stream.
    pub sidebar_sections: &'static [Section],
    /// Order of sections in the paginated content column.
    pub content_order: &'static [Section],
}

/// Horizontal padding of the content column, mm (left: gap to the sidebar,
/// right: outer page margin). Shared by all four templates.
pub const CONTENT_PAD_LEFT_MM: f32 = 10.0;
pub const CONTENT_PAD_RIGHT_MM: f32 = 15.0;

impl TemplateSpec {
    /// Returns the descriptor for a template id.
    pub fn for_id(id: TemplateId) -> &'static TemplateSpec {
        match id {
            TemplateId::Modern => &MODERN,
            TemplateId::ClassicSidebar => &CLASSIC_SIDEBAR,
            TemplateId::ModernHeader => &MODERN_HEADER,
            TemplateId::PhotoFocus => &PHOTO_FOCUS,
        }
    }

    /// All templates, registry order.
    pub fn all() -> [&'static TemplateSpec; 4] {
        [&MODERN, &CLASSIC_SIDEBAR, &MODERN_HEADER, &PHOTO_FOCUS]
    }

    /// True if the template routes this section into the sidebar.
    pub fn routes_to_sidebar(&self, section: Section) -> bool {
        self.sidebar_sections.contains(&section)
    }

    /// Width of the sidebar column in px for a given page width.
    pub fn sidebar_width_px(&self, page_width_px: f32) -> f32 {
        page_width_px * self.sidebar_fraction
    }

    /// Usable text width of the content column in px: what remains of the
    /// page after the sidebar and the column's own padding. Blocks are
    /// measured and placed at exactly this width.
    pub fn content_column_width_px(&self, page_width_px: f32) -> f32 {
        let mm_to_px = page_width_px / 210.0;
        page_width_px * (1.0 - self.sidebar_fraction)
            - (CONTENT_PAD_LEFT_MM + CONTENT_PAD_RIGHT_MM) * mm_to_px
    }
}

static MODERN: TemplateSpec = TemplateSpec {
    id: TemplateId::Modern,
    name: "Modern",
    default_accent: "#2563eb",
    supports_photo: true,
    sidebar_fraction: 1.0 / 3.0,
    sidebar_chrome_every_page: false,
    sidebar_sections: &[
        Section::Photo,
        Section::QrCode,
        Section::Skills,
        Section::Languages,
    ],
    content_order: &[Section::Profile, Section::Experience, Section::Education],
};

static CLASSIC_SIDEBAR: TemplateSpec = TemplateSpec {
    id: TemplateId::ClassicSidebar,
    name: "Classic Sidebar",
    default_accent: "#8B2677",
    supports_photo: true,
    sidebar_fraction: 0.30,
    sidebar_chrome_every_page: false,
    sidebar_sections: &[
        Section::Photo,
        Section::QrCode,
        Section::Skills,
        Section::Languages,
    ],
    content_order: &[Section::Profile, Section::Education, Section::Experience],
};

static MODERN_HEADER: TemplateSpec = TemplateSpec {
    id: TemplateId::ModernHeader,
    name: "Modern Header",
    default_accent: "#3E5A7C",
    supports_photo: true,
    sidebar_fraction: 0.40,
    sidebar_chrome_every_page: false,
    sidebar_sections: &[
        Section::Photo,
        Section::QrCode,
        Section::Skills,
        Section::Languages,
    ],
    content_order: &[Section::Profile, Section::Education, Section::Experience],
};

static PHOTO_FOCUS: TemplateSpec = TemplateSpec {
    id: TemplateId::PhotoFocus,
    name: "Photo Focus",
    default_accent: "#2D7D4E",
    supports_photo: true,
    sidebar_fraction: 0.35,
    sidebar_chrome_every_page: false,
    sidebar_sections: &[
        Section::Photo,
        Section::QrCode,
        Section::Skills,
        Section::Languages,
    ],
    content_order: &[Section::Profile, Section::Education, Section::Experience],
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        assert_eq!(
            TemplateId::parse_or_default("classic-sidebar"),
            TemplateId::ClassicSidebar
        );
        assert_eq!(
            TemplateId::parse_or_default("photo-focus"),
            TemplateId::PhotoFocus
        );
        assert_eq!(TemplateId::parse_or_default("modern"), TemplateId::Modern);
    }

    #[test]
    fn test_unknown_id_falls_back_to_modern() {
        assert_eq!(
            TemplateId::parse_or_default("brutalist"),
            TemplateId::Modern
        );
        assert_eq!(TemplateId::parse_or_default(""), TemplateId::Modern);
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&TemplateId::ClassicSidebar).unwrap();
        assert_eq!(json, "\"classic-sidebar\"");
    }

    #[test]
    fn test_all_sidebar_fractions_leave_a_content_column() {
        for spec in TemplateSpec::all() {
            assert!(
                spec.sidebar_fraction > 0.0 && spec.sidebar_fraction < 0.5,
                "{} sidebar fraction {} out of range",
                spec.name,
                spec.sidebar_fraction
            );
        }
    }

    #[test]
    fn test_skills_and_languages_always_sidebar_routed() {
        for spec in TemplateSpec::all() {
            assert!(spec.routes_to_sidebar(Section::Skills));
            assert!(spec.routes_to_sidebar(Section::Languages));
            assert!(!spec.routes_to_sidebar(Section::Experience));
        }
    }

    #[test]
    fn test_content_order_never_contains_sidebar_sections() {
        for spec in TemplateSpec::all() {
            for section in spec.content_order {
                assert!(
                    !spec.sidebar_sections.contains(section),
                    "{} routes {:?} both ways",
                    spec.name,
                    section
                );
            }
        }
    }

    #[test]
    fn test_modern_orders_experience_before_education() {
        let modern = TemplateSpec::for_id(TemplateId::Modern);
        let exp = modern
            .content_order
            .iter()
            .position(|s| *s == Section::Experience)
            .unwrap();
        let edu = modern
            .content_order
            .iter()
            .position(|s| *s == Section::Education)
            .unwrap();
        assert!(exp < edu);

        // The other three lead with education.
        let classic = TemplateSpec::for_id(TemplateId::ClassicSidebar);
        let exp = classic
            .content_order
            .iter()
            .position(|s| *s == Section::Experience)
            .unwrap();
        let edu = classic
            .content_order
            .iter()
            .position(|s| *s == Section::Education)
            .unwrap();
        assert!(edu < exp);
    }
}
