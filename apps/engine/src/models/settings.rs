//! Editor-facing visual settings: template, accent, font, QR toggle.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontId;
use crate::layout::templates::{TemplateId, TemplateSpec};

/// Visual settings for one editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvSettings {
    pub template: TemplateId,
    /// Hex accent color, e.g. `"#2563eb"`.
    pub accent_color: String,
    pub font: FontId,
    #[serde(default = "default_show_qr")]
    pub show_qr_code: bool,
}

fn default_show_qr() -> bool {
    true
}

impl CvSettings {
    /// Settings for a template with its default accent.
    pub fn for_template(template: TemplateId) -> Self {
        CvSettings {
            template,
            accent_color: TemplateSpec::for_id(template).default_accent.to_string(),
            font: FontId::Inter,
            show_qr_code: true,
        }
    }
}

impl Default for CvSettings {
    fn default() -> Self {
        CvSettings::for_template(TemplateId::Modern)
    }
}
