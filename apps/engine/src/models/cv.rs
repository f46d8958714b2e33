//! The résumé data model supplied by editor collaborators.
//!
//! Entry ids are optional on the wire; when absent, block ids are
//! synthesized from array position (see `layout::blocks`). Ordering of the
//! entry vectors is meaningful and preserved end to end.

use serde::{Deserialize, Serialize};

/// Personal/identity fields rendered in the sidebar chrome on page 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Free-text profile summary. Empty means no profile block.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
    /// Target of the optional QR code on page 0.
    #[serde(default)]
    pub live_cv_url: Option<String>,
}

/// One job entry. `description` may carry simple rich-text markup
/// (`<ul>`, `<li>`, `<strong>`, ...); tags are ignored for measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub description: String,
}

/// One education entry. Description is optional, unlike experience.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A language/proficiency pair, rendered in the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSkill {
    pub language: String,
    pub proficiency: String,
}

/// The full résumé object. Section vectors keep source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvData {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cv_data_roundtrips_camel_case() {
        let json = r#"{
            "personal": {
                "fullName": "Jane Doe",
                "jobTitle": "Engineer",
                "email": "jane@example.com",
                "phone": "+31 6 1234 5678",
                "address": "Amsterdam",
                "summary": "Systems engineer.",
                "liveCvUrl": "https://example.com/cv/jane"
            },
            "experience": [
                {"id": "exp-1", "role": "Engineer", "company": "Acme",
                 "start": "2020", "end": "2024", "description": "Built things."}
            ],
            "education": [],
            "skills": ["Rust"],
            "languages": [{"language": "Dutch", "proficiency": "Native"}]
        }"#;

        let data: CvData = serde_json::from_str(json).expect("camelCase JSON should parse");
        assert_eq!(data.personal.full_name, "Jane Doe");
        assert_eq!(data.experience[0].id.as_deref(), Some("exp-1"));
        assert_eq!(data.languages[0].proficiency, "Native");
    }

    #[test]
    fn test_missing_optional_sections_default_empty() {
        let json = r#"{"personal": {"fullName": "Jane Doe"}}"#;
        let data: CvData = serde_json::from_str(json).expect("minimal JSON should parse");
        assert!(data.experience.is_empty());
        assert!(data.education.is_empty());
        assert!(data.skills.is_empty());
        assert!(data.languages.is_empty());
        assert!(data.personal.summary.is_empty());
    }
}
