// Résumé data model and editor settings.
// Wire names are camelCase to match the JSON the editor collaborators emit.

pub mod cv;
pub mod settings;

pub use cv::{CvData, EducationEntry, ExperienceEntry, LanguageSkill, PersonalInfo};
pub use settings::CvSettings;
