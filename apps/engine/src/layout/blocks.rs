//! Content block construction — turns CvData into the ordered, atomic block
//! stream the paginator consumes.
//!
//! Blocks are rebuilt from scratch on every data change; what stays stable
//! is their ids, so the height cache keeps its hits across unrelated edits.
//! Sections the active template routes to the sidebar never produce blocks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::layout::templates::{Section, TemplateSpec};
use crate::models::{CvData, EducationEntry, ExperienceEntry};

pub const EXPERIENCE_HEADER_TITLE: &str = "Work Experience";
pub const EDUCATION_HEADER_TITLE: &str = "Education";

// ────────────────────────────────────────────────────────────────────────────
// Block types
// ────────────────────────────────────────────────────────────────────────────

/// Kind of an atomic content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Profile,
    SectionHeader,
    ExperienceEntry,
    EducationEntry,
}

/// Payload of a content block. Entries are cloned out of CvData so a block
/// stream is self-contained once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockPayload {
    Profile { summary: String },
    SectionHeader { title: String },
    Experience(ExperienceEntry),
    Education(EducationEntry),
}

/// An atomic, unsplittable unit of résumé content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    /// Stable id: `"profile"`, `"experience-header"`, `"experience-<id|idx>"`, ...
    pub id: String,
    pub kind: BlockKind,
    pub payload: BlockPayload,
}

impl ContentBlock {
    /// Content fingerprint for the height cache: two blocks with the same id
    /// but different payloads must not share a cached height.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind.hash(&mut hasher);
        self.payload.hash(&mut hasher);
        hasher.finish()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builds the ordered block stream for `data` under `template`.
///
/// Guarantees:
/// - order follows `template.content_order`, entries keep source order;
/// - a section-header block immediately precedes its first entry;
/// - empty sections produce nothing (no orphan headers);
/// - ids are deterministic: entry id when present, array index otherwise.
pub fn build_blocks(data: &CvData, template: &TemplateSpec) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    for section in template.content_order {
        match section {
            Section::Profile => push_profile(data, &mut blocks),
            Section::Experience => push_experience(&data.experience, &mut blocks),
            Section::Education => push_education(&data.education, &mut blocks),
            // Sidebar-only sections never appear in content_order; ignore
            // defensively if a future descriptor misroutes one.
            _ => {}
        }
    }

    blocks
}

fn push_profile(data: &CvData, blocks: &mut Vec<ContentBlock>) {
    let summary = data.personal.summary.trim();
    if summary.is_empty() {
        return;
    }
    blocks.push(ContentBlock {
        id: "profile".to_string(),
        kind: BlockKind::Profile,
        payload: BlockPayload::Profile {
            summary: summary.to_string(),
        },
    });
}

fn push_experience(entries: &[ExperienceEntry], blocks: &mut Vec<ContentBlock>) {
    if entries.is_empty() {
        return;
    }
    blocks.push(ContentBlock {
        id: "experience-header".to_string(),
        kind: BlockKind::SectionHeader,
        payload: BlockPayload::SectionHeader {
            title: EXPERIENCE_HEADER_TITLE.to_string(),
        },
    });
    for (index, entry) in entries.iter().enumerate() {
        blocks.push(ContentBlock {
            id: entry_block_id("experience", entry.id.as_deref(), index),
            kind: BlockKind::ExperienceEntry,
            payload: BlockPayload::Experience(entry.clone()),
        });
    }
}

fn push_education(entries: &[EducationEntry], blocks: &mut Vec<ContentBlock>) {
    if entries.is_empty() {
        return;
    }
    blocks.push(ContentBlock {
        id: "education-header".to_string(),
        kind: BlockKind::SectionHeader,
        payload: BlockPayload::SectionHeader {
            title: EDUCATION_HEADER_TITLE.to_string(),
        },
    });
    for (index, entry) in entries.iter().enumerate() {
        blocks.push(ContentBlock {
            id: entry_block_id("education", entry.id.as_deref(), index),
            kind: BlockKind::EducationEntry,
            payload: BlockPayload::Education(entry.clone()),
        });
    }
}

/// `"<prefix>-<entry id>"` when the entry carries one, `"<prefix>-<index>"`
/// otherwise. Index-derived ids are stable as long as the array order is.
fn entry_block_id(prefix: &str, entry_id: Option<&str>, index: usize) -> String {
    match entry_id {
        Some(id) if !id.is_empty() => format!("{prefix}-{id}"),
        _ => format!("{prefix}-{index}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
