//! PaginationSession — one editor's layout state, owned exclusively.
//!
//! The session replaces hidden module-level "current scale"/"current page"
//! state: every recomputation is a pure function over the session's current
//! inputs (data, settings, viewport, cached heights). Edits bump a
//! generation counter; a settle pass snapshots the inputs, measures and
//! packs off-thread, and commits only if no newer edit arrived in the
//! meantime — a superseded pass is discarded wholesale and re-run, never
//! merged, so stale heights can never mix with fresh content.
//!
//! A provisional layout (cached + fallback heights) is always available
//! synchronously; `Committed` status requires every block height to be
//! known and the pass generation to match.

use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::export::{ExportOptions, ExportRequest};
use crate::layout::blocks::build_blocks;
use crate::layout::measure::{fallback_height, HeightCache, HeightMeasure, StyleContext};
use crate::layout::paginator::{
    paginate, MeasuredBlock, PageGeometry, PageLayout, PaginationRules,
};
use crate::layout::scale::{fit_scale, Viewport, PREVIEW_PADDING_PX};
use crate::layout::templates::{TemplateId, TemplateSpec};
use crate::layout::FontId;
use crate::models::{CvData, CvSettings};
use crate::render::{render_document, PageRender};

/// Coalescing window for bursts of edits. One settled state → one pass.
pub const DEBOUNCE_MS: u64 = 150;

/// Measurement passes per settle before giving up and staying provisional.
const MAX_MEASURE_PASSES: u32 = 3;

/// Page count above which an advisory is surfaced (guidance only — it never
/// changes packing).
pub const PAGE_COUNT_ADVISORY_THRESHOLD: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Snapshot types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Some heights are fallbacks or the layout predates the newest edit.
    Provisional,
    /// Every visible block measured; safe to export.
    Committed,
}

/// The preview contract: packed pages, their placement, and the current
/// viewport scale.
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    pub pages: Vec<PageLayout>,
    pub placement: Vec<PageRender>,
    pub scale: f32,
    pub status: LayoutStatus,
}

impl LayoutSnapshot {
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Advisory for layouts running long. Surfaced upward for user
    /// guidance; pagination itself is never affected.
    pub fn page_count_advisory(&self) -> Option<PageCountAdvisory> {
        let total_pages = self.total_pages();
        (total_pages > PAGE_COUNT_ADVISORY_THRESHOLD).then_some(PageCountAdvisory {
            total_pages,
            recommended_max: PAGE_COUNT_ADVISORY_THRESHOLD,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCountAdvisory {
    pub total_pages: usize,
    pub recommended_max: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

pub struct PaginationSession {
    id: Uuid,
    data: CvData,
    settings: CvSettings,
    geometry: PageGeometry,
    rules: PaginationRules,
    viewport: Viewport,
    measurer: Arc<dyn HeightMeasure>,
    cache: HeightCache,
    /// Bumped on every content/style edit.
    generation: u64,
    /// Generation of the last fully measured, committed pass.
    committed_generation: Option<u64>,
}

impl PaginationSession {
    pub fn new(data: CvData, settings: CvSettings, measurer: Arc<dyn HeightMeasure>) -> Self {
        let geometry = PageGeometry::a4();
        // Default viewport shows the page at natural size until the host
        // reports a real container.
        let viewport = Viewport::new(
            geometry.page_width_px + PREVIEW_PADDING_PX,
            geometry.page_height_px + PREVIEW_PADDING_PX,
        );
        PaginationSession {
            id: Uuid::new_v4(),
            data,
            settings,
            geometry,
            rules: PaginationRules::default(),
            viewport,
            measurer,
            cache: HeightCache::new(),
            generation: 0,
            committed_generation: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn data(&self) -> &CvData {
        &self.data
    }

    pub fn settings(&self) -> &CvSettings {
        &self.settings
    }

    // ── edits (each invalidates the committed layout) ───────────────────────

    pub fn update_data(&mut self, data: CvData) {
        self.data = data;
        self.touch();
    }

    pub fn set_template(&mut self, template: TemplateId) {
        self.settings.template = template;
        self.touch();
    }

    pub fn set_font(&mut self, font: FontId) {
        self.settings.font = font;
        self.touch();
    }

    pub fn set_accent_color(&mut self, accent_color: impl Into<String>) {
        self.settings.accent_color = accent_color.into();
        self.touch();
    }

    pub fn set_show_qr_code(&mut self, show: bool) {
        self.settings.show_qr_code = show;
        self.touch();
    }

    pub fn set_pagination_rules(&mut self, rules: PaginationRules) {
        self.rules = rules;
        self.touch();
    }

    /// Viewport changes are presentation-only: the scale recomputes on the
    /// next snapshot, packing and placement stay untouched.
    pub fn resize_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.committed_generation = None;
    }

    // ── snapshots ───────────────────────────────────────────────────────────

    /// Current layout without waiting: cached heights where available,
    /// fallback heights otherwise. Flagged `Provisional` unless the last
    /// committed pass still matches the current inputs.
    pub fn preview(&mut self) -> LayoutSnapshot {
        self.assemble()
    }

    /// Waits out the debounce window, measures every block off-thread, and
    /// commits. Bursty edits that land before the window closes restart the
    /// wait, so one settled state produces exactly one measurement pass.
    ///
    /// If the measurer cannot resolve every height after
    /// `MAX_MEASURE_PASSES`, the snapshot stays provisional — a transient
    /// condition, not an error.
    pub async fn settle(&mut self) -> LayoutSnapshot {
        let mut pass = 0u32;
        while pass < MAX_MEASURE_PASSES {
            let generation = self.generation;
            sleep(Duration::from_millis(DEBOUNCE_MS)).await;
            if self.generation != generation {
                // A newer edit arrived during the window: the pending pass
                // is superseded. Restart without counting a pass.
                continue;
            }
            pass += 1;

            // Snapshot the inputs; the blocking pass works on its own copy
            // so a superseded result can be dropped wholesale.
            let data = self.data.clone();
            let settings = self.settings.clone();
            let geometry = self.geometry.clone();
            let measurer = Arc::clone(&self.measurer);
            let mut cache = std::mem::take(&mut self.cache);

            let joined = tokio::task::spawn_blocking(move || {
                let template = TemplateSpec::for_id(settings.template);
                let style = StyleContext {
                    template: settings.template,
                    font: settings.font,
                };
                let width = template.content_column_width_px(geometry.page_width_px);
                cache.ensure_style(&style, width);

                let blocks = build_blocks(&data, template);
                let mut unknown = 0usize;
                for block in &blocks {
                    if cache.get(block).is_none() {
                        match measurer.measure(block, width, &style) {
                            Some(height) => cache.insert(block, height),
                            None => unknown += 1,
                        }
                    }
                }
                (cache, unknown)
            })
            .await;

            match joined {
                Ok((cache, unknown)) => {
                    self.cache = cache;
                    if self.generation != generation {
                        // Superseded while measuring: discard, go again.
                        continue;
                    }
                    if unknown == 0 {
                        self.committed_generation = Some(generation);
                        debug!(
                            session = %self.id,
                            generation,
                            cached = self.cache.len(),
                            "layout pass committed"
                        );
                        return self.assemble();
                    }
                    warn!(
                        session = %self.id,
                        unknown,
                        pass,
                        "blocks still unmeasured after pass, rescheduling"
                    );
                }
                Err(e) => {
                    // The measurer panicked and took the cache with it; the
                    // provisional layout stands and the cache rebuilds on
                    // the next settle.
                    warn!(session = %self.id, "layout pass lost: {e}");
                    return self.assemble();
                }
            }
        }
        self.assemble()
    }

    /// Builds the export request for a settled snapshot. The placement is
    /// the snapshot's own — identical to what the preview rendered.
    pub fn export_request(
        &self,
        snapshot: &LayoutSnapshot,
        options: ExportOptions,
    ) -> ExportRequest {
        ExportRequest {
            cv_data: self.data.clone(),
            template: self.settings.template,
            accent_color: self.settings.accent_color.clone(),
            font: self.settings.font,
            show_qr_code: self.settings.show_qr_code,
            placement: snapshot.placement.clone(),
            options,
        }
    }

    /// Pure recomputation over the current inputs: build → resolve heights
    /// (cache or fallback) → pack → place → scale.
    fn assemble(&mut self) -> LayoutSnapshot {
        let template = TemplateSpec::for_id(self.settings.template);
        let style = StyleContext {
            template: self.settings.template,
            font: self.settings.font,
        };
        let width = template.content_column_width_px(self.geometry.page_width_px);
        self.cache.ensure_style(&style, width);

        let mut all_known = true;
        let measured: Vec<MeasuredBlock> = build_blocks(&self.data, template)
            .into_iter()
            .map(|block| {
                let height_px = match self.cache.get(&block) {
                    Some(height) => height,
                    None => {
                        all_known = false;
                        fallback_height(&block)
                    }
                };
                MeasuredBlock { block, height_px }
            })
            .collect();

        let pages = paginate(measured, &self.geometry, &self.rules);
        let placement = render_document(&pages, &self.data, &self.settings, &self.geometry);
        let scale = fit_scale(
            self.viewport,
            self.geometry.page_width_px,
            self.geometry.page_height_px,
        );
        let status = if all_known && self.committed_generation == Some(self.generation) {
            LayoutStatus::Committed
        } else {
            LayoutStatus::Provisional
        };

        LayoutSnapshot {
            pages,
            placement,
            scale,
            status,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::layout::blocks::ContentBlock;
    use crate::layout::measure::MetricMeasurer;
    use crate::models::{ExperienceEntry, PersonalInfo};

    /// Counts measure calls; resolves everything at a fixed height.
    struct CountingMeasurer {
        calls: AtomicUsize,
    }

    impl CountingMeasurer {
        fn new() -> Arc<Self> {
            Arc::new(CountingMeasurer {
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl HeightMeasure for CountingMeasurer {
        fn measure(&self, _: &ContentBlock, _: f32, _: &StyleContext) -> Option<f32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(100.0)
        }
    }

    /// Returns `None` until released — models heights not yet readable.
    struct GatedMeasurer {
        ready: AtomicBool,
    }

    impl GatedMeasurer {
        fn new() -> Arc<Self> {
            Arc::new(GatedMeasurer {
                ready: AtomicBool::new(false),
            })
        }
    }

    impl HeightMeasure for GatedMeasurer {
        fn measure(&self, _: &ContentBlock, _: f32, _: &StyleContext) -> Option<f32> {
            if self.ready.load(Ordering::SeqCst) {
                Some(100.0)
            } else {
                None
            }
        }
    }

    fn sample_data() -> CvData {
        CvData {
            personal: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                summary: "Engineer who paginates.".to_string(),
                ..Default::default()
            },
            experience: vec![
                ExperienceEntry {
                    id: Some("a".to_string()),
                    role: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    description: "Built the layout engine.".to_string(),
                    ..Default::default()
                },
                ExperienceEntry {
                    id: Some("b".to_string()),
                    role: "Intern".to_string(),
                    company: "Beta".to_string(),
                    description: "Measured blocks.".to_string(),
                    ..Default::default()
                },
            ],
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }
    }

    fn session_with(measurer: Arc<dyn HeightMeasure>) -> PaginationSession {
        PaginationSession::new(sample_data(), CvSettings::default(), measurer)
    }

    #[test]
    fn test_preview_before_settle_is_provisional_with_fallback_heights() {
        let mut session = session_with(CountingMeasurer::new());
        let snapshot = session.preview();
        assert_eq!(snapshot.status, LayoutStatus::Provisional);
        // profile + header + 2 entries, all at fallback heights
        let heights: Vec<f32> = snapshot.pages[0]
            .blocks
            .iter()
            .map(|b| b.height_px)
            .collect();
        assert_eq!(heights, vec![150.0, 50.0, 150.0, 150.0]);
    }

    #[tokio::test]
    async fn test_settle_commits_with_measured_heights() {
        let measurer = CountingMeasurer::new();
        let mut session = session_with(measurer.clone());
        let snapshot = session.settle().await;
        assert_eq!(snapshot.status, LayoutStatus::Committed);
        assert!(snapshot.pages[0]
            .blocks
            .iter()
            .all(|b| (b.height_px - 100.0).abs() < 1e-6));
        // One call per block: profile + header + 2 entries.
        assert_eq!(measurer.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_burst_of_edits_measures_each_block_once() {
        let measurer = CountingMeasurer::new();
        let mut session = session_with(measurer.clone());

        // Three rapid edits to the same entry, then one settle.
        for suffix in ["!", "!!", "!!!"] {
            let mut data = sample_data();
            data.experience[0].description = format!("Built the layout engine{suffix}");
            session.update_data(data);
        }
        let snapshot = session.settle().await;

        assert_eq!(snapshot.status, LayoutStatus::Committed);
        assert_eq!(
            measurer.calls.load(Ordering::SeqCst),
            4,
            "coalesced burst must measure the final state once, not per edit"
        );
    }

    #[tokio::test]
    async fn test_edit_after_commit_invalidates_and_remeasures_only_that_block() {
        let measurer = CountingMeasurer::new();
        let mut session = session_with(measurer.clone());
        session.settle().await;
        assert_eq!(measurer.calls.load(Ordering::SeqCst), 4);

        let mut data = sample_data();
        data.experience[1].role = "Senior Intern".to_string();
        session.update_data(data);
        assert_eq!(session.preview().status, LayoutStatus::Provisional);

        let snapshot = session.settle().await;
        assert_eq!(snapshot.status, LayoutStatus::Committed);
        assert_eq!(
            measurer.calls.load(Ordering::SeqCst),
            5,
            "only the edited block should re-measure; ids keep the cache warm"
        );
    }

    #[tokio::test]
    async fn test_unknown_heights_keep_snapshot_provisional() {
        let measurer = GatedMeasurer::new();
        let mut session = session_with(measurer.clone());
        let snapshot = session.settle().await;
        assert_eq!(
            snapshot.status,
            LayoutStatus::Provisional,
            "unmeasurable blocks must never commit"
        );

        // Heights become readable; the next settle commits.
        measurer.ready.store(true, Ordering::SeqCst);
        let snapshot = session.settle().await;
        assert_eq!(snapshot.status, LayoutStatus::Committed);
    }

    #[tokio::test]
    async fn test_resize_changes_scale_but_not_pages() {
        let mut session = session_with(CountingMeasurer::new());
        session.resize_viewport(Viewport::new(1000.0, 4000.0));
        let before = session.settle().await;

        session.resize_viewport(Viewport::new(500.0, 4000.0));
        let after = session.preview();

        assert!(after.scale < before.scale);
        assert_eq!(after.pages, before.pages, "packing must not depend on viewport");
        assert_eq!(
            after.status,
            LayoutStatus::Committed,
            "a resize is not an edit"
        );
    }

    #[tokio::test]
    async fn test_settle_is_deterministic() {
        let mut a = session_with(Arc::new(MetricMeasurer));
        let mut b = session_with(Arc::new(MetricMeasurer));
        let snap_a = a.settle().await;
        let snap_b = b.settle().await;
        assert_eq!(snap_a.pages, snap_b.pages);
        assert_eq!(snap_a.placement, snap_b.placement);
    }

    #[tokio::test]
    async fn test_template_switch_invalidates_cache_and_repaginates() {
        let measurer = CountingMeasurer::new();
        let mut session = session_with(measurer.clone());
        session.settle().await;
        let first_calls = measurer.calls.load(Ordering::SeqCst);

        session.set_template(TemplateId::ClassicSidebar);
        let snapshot = session.settle().await;

        assert_eq!(snapshot.status, LayoutStatus::Committed);
        assert!(
            measurer.calls.load(Ordering::SeqCst) >= first_calls + 4,
            "template switch changes column width — every block re-measures"
        );
        // classic-sidebar leads with education (none here), so stream order
        // is profile then experience.
        let ids: Vec<&str> = snapshot.pages[0]
            .blocks
            .iter()
            .map(|b| b.block.id.as_str())
            .collect();
        assert_eq!(ids[0], "profile");
        assert_eq!(ids[1], "experience-header");
    }

    #[tokio::test]
    async fn test_page_count_advisory_over_threshold() {
        // Tall blocks: each entry fills most of a page.
        struct TallMeasurer;
        impl HeightMeasure for TallMeasurer {
            fn measure(&self, _: &ContentBlock, _: f32, _: &StyleContext) -> Option<f32> {
                Some(900.0)
            }
        }
        let mut session = session_with(Arc::new(TallMeasurer));
        let snapshot = session.settle().await;
        assert!(snapshot.total_pages() > 2);
        let advisory = snapshot
            .page_count_advisory()
            .expect("advisory expected over threshold");
        assert_eq!(advisory.recommended_max, 2);
        assert_eq!(advisory.total_pages, snapshot.total_pages());
    }

    #[tokio::test]
    async fn test_two_page_layout_has_no_advisory() {
        let mut session = session_with(CountingMeasurer::new());
        let snapshot = session.settle().await;
        assert!(snapshot.total_pages() <= 2);
        assert!(snapshot.page_count_advisory().is_none());
    }

    #[tokio::test]
    async fn test_export_request_reuses_preview_placement() {
        let mut session = session_with(CountingMeasurer::new());
        let snapshot = session.settle().await;
        let request = session.export_request(&snapshot, ExportOptions::default());
        assert_eq!(
            request.placement, snapshot.placement,
            "export must ship exactly the previewed placement"
        );
        assert_eq!(request.template, TemplateId::Modern);
        assert_eq!(request.cv_data, *session.data());
    }
}
