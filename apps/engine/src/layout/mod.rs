// The pagination & layout core: block construction, height measurement,
// bin-packing, viewport scaling, and the per-template geometry descriptors.
// Everything here is synchronous and deterministic; scheduling lives in
// `session`.

pub mod blocks;
pub mod font_metrics;
pub mod measure;
pub mod paginator;
pub mod scale;
pub mod templates;

pub use blocks::{build_blocks, BlockKind, BlockPayload, ContentBlock};
pub use font_metrics::FontId;
pub use measure::{HeightMeasure, MetricMeasurer, StyleContext};
pub use paginator::{paginate, MeasuredBlock, PageGeometry, PageLayout, PaginationRules};
pub use scale::{fit_scale, Viewport};
pub use templates::{Section, TemplateId, TemplateSpec};
