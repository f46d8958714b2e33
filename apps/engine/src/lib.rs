//! Résumé pagination & layout engine.
//!
//! Turns a structured résumé (`CvData`) into fixed-size A4 page layouts:
//! atomic content blocks are measured, bin-packed into pages without ever
//! splitting across a boundary, placed under one of four template
//! geometries, and scaled uniformly into whatever viewport the host
//! provides. The same per-page placement drives the interactive preview
//! and the export request sent to the external PDF service, so the two can
//! never disagree.
//!
//! Entry points:
//! - [`session::PaginationSession`] — one editor's owned layout state;
//! - [`export::HttpPdfClient`] — the PDF render service client;
//! - the pure pieces in [`layout`] and [`render`] for hosts that drive the
//!   pipeline themselves.

pub mod config;
pub mod errors;
pub mod export;
pub mod layout;
pub mod models;
pub mod render;
pub mod session;

pub use errors::ExportError;
pub use export::{ExportOptions, ExportRequest, ExportSession, HttpPdfClient, PdfRenderService};
pub use layout::{
    FontId, HeightMeasure, MetricMeasurer, PageGeometry, PageLayout, PaginationRules, TemplateId,
    TemplateSpec, Viewport,
};
pub use models::{CvData, CvSettings};
pub use render::{PageRender, PlacedBlock};
pub use session::{LayoutSnapshot, LayoutStatus, PaginationSession};
