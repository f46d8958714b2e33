//! Error taxonomy for the engine.
//!
//! Of the three failure families in the layout pipeline, only the export
//! boundary produces real errors. Unmeasured blocks are a transient state
//! (the session stays provisional and reschedules) and oversized blocks are
//! a defined packing edge case — neither ever surfaces as an `Err`.

use thiserror::Error;

/// Failures talking to the external PDF rendering service.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF service error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The export session is gone (expired, consumed, or never existed).
    /// Distinguished from generic failures so callers can tell the user to
    /// start a fresh export instead of retrying the download.
    #[error("export session expired — request a new export")]
    SessionExpired,

    #[error("PDF service rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("PDF service returned an empty file")]
    EmptyFile,
}

impl ExportError {
    /// Whether retrying the same call can plausibly succeed. A dead session
    /// needs a new submit, not a retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExportError::SessionExpired)
    }
}
