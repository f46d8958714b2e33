//! Export client — the single point of contact with the external PDF
//! rendering service.
//!
//! Protocol: submit the CV plus the per-page placement, receive a session
//! id, then fetch the finished file by that id. The placement embedded in
//! the request is the exact value the preview rendered, so the exported
//! document can never disagree with what the user saw.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::ExportError;
use crate::layout::font_metrics::FontId;
use crate::layout::templates::TemplateId;
use crate::models::CvData;
use crate::render::PageRender;

const SESSIONS_PATH: &str = "/v1/render/sessions";
const MAX_RETRIES: u32 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Extra rendering options forwarded to the PDF service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub include_watermark: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_footer: Option<String>,
    pub page_numbers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            include_watermark: false,
            watermark_text: None,
            custom_footer: None,
            page_numbers: true,
        }
    }
}

/// A complete export submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub cv_data: CvData,
    pub template: TemplateId,
    pub accent_color: String,
    pub font: FontId,
    pub show_qr_code: bool,
    /// The per-page placement the preview rendered — byte-for-byte the
    /// layout the service must reproduce.
    pub placement: Vec<PageRender>,
    #[serde(default)]
    pub options: ExportOptions,
}

/// Server acknowledgement of a submitted export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSession {
    pub session_id: String,
    pub filename: String,
    pub expires_at: DateTime<Utc>,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Service trait
// ────────────────────────────────────────────────────────────────────────────

/// The PDF rendering collaborator. Trait-based so callers (and tests) can
/// swap the HTTP client for a double without touching session code.
#[async_trait]
pub trait PdfRenderService: Send + Sync {
    /// Submits an export; returns the session handle to download by.
    async fn submit(&self, request: &ExportRequest) -> Result<ExportSession, ExportError>;

    /// Fetches the finished file for a previously created session.
    async fn download(&self, session_id: &str) -> Result<Bytes, ExportError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// reqwest-backed client with retry + exponential backoff on 429/5xx.
pub struct HttpPdfClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPdfClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        HttpPdfClient {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn sessions_url(&self) -> String {
        format!("{}{SESSIONS_PATH}", self.base_url)
    }

    fn file_url(&self, session_id: &str) -> String {
        format!("{}{SESSIONS_PATH}/{session_id}/file", self.base_url)
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }
}

#[async_trait]
impl PdfRenderService for HttpPdfClient {
    async fn submit(&self, request: &ExportRequest) -> Result<ExportSession, ExportError> {
        let mut last_error: Option<ExportError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "export submit attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .apply_auth(self.client.post(self.sessions_url()))
                .json(request)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ExportError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("PDF service returned {status}: {body}");
                last_error = Some(ExportError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ExportError::SessionExpired);
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ServiceError>(&body)
                    .map(|e| match e.details {
                        Some(details) => format!("{}: {details}", e.error),
                        None => e.error,
                    })
                    .unwrap_or(body);
                return Err(ExportError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let session: ExportSession = response.json().await?;
            debug!(
                session_id = %session.session_id,
                filename = %session.filename,
                size = session.size,
                "export session created"
            );
            return Ok(session);
        }

        Err(last_error.unwrap_or(ExportError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    async fn download(&self, session_id: &str) -> Result<Bytes, ExportError> {
        let response = self
            .apply_auth(self.client.get(self.file_url(session_id)))
            .send()
            .await?;

        let status = response.status();
        // A consumed or timed-out session reads as gone, not as a failure.
        if status.as_u16() == 404 || status.as_u16() == 410 {
            return Err(ExportError::SessionExpired);
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ExportError::SessionExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ExportError::EmptyFile);
        }
        debug!(session_id, size = bytes.len(), "export file downloaded");
        Ok(bytes)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filenames
// ────────────────────────────────────────────────────────────────────────────

/// Strips characters the download filesystem path cannot carry, collapses
/// whitespace/underscores, caps the length, and falls back to `"CV"`.
pub fn sanitize_filename(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') && *c >= ' ')
        .collect();

    cleaned = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    while cleaned.contains("__") {
        cleaned = cleaned.replace("__", "_");
    }

    if cleaned.len() > 200 {
        let mut end = 200;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }
    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        "CV".to_string()
    } else {
        cleaned
    }
}

/// `"<FullName>_CV.pdf"` with the name sanitized.
pub fn export_filename(full_name: &str) -> String {
    format!("{}_CV.pdf", sanitize_filename(full_name))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_spaces_with_underscores() {
        assert_eq!(sanitize_filename("Jane van Doe"), "Jane_van_Doe");
    }

    #[test]
    fn test_sanitize_strips_invalid_characters() {
        assert_eq!(sanitize_filename("Jane<>:\"/\\|?*Doe"), "JaneDoe");
    }

    #[test]
    fn test_sanitize_collapses_underscores() {
        assert_eq!(sanitize_filename("Jane   van   Doe"), "Jane_van_Doe");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename("...Jane"), "Jane");
    }

    #[test]
    fn test_sanitize_empty_falls_back_to_cv() {
        assert_eq!(sanitize_filename(""), "CV");
        assert_eq!(sanitize_filename("???"), "CV");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_filename(&long).len(), 200);
    }

    #[test]
    fn test_export_filename_shape() {
        assert_eq!(export_filename("Jane Doe"), "Jane_Doe_CV.pdf");
    }

    #[test]
    fn test_export_request_serializes_camel_case() {
        let request = ExportRequest {
            cv_data: CvData::default(),
            template: TemplateId::Modern,
            accent_color: "#2563eb".to_string(),
            font: FontId::Inter,
            show_qr_code: true,
            placement: Vec::new(),
            options: ExportOptions::default(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"cvData\""));
        assert!(json.contains("\"accentColor\""));
        assert!(json.contains("\"placement\""));
        assert!(json.contains("\"pageNumbers\""));
    }

    #[test]
    fn test_export_session_parses_service_response() {
        let json = r#"{
            "sessionId": "b9c7f3",
            "filename": "Jane_Doe_CV.pdf",
            "expiresAt": "2026-08-07T12:00:00Z",
            "size": 48213
        }"#;
        let session: ExportSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.session_id, "b9c7f3");
        assert_eq!(session.size, 48213);
    }

    #[test]
    fn test_client_urls() {
        let client = HttpPdfClient::new("https://pdf.example.com/", None);
        assert_eq!(
            client.sessions_url(),
            "https://pdf.example.com/v1/render/sessions"
        );
        assert_eq!(
            client.file_url("abc"),
            "https://pdf.example.com/v1/render/sessions/abc/file"
        );
    }
}
