use anyhow::Result;

/// Runtime configuration loaded from environment variables (and `.env` if
/// present). The PDF service settings are optional: without them the demo
/// binary lays out and previews but skips the export step.
#[derive(Debug, Clone)]
pub struct Config {
    pub pdf_service_url: Option<String>,
    pub pdf_service_api_key: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            pdf_service_url: std::env::var("PDF_SERVICE_URL").ok(),
            pdf_service_api_key: std::env::var("PDF_SERVICE_API_KEY").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
