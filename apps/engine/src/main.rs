use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use engine::config::Config;
use engine::export::{ExportOptions, HttpPdfClient, PdfRenderService};
use engine::layout::{MetricMeasurer, Viewport};
use engine::models::{CvData, CvSettings};
use engine::session::{LayoutStatus, PaginationSession};

/// Demo driver: load a CV from JSON, lay it out, report the page layouts,
/// and — when a PDF service is configured — run a full export round-trip.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("CV layout engine v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .context("usage: engine <cv.json>")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read CV file '{path}'"))?;
    let data: CvData = serde_json::from_str(&raw).context("CV JSON did not parse")?;

    let mut session = PaginationSession::new(data, CvSettings::default(), Arc::new(MetricMeasurer));
    session.resize_viewport(Viewport::new(1280.0, 800.0));

    let snapshot = session.settle().await;

    info!(
        pages = snapshot.total_pages(),
        scale = snapshot.scale,
        status = ?snapshot.status,
        "layout settled"
    );
    for page in &snapshot.pages {
        info!(
            page = page.page_index,
            blocks = page.blocks.len(),
            used_px = format!("{:.1}", page.used_height_px),
            "page packed"
        );
    }
    if let Some(advisory) = snapshot.page_count_advisory() {
        warn!(
            "CV runs to {} pages — consider trimming to {} or fewer",
            advisory.total_pages, advisory.recommended_max
        );
    }

    let Some(service_url) = config.pdf_service_url else {
        info!("PDF_SERVICE_URL not set — skipping export");
        return Ok(());
    };

    if snapshot.status != LayoutStatus::Committed {
        warn!("layout is still provisional — not exporting");
        return Ok(());
    }

    let client = HttpPdfClient::new(service_url, config.pdf_service_api_key);
    let request = session.export_request(&snapshot, ExportOptions::default());

    let export_session = client.submit(&request).await?;
    info!(
        session_id = %export_session.session_id,
        filename = %export_session.filename,
        expires_at = %export_session.expires_at,
        "export session created"
    );

    let bytes = client.download(&export_session.session_id).await?;
    std::fs::write(&export_session.filename, &bytes)
        .with_context(|| format!("failed to write '{}'", export_session.filename))?;
    info!(
        "exported {} ({} bytes)",
        export_session.filename,
        bytes.len()
    );

    Ok(())
}
