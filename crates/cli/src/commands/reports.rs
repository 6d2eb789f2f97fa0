//! `reports export`.

use std::path::PathBuf;

use chrono::Utc;
use jfa_admin::routes::reports::{export_file_name, render_print};

use super::CliError;
use super::session::Session;
use crate::ExportFormat;

/// Fetch the six aggregations and write them in `format`.
///
/// # Errors
///
/// Returns an error if the API call, rendering or the write fails.
pub async fn export(
    session: &Session,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let bundle = session.api().report_bundle().await?;
    let now = Utc::now();

    let contents = match format {
        ExportFormat::Xlsx => bundle
            .to_xlsx()
            .map_err(|e| CliError::Render(e.to_string()))?,
        ExportFormat::Html => render_print(&bundle, now)
            .map_err(|e| CliError::Render(e.to_string()))?
            .into_bytes(),
    };

    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(now, format.extension())));
    tokio::fs::write(&path, contents).await?;

    for section in bundle.sections() {
        tracing::info!(sheet = section.sheet, rows = section.rows.len(), "Exported section");
    }
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}
