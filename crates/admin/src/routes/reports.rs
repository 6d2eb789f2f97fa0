//! Reports page and exports.
//!
//! All three handlers read the same [`ReportBundle`]. The API client caches
//! report responses, so exporting right after viewing the page does not
//! refetch.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use jfa_core::reports::{GeneralMetrics, ReportBundle, ReportSection};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::layout::AdminLayout;
use crate::state::AppState;

/// One report table.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub title: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl From<ReportSection> for SectionView {
    fn from(section: ReportSection) -> Self {
        Self {
            title: section.title,
            headers: section.headers.to_vec(),
            rows: section
                .rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }
}

/// The general metrics cards.
#[derive(Debug, Clone)]
pub struct MetricsView {
    pub total_revenue: String,
    pub average_sale: String,
    pub customers: u64,
    pub orders: u64,
    pub paid_invoices: u64,
    pub critical_stock_products: u64,
}

impl From<&GeneralMetrics> for MetricsView {
    fn from(metrics: &GeneralMetrics) -> Self {
        Self {
            total_revenue: metrics.total_revenue.to_string(),
            average_sale: metrics.average_sale.to_string(),
            customers: metrics.customers,
            orders: metrics.orders,
            paid_invoices: metrics.paid_invoices,
            critical_stock_products: metrics.critical_stock_products,
        }
    }
}

fn section_views(bundle: &ReportBundle) -> Vec<SectionView> {
    bundle.sections().into_iter().map(SectionView::from).collect()
}

/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub layout: AdminLayout,
    pub metrics: MetricsView,
    pub sections: Vec<SectionView>,
}

/// Standalone printable report ("Reporte General").
#[derive(Template)]
#[template(path = "reports/print.html")]
pub struct PrintTemplate {
    pub generated_at: String,
    pub metrics: MetricsView,
    pub sections: Vec<SectionView>,
}

impl PrintTemplate {
    #[must_use]
    pub fn new(bundle: &ReportBundle, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.format("%d/%m/%Y %H:%M").to_string(),
            metrics: MetricsView::from(&bundle.metrics),
            sections: section_views(bundle),
        }
    }
}

/// Render the printable report as a complete HTML document.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_print(bundle: &ReportBundle, generated_at: DateTime<Utc>) -> askama::Result<String> {
    PrintTemplate::new(bundle, generated_at).render()
}

/// File name for exports made at `at`.
#[must_use]
pub fn export_file_name(at: DateTime<Utc>, extension: &str) -> String {
    format!("reporte-general-{}.{extension}", at.format("%Y-%m-%d"))
}

/// Reports page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<ReportsTemplate> {
    let bundle = state.api(&admin).report_bundle().await?;
    Ok(ReportsTemplate {
        layout: AdminLayout::new(&admin, "/reports"),
        metrics: MetricsView::from(&bundle.metrics),
        sections: section_views(&bundle),
    })
}

/// MIME type of an `.xlsx` workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Spreadsheet export as an `.xlsx` attachment.
#[instrument(skip(admin, state))]
pub async fn export_xlsx(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Response> {
    let bundle = state.api(&admin).report_bundle().await?;
    let workbook = bundle
        .to_xlsx()
        .map_err(|e| AppError::Internal(format!("report export failed: {e}")))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now(), "xlsx")
    );
    tracing::info!(bytes = workbook.len(), "Report exported as XLSX");

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
            (CONTENT_DISPOSITION, disposition),
            (CACHE_CONTROL, "no-store".to_owned()),
        ],
        workbook,
    )
        .into_response())
}

/// Printable report, opened in a new tab and printed from the browser.
#[instrument(skip(admin, state))]
pub async fn print(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Html<String>> {
    let bundle = state.api(&admin).report_bundle().await?;
    render_print(&bundle, Utc::now())
        .map(Html)
        .map_err(|e| AppError::Internal(format!("report render failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bundle() -> ReportBundle {
        ReportBundle {
            top_products: serde_json::from_str(
                r#"[{"nombre": "Cable 2.5mm", "categoria": "Cables", "total_vendido": 40},
                    {"nombre": "Foco <LED>", "categoria": "Iluminación", "total_vendido": 12}]"#,
            )
            .unwrap(),
            critical_stock: serde_json::from_str(
                r#"[{"nombre": "Toma doble", "stock": 2, "precio": "950.5"}]"#,
            )
            .unwrap(),
            ..ReportBundle::default()
        }
    }

    #[test]
    fn test_print_has_one_table_per_section() {
        let at = DateTime::parse_from_rfc3339("2025-05-02T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let html = render_print(&bundle(), at).unwrap();

        assert!(html.contains("Reporte General"));
        assert!(html.contains("02/05/2025 10:00"));
        assert_eq!(html.matches("<table").count(), 5);
        assert_eq!(html.matches("<tbody>").count(), 5);
        assert!(html.contains("Foco &#60;LED&#62;") || html.contains("Foco &lt;LED&gt;"));
        assert!(html.contains("950,50"));
    }

    #[test]
    fn test_export_file_name() {
        let at = DateTime::parse_from_rfc3339("2025-05-02T23:59:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(export_file_name(at, "xlsx"), "reporte-general-2025-05-02.xlsx");
    }
}
