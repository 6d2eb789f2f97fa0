//! Payments list route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use jfa_core::catalog::{ADMIN_PAGE_SIZE, Page};
use jfa_core::models::{BillingStatistics, Payment};
use tracing::instrument;

use crate::components::{PageQuery, Pager};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::layout::{AdminLayout, format_timestamp};
use crate::state::AppState;

/// Payment display data for the table.
#[derive(Debug, Clone)]
pub struct PaymentRow {
    pub id: i32,
    pub order_id: String,
    pub customer: String,
    pub total: String,
    pub method: String,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub paid_at: String,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.as_i32(),
            order_id: payment
                .order_id
                .map_or_else(|| "-".to_owned(), |id| id.to_string()),
            customer: payment.customer_name(),
            total: payment.total.to_string(),
            method: payment.method.clone().unwrap_or_else(|| "-".to_owned()),
            status_label: payment.status.label(),
            status_tone: payment.status.tone(),
            paid_at: format_timestamp(payment.paid_at),
        }
    }
}

/// Payments page template.
#[derive(Template, WebTemplate)]
#[template(path = "payments/index.html")]
pub struct PaymentsIndexTemplate {
    pub layout: AdminLayout,
    pub payments: Vec<PaymentRow>,
    pub pager: Pager,
    pub invoice_count: u64,
    pub revenue: String,
    pub average: String,
}

/// Payments list page handler. The summary is totalled over the listed
/// payments.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<PaymentsIndexTemplate> {
    let payments = state.api(&admin).list_payments().await?;
    let summary = BillingStatistics::from_payments(&payments);
    let rows: Vec<PaymentRow> = payments.iter().map(PaymentRow::from).collect();
    let rows = Page::paginate(rows, page.page(), ADMIN_PAGE_SIZE);

    Ok(PaymentsIndexTemplate {
        layout: AdminLayout::new(&admin, "/payments"),
        pager: Pager::new(&rows, "/payments", None),
        payments: rows.items,
        invoice_count: summary.invoice_count,
        revenue: summary.total_revenue.to_string(),
        average: summary.average_per_invoice.to_string(),
    })
}
