//! Dashboard route handler.
//!
//! Counts are computed here from the full product, user and order lists.
//! Billing figures come from the statistics endpoint, or from the payment
//! list when that endpoint fails.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use jfa_backend::{Api, ApiError};
use jfa_core::models::{BillingStatistics, Order, Product, User};
use jfa_core::{OrderStatus, Role};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::layout::AdminLayout;
use crate::state::AppState;

/// Figures shown on the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub products: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub customers: usize,
    pub orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    pub invoices: u64,
    pub revenue: String,
    pub average_invoice: String,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(
        products: &[Product],
        users: &[User],
        orders: &[Order],
        billing: &BillingStatistics,
    ) -> Self {
        let orders_with =
            |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        Self {
            products: products.len(),
            low_stock: products.iter().filter(|p| p.is_low_stock()).count(),
            out_of_stock: products.iter().filter(|p| p.stock == 0).count(),
            customers: users.iter().filter(|u| u.role == Role::User).count(),
            orders: orders.len(),
            pending_orders: orders_with(OrderStatus::Pending),
            delivered_orders: orders_with(OrderStatus::Delivered),
            invoices: billing.invoice_count,
            revenue: billing.total_revenue.to_string(),
            average_invoice: billing.average_per_invoice.to_string(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: AdminLayout,
    pub stats: DashboardStats,
    pub error: Option<&'static str>,
}

async fn load_stats(api: Api<'_>) -> std::result::Result<DashboardStats, ApiError> {
    let products = api.list_products().await?;
    let users = api.list_users().await?;
    let orders = api.list_orders().await?;
    let billing = api.billing_statistics_or_aggregate().await?;
    Ok(DashboardStats::compute(&products, &users, &orders, &billing))
}

/// Dashboard page handler.
///
/// An expired token goes back to login; any other failure renders the page
/// with empty figures and a notice.
#[instrument(skip(admin, state))]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Response> {
    let (stats, error) = match load_stats(state.api(&admin)).await {
        Ok(stats) => (stats, None),
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard data");
            (
                DashboardStats::default(),
                Some("Error al cargar los datos del panel"),
            )
        }
    };

    Ok(DashboardTemplate {
        layout: AdminLayout::new(&admin, "/"),
        stats,
        error,
    }
    .into_response())
}
