//! Order management route handlers.
//!
//! Orders are listed, inspected line by line, moved to any status and
//! deleted. The API has no single-order endpoint, so the detail page filters
//! the full list.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use jfa_core::catalog::{ADMIN_PAGE_SIZE, Page};
use jfa_core::models::{Order, OrderLine};
use jfa_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::components::{PageQuery, Pager};
use crate::error::{Result, audit};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::layout::{AdminLayout, MessageQuery, Notice, format_timestamp};
use crate::state::AppState;

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub estado: String,
}

/// Order display data for the list.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: i32,
    pub customer: String,
    pub date: String,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub total: String,
}

/// Who placed the order: the shipping name, else the linked account.
fn customer_name(order: &Order) -> String {
    order
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            order
                .customer
                .as_ref()
                .map(|c| format!("{} {}", c.first_name, c.last_name).trim().to_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "-".to_owned())
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            customer: customer_name(order),
            date: format_timestamp(order.created_at),
            status_label: order.status.label(),
            status_tone: order.status.tone(),
            total: order.total.to_string(),
        }
    }
}

/// One line of the order detail.
#[derive(Debug, Clone)]
pub struct LineView {
    pub product: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl From<&OrderLine> for LineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            product: line
                .product_name
                .clone()
                .unwrap_or_else(|| format!("Producto #{}", line.product_id)),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            subtotal: line.line_subtotal.to_string(),
        }
    }
}

/// Full order data for the detail page.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub id: i32,
    pub customer: String,
    pub email: String,
    pub created: String,
    pub updated: String,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub delivery: &'static str,
    pub payment: &'static str,
    pub address: String,
    pub phone: String,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl From<&Order> for OrderDetail {
    fn from(order: &Order) -> Self {
        let address = [&order.address, &order.city, &order.postal_code]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: order.id.as_i32(),
            customer: customer_name(order),
            email: order
                .customer
                .as_ref()
                .map(|c| c.email.clone())
                .unwrap_or_default(),
            created: format_timestamp(order.created_at),
            updated: format_timestamp(order.updated_at),
            status_label: order.status.label(),
            status_tone: order.status.tone(),
            delivery: order.delivery_method.map_or("-", |m| m.label()),
            payment: order.payment_method.map_or("-", |m| m.label()),
            address,
            phone: order.phone.clone().unwrap_or_default(),
            subtotal: order.subtotal.to_string(),
            shipping: order.shipping_cost.to_string(),
            total: order.total.to_string(),
        }
    }
}

/// Entry of the status picker.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn status_options(current: OrderStatus) -> Vec<StatusOption> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: status == current,
        })
        .collect()
}

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: AdminLayout,
    pub orders: Vec<OrderRow>,
    pub pager: Pager,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: AdminLayout,
    pub order: OrderDetail,
    pub lines: Vec<LineView>,
    pub statuses: Vec<StatusOption>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Orders list page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(messages): Query<MessageQuery>,
) -> Result<OrdersIndexTemplate> {
    let orders = state.api(&admin).list_orders().await?;
    let rows: Vec<OrderRow> = orders.iter().map(OrderRow::from).collect();
    let rows = Page::paginate(rows, page.page(), ADMIN_PAGE_SIZE);

    Ok(OrdersIndexTemplate {
        layout: AdminLayout::new(&admin, "/orders"),
        pager: Pager::new(&rows, "/orders", None),
        orders: rows.items,
        error: messages.error(),
        success: messages.success(),
    })
}

/// Order detail page handler.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Result<OrderShowTemplate> {
    let order = state.api(&admin).get_order(OrderId::new(id)).await?;

    Ok(OrderShowTemplate {
        layout: AdminLayout::new(&admin, "/orders"),
        order: OrderDetail::from(&order),
        lines: order.lines.iter().map(LineView::from).collect(),
        statuses: status_options(order.status),
        error: messages.error(),
        success: messages.success(),
    })
}

/// Move an order to another status.
#[instrument(skip(admin, state, form), fields(estado = %form.estado))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);
    let detail_path = format!("/orders/{order_id}");

    let Ok(status) = OrderStatus::from_str(&form.estado) else {
        tracing::warn!(estado = %form.estado, "Unknown order status submitted");
        return Ok(Notice::StatusFailed.error_at(&detail_path));
    };

    match state.api(&admin).update_order_status(order_id, status).await {
        Ok(()) => {
            state.api_client().invalidate_reports();
            audit(
                "order.status",
                &[
                    ("order_id", order_id.to_string()),
                    ("status", status.to_string()),
                ],
            );
            Ok(Notice::StatusUpdated.success_at(&detail_path))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, order_id = %order_id, "Failed to update order status");
            Ok(Notice::StatusFailed.error_at(&detail_path))
        }
    }
}

/// Delete an order.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);
    match state.api(&admin).delete_order(order_id).await {
        Ok(()) => {
            state.api_client().invalidate_reports();
            audit("order.delete", &[("order_id", order_id.to_string())]);
            Ok(Notice::OrderDeleted.success_at("/orders"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, order_id = %order_id, "Failed to delete order");
            Ok(Notice::OrderDeleteFailed.error_at(&format!("/orders/{order_id}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(json: &str) -> Order {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_customer_name_fallbacks() {
        let shipped = order(r#"{"id_pedido": 1, "nombre_completo": "Ana Pérez"}"#);
        assert_eq!(customer_name(&shipped), "Ana Pérez");

        let account = order(
            r#"{"id_pedido": 2, "nombre_completo": " ",
                "usuario": {"nombre": "Luis", "apellido": "Díaz", "email": "l@d.com"}}"#,
        );
        assert_eq!(customer_name(&account), "Luis Díaz");

        assert_eq!(customer_name(&order(r#"{"id_pedido": 3}"#)), "-");
    }

    #[test]
    fn test_status_picker_lists_every_status() {
        let options = status_options(OrderStatus::Shipped);
        assert_eq!(options.len(), OrderStatus::ALL.len());
        let selected: Vec<_> = options.iter().filter(|o| o.selected).map(|o| o.value).collect();
        assert_eq!(selected, vec!["enviado"]);
    }

    #[test]
    fn test_detail_joins_address_parts() {
        let detail = OrderDetail::from(&order(
            r#"{"id_pedido": 5, "direccion_entrega": "San Martín 123",
                "ciudad_entrega": "Córdoba", "codigo_postal_entrega": "",
                "metodo_entrega": "retiro", "metodo_pago": "efectivo"}"#,
        ));
        assert_eq!(detail.address, "San Martín 123, Córdoba");
        assert_eq!(detail.delivery, "Retiro en tienda");
        assert_eq!(detail.payment, "Efectivo");
    }
}
