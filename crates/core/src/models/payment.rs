//! Payments (`bill`) and billing statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Money, OrderId, PaymentId, PaymentStatus};

/// A payment row from `GET /bill`.
///
/// `metodo_pago` is kept as free text: the billing service records values
/// the storefront never offers (e.g. historical imports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "id_pago")]
    pub id: PaymentId,
    #[serde(rename = "id_pedido", default)]
    pub order_id: Option<OrderId>,
    #[serde(rename = "usuario_nombre", default)]
    pub customer_first_name: Option<String>,
    #[serde(rename = "usuario_apellido", default)]
    pub customer_last_name: Option<String>,
    #[serde(default)]
    pub total: Money,
    #[serde(rename = "metodo_pago", default)]
    pub method: Option<String>,
    #[serde(rename = "estado_pago", default)]
    pub status: PaymentStatus,
    #[serde(
        rename = "fecha_pago",
        default,
        deserialize_with = "super::lenient::datetime"
    )]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Customer name, or a dash when the bill has none.
    #[must_use]
    pub fn customer_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.customer_first_name.as_deref().unwrap_or_default(),
            self.customer_last_name.as_deref().unwrap_or_default()
        );
        let name = name.trim();
        if name.is_empty() {
            "-".to_owned()
        } else {
            name.to_owned()
        }
    }
}

/// `GET /bill/admin/estadisticas`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingStatistics {
    #[serde(
        rename = "total_facturas",
        default,
        deserialize_with = "super::lenient::count"
    )]
    pub invoice_count: u64,
    #[serde(rename = "ingresos_totales", default)]
    pub total_revenue: Money,
    #[serde(rename = "promedio_por_factura", default)]
    pub average_per_invoice: Money,
}

impl BillingStatistics {
    /// Aggregate the statistics locally from the payment list.
    ///
    /// Used when the statistics endpoint is unavailable.
    #[must_use]
    pub fn from_payments(payments: &[Payment]) -> Self {
        let total_revenue: Money = payments.iter().map(|p| p.total).sum();
        let invoice_count = payments.len() as u64;
        let average_per_invoice = if invoice_count == 0 {
            Money::ZERO
        } else {
            Money::new(total_revenue.amount() / rust_decimal::Decimal::from(invoice_count))
        };
        Self {
            invoice_count,
            total_revenue,
            average_per_invoice,
        }
    }
}
