//! Orders (`pedidos`) and the order-creation request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    DeliveryMethod, Money, OrderId, OrderLineId, OrderStatus, PaymentMethod, ProductId, UserId,
};

/// A line of a placed order (`pedido_detalle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "id_pedido_detalle", default)]
    pub id: Option<OrderLineId>,
    #[serde(rename = "id_pedido", default)]
    pub order_id: Option<OrderId>,
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "producto_nombre", default)]
    pub product_name: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio_unitario", default)]
    pub unit_price: Money,
    #[serde(rename = "subtotal_linea", default)]
    pub line_subtotal: Money,
}

/// Customer summary embedded in admin order listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// An order as returned by `GET /order` and `GET /order/usuario/{uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "id_pedido")]
    pub id: OrderId,
    #[serde(rename = "id_usuario", default)]
    pub user_id: Option<UserId>,
    #[serde(
        rename = "fecha_creacion",
        default,
        deserialize_with = "super::lenient::datetime"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "fecha_actualizacion",
        default,
        deserialize_with = "super::lenient::datetime"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(rename = "costo_envio", default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub total: Money,
    #[serde(rename = "estado", default)]
    pub status: OrderStatus,
    #[serde(rename = "metodo_entrega", default)]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(rename = "metodo_pago", default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "direccion_entrega", default)]
    pub address: Option<String>,
    #[serde(rename = "ciudad_entrega", default)]
    pub city: Option<String>,
    #[serde(rename = "codigo_postal_entrega", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "telefono_contacto", default)]
    pub phone: Option<String>,
    #[serde(rename = "nombre_completo", default)]
    pub full_name: Option<String>,
    #[serde(rename = "detalles", default)]
    pub lines: Vec<OrderLine>,
    #[serde(rename = "usuario", default)]
    pub customer: Option<OrderCustomer>,
}

/// Product and quantity in a [`CreateOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

/// Body for `POST /order/usuario/{uid}/carrito/confirmar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    #[serde(rename = "id_usuario")]
    pub user_id: UserId,
    #[serde(rename = "metodo_entrega")]
    pub delivery_method: DeliveryMethod,
    #[serde(rename = "metodo_pago")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "direccion_entrega")]
    pub address: String,
    #[serde(rename = "ciudad_entrega")]
    pub city: String,
    #[serde(rename = "codigo_postal_entrega")]
    pub postal_code: String,
    #[serde(rename = "telefono_contacto")]
    pub phone: String,
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    pub subtotal: Money,
    #[serde(rename = "costo_envio")]
    pub shipping_cost: Money,
    pub total: Money,
    #[serde(rename = "productos")]
    pub products: Vec<OrderLineRequest>,
}
