//! The server-held shopping cart.
//!
//! The cart is an open order (`pedido`) on the API side. This crate never
//! changes it locally; views always render the last fetched copy.

use serde::{Deserialize, Serialize};

use crate::types::{Money, OrderId, ProductId, UserId};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "producto_nombre", default)]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio_unitario", default)]
    pub unit_price: Money,
    #[serde(rename = "subtotal_linea", default)]
    pub line_subtotal: Money,
    #[serde(rename = "imagen_url", default)]
    pub image_url: Option<String>,
}

/// `GET /order/usuario/{uid}/carrito`.
///
/// A user without an open cart is represented by `Cart::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "id_pedido", default)]
    pub order_id: Option<OrderId>,
    #[serde(rename = "id_usuario", default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(rename = "costo_envio", default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub total: Money,
    #[serde(rename = "detalles", default)]
    pub items: Vec<CartItem>,
    #[serde(rename = "nombre_completo", default)]
    pub full_name: Option<String>,
    #[serde(rename = "direccion_entrega", default)]
    pub address: Option<String>,
    #[serde(rename = "ciudad_entrega", default)]
    pub city: Option<String>,
    #[serde(rename = "codigo_postal_entrega", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "telefono_contacto", default)]
    pub phone: Option<String>,
}

impl Cart {
    /// Total units across all lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Sum of line subtotals. Checkout uses this rather than the
    /// server-side `subtotal`, which may lag behind the lines.
    #[must_use]
    pub fn lines_subtotal(&self) -> Money {
        self.items.iter().map(|item| item.line_subtotal).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_from_api() {
        let cart: Cart = serde_json::from_str(
            r#"{
                "id_pedido": 12,
                "id_usuario": 5,
                "subtotal": "3000.00",
                "costo_envio": 0,
                "total": "3000.00",
                "detalles": [
                    {"id_producto": 1, "producto_nombre": "Llave térmica", "cantidad": 2,
                     "precio_unitario": 1000, "subtotal_linea": 2000},
                    {"id_producto": 2, "producto_nombre": "Toma doble", "cantidad": 1,
                     "precio_unitario": "1000.00", "subtotal_linea": "1000.00"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.lines_subtotal(), Money::from_pesos(3000));
        assert_eq!(cart.line(ProductId::new(2)).unwrap().quantity, 1);
        assert!(cart.line(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_empty_object_is_empty_cart() {
        let cart: Cart = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
