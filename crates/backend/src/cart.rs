//! The server-held cart.
//!
//! Every cart call is scoped to a user and requires a token; without one
//! the call fails locally with [`ApiError::MissingCredentials`] and nothing
//! is sent.

use jfa_core::models::{Cart, CreateOrder};
use jfa_core::{OrderId, ProductId, UserId};
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use crate::client::Api;
use crate::error::ApiError;

/// What `POST .../carrito/confirmar` told us about the new order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderPlaced {
    pub order_id: Option<OrderId>,
}

#[derive(Deserialize)]
struct RawPlaced {
    #[serde(default)]
    id_pedido: Option<OrderId>,
    #[serde(default)]
    pedido: Option<Box<RawPlaced>>,
}

impl RawPlaced {
    fn order_id(&self) -> Option<OrderId> {
        self.id_pedido
            .or_else(|| self.pedido.as_ref().and_then(|inner| inner.order_id()))
    }
}

fn cart_path(user: UserId) -> String {
    format!("/order/usuario/{user}/carrito")
}

impl Api<'_> {
    fn require_token(&self) -> Result<(), ApiError> {
        if self.token().is_none() {
            return Err(ApiError::MissingCredentials);
        }
        Ok(())
    }

    /// `GET /order/usuario/{uid}/carrito`. No open cart yields an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user: UserId) -> Result<Cart, ApiError> {
        self.require_token()?;
        match Self::send_optional_json::<Cart>(self.request(Method::GET, &cart_path(user))).await {
            Ok(cart) => Ok(cart.unwrap_or_default()),
            Err(ApiError::NotFound(_)) => Ok(Cart::default()),
            Err(e) => Err(e),
        }
    }

    /// `POST /order/usuario/{uid}/carrito`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `quantity` is zero.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.require_token()?;
        if quantity < 1 {
            return Err(ApiError::InvalidQuantity);
        }
        let body = serde_json::json!({ "id_producto": product, "cantidad": quantity });
        Self::send_unit(self.request(Method::POST, &cart_path(user)).json(&body)).await
    }

    /// `PATCH /order/usuario/{uid}/carrito/producto/{pid}`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` without calling the API when `quantity` is
    /// zero; otherwise any request error.
    #[instrument(skip(self))]
    pub async fn set_cart_quantity(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.require_token()?;
        if quantity < 1 {
            return Err(ApiError::InvalidQuantity);
        }
        let body = serde_json::json!({ "cantidad": quantity });
        let path = format!("{}/producto/{product}", cart_path(user));
        Self::send_unit(self.request(Method::PATCH, &path).json(&body)).await
    }

    /// `DELETE /order/usuario/{uid}/carrito/producto/{pid}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, user: UserId, product: ProductId) -> Result<(), ApiError> {
        self.require_token()?;
        let path = format!("{}/producto/{product}", cart_path(user));
        Self::send_unit(self.request(Method::DELETE, &path)).await
    }

    /// `DELETE /order/usuario/{uid}/carrito`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user: UserId) -> Result<(), ApiError> {
        self.require_token()?;
        Self::send_unit(self.request(Method::DELETE, &cart_path(user))).await
    }

    /// `POST /order/usuario/{uid}/carrito/confirmar`: turn the cart into an
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, order), fields(lines = order.products.len()))]
    pub async fn confirm_cart(
        &self,
        user: UserId,
        order: &CreateOrder,
    ) -> Result<OrderPlaced, ApiError> {
        self.require_token()?;
        let path = format!("{}/confirmar", cart_path(user));
        let raw: Option<RawPlaced> =
            Self::send_optional_json(self.request(Method::POST, &path).json(order))
                .await
                .or_else(|e| match e {
                    // The order exists; only the echo was unreadable.
                    ApiError::Parse(_) => Ok(None),
                    other => Err(other),
                })?;
        Ok(OrderPlaced {
            order_id: raw.as_ref().and_then(RawPlaced::order_id),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{ApiClient, ApiConfig};

    #[test]
    fn test_placed_order_id_top_level_or_nested() {
        let top: RawPlaced = serde_json::from_str(r#"{"id_pedido": 9}"#).unwrap();
        assert_eq!(top.order_id(), Some(OrderId::new(9)));
        let nested: RawPlaced =
            serde_json::from_str(r#"{"message": "ok", "pedido": {"id_pedido": 11}}"#).unwrap();
        assert_eq!(nested.order_id(), Some(OrderId::new(11)));
        let none: RawPlaced = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert_eq!(none.order_id(), None);
    }

    #[tokio::test]
    async fn test_cart_calls_without_token_fail_locally() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        let api = client.anonymous();
        assert!(matches!(
            api.get_cart(UserId::new(1)).await,
            Err(ApiError::MissingCredentials)
        ));
        assert!(matches!(
            api.clear_cart(UserId::new(1)).await,
            Err(ApiError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_before_sending() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        let token = crate::BearerToken::new("t");
        let api = client.with_token(Some(&token));
        assert!(matches!(
            api.set_cart_quantity(UserId::new(1), ProductId::new(2), 0).await,
            Err(ApiError::InvalidQuantity)
        ));
    }
}
