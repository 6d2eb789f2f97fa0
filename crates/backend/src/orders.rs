//! Placed orders.

use jfa_core::models::Order;
use jfa_core::{OrderId, OrderStatus, UserId};
use reqwest::Method;
use tracing::instrument;

use crate::client::Api;
use crate::error::ApiError;

impl Api<'_> {
    /// `GET /order` (admin): every order, with lines and customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        Self::send_json(self.request(Method::GET, "/order")).await
    }

    /// One order, looked up in the admin list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no order has that id.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.list_orders()
            .await?
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Pedido {id} no encontrado")))
    }

    /// `GET /order/usuario/{uid}`: the user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn user_orders(&self, user: UserId) -> Result<Vec<Order>, ApiError> {
        if self.token().is_none() {
            return Err(ApiError::MissingCredentials);
        }
        match Self::send_optional_json(self.request(Method::GET, &format!("/order/usuario/{user}")))
            .await
        {
            Ok(orders) => Ok(orders.unwrap_or_default()),
            Err(ApiError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// `PATCH /order/{id}/estado` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "estado": status });
        Self::send_unit(
            self.request(Method::PATCH, &format!("/order/{id}/estado"))
                .json(&body),
        )
        .await
    }

    /// `DELETE /order/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::DELETE, &format!("/order/{id}"))).await
    }
}
