//! Products and stock.

use jfa_core::ProductId;
use jfa_core::models::{Product, ProductDraft};
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use crate::client::Api;
use crate::error::ApiError;

/// Stock reported back by the reduce/increase endpoints.
///
/// The API answers with the updated product; only `stock` is relied on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StockLevel {
    #[serde(default)]
    pub stock: Option<i32>,
}

impl Api<'_> {
    /// `GET /products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Self::send_json(self.request(Method::GET, "/products")).await
    }

    /// One product, looked up in the full list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no product has that id.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.list_products()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Producto {id} no encontrado")))
    }

    /// `POST /products/create` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::POST, "/products/create").json(draft)).await
    }

    /// `PATCH /products/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, draft))]
    pub async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<(), ApiError> {
        Self::send_unit(
            self.request(Method::PATCH, &format!("/products/{id}"))
                .json(draft),
        )
        .await
    }

    /// `DELETE /products/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::DELETE, &format!("/products/{id}"))).await
    }

    /// `PATCH /products/{id}/reduce-stock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (e.g. not enough stock).
    #[instrument(skip(self))]
    pub async fn reduce_stock(&self, id: ProductId, quantity: u32) -> Result<StockLevel, ApiError> {
        self.change_stock(id, "reduce-stock", quantity).await
    }

    /// `PATCH /products/{id}/increase-stock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn increase_stock(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> Result<StockLevel, ApiError> {
        self.change_stock(id, "increase-stock", quantity).await
    }

    async fn change_stock(
        &self,
        id: ProductId,
        action: &str,
        quantity: u32,
    ) -> Result<StockLevel, ApiError> {
        let body = serde_json::json!({ "cantidad": quantity });
        let level = Self::send_optional_json(
            self.request(Method::PATCH, &format!("/products/{id}/{action}"))
                .json(&body),
        )
        .await?;
        Ok(level.unwrap_or_default())
    }
}
