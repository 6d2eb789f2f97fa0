//! Payments and billing statistics.

use jfa_core::models::{BillingStatistics, Payment};
use reqwest::Method;
use tracing::instrument;

use crate::client::Api;
use crate::error::ApiError;

impl Api<'_> {
    /// `GET /bill` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        Self::send_json(self.request(Method::GET, "/bill")).await
    }

    /// `GET /bill/admin/estadisticas` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn billing_statistics(&self) -> Result<BillingStatistics, ApiError> {
        Self::send_json(self.request(Method::GET, "/bill/admin/estadisticas")).await
    }

    /// Statistics from the endpoint, or aggregated from `/bill` when the
    /// endpoint fails.
    ///
    /// # Errors
    ///
    /// Returns an error only when both sources fail.
    #[instrument(skip(self))]
    pub async fn billing_statistics_or_aggregate(&self) -> Result<BillingStatistics, ApiError> {
        match self.billing_statistics().await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                tracing::warn!(error = %e, "Billing statistics unavailable, aggregating payments");
                let payments = self.list_payments().await?;
                Ok(BillingStatistics::from_payments(&payments))
            }
        }
    }
}
