//! Reporting aggregations. Responses are cached briefly so that viewing a
//! report and then exporting it hits the API once.

use jfa_core::reports::{
    CRITICAL_STOCK_LEVEL, CategoryRevenue, CriticalStock, GeneralMetrics, MonthlyRevenue,
    ReportBundle, TOP_LIMIT, TopCustomer, TopProduct,
};
use tracing::instrument;

use crate::client::Api;
use crate::error::ApiError;

impl Api<'_> {
    /// `GET /reports/ingresos-totales`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, ApiError> {
        self.cached_report("/reports/ingresos-totales", &[]).await
    }

    /// `GET /reports/productos-mas-vendidos?limite=N`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn top_products(&self, limit: u32) -> Result<Vec<TopProduct>, ApiError> {
        self.cached_report(
            "/reports/productos-mas-vendidos",
            &[("limite", limit.to_string())],
        )
        .await
    }

    /// `GET /reports/clientes-top?limite=N`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn top_customers(&self, limit: u32) -> Result<Vec<TopCustomer>, ApiError> {
        self.cached_report("/reports/clientes-top", &[("limite", limit.to_string())])
            .await
    }

    /// `GET /reports/stock-critico?nivel_minimo=N`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn critical_stock(&self, minimum: u32) -> Result<Vec<CriticalStock>, ApiError> {
        self.cached_report(
            "/reports/stock-critico",
            &[("nivel_minimo", minimum.to_string())],
        )
        .await
    }

    /// `GET /reports/ventas-categoria`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn category_revenue(&self) -> Result<Vec<CategoryRevenue>, ApiError> {
        self.cached_report("/reports/ventas-categoria", &[]).await
    }

    /// `GET /reports/metricas-generales`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn general_metrics(&self) -> Result<GeneralMetrics, ApiError> {
        self.cached_report("/reports/metricas-generales", &[]).await
    }

    /// All six aggregations, fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error; partial results are discarded.
    #[instrument(skip(self))]
    pub async fn report_bundle(&self) -> Result<ReportBundle, ApiError> {
        let (monthly_revenue, top_products, top_customers, critical_stock, category_revenue, metrics) =
            tokio::try_join!(
                self.monthly_revenue(),
                self.top_products(TOP_LIMIT),
                self.top_customers(TOP_LIMIT),
                self.critical_stock(CRITICAL_STOCK_LEVEL),
                self.category_revenue(),
                self.general_metrics(),
            )?;

        Ok(ReportBundle {
            monthly_revenue,
            top_products,
            top_customers,
            critical_stock,
            category_revenue,
            metrics,
        })
    }
}
