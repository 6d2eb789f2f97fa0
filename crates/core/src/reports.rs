//! Report datasets and their export.
//!
//! The API computes six aggregations. Five of them are exported, each as a
//! section with a fixed title and header row; the general metrics are only
//! shown on screen.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};

use crate::models::lenient;
use crate::types::Money;

/// Limit sent to the top-products and top-customers endpoints.
pub const TOP_LIMIT: u32 = 5;

/// `nivel_minimo` sent to the critical-stock endpoint.
pub const CRITICAL_STOCK_LEVEL: u32 = 5;

/// `GET /reports/ingresos-totales`, one row per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    #[serde(rename = "mes", deserialize_with = "lenient::text", default)]
    pub month: String,
    #[serde(rename = "total_facturas", deserialize_with = "lenient::count", default)]
    pub invoice_count: u64,
    #[serde(rename = "ingresos_totales", default)]
    pub revenue: Money,
}

/// `GET /reports/productos-mas-vendidos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "total_vendido", deserialize_with = "lenient::count", default)]
    pub units_sold: u64,
}

/// `GET /reports/clientes-top`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCustomer {
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "total_gastado", default)]
    pub total_spent: Money,
}

impl TopCustomer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// `GET /reports/stock-critico`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalStock {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(deserialize_with = "lenient::count", default)]
    pub stock: u64,
    #[serde(rename = "precio", default)]
    pub price: Money,
}

/// `GET /reports/ventas-categoria`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "total_ventas", deserialize_with = "lenient::count", default)]
    pub sales: u64,
    #[serde(rename = "total_unidades", deserialize_with = "lenient::count", default)]
    pub units: u64,
    #[serde(rename = "ingresos_totales", default)]
    pub revenue: Money,
}

/// `GET /reports/metricas-generales`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralMetrics {
    #[serde(rename = "ingresos_totales", default)]
    pub total_revenue: Money,
    #[serde(rename = "promedio_venta", default)]
    pub average_sale: Money,
    #[serde(rename = "total_clientes", deserialize_with = "lenient::count", default)]
    pub customers: u64,
    #[serde(rename = "total_pedidos", deserialize_with = "lenient::count", default)]
    pub orders: u64,
    #[serde(rename = "facturas_pagadas", deserialize_with = "lenient::count", default)]
    pub paid_invoices: u64,
    #[serde(
        rename = "productos_stock_critico",
        deserialize_with = "lenient::count",
        default
    )]
    pub critical_stock_products: u64,
}

/// Everything the reports page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub top_products: Vec<TopProduct>,
    pub top_customers: Vec<TopCustomer>,
    pub critical_stock: Vec<CriticalStock>,
    pub category_revenue: Vec<CategoryRevenue>,
    pub metrics: GeneralMetrics,
}

/// A single table cell. Counts and amounts stay numeric so the spreadsheet
/// can sum them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Text(String),
    Count(u64),
    Amount(Money),
}

impl fmt::Display for ReportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Count(n) => write!(f, "{n}"),
            Self::Amount(money) => f.write_str(&money.plain()),
        }
    }
}

/// One exported table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// Worksheet name in the spreadsheet export.
    pub sheet: &'static str,
    /// Heading in the printable document.
    pub title: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportBundle {
    /// The five exported sections, in export order.
    #[must_use]
    pub fn sections(&self) -> Vec<ReportSection> {
        use ReportCell::{Amount, Count, Text};

        vec![
            ReportSection {
                sheet: "Ventas",
                title: "Ingresos mensuales",
                headers: &["Mes", "Total Facturas", "Ingresos Totales"],
                rows: self
                    .monthly_revenue
                    .iter()
                    .map(|r| vec![Text(r.month.clone()), Count(r.invoice_count), Amount(r.revenue)])
                    .collect(),
            },
            ReportSection {
                sheet: "Productos",
                title: "Productos más vendidos",
                headers: &["Producto", "Categoria", "Total Vendido"],
                rows: self
                    .top_products
                    .iter()
                    .map(|r| vec![Text(r.name.clone()), Text(r.category.clone()), Count(r.units_sold)])
                    .collect(),
            },
            ReportSection {
                sheet: "Clientes",
                title: "Clientes top",
                headers: &["Cliente", "Email", "Total Gastado"],
                rows: self
                    .top_customers
                    .iter()
                    .map(|r| vec![Text(r.full_name()), Text(r.email.clone()), Amount(r.total_spent)])
                    .collect(),
            },
            ReportSection {
                sheet: "Stock Critico",
                title: "Stock crítico",
                headers: &["Producto", "Stock", "Precio"],
                rows: self
                    .critical_stock
                    .iter()
                    .map(|r| vec![Text(r.name.clone()), Count(r.stock), Amount(r.price)])
                    .collect(),
            },
            ReportSection {
                sheet: "Ventas Categoria",
                title: "Ventas por categoría",
                headers: &["Categoria", "Total Ventas", "Total Unidades", "Ingresos Totales"],
                rows: self
                    .category_revenue
                    .iter()
                    .map(|r| {
                        vec![
                            Text(r.category.clone()),
                            Count(r.sales),
                            Count(r.units),
                            Amount(r.revenue),
                        ]
                    })
                    .collect(),
            },
        ]
    }

    /// Spreadsheet export: an `.xlsx` workbook with one worksheet per
    /// section, named after [`ReportSection::sheet`]. Each worksheet holds
    /// the header row followed by the data rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the workbook cannot be assembled.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let amount = Format::new().set_num_format("#,##0.00");

        for section in self.sections() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(section.sheet)?;
            for (col, title) in (0u16..).zip(section.headers) {
                worksheet.write_string_with_format(0, col, *title, &header)?;
            }
            for (row, cells) in (1u32..).zip(&section.rows) {
                for (col, cell) in (0u16..).zip(cells) {
                    match cell {
                        ReportCell::Text(text) => {
                            worksheet.write_string(row, col, text)?;
                        }
                        ReportCell::Count(n) => {
                            #[allow(clippy::cast_precision_loss)]
                            let value = *n as f64;
                            worksheet.write_number(row, col, value)?;
                        }
                        ReportCell::Amount(money) => {
                            let value = money.amount().to_f64().unwrap_or_default();
                            worksheet.write_number_with_format(row, col, value, &amount)?;
                        }
                    }
                }
            }
            worksheet.autofit();
        }

        workbook.save_to_buffer()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};

    use super::*;

    fn bundle() -> ReportBundle {
        ReportBundle {
            monthly_revenue: serde_json::from_str(
                r#"[{"mes": "2025-01", "total_facturas": "3", "ingresos_totales": "15000.5"},
                    {"mes": "2025-02", "total_facturas": 4, "ingresos_totales": 22000}]"#,
            )
            .unwrap(),
            top_products: serde_json::from_str(
                r#"[{"nombre": "Cable 2.5mm", "categoria": "Cables", "total_vendido": "40"}]"#,
            )
            .unwrap(),
            top_customers: serde_json::from_str(
                r#"[{"nombre": "Ana", "apellido": "Paz", "email": "ana@correo.com", "total_gastado": "9800.00"},
                    {"nombre": "Luis", "apellido": "Díaz", "email": "luis@correo.com", "total_gastado": 5400},
                    {"nombre": "Eva", "apellido": "Sosa", "email": "eva@correo.com", "total_gastado": 100}]"#,
            )
            .unwrap(),
            critical_stock: Vec::new(),
            category_revenue: serde_json::from_str(
                r#"[{"categoria": "Iluminación", "total_ventas": 7, "total_unidades": 19, "ingresos_totales": "31000"}]"#,
            )
            .unwrap(),
            metrics: serde_json::from_str(
                r#"{"ingresos_totales": "37000.5", "promedio_venta": "5285.78", "total_clientes": "12",
                    "total_pedidos": 9, "facturas_pagadas": 7, "productos_stock_critico": 2}"#,
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_sections_follow_export_order_and_row_counts() {
        let data = bundle();
        let sections = data.sections();
        let sheets: Vec<_> = sections.iter().map(|s| s.sheet).collect();
        assert_eq!(
            sheets,
            vec!["Ventas", "Productos", "Clientes", "Stock Critico", "Ventas Categoria"]
        );
        let counts: Vec<_> = sections.iter().map(|s| s.rows.len()).collect();
        assert_eq!(counts, vec![2, 1, 3, 0, 1]);
    }

    #[test]
    fn test_amounts_use_comma_decimals() {
        let sections = bundle().sections();
        let first: Vec<_> = sections[0].rows[0].iter().map(ToString::to_string).collect();
        assert_eq!(first, vec!["2025-01", "3", "15000,50"]);
        assert_eq!(sections[2].rows[1][0].to_string(), "Luis Díaz");
        assert_eq!(sections[2].rows[1][2].to_string(), "5400,00");
    }

    #[test]
    fn test_xlsx_has_one_worksheet_per_section() {
        let bytes = bundle().to_xlsx().unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();

        assert_eq!(
            workbook.sheet_names(),
            vec!["Ventas", "Productos", "Clientes", "Stock Critico", "Ventas Categoria"]
        );
        let data_rows: Vec<_> = workbook
            .sheet_names()
            .iter()
            .map(|name| workbook.worksheet_range(name).unwrap().height() - 1)
            .collect();
        assert_eq!(data_rows, vec![2, 1, 3, 0, 1]);
    }

    #[test]
    fn test_xlsx_keeps_numbers_numeric() {
        let bytes = bundle().to_xlsx().unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let ventas = workbook.worksheet_range("Ventas").unwrap();

        assert_eq!(ventas.get((0, 2)), Some(&Data::String("Ingresos Totales".to_owned())));
        assert_eq!(ventas.get((1, 0)), Some(&Data::String("2025-01".to_owned())));
        assert_eq!(ventas.get((1, 1)), Some(&Data::Float(3.0)));
        assert_eq!(ventas.get((1, 2)), Some(&Data::Float(15000.5)));

        let clientes = workbook.worksheet_range("Clientes").unwrap();
        assert_eq!(clientes.get((2, 0)), Some(&Data::String("Luis Díaz".to_owned())));
    }

    #[test]
    fn test_empty_section_keeps_header_row() {
        let bytes = ReportBundle::default().to_xlsx().unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let stock = workbook.worksheet_range("Stock Critico").unwrap();

        assert_eq!(stock.height(), 1);
        assert_eq!(stock.get((0, 1)), Some(&Data::String("Stock".to_owned())));
    }

    #[test]
    fn test_general_metrics_lenient_counts() {
        let metrics = bundle().metrics;
        assert_eq!(metrics.customers, 12);
        assert_eq!(metrics.critical_stock_products, 2);
    }
}
