//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// Stock below this (and above zero) is flagged as low.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: Money,
    #[serde(default)]
    pub stock: i32,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "super::lenient::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Stock is positive but under [`LOW_STOCK_THRESHOLD`].
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
    }

    /// Description cut to `max` characters with an ellipsis, for cards.
    #[must_use]
    pub fn short_description(&self, max: usize) -> String {
        if self.description.chars().count() > max {
            let cut: String = self.description.chars().take(max).collect();
            format!("{cut}...")
        } else {
            self.description.clone()
        }
    }
}

/// Body for `POST /products/create` and `PATCH /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: Money,
    pub stock: i32,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        serde_json::from_str(
            r#"{
                "id_producto": 3,
                "nombre": "Cable unipolar 2.5mm",
                "descripcion": "Rollo de 100 metros, cobre electrolítico, normalizado IRAM",
                "precio": "15999.90",
                "stock": 4,
                "categoria": "Cables",
                "imagen_url": null,
                "created_at": "2025-01-10T09:00:00.000Z"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_api_product() {
        let product = sample();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.category, "Cables");
        assert!(product.image_url.is_none());
        assert!(product.created_at.is_some());
        assert_eq!(product.price.to_string(), "$15.999,90");
    }

    #[test]
    fn test_stock_flags() {
        let mut product = sample();
        assert!(product.in_stock());
        assert!(product.is_low_stock());
        product.stock = 0;
        assert!(!product.in_stock());
        assert!(!product.is_low_stock());
        product.stock = 10;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_short_description() {
        let product = sample();
        let short = product.short_description(50);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 53);
    }

    #[test]
    fn test_draft_omits_missing_image() {
        let draft = ProductDraft::from(&sample());
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("imagen_url").is_none());
        assert_eq!(json["nombre"], "Cable unipolar 2.5mm");
    }
}
