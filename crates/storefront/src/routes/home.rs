//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use jfa_core::catalog::CATEGORIES;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::layout::{Layout, ProductCard};
use crate::state::AppState;

/// Featured products shown under the hero.
const FEATURED_COUNT: usize = 3;

/// Category tile with the number of products currently listed.
#[derive(Debug, Clone)]
pub struct CategoryTile {
    pub name: &'static str,
    pub href: String,
    pub count: usize,
}

/// Selling point shown in the features strip.
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

const FEATURES: [Feature; 4] = [
    Feature {
        title: "Envío Rápido",
        description: "Entregamos en 24-48 horas en toda la provincia.",
    },
    Feature {
        title: "Calidad Garantizada",
        description: "Todos nuestros productos tienen garantía oficial del fabricante y certificación IRAM.",
    },
    Feature {
        title: "Múltiples Pagos",
        description: "Efectivo, transferencia, tarjetas y Mercado Pago.",
    },
    Feature {
        title: "Asesoramiento",
        description: "Nuestros técnicos te ayudan a elegir el producto ideal para tu proyecto.",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub features: &'static [Feature],
    pub categories: Vec<CategoryTile>,
    pub featured: Vec<ProductCard>,
}

/// Display the home page.
///
/// The catalog fetch only feeds the counts and featured products, so a
/// failing API still renders the page.
#[instrument(skip(state, user))]
pub async fn home(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    let products = match state.api(None).list_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products for home page");
            Vec::new()
        }
    };

    let categories = CATEGORIES
        .iter()
        .skip(1)
        .map(|&name| CategoryTile {
            name,
            href: format!("/products?categoria={}", urlencoding::encode(name)),
            count: products.iter().filter(|p| p.category == name).count(),
        })
        .collect();

    let featured = products
        .iter()
        .filter(|p| p.in_stock())
        .take(FEATURED_COUNT)
        .map(ProductCard::from)
        .collect();

    HomeTemplate {
        layout: Layout::load(&state, user.as_ref()).await,
        features: &FEATURES,
        categories,
        featured,
    }
}
