//! Product management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use jfa_core::ProductId;
use jfa_core::catalog::{ADMIN_PAGE_SIZE, ALL_CATEGORIES, CATEGORIES, CatalogFilter, Page};
use jfa_core::models::Product;
use jfa_core::validation::ProductForm;
use tracing::instrument;

use crate::components::{PageQuery, Pager};
use crate::error::{Result, audit};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::routes::layout::{AdminLayout, MessageQuery, Notice};
use crate::state::AppState;

/// Descriptions in the table are cut to this many characters.
const TABLE_DESCRIPTION_LENGTH: usize = 60;

/// Product display data for the table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i32,
    pub stock_tone: &'static str,
    pub category: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let stock_tone = if product.stock == 0 {
            "error"
        } else if product.is_low_stock() {
            "warning"
        } else {
            "success"
        };
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.short_description(TABLE_DESCRIPTION_LENGTH),
            price: product.price.to_string(),
            stock: product.stock,
            stock_tone,
            category: product.category.clone(),
        }
    }
}

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: AdminLayout,
    pub products: Vec<ProductRow>,
    pub pager: Pager,
    pub search: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: AdminLayout,
    pub title: &'static str,
    pub action: String,
    pub form: ProductForm,
    pub categories: Vec<&'static str>,
    pub error_field: &'static str,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn new(admin: &CurrentAdmin, product: Option<ProductId>, form: ProductForm) -> Self {
        let (title, action) = match product {
            Some(id) => ("Editar producto", format!("/products/{id}")),
            None => ("Nuevo producto", "/products".to_owned()),
        };
        Self {
            layout: AdminLayout::new(admin, "/products"),
            title,
            action,
            form,
            categories: CATEGORIES
                .into_iter()
                .filter(|c| *c != ALL_CATEGORIES)
                .collect(),
            error_field: "",
            error: None,
        }
    }

    fn with_error(mut self, field: &'static str, message: impl Into<String>) -> Self {
        self.error_field = field;
        self.error = Some(message.into());
        self
    }
}

/// Products list page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(messages): Query<MessageQuery>,
) -> Result<ProductsIndexTemplate> {
    let products = state.api(&admin).list_products().await?;
    let filter = CatalogFilter::new(None, page.search());
    let rows: Vec<ProductRow> = filter
        .apply(&products)
        .into_iter()
        .map(ProductRow::from)
        .collect();
    let rows = Page::paginate(rows, page.page(), ADMIN_PAGE_SIZE);

    Ok(ProductsIndexTemplate {
        layout: AdminLayout::new(&admin, "/products"),
        pager: Pager::new(&rows, "/products", page.search()),
        products: rows.items,
        search: filter.search().to_owned(),
        error: messages.error(),
        success: messages.success(),
    })
}

/// Empty create form.
pub async fn new_page(RequireAdminAuth(admin): RequireAdminAuth) -> ProductFormTemplate {
    ProductFormTemplate::new(&admin, None, ProductForm::default())
}

/// Validate and create a product.
#[instrument(skip(admin, state, form), fields(name = %form.name))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            return Ok(ProductFormTemplate::new(&admin, None, form)
                .with_error(e.field, e.message)
                .into_response());
        }
    };

    if let Err(e) = state.api(&admin).create_product(&draft).await {
        if e.is_unauthorized() {
            return Err(e.into());
        }
        tracing::warn!(error = %e, "Failed to create product");
        let message = e
            .api_message()
            .unwrap_or("Error al guardar el producto")
            .to_owned();
        return Ok(ProductFormTemplate::new(&admin, None, form)
            .with_error("", message)
            .into_response());
    }

    state.api_client().invalidate_reports();
    audit("product.create", &[("name", draft.name)]);
    Ok(Notice::ProductCreated.success_at("/products").into_response())
}

/// Edit form prefilled from the stored product.
#[instrument(skip(admin, state))]
pub async fn edit_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let product = state.api(&admin).get_product(id).await?;
    Ok(ProductFormTemplate::new(
        &admin,
        Some(id),
        ProductForm::from(&product),
    ))
}

/// Validate and update a product.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            return Ok(ProductFormTemplate::new(&admin, Some(id), form)
                .with_error(e.field, e.message)
                .into_response());
        }
    };

    if let Err(e) = state.api(&admin).update_product(id, &draft).await {
        if e.is_unauthorized() {
            return Err(e.into());
        }
        tracing::warn!(error = %e, product_id = %id, "Failed to update product");
        let message = e
            .api_message()
            .unwrap_or("Error al guardar el producto")
            .to_owned();
        return Ok(ProductFormTemplate::new(&admin, Some(id), form)
            .with_error("", message)
            .into_response());
    }

    state.api_client().invalidate_reports();
    audit("product.update", &[("product_id", id.to_string())]);
    Ok(Notice::ProductUpdated.success_at("/products").into_response())
}

/// Delete a product.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let id = ProductId::new(id);
    match state.api(&admin).delete_product(id).await {
        Ok(()) => {
            state.api_client().invalidate_reports();
            audit("product.delete", &[("product_id", id.to_string())]);
            Ok(Notice::ProductDeleted.success_at("/products"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Failed to delete product");
            Ok(Notice::ProductDeleteFailed.error_at("/products"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_tone() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"id_producto": 1, "nombre": "Cable", "precio": "10", "stock": 0},
                {"id_producto": 2, "nombre": "Foco", "precio": "10", "stock": 3},
                {"id_producto": 3, "nombre": "Toma", "precio": "10", "stock": 30}
            ]"#,
        )
        .unwrap();
        let tones: Vec<_> = products.iter().map(|p| ProductRow::from(p).stock_tone).collect();
        assert_eq!(tones, vec!["error", "warning", "success"]);
    }
}
