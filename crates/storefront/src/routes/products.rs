//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use jfa_core::ProductId;
use jfa_core::catalog::{
    ALL_CATEGORIES, CATALOG_PAGE_SIZE, CatalogFilter, CategoryOption, Page, category_options,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::layout::{Layout, MessageQuery, ProductCard};
use crate::state::AppState;

/// Related products shown under a product.
const RELATED_COUNT: usize = 3;

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub categoria: Option<String>,
    pub buscar: Option<String>,
    pub pagina: Option<usize>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl CatalogQuery {
    fn messages(&self) -> MessageQuery {
        MessageQuery {
            error: self.error.clone(),
            success: self.success.clone(),
        }
    }
}

/// One link of the pager.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Category chip with its link.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: &'static str,
    pub href: String,
    pub selected: bool,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub page: Page<ProductCard>,
    pub summary: String,
    pub pages: Vec<PageLink>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub categories: Vec<CategoryLink>,
    pub category: String,
    pub search: String,
    pub return_to: String,
    pub logged_in: bool,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductCard,
    pub description: String,
    pub related: Vec<ProductCard>,
    pub return_to: String,
    pub logged_in: bool,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Catalog URL for a category, search term and page.
fn catalog_href(category: &str, search: &str, page: usize) -> String {
    let mut href = String::from("/products");
    let mut separator = '?';
    if category != ALL_CATEGORIES {
        href.push(separator);
        href.push_str("categoria=");
        href.push_str(&urlencoding::encode(category));
        separator = '&';
    }
    if !search.is_empty() {
        href.push(separator);
        href.push_str("buscar=");
        href.push_str(&urlencoding::encode(search));
        separator = '&';
    }
    if page > 1 {
        href.push(separator);
        href.push_str("pagina=");
        href.push_str(&page.to_string());
    }
    href
}

fn category_links(options: Vec<CategoryOption>, search: &str) -> Vec<CategoryLink> {
    options
        .into_iter()
        .map(|option| CategoryLink {
            name: option.name,
            href: catalog_href(option.name, search, 1),
            selected: option.selected,
        })
        .collect()
}

/// Display the catalog.
///
/// Filtering and paging happen locally over the full product list.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let products = state.api(None).list_products().await?;

    let filter = CatalogFilter::new(query.categoria.as_deref(), query.buscar.as_deref());
    let category = filter.category().to_owned();
    let search = filter.search().to_owned();

    let matching = filter.apply(&products);
    let page = Page::paginate(matching, query.pagina.unwrap_or(1), CATALOG_PAGE_SIZE)
        .map(ProductCard::from);

    let pages = page
        .page_numbers()
        .into_iter()
        .map(|number| PageLink {
            number,
            href: catalog_href(&category, &search, number),
            current: number == page.number,
        })
        .collect();
    let previous_href = page
        .has_previous()
        .then(|| catalog_href(&category, &search, page.number - 1));
    let next_href = page
        .has_next()
        .then(|| catalog_href(&category, &search, page.number + 1));

    let messages = query.messages();
    Ok(ProductsIndexTemplate {
        layout: Layout::load(&state, user.as_ref()).await,
        summary: page.summary(),
        return_to: catalog_href(&category, &search, page.number),
        categories: category_links(category_options(&category), &search),
        page,
        pages,
        previous_href,
        next_href,
        category,
        search,
        logged_in: user.is_some(),
        error: messages.error(),
        success: messages.success(),
    })
}

/// Display a product with others from its category.
#[instrument(skip(state, user, query))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<ProductId>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let products = state.api(None).list_products().await?;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| crate::error::AppError::NotFound(format!("producto {id}")))?;

    let related = products
        .iter()
        .filter(|p| p.id != id && p.category == product.category)
        .take(RELATED_COUNT)
        .map(ProductCard::from)
        .collect();

    Ok(ProductShowTemplate {
        layout: Layout::load(&state, user.as_ref()).await,
        product: ProductCard::from(product),
        description: product.description.clone(),
        related,
        return_to: format!("/products/{id}"),
        logged_in: user.is_some(),
        error: query.error(),
        success: query.success(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_href_keeps_filters() {
        assert_eq!(catalog_href("Todos", "", 1), "/products");
        assert_eq!(
            catalog_href("Iluminación", "led", 2),
            "/products?categoria=Iluminaci%C3%B3n&buscar=led&pagina=2"
        );
        assert_eq!(catalog_href("Todos", "cable 2", 3), "/products?buscar=cable%202&pagina=3");
    }
}
