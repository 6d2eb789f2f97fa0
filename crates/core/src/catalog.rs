//! Catalog filtering and pagination.
//!
//! The API returns the whole product list; category and search filtering
//! happen here so the storefront and the admin table agree on the rules.

use serde::Serialize;

use crate::models::Product;

/// The pseudo-category that matches every product.
pub const ALL_CATEGORIES: &str = "Todos";

/// Categories offered by the catalog filter, in display order.
pub const CATEGORIES: [&str; 8] = [
    ALL_CATEGORIES,
    "Cables",
    "Iluminación",
    "Herramientas",
    "Interruptores",
    "Tomacorrientes",
    "Baterías",
    "Automatización",
];

/// Products per page in the storefront catalog.
pub const CATALOG_PAGE_SIZE: usize = 6;

/// Rows per page in admin tables.
pub const ADMIN_PAGE_SIZE: usize = 10;

/// A category + free-text filter over the product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    category: String,
    search: String,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_owned(),
            search: String::new(),
        }
    }
}

impl CatalogFilter {
    /// Build a filter from raw query values. A missing or blank category
    /// means [`ALL_CATEGORIES`]. The search term is kept as typed, surrounding
    /// spaces included.
    #[must_use]
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(ALL_CATEGORIES)
            .to_owned();
        let search = search.unwrap_or_default().to_owned();
        Self { category, search }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Category matches (or is "Todos") and the name or description
    /// contains the search term, ignoring case.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self.category == ALL_CATEGORIES || product.category == self.category;
        if !category_ok {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }

    /// Filtered products, preserving API order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// One page of a list plus the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown (after clamping).
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first item shown; 0 when empty.
    pub first_index: usize,
    /// 1-based index of the last item shown; 0 when empty.
    pub last_index: usize,
}

impl<T> Page<T> {
    /// Slice `items` into pages of `per_page` and return page `requested`
    /// (1-based). Zero clamps to the first page, past-the-end to the last.
    #[must_use]
    pub fn paginate(items: Vec<T>, requested: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let number = requested.clamp(1, total_pages);

        let start = (number - 1) * per_page;
        let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();
        let (first_index, last_index) = if items.is_empty() {
            (0, 0)
        } else {
            (start + 1, start + items.len())
        };

        Self {
            items,
            number,
            total_pages,
            total_items,
            first_index,
            last_index,
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// "Mostrando 1-6 de 14".
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Mostrando {}-{} de {}",
            self.first_index, self.last_index, self.total_items
        )
    }

    /// Page numbers for the pager links.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    /// Map the items while keeping the pager numbers.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
            total_items: self.total_items,
            first_index: self.first_index,
            last_index: self.last_index,
        }
    }
}

/// Category chip state for the filter bar.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub name: &'static str,
    pub selected: bool,
}

/// The category list with the active one marked.
#[must_use]
pub fn category_options(active: &str) -> Vec<CategoryOption> {
    CATEGORIES
        .iter()
        .map(|name| CategoryOption {
            name,
            selected: *name == active,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Money, ProductId};

    fn product(id: i32, name: &str, description: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Money::from_pesos(100),
            stock: 5,
            category: category.to_owned(),
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Cable 2.5mm", "Rollo de cobre", "Cables"),
            product(2, "Lámpara LED", "Luz fría 12W", "Iluminación"),
            product(3, "Pinza", "Aislada para CABLE", "Herramientas"),
            product(4, "Interruptor", "Simple", "Interruptores"),
        ]
    }

    #[test]
    fn test_all_category_without_search_returns_everything() {
        let products = catalog();
        assert_eq!(CatalogFilter::default().apply(&products).len(), 4);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        let filter = CatalogFilter::new(Some("Iluminación"), None);
        let ids: Vec<_> = filter.apply(&products).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::new(2)]);
    }

    #[test]
    fn test_search_matches_name_or_description_case_insensitive() {
        let products = catalog();
        let filter = CatalogFilter::new(None, Some("cable"));
        let ids: Vec<_> = filter.apply(&products).iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_category_and_search_combined() {
        let products = catalog();
        let filter = CatalogFilter::new(Some("Herramientas"), Some("cable"));
        assert_eq!(filter.apply(&products).len(), 1);
        let filter = CatalogFilter::new(Some("Cables"), Some("pinza"));
        assert!(filter.apply(&products).is_empty());
    }

    #[test]
    fn test_blank_category_means_all() {
        let filter = CatalogFilter::new(Some("  "), Some("led"));
        assert_eq!(filter.category(), ALL_CATEGORIES);
        assert_eq!(filter.search(), "led");
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let products = catalog();
        let ids = |term: &str| -> Vec<i32> {
            CatalogFilter::new(None, Some(term))
                .apply(&products)
                .iter()
                .map(|p| p.id.as_i32())
                .collect()
        };

        assert_eq!(CatalogFilter::new(None, Some(" led ")).search(), " led ");
        assert_eq!(ids(" "), vec![1, 2, 3]);
        assert_eq!(ids(" led"), vec![2]);
        assert!(ids("led ").is_empty());
    }

    #[test]
    fn test_paginate_middle_and_last_page() {
        let items: Vec<u32> = (1..=14).collect();
        let page = Page::paginate(items.clone(), 2, CATALOG_PAGE_SIZE);
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.summary(), "Mostrando 7-12 de 14");
        assert!(page.has_previous());
        assert!(page.has_next());

        let last = Page::paginate(items, 3, CATALOG_PAGE_SIZE);
        assert_eq!(last.items, vec![13, 14]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let items: Vec<u32> = (1..=8).collect();
        assert_eq!(Page::paginate(items.clone(), 0, 6).number, 1);
        assert_eq!(Page::paginate(items, 99, 6).number, 2);
    }

    #[test]
    fn test_paginate_empty() {
        let page = Page::paginate(Vec::<u32>::new(), 1, 6);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.summary(), "Mostrando 0-0 de 0");
    }

    #[test]
    fn test_category_options_marks_active() {
        let options = category_options("Cables");
        assert_eq!(options.len(), CATEGORIES.len());
        assert!(options.iter().filter(|o| o.selected).all(|o| o.name == "Cables"));
    }
}
