//! Pager state for paginated admin tables.
//!
//! Tables receive the full list from the API and page it locally with
//! [`Page`]; this turns the page numbers into links that keep the other
//! query parameters.

use jfa_core::catalog::Page;
use serde::Deserialize;

/// `?pagina=` plus an optional `?buscar=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub pagina: Option<usize>,
    pub buscar: Option<String>,
}

impl PageQuery {
    /// Requested page, 1-based; missing means the first.
    #[must_use]
    pub fn page(&self) -> usize {
        self.pagina.unwrap_or(1)
    }

    /// Trimmed search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.buscar.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One pager link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Links and summary for the pager under a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub summary: String,
    pub links: Vec<PageLink>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Pager {
    /// Build the pager for `page` of the table at `base_path`.
    #[must_use]
    pub fn new<T>(page: &Page<T>, base_path: &str, search: Option<&str>) -> Self {
        let href = |number: usize| {
            let mut href = format!("{base_path}?pagina={number}");
            if let Some(term) = search {
                href.push_str("&buscar=");
                href.push_str(&urlencoding::encode(term));
            }
            href
        };

        Self {
            summary: page.summary(),
            links: page
                .page_numbers()
                .into_iter()
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    current: number == page.number,
                })
                .collect(),
            previous: page.has_previous().then(|| href(page.number - 1)),
            next: page.has_next().then(|| href(page.number + 1)),
        }
    }

    /// A single page needs no links.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.links.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_keep_search_term() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 2, 10);
        let pager = Pager::new(&page, "/products", Some("cable 2,5"));

        assert_eq!(pager.links.len(), 3);
        assert!(pager.links[1].current);
        assert_eq!(
            pager.previous.as_deref(),
            Some("/products?pagina=1&buscar=cable%202%2C5")
        );
        assert_eq!(
            pager.next.as_deref(),
            Some("/products?pagina=3&buscar=cable%202%2C5")
        );
        assert_eq!(pager.summary, "Mostrando 11-20 de 25");
    }

    #[test]
    fn test_single_page() {
        let page = Page::paginate(vec![1, 2], 1, 10);
        let pager = Pager::new(&page, "/users", None);
        assert!(pager.is_single());
        assert!(pager.previous.is_none());
        assert!(pager.next.is_none());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = PageQuery {
            pagina: None,
            buscar: Some("   ".to_owned()),
        };
        assert_eq!(query.search(), None);
        assert_eq!(query.page(), 1);
    }
}
