//! Askama filters used by the storefront templates.

use std::fmt::Display;

/// Year for the footer copyright.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// A unit count in words: `1 unidad`, `3 unidades`.
///
/// Usage in templates: `{{ product.stock|units }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn units(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(units_label(&count.to_string()))
}

fn units_label(count: &str) -> String {
    if count == "1" {
        "1 unidad".to_owned()
    } else {
        format!("{count} unidades")
    }
}
