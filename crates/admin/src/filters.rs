//! Askama filters used by the admin templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Year for the footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Row count under a report table: `1 registro`, `0 registros`.
///
/// Usage in templates: `{{ section.rows.len()|records }}`
#[askama::filter_fn]
pub fn records(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    Ok(if count == "1" {
        "1 registro".to_owned()
    } else {
        format!("{count} registros")
    })
}
