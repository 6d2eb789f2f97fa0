//! Records mirrored from the remote REST API.
//!
//! Field names on the wire are the API's Spanish names; the Rust fields are
//! English and mapped with `#[serde(rename)]`. Everything the API may omit is
//! defaulted so a sparse response still deserializes.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{CreateOrder, Order, OrderCustomer, OrderLine, OrderLineRequest};
pub use payment::{BillingStatistics, Payment};
pub use product::{Product, ProductDraft};
pub use user::{NewUser, ProfileUpdate, SessionUser, User};

/// Deserializers that tolerate the loose typing of the API's JSON.
pub(crate) mod lenient {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date.
    pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Timestamps in any format [`parse_datetime`] knows; anything else,
    /// including `null`, becomes `None`.
    pub fn datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_datetime))
    }

    /// Counts sent either as numbers or as numeric strings (SQL `COUNT`).
    pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Float(f64),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Raw::Number(n)) => Ok(n),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(Raw::Float(f)) => Ok(f.max(0.0) as u64),
            Some(Raw::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    /// Labels that may arrive as strings, numbers or timestamps.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
        })
    }

}
