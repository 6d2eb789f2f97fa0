//! JFA Backend - typed client for the remote REST API.
//!
//! Every piece of persistent state (accounts, products, carts, orders,
//! payments, reports) lives behind the API at `/api`. This crate is the only
//! place that knows its paths and payload shapes.
//!
//! # Authentication
//!
//! The API authenticates with `Authorization: Bearer <token>`. The client
//! itself holds no credentials; each call is made through an [`Api`] handle
//! built for the current request with [`ApiClient::with_token`]. A handle
//! built without a token sends no `Authorization` header at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use jfa_backend::{ApiClient, ApiConfig};
//!
//! let client = ApiClient::new(&ApiConfig::default())?;
//! let products = client.anonymous().list_products().await?;
//!
//! let login = client.anonymous().login("ana@correo.com", &password).await?;
//! let cart = client.with_token(Some(&login.token)).get_cart(login.user.id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
mod billing;
mod cart;
mod client;
mod error;
mod orders;
mod products;
mod reports;
mod users;

pub use auth::LoginResponse;
pub use cart::OrderPlaced;
pub use client::{Api, ApiClient, ApiConfig, BearerToken, DEFAULT_API_URL};
pub use error::ApiError;
pub use products::StockLevel;

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;
