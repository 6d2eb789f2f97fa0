//! JFA Core - Shared domain library.
//!
//! This crate provides the types and rules used across all JFA Distribuciones
//! components:
//! - `backend` - Typed client for the remote REST API
//! - `storefront` - Public catalog, cart and checkout
//! - `admin` - Back-office panel (products, orders, users, payments, reports)
//! - `cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything here can be unit tested without a running API.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, emails, and status enums
//! - [`models`] - Records mirrored from the remote API
//! - [`catalog`] - Category filtering and pagination
//! - [`cart`] - Planning of cart quantity adjustments
//! - [`checkout`] - Shipping cost, totals and shipping-detail checks
//! - [`validation`] - Registration, profile and product form rules
//! - [`reports`] - Report datasets and spreadsheet export

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod models;
pub mod reports;
pub mod types;
pub mod validation;

pub use types::*;
