//! Session-related types.
//!
//! The session holds the login (`user`, `token`, `role`) plus the checkout
//! in progress and the last confirmation shown.

use jfa_backend::BearerToken;
use jfa_core::checkout::{CheckoutTotals, ShippingDetails};
use jfa_core::models::SessionUser;
use jfa_core::{DeliveryMethod, OrderId, PaymentMethod};
use serde::{Deserialize, Serialize};

/// The logged-in user, assembled from the session keys.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
    pub token: BearerToken,
}

/// Checkout data carried from `/checkout` to `/checkout/payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheckout {
    pub delivery: DeliveryMethod,
    pub payment: PaymentMethod,
    pub details: ShippingDetails,
    pub totals: CheckoutTotals,
}

/// One line of the purchase summary on the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationLine {
    pub name: String,
    pub quantity: u32,
    pub subtotal: String,
}

/// What the confirmation page shows after a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub order_id: Option<OrderId>,
    pub email: String,
    pub delivery: DeliveryMethod,
    pub payment: PaymentMethod,
    pub lines: Vec<ConfirmationLine>,
    pub totals: CheckoutTotals,
}

/// Session keys.
pub mod keys {
    /// The logged-in [`SessionUser`](jfa_core::models::SessionUser).
    pub const USER: &str = "user";

    /// The bearer token returned by the API at login.
    pub const TOKEN: &str = "token";

    /// The user's role (`admin` / `user`).
    pub const ROLE: &str = "role";

    /// The [`PendingCheckout`](super::PendingCheckout).
    pub const CHECKOUT: &str = "checkout";

    /// The last [`Confirmation`](super::Confirmation).
    pub const CONFIRMATION: &str = "confirmation";
}
