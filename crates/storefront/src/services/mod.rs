//! Multi-call workflows on top of the API client.
//!
//! - `cart` - add-to-cart and quantity adjustments (cart line + stock)
//! - `checkout` - turning the pending checkout into an order

pub mod cart;
pub mod checkout;
