//! Planning of cart quantity adjustments.
//!
//! Changing a cart line is two API calls: one on the cart line and one on
//! the product's stock, always in that order. This module decides which two
//! calls a user action maps to; the storefront executes them.

/// What the user asked for on a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// One more unit.
    Increase,
    /// One unit fewer; removes the line when it would drop below one.
    Decrease,
    /// Drop the whole line.
    Remove,
}

/// The call made against the cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// `PATCH .../carrito/producto/{pid}` with the new quantity (always >= 1).
    SetQuantity(u32),
    /// `DELETE .../carrito/producto/{pid}`.
    Remove,
}

/// The call made against the product stock afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// `PATCH /products/{id}/reduce-stock`.
    Reduce(u32),
    /// `PATCH /products/{id}/increase-stock`.
    Increase(u32),
}

/// The ordered pair of calls for one [`CartAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartAdjustment {
    pub line: LineChange,
    pub stock: StockChange,
}

/// Map an action on a line currently holding `quantity` units to its calls.
///
/// Decreasing a line of one unit removes it and returns that unit to stock;
/// it never asks the API to set a quantity of zero.
#[must_use]
pub const fn plan_adjustment(quantity: u32, action: CartAction) -> CartAdjustment {
    match action {
        CartAction::Increase => CartAdjustment {
            line: LineChange::SetQuantity(quantity.saturating_add(1)),
            stock: StockChange::Reduce(1),
        },
        CartAction::Decrease if quantity > 1 => CartAdjustment {
            line: LineChange::SetQuantity(quantity - 1),
            stock: StockChange::Increase(1),
        },
        CartAction::Decrease | CartAction::Remove => CartAdjustment {
            line: LineChange::Remove,
            stock: StockChange::Increase(quantity),
        },
    }
}
