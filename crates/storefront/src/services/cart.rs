//! Cart workflows.
//!
//! Each user action is a cart-line call followed by a stock call. The
//! sequence stops at the first rejected call; nothing already applied is
//! undone.

use jfa_backend::{Api, ApiError};
use jfa_core::cart::{CartAction, LineChange, StockChange, plan_adjustment};
use jfa_core::models::{Cart, Product};
use jfa_core::{ProductId, UserId};
use thiserror::Error;
use tracing::instrument;

/// Why an add-to-cart was refused or failed.
#[derive(Debug, Error)]
pub enum AddToCartError {
    #[error("No hay stock disponible")]
    OutOfStock,
    #[error("No se pudo agregar el producto")]
    Api(#[from] ApiError),
}

/// Why a quantity change did not happen.
#[derive(Debug, Error)]
pub enum AdjustError {
    #[error("El producto no está en el carrito")]
    NotInCart,
    #[error("No se pudo actualizar el carrito")]
    Api(#[from] ApiError),
}

/// Put one unit of `product` in the cart and take it out of stock.
///
/// # Errors
///
/// Returns `OutOfStock` without calling the API when the product has no
/// stock; otherwise the first failing call.
#[instrument(skip(api, product), fields(product_id = %product.id))]
pub async fn add_product(api: Api<'_>, user: UserId, product: &Product) -> Result<(), AddToCartError> {
    if !product.in_stock() {
        return Err(AddToCartError::OutOfStock);
    }

    api.add_to_cart(user, product.id, 1).await?;
    api.reduce_stock(product.id, 1).await?;
    Ok(())
}

/// Apply `action` to the cart line holding `product`.
///
/// The current quantity is read from `cart`, which must be the cart as last
/// fetched. Decreasing a single unit removes the line.
///
/// # Errors
///
/// Returns `NotInCart` when the cart has no such line, or the first failing
/// API call.
#[instrument(skip(api, cart))]
pub async fn adjust_line(
    api: Api<'_>,
    user: UserId,
    cart: &Cart,
    product: ProductId,
    action: CartAction,
) -> Result<(), AdjustError> {
    let line = cart.line(product).ok_or(AdjustError::NotInCart)?;
    let plan = plan_adjustment(line.quantity, action);

    match plan.line {
        LineChange::SetQuantity(quantity) => {
            api.set_cart_quantity(user, product, quantity).await?;
        }
        LineChange::Remove => api.remove_from_cart(user, product).await?,
    }

    match plan.stock {
        StockChange::Reduce(quantity) => api.reduce_stock(product, quantity).await?,
        StockChange::Increase(quantity) => api.increase_stock(product, quantity).await?,
    };

    Ok(())
}
