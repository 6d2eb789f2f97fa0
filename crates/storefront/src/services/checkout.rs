//! Order placement.

use jfa_backend::{Api, ApiError};
use jfa_core::checkout::CheckoutTotals;
use jfa_core::models::{Cart, CreateOrder, OrderLineRequest};
use jfa_core::UserId;
use thiserror::Error;
use tracing::instrument;

use crate::models::{Confirmation, ConfirmationLine, PendingCheckout};

#[derive(Debug, Error)]
pub enum PlaceOrderError {
    #[error("No hay productos en el carrito")]
    EmptyCart,
    #[error("No se pudo confirmar el pedido")]
    Api(#[from] ApiError),
}

/// The order body for the cart's lines and the checkout choices.
///
/// Totals are computed from `cart`, not taken from `pending`: the cart may
/// have changed since the checkout form was submitted.
#[must_use]
pub fn order_request(user: UserId, cart: &Cart, pending: &PendingCheckout) -> CreateOrder {
    let details = &pending.details;
    let totals = CheckoutTotals::for_cart(cart, pending.delivery);
    CreateOrder {
        user_id: user,
        delivery_method: pending.delivery,
        payment_method: pending.payment,
        address: details.address.clone(),
        city: details.city.clone(),
        postal_code: details.postal_code.clone(),
        phone: details.phone.clone(),
        full_name: details.full_name.clone(),
        subtotal: totals.subtotal,
        shipping_cost: totals.shipping,
        total: totals.total,
        products: cart
            .items
            .iter()
            .map(|item| OrderLineRequest {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect(),
    }
}

/// Confirm the user's cart as an order.
///
/// The cart is re-read first so the order carries what the server holds,
/// not what the payment page showed.
///
/// # Errors
///
/// Returns `EmptyCart` when there is nothing to order, or the failing call.
#[instrument(skip(api, pending, email))]
pub async fn place_order(
    api: Api<'_>,
    user: UserId,
    pending: &PendingCheckout,
    email: String,
) -> Result<Confirmation, PlaceOrderError> {
    let cart = api.get_cart(user).await?;
    if cart.is_empty() {
        return Err(PlaceOrderError::EmptyCart);
    }

    let request = order_request(user, &cart, pending);
    let placed = api.confirm_cart(user, &request).await?;
    tracing::info!(order_id = ?placed.order_id, lines = request.products.len(), "Order placed");

    Ok(Confirmation {
        order_id: placed.order_id,
        email,
        delivery: pending.delivery,
        payment: pending.payment,
        lines: cart
            .items
            .iter()
            .map(|item| ConfirmationLine {
                name: item.product_name.clone(),
                quantity: item.quantity,
                subtotal: item.line_subtotal.to_string(),
            })
            .collect(),
        totals: CheckoutTotals {
            subtotal: request.subtotal,
            shipping: request.shipping_cost,
            total: request.total,
        },
    })
}

#[cfg(test)]
mod tests {
    use jfa_core::checkout::ShippingDetails;
    use jfa_core::models::CartItem;
    use jfa_core::{DeliveryMethod, Money, PaymentMethod, ProductId};

    use super::*;

    #[test]
    fn test_order_request_carries_every_line() {
        let cart = Cart {
            items: vec![
                CartItem {
                    product_id: ProductId::new(3),
                    product_name: "Cable 2.5mm".to_owned(),
                    quantity: 2,
                    unit_price: Money::from_pesos(1500),
                    line_subtotal: Money::from_pesos(3000),
                    image_url: None,
                },
                CartItem {
                    product_id: ProductId::new(8),
                    product_name: "Lámpara LED".to_owned(),
                    quantity: 1,
                    unit_price: Money::from_pesos(900),
                    line_subtotal: Money::from_pesos(900),
                    image_url: None,
                },
            ],
            ..Cart::default()
        };
        let pending = PendingCheckout {
            delivery: DeliveryMethod::StorePickup,
            payment: PaymentMethod::Cash,
            details: ShippingDetails {
                full_name: "Ana Pérez".to_owned(),
                ..ShippingDetails::default()
            },
            totals: CheckoutTotals::compute(Money::from_pesos(3900), DeliveryMethod::StorePickup),
        };

        let request = order_request(UserId::new(4), &cart, &pending);
        assert_eq!(request.products.len(), 2);
        assert_eq!(request.products[0].quantity, 2);
        assert_eq!(request.total, Money::from_pesos(3900));
        assert_eq!(request.shipping_cost, Money::ZERO);
        assert_eq!(request.full_name, "Ana Pérez");
    }

    #[test]
    fn test_totals_follow_current_cart() {
        // Checkout was submitted for 3000; the cart grew before paying
        let cart = Cart {
            items: vec![CartItem {
                product_id: ProductId::new(3),
                product_name: "Cable 2.5mm".to_owned(),
                quantity: 4,
                unit_price: Money::from_pesos(3000),
                line_subtotal: Money::from_pesos(12000),
                image_url: None,
            }],
            ..Cart::default()
        };
        let pending = PendingCheckout {
            delivery: DeliveryMethod::HomeDelivery,
            payment: PaymentMethod::Cash,
            details: ShippingDetails {
                full_name: "Ana Pérez".to_owned(),
                ..ShippingDetails::default()
            },
            totals: CheckoutTotals::compute(Money::from_pesos(3000), DeliveryMethod::HomeDelivery),
        };

        let request = order_request(UserId::new(4), &cart, &pending);
        assert_eq!(request.subtotal, Money::from_pesos(12000));
        assert_eq!(request.shipping_cost, Money::from_pesos(1200));
        assert_eq!(request.total, Money::from_pesos(13200));
        assert_eq!(request.products[0].quantity, 4);
    }
}
