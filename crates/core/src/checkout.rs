//! Checkout totals and shipping details.

use serde::{Deserialize, Serialize};

use crate::models::{Cart, SessionUser};
use crate::types::{DeliveryMethod, Money};

/// Home delivery costs this share of the subtotal...
pub const HOME_DELIVERY_PERCENT: u32 = 10;

/// ...but never less than this many pesos.
pub const HOME_DELIVERY_MINIMUM_PESOS: i64 = 500;

/// Shipping cost for `subtotal` under `method`.
#[must_use]
pub fn shipping_cost(subtotal: Money, method: DeliveryMethod) -> Money {
    match method {
        DeliveryMethod::StorePickup => Money::ZERO,
        DeliveryMethod::HomeDelivery => subtotal
            .percent_of(HOME_DELIVERY_PERCENT)
            .max(Money::from_pesos(HOME_DELIVERY_MINIMUM_PESOS))
            .round_cents(),
    }
}

/// Subtotal, shipping and total, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

impl CheckoutTotals {
    #[must_use]
    pub fn compute(subtotal: Money, method: DeliveryMethod) -> Self {
        let subtotal = subtotal.round_cents();
        let shipping = shipping_cost(subtotal, method);
        Self {
            subtotal,
            shipping,
            total: (subtotal + shipping).round_cents(),
        }
    }

    /// Totals for the cart's current lines.
    #[must_use]
    pub fn for_cart(cart: &Cart, method: DeliveryMethod) -> Self {
        Self::compute(cart.lines_subtotal(), method)
    }
}

/// Why the shipping details were rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Ingrese el nombre completo")]
    MissingName,
    #[error("Complete los datos de envío (dirección, ciudad, código postal y teléfono).")]
    IncompleteAddress,
    #[error("No hay productos en el carrito")]
    EmptyCart,
}

/// Contact and address entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

impl ShippingDetails {
    /// Values saved on the cart, falling back to the user's name.
    #[must_use]
    pub fn prefill(cart: &Cart, user: &SessionUser) -> Self {
        let full_name = cart
            .full_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| user.full_name());
        Self {
            full_name,
            address: cart.address.clone().unwrap_or_default(),
            city: cart.city.clone().unwrap_or_default(),
            postal_code: cart.postal_code.clone().unwrap_or_default(),
            phone: cart.phone.clone().unwrap_or_default(),
        }
    }

    /// A name is always required; home delivery also needs the address,
    /// city, postal code and phone.
    ///
    /// # Errors
    ///
    /// Returns the first missing requirement.
    pub fn validate(&self, method: DeliveryMethod) -> Result<(), CheckoutError> {
        if self.full_name.trim().is_empty() {
            return Err(CheckoutError::MissingName);
        }
        if method == DeliveryMethod::HomeDelivery
            && [&self.address, &self.city, &self.postal_code, &self.phone]
                .iter()
                .any(|field| field.trim().is_empty())
        {
            return Err(CheckoutError::IncompleteAddress);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Role, UserId};
    use core::str::FromStr;
    use rust_decimal::Decimal;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_pickup_is_free() {
        let totals = CheckoutTotals::compute(money("12000"), DeliveryMethod::StorePickup);
        assert_eq!(totals.shipping, Money::ZERO);
        assert_eq!(totals.total, money("12000"));
    }

    #[test]
    fn test_home_delivery_ten_percent() {
        let totals = CheckoutTotals::compute(money("12000"), DeliveryMethod::HomeDelivery);
        assert_eq!(totals.shipping, money("1200"));
        assert_eq!(totals.total, money("13200"));
    }

    #[test]
    fn test_home_delivery_minimum() {
        let totals = CheckoutTotals::compute(money("3000"), DeliveryMethod::HomeDelivery);
        assert_eq!(totals.shipping, money("500"));
        assert_eq!(totals.total, money("3500"));
    }

    #[test]
    fn test_totals_round_to_cents() {
        let totals = CheckoutTotals::compute(money("10000.555"), DeliveryMethod::HomeDelivery);
        assert_eq!(totals.subtotal, money("10000.56"));
        assert_eq!(totals.shipping, money("1000.06"));
        assert_eq!(totals.total, money("11000.62"));
    }

    fn details() -> ShippingDetails {
        ShippingDetails {
            full_name: "Ana Pérez".to_owned(),
            address: "San Martín 123".to_owned(),
            city: "Córdoba".to_owned(),
            postal_code: "5000".to_owned(),
            phone: "3515550000".to_owned(),
        }
    }

    #[test]
    fn test_name_always_required() {
        let mut d = details();
        d.full_name = " ".to_owned();
        assert_eq!(
            d.validate(DeliveryMethod::StorePickup),
            Err(CheckoutError::MissingName)
        );
    }

    #[test]
    fn test_address_only_required_for_home_delivery() {
        let d = ShippingDetails {
            full_name: "Ana".to_owned(),
            ..ShippingDetails::default()
        };
        assert!(d.validate(DeliveryMethod::StorePickup).is_ok());
        assert_eq!(
            d.validate(DeliveryMethod::HomeDelivery),
            Err(CheckoutError::IncompleteAddress)
        );
        assert!(details().validate(DeliveryMethod::HomeDelivery).is_ok());
    }

    #[test]
    fn test_prefill_falls_back_to_user_name() {
        let user = SessionUser {
            id: UserId::new(1),
            first_name: "Ana".to_owned(),
            last_name: "Pérez".to_owned(),
            email: String::new(),
            username: String::new(),
            role: Role::User,
            phone: None,
            address: None,
            city: None,
            postal_code: None,
        };
        let cart = Cart {
            city: Some("Córdoba".to_owned()),
            ..Cart::default()
        };
        let d = ShippingDetails::prefill(&cart, &user);
        assert_eq!(d.full_name, "Ana Pérez");
        assert_eq!(d.city, "Córdoba");
        assert!(d.address.is_empty());
    }
}
