//! Checkout route handlers.
//!
//! Three steps: shipping and method choice (`/checkout`), payment
//! (`/checkout/payment`) and confirmation. The choice made in the first step
//! is kept in the session as a [`PendingCheckout`] until the order is placed
//! or the checkout is cancelled.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use jfa_core::checkout::{CheckoutTotals, ShippingDetails};
use jfa_core::models::Cart;
use jfa_core::{DeliveryMethod, Email, PaymentMethod};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Confirmation, PendingCheckout, keys};
use crate::routes::cart::CartView;
use crate::routes::layout::{Layout, MessageQuery, Notice};
use crate::services::checkout::{PlaceOrderError, place_order};
use crate::state::AppState;

/// Delivery option radio with its cost for the current cart.
#[derive(Debug, Clone)]
pub struct DeliveryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub cost: String,
    pub selected: bool,
}

/// Payment option radio.
#[derive(Debug, Clone)]
pub struct PaymentOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Subtotal, shipping and total formatted for display.
#[derive(Debug, Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl From<&CheckoutTotals> for TotalsView {
    fn from(totals: &CheckoutTotals) -> Self {
        Self {
            subtotal: totals.subtotal.to_string(),
            shipping: totals.shipping.to_string(),
            total: totals.total.to_string(),
        }
    }
}

/// Shipping form as posted.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub nombre_completo: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub ciudad: String,
    #[serde(default)]
    pub codigo_postal: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub metodo_entrega: DeliveryMethod,
    #[serde(default)]
    pub metodo_pago: PaymentMethod,
}

impl CheckoutForm {
    fn details(&self) -> ShippingDetails {
        ShippingDetails {
            full_name: self.nombre_completo.trim().to_owned(),
            address: self.direccion.trim().to_owned(),
            city: self.ciudad.trim().to_owned(),
            postal_code: self.codigo_postal.trim().to_owned(),
            phone: self.telefono.trim().to_owned(),
        }
    }
}

/// Query for previewing another delivery method.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    pub metodo_entrega: Option<DeliveryMethod>,
}

/// Payment form as posted.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentForm {
    /// Mercado Pago account email.
    pub email: Option<String>,
    /// Transfer account holder.
    pub titular: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub details: ShippingDetails,
    pub deliveries: Vec<DeliveryOption>,
    pub payments: Vec<PaymentOption>,
    pub totals: TotalsView,
    pub error: Option<String>,
}

/// Empty-cart page shown instead of the checkout form.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/empty.html")]
pub struct EmptyCheckoutTemplate {
    pub layout: Layout,
}

/// Demo card data shown for card payments. Nothing is charged.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub number: String,
    pub ccv: String,
    pub expiry: String,
}

impl CardDetails {
    fn generate() -> Self {
        Self {
            number: random_digits(16),
            ccv: random_digits(3),
            expiry: format!("{}/{}", random_digits(2), random_digits(2)),
        }
    }
}

/// Account the customer transfers to, with a fresh reference.
#[derive(Debug, Clone)]
pub struct TransferDetails {
    pub holder: &'static str,
    pub account: String,
    pub reference: String,
}

/// Holder shown on the transfer details.
const TRANSFER_HOLDER: &str = "JFA Distribuciones S.R.L.";

impl TransferDetails {
    fn generate() -> Self {
        Self {
            holder: TRANSFER_HOLDER,
            account: random_digits(14),
            reference: random_digits(6),
        }
    }
}

fn random_digits(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub layout: Layout,
    pub method_label: &'static str,
    pub delivery_label: &'static str,
    pub method: &'static str,
    pub card: Option<CardDetails>,
    pub transfer: Option<TransferDetails>,
    pub totals: TotalsView,
    pub default_email: String,
    pub error: Option<&'static str>,
}

/// Confirmation line display data.
#[derive(Debug, Clone)]
pub struct ConfirmationLineView {
    pub name: String,
    pub quantity: u32,
    pub subtotal: String,
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub layout: Layout,
    pub order_number: Option<String>,
    pub email: String,
    pub delivery_label: &'static str,
    pub delivery_message: &'static str,
    pub payment_label: &'static str,
    pub lines: Vec<ConfirmationLineView>,
    pub totals: TotalsView,
}

/// Shown when a later step is opened without the earlier ones.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/missing.html")]
pub struct MissingOrderTemplate {
    pub layout: Layout,
}

fn delivery_options(cart: &Cart, selected: DeliveryMethod) -> Vec<DeliveryOption> {
    [DeliveryMethod::HomeDelivery, DeliveryMethod::StorePickup]
        .into_iter()
        .map(|method| DeliveryOption {
            value: method.as_str(),
            label: method.label(),
            cost: CheckoutTotals::for_cart(cart, method).shipping.to_string(),
            selected: method == selected,
        })
        .collect()
}

fn payment_options(selected: PaymentMethod) -> Vec<PaymentOption> {
    PaymentMethod::ALL
        .into_iter()
        .map(|method| PaymentOption {
            value: method.as_str(),
            label: method.label(),
            selected: method == selected,
        })
        .collect()
}

async fn pending_checkout(session: &Session) -> Option<PendingCheckout> {
    session.get(keys::CHECKOUT).await.ok().flatten()
}

/// Display the checkout form, prefilled from a pending checkout or the cart
/// and profile.
#[instrument(skip(state, session, current, query))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    let cart = state.api(Some(&current)).get_cart(current.user.id).await?;
    let layout = Layout {
        user_name: Some(current.user.first_name.clone()),
        cart_count: cart.item_count(),
    };
    if cart.is_empty() {
        return Ok(EmptyCheckoutTemplate { layout }.into_response());
    }

    let pending = pending_checkout(&session).await;
    let (details, delivery, payment) = match pending {
        Some(p) => (p.details, p.delivery, p.payment),
        None => (
            ShippingDetails::prefill(&cart, &current.user),
            DeliveryMethod::default(),
            PaymentMethod::default(),
        ),
    };
    let delivery = query.metodo_entrega.unwrap_or(delivery);

    Ok(CheckoutTemplate {
        layout,
        totals: TotalsView::from(&CheckoutTotals::for_cart(&cart, delivery)),
        deliveries: delivery_options(&cart, delivery),
        payments: payment_options(payment),
        cart: CartView::from(&cart),
        details,
        error: None,
    }
    .into_response())
}

/// Validate the shipping form and continue to payment.
#[instrument(skip(state, session, current, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = state.api(Some(&current)).get_cart(current.user.id).await?;
    let layout = Layout {
        user_name: Some(current.user.first_name.clone()),
        cart_count: cart.item_count(),
    };
    if cart.is_empty() {
        return Ok(EmptyCheckoutTemplate { layout }.into_response());
    }

    let details = form.details();
    let delivery = form.metodo_entrega;
    let totals = CheckoutTotals::for_cart(&cart, delivery);

    if let Err(e) = details.validate(delivery) {
        return Ok(CheckoutTemplate {
            layout,
            totals: TotalsView::from(&totals),
            deliveries: delivery_options(&cart, delivery),
            payments: payment_options(form.metodo_pago),
            cart: CartView::from(&cart),
            details,
            error: Some(e.to_string()),
        }
        .into_response());
    }

    let pending = PendingCheckout {
        delivery,
        payment: form.metodo_pago,
        details,
        totals,
    };
    session.insert(keys::CHECKOUT, &pending).await?;

    Ok(Redirect::to("/checkout/payment").into_response())
}

/// Discard the pending checkout and go back to the cart.
#[instrument(skip(session, _current))]
pub async fn cancel(session: Session, RequireAuth(_current): RequireAuth) -> Result<Redirect> {
    session.remove::<PendingCheckout>(keys::CHECKOUT).await?;
    Ok(Redirect::to("/cart"))
}

/// Display the payment step for the chosen method.
#[instrument(skip(session, current, query))]
pub async fn payment(
    session: Session,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    let layout = Layout {
        user_name: Some(current.user.first_name.clone()),
        cart_count: 0,
    };
    let Some(pending) = pending_checkout(&session).await else {
        return MissingOrderTemplate { layout }.into_response();
    };

    PaymentTemplate {
        layout,
        method_label: pending.payment.label(),
        delivery_label: pending.delivery.label(),
        method: pending.payment.as_str(),
        card: (pending.payment == PaymentMethod::Card).then(CardDetails::generate),
        transfer: (pending.payment == PaymentMethod::Transfer).then(TransferDetails::generate),
        totals: TotalsView::from(&pending.totals),
        default_email: current.user.email.clone(),
        error: query.error(),
    }
    .into_response()
}

/// Place the order and show the confirmation.
#[instrument(skip(state, session, current, form))]
pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let Some(pending) = pending_checkout(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    let wallet_email = form
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    if pending.payment == PaymentMethod::MercadoPago {
        match wallet_email {
            Some(email) if Email::parse(email).is_ok() => {}
            _ => return Ok(Notice::PaymentEmail.error_at("/checkout/payment").into_response()),
        }
    }
    let email = wallet_email.map_or_else(|| current.user.email.clone(), str::to_owned);

    let api = state.api(Some(&current));
    let confirmation = match place_order(api, current.user.id, &pending, email).await {
        Ok(confirmation) => confirmation,
        Err(PlaceOrderError::EmptyCart) => {
            session.remove::<PendingCheckout>(keys::CHECKOUT).await?;
            return Ok(Notice::EmptyCart.error_at("/cart").into_response());
        }
        Err(e) => {
            tracing::warn!(error = ?e, "Order confirmation failed");
            return Ok(Notice::OrderFailed.error_at("/checkout/payment").into_response());
        }
    };

    add_breadcrumb(
        "checkout",
        "Order placed",
        &[(
            "order_id",
            confirmation
                .order_id
                .map_or_else(|| "-".to_owned(), |id| id.to_string()),
        )],
    );

    session.insert(keys::CONFIRMATION, &confirmation).await?;
    session.remove::<PendingCheckout>(keys::CHECKOUT).await?;

    Ok(Redirect::to("/checkout/confirmation").into_response())
}

/// Display the last confirmation.
#[instrument(skip(session, current))]
pub async fn confirmation(session: Session, RequireAuth(current): RequireAuth) -> Response {
    // The confirmed cart is gone, so the badge shows zero
    let layout = Layout {
        user_name: Some(current.user.first_name.clone()),
        cart_count: 0,
    };
    let confirmation: Option<Confirmation> = session.get(keys::CONFIRMATION).await.ok().flatten();
    let Some(confirmation) = confirmation else {
        return MissingOrderTemplate { layout }.into_response();
    };

    ConfirmationTemplate {
        layout,
        order_number: confirmation.order_id.map(|id| id.to_string()),
        email: confirmation.email,
        delivery_label: confirmation.delivery.label(),
        delivery_message: confirmation.delivery.delivery_message(),
        payment_label: confirmation.payment.label(),
        lines: confirmation
            .lines
            .into_iter()
            .map(|line| ConfirmationLineView {
                name: line.name,
                quantity: line.quantity,
                subtotal: line.subtotal,
            })
            .collect(),
        totals: TotalsView::from(&confirmation.totals),
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_digits_length_and_charset() {
        let digits = random_digits(16);
        assert_eq!(digits.len(), 16);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_card_details_shape() {
        let card = CardDetails::generate();
        assert_eq!(card.number.len(), 16);
        assert_eq!(card.ccv.len(), 3);
        assert_eq!(card.expiry.len(), 5);
        assert_eq!(card.expiry.chars().nth(2), Some('/'));
    }

    #[test]
    fn test_transfer_details_shape() {
        let transfer = TransferDetails::generate();
        assert_eq!(transfer.account.len(), 14);
        assert_eq!(transfer.reference.len(), 6);
        assert!(!transfer.holder.is_empty());
    }

    #[test]
    fn test_checkout_form_trims_fields() {
        let form = CheckoutForm {
            nombre_completo: "  Ana Pérez ".to_owned(),
            direccion: "San Martín 123 ".to_owned(),
            ciudad: "Córdoba".to_owned(),
            codigo_postal: " 5000".to_owned(),
            telefono: "351".to_owned(),
            metodo_entrega: DeliveryMethod::HomeDelivery,
            metodo_pago: PaymentMethod::Cash,
        };
        let details = form.details();
        assert_eq!(details.full_name, "Ana Pérez");
        assert_eq!(details.postal_code, "5000");
    }
}
