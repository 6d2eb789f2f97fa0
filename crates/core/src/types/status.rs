//! Status and option enums exchanged with the remote API.
//!
//! Every enum serializes to the lowercase Spanish value the API uses
//! (`pendiente`, `domicilio`, ...). `Display` writes that same wire value;
//! `label()` gives the text shown to people.

use serde::{Deserialize, Serialize};

/// Lifecycle of an order (`pedido`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pendiente", alias = "Pendiente")]
    Pending,
    #[serde(rename = "confirmado", alias = "Confirmado")]
    Confirmed,
    #[serde(rename = "preparando", alias = "Preparando")]
    Preparing,
    #[serde(rename = "enviado", alias = "Enviado")]
    Shipped,
    #[serde(rename = "entregado", alias = "Entregado")]
    Delivered,
    #[serde(rename = "cancelado", alias = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order, for status pickers.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Confirmed => "confirmado",
            Self::Preparing => "preparando",
            Self::Shipped => "enviado",
            Self::Delivered => "entregado",
            Self::Cancelled => "cancelado",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Confirmed => "Confirmado",
            Self::Preparing => "Preparando",
            Self::Shipped => "Enviado",
            Self::Delivered => "Entregado",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Badge modifier used by the templates.
    #[must_use]
    pub const fn tone(&self) -> &'static str {
        match self {
            Self::Pending | Self::Preparing => "warning",
            Self::Confirmed | Self::Shipped => "info",
            Self::Delivered => "success",
            Self::Cancelled => "error",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Settlement state of a payment (`pago`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "pagado")]
    Paid,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl PaymentStatus {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Paid => "pagado",
            Self::Cancelled => "cancelado",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Paid => "Pagado",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Badge modifier used by the templates.
    #[must_use]
    pub const fn tone(&self) -> &'static str {
        match self {
            Self::Pending => "warning",
            Self::Paid => "success",
            Self::Cancelled => "error",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role. Only `admin` may enter the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Whether this role grants back-office access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryMethod {
    /// Shipped to the customer's address.
    #[default]
    #[serde(rename = "domicilio")]
    HomeDelivery,
    /// Picked up at the store.
    #[serde(rename = "retiro")]
    StorePickup,
}

impl DeliveryMethod {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HomeDelivery => "domicilio",
            Self::StorePickup => "retiro",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HomeDelivery => "Envío a domicilio",
            Self::StorePickup => "Retiro en tienda",
        }
    }

    /// What happens after the order is placed.
    #[must_use]
    pub const fn delivery_message(&self) -> &'static str {
        match self {
            Self::HomeDelivery => "Tu pedido será enviado a tu dirección en 2-3 días hábiles.",
            Self::StorePickup => {
                "Puedes retirar tu compra en un plazo de 2 horas hábiles presentando tu DNI."
            }
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domicilio" => Ok(Self::HomeDelivery),
            "retiro" => Ok(Self::StorePickup),
            _ => Err(format!("invalid delivery method: {s}")),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "mercadopago")]
    MercadoPago,
    #[serde(rename = "transferencia")]
    Transfer,
    #[serde(rename = "tarjeta")]
    Card,
    #[serde(rename = "efectivo")]
    Cash,
}

impl PaymentMethod {
    /// All methods in the order the checkout offers them.
    pub const ALL: [Self; 4] = [Self::MercadoPago, Self::Transfer, Self::Card, Self::Cash];

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MercadoPago => "mercadopago",
            Self::Transfer => "transferencia",
            Self::Card => "tarjeta",
            Self::Cash => "efectivo",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MercadoPago => "Mercado Pago",
            Self::Transfer => "Transferencia bancaria",
            Self::Card => "Tarjeta de crédito/débito",
            Self::Cash => "Efectivo",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("invalid payment method: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"enviado\""
        );
        let status: OrderStatus = serde_json::from_str("\"Entregado\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn test_order_status_from_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("archivado".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_delivery_method_round_trip() {
        assert_eq!(
            "retiro".parse::<DeliveryMethod>().unwrap(),
            DeliveryMethod::StorePickup
        );
        assert_eq!(DeliveryMethod::HomeDelivery.to_string(), "domicilio");
    }

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transfer).unwrap(),
            "\"transferencia\""
        );
        assert_eq!("efectivo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
    }

    #[test]
    fn test_role() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
        assert!(!Role::User.is_admin());
    }
}
