//! Peso amounts using decimal arithmetic.
//!
//! The remote API sends amounts either as JSON numbers or as numeric strings
//! (`"1500.00"`), depending on the endpoint. [`Money`] accepts both and
//! always sends plain JSON numbers back.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};

/// An amount in Argentine pesos.
///
/// `Display` renders the storefront format (`$1.234,56`); [`Money::plain`]
/// renders the report/export format (`1234,56`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero pesos.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole pesos, mostly useful for constants and tests.
    #[must_use]
    pub fn from_pesos(pesos: i64) -> Self {
        Self(Decimal::from(pesos))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round half away from zero to cents.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// `percent` per cent of this amount, e.g. `percent_of(10)` is 10%.
    #[must_use]
    pub fn percent_of(self, percent: u32) -> Self {
        Self(self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED)
    }

    /// Two decimals, comma separator, no grouping (`1234,56`).
    #[must_use]
    pub fn plain(&self) -> String {
        let rounded = self.round_cents().0;
        format!("{rounded:.2}").replace('.', ",")
    }

    /// Two decimals, `.` thousands grouping, `,` decimal separator, no symbol.
    #[must_use]
    pub fn grouped(&self) -> String {
        let rounded = self.round_cents().0;
        let text = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*digit);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{grouped},{frac_part}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.grouped())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.round_cents().0.to_f64().unwrap_or_default();
        serializer.serialize_f64(value)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(money("1234.5").to_string(), "$1.234,50");
        assert_eq!(money("1234567.891").to_string(), "$1.234.567,89");
        assert_eq!(money("500").to_string(), "$500,00");
        assert_eq!(money("0").to_string(), "$0,00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(money("-1500").to_string(), "$-1.500,00");
    }

    #[test]
    fn test_plain() {
        assert_eq!(money("1234.5").plain(), "1234,50");
        assert_eq!(money("0.005").plain(), "0,01");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(money("4200").percent_of(10), money("420"));
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: Money = serde_json::from_str("1500.5").unwrap();
        let from_string: Money = serde_json::from_str("\"1500.50\"").unwrap();
        assert_eq!(from_number.round_cents(), from_string.round_cents());
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&money("12.345")).unwrap(), "12.35");
    }

    #[test]
    fn test_sum() {
        let total: Money = [money("1.10"), money("2.20")].iter().sum();
        assert_eq!(total, money("3.30"));
    }
}
