//! Money value object.
//!
//! All monetary values are stored as i64 minor units (cents). Arithmetic
//! on prices never touches floating point, so pricing recomputes are
//! exactly reproducible regardless of mutation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use super::{Percentage, ValidationError};

/// An amount of money in minor units (cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units (cents).
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole major units (e.g. dollars).
    pub fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Returns the amount in minor units.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a unit count (quantity, nights, tickets).
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * i64::from(quantity))
    }

    /// Returns the given percentage of this amount, rounded half-up
    /// to the nearest cent.
    pub fn percent_of(&self, pct: Percentage) -> Self {
        let numerator = i128::from(self.0) * i128::from(pct.value());
        let rounded = (numerator + 50) / 100;
        Self(rounded as i64)
    }

    /// Divides the amount evenly across `n` people, rounded half-up
    /// to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is zero.
    pub fn split_between(&self, n: u32) -> Result<Self, ValidationError> {
        if n == 0 {
            return Err(ValidationError::out_of_range("traveler_count", 1, i64::MAX, 0));
        }
        let divisor = i128::from(n);
        let rounded = (i128::from(self.0) + divisor / 2) / divisor;
        Ok(Self(rounded as i64))
    }

    /// Returns the larger of this amount and zero.
    pub fn clamp_to_zero(&self) -> Self {
        Self(self.0.max(0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// ISO-4217 style currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Creates a currency code, returning error if not three ASCII letters.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into().to_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO code",
            ));
        }
        Ok(Self(code))
    }

    /// US dollars.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// Returns the inner code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_major_converts_to_cents() {
        assert_eq!(Money::from_major(100).cents(), 10_000);
    }

    #[test]
    fn times_multiplies_by_quantity() {
        assert_eq!(Money::from_major(100).times(2), Money::from_major(200));
    }

    #[test]
    fn percent_of_computes_service_fee() {
        // 5% of 300.00 = 15.00
        let subtotal = Money::from_major(300);
        assert_eq!(subtotal.percent_of(Percentage::new(5)), Money::from_major(15));
    }

    #[test]
    fn percent_of_rounds_half_up() {
        // 5% of 0.30 = 0.015 -> 0.02
        assert_eq!(Money::from_cents(30).percent_of(Percentage::new(5)).cents(), 2);
    }

    #[test]
    fn split_between_divides_evenly() {
        // 315.00 / 2 = 157.50
        let total = Money::from_major(315);
        assert_eq!(total.split_between(2).unwrap(), Money::from_cents(15_750));
    }

    #[test]
    fn split_between_zero_is_an_error() {
        assert!(Money::from_major(10).split_between(0).is_err());
    }

    #[test]
    fn sum_adds_amounts() {
        let total: Money = [Money::from_major(1), Money::from_major(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_major(3));
    }

    #[test]
    fn display_formats_cents() {
        assert_eq!(Money::from_cents(15_750).to_string(), "157.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
    }

    #[test]
    fn clamp_to_zero_floors_negative_amounts() {
        assert_eq!(Money::from_cents(-100).clamp_to_zero(), Money::ZERO);
        assert_eq!(Money::from_cents(100).clamp_to_zero(), Money::from_cents(100));
    }

    #[test]
    fn currency_normalizes_case() {
        assert_eq!(Currency::new("usd").unwrap().as_str(), "USD");
    }

    #[test]
    fn currency_rejects_invalid_codes() {
        assert!(Currency::new("US").is_err());
        assert!(Currency::new("US1").is_err());
    }
}
