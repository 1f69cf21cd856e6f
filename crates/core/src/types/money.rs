//! Type-safe rupee amounts using decimal arithmetic.
//!
//! Prices arrive as display strings (`"₹1,200"`) from the catalog and from
//! persisted bags. They are parsed once into [`Money`] and formatted back to
//! the same display form when serialized, so stored bags keep their original
//! shape while all arithmetic happens on decimals.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol used for display.
pub const RUPEE_SYMBOL: &str = "₹";

/// Errors that can occur when parsing a [`Money`] amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The input contains no digits.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number after stripping symbol and separators.
    #[error("invalid price: {0:?}")]
    Invalid(String),
    /// Prices are never negative.
    #[error("price cannot be negative: {0:?}")]
    Negative(String),
}

/// An amount in Indian rupees.
///
/// ## Examples
///
/// ```
/// use tidepool_core::Money;
///
/// let price = Money::parse("₹1,200").unwrap();
/// assert_eq!(price, Money::from_rupees(1200));
/// assert_eq!(price.to_string(), "₹1,200");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal number of rupees.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Returns the amount as a decimal number of rupees.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a display string such as `"₹1,200"`, `"1200"` or `"₹ 99.50"`.
    ///
    /// The rupee symbol is optional and every `,` group separator is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is left after stripping the symbol, if the
    /// remainder is not a decimal number, or if it is negative.
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix(RUPEE_SYMBOL).unwrap_or(trimmed).trim();
        if digits.is_empty() {
            return Err(MoneyError::Empty);
        }

        let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
        let amount =
            Decimal::from_str(&cleaned).map_err(|_| MoneyError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(s.to_owned()));
        }

        Ok(Self(amount))
    }

    /// Multiply by a quantity, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2).normalize();
        let plain = if rounded.fract().is_zero() {
            rounded.trunc().normalize().to_string()
        } else {
            format!("{rounded:.2}")
        };

        let (whole, fraction) = plain
            .split_once('.')
            .map_or((plain.as_str(), None), |(w, f)| (w, Some(f)));

        write!(f, "{RUPEE_SYMBOL}{}", group_thousands(whole))?;
        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

/// Insert `,` between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
