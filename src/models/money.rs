//! Money type for representing ledger amounts
//!
//! Amounts are exact decimals, so replaying the transaction history sums
//! without intermediate rounding and sub-cent legs survive a save/load cycle.
//! On disk amounts are plain decimal numbers (`1000.0`, `-12.5`, `0.333`),
//! which is what hand-edited ledger files contain. Rounding to two decimals
//! happens only when an amount is displayed.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Decimal places shown when an amount is displayed
pub const DISPLAY_PLACES: u32 = 2;

/// A signed exact decimal amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Wrap a decimal amount
    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use wimm::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a Money amount from whole units
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a Money amount from a float, keeping its shortest decimal form
    ///
    /// `0.333_f64` becomes exactly `0.333`. Returns `None` for NaN and
    /// infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        decimal_from_f64(value).map(Self)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The exact decimal value
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is within `tolerance` of zero
    pub fn is_near_zero(&self, tolerance: Decimal) -> bool {
        self.0.abs() <= tolerance
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a rate (e.g. a tax rate); the product is exact
    pub fn scale(&self, rate: f64) -> Self {
        let rate = decimal_from_f64(rate).unwrap_or(Decimal::ZERO);
        Self(self.0 * rate)
    }

    /// The amount rounded half away from zero to `places` decimals
    pub fn rounded(&self, places: u32) -> Self {
        let rounded = self
            .0
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            // no "-0.00"
            Self(Decimal::ZERO)
        } else {
            Self(rounded)
        }
    }

    /// Parse an amount from a string
    ///
    /// Accepts "10.50", "-10.50", "+10", "0.333" and the decimal-comma form
    /// "10,50" used by some bank exports. Every digit given is kept.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let raw = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (negative, rest) = if let Some(stripped) = raw.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, raw.strip_prefix('+').unwrap_or(raw))
        };

        let normalized = if rest.contains('.') {
            rest.to_string()
        } else {
            rest.replacen(',', ".", 1)
        };

        let well_formed = !normalized.is_empty()
            && normalized != "."
            && normalized.chars().all(|c| c.is_ascii_digit() || c == '.')
            && normalized.matches('.').count() <= 1;
        if !well_formed {
            return Err(invalid());
        }

        let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
        Ok(Self(if negative { -value } else { value }))
    }
}

fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    // Display of f64 is the shortest form that reads back to the same float
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.rounded(DISPLAY_PLACES).0;
        shown.rescale(DISPLAY_PLACES);
        f.pad(&shown.to_string())
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self
            .0
            .to_f64()
            .ok_or_else(|| ser::Error::custom(format!("amount out of range: {}", self.0)))?;
        serializer.serialize_f64(value)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v)
            .ok_or_else(|| E::custom(format!("amount is not a finite number: {}", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money(Decimal::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
