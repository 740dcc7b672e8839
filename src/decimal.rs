use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// decimal places kept for every currency amount
pub const CURRENCY_DP: u32 = 2;

/// largest magnitude accepted from user input (one quadrillion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// round half away from zero to currency precision, always carrying two
/// decimal places so equal amounts print the same
pub fn round_currency(d: Decimal) -> Decimal {
    let mut rounded = d.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Money type with minor-unit (paise) precision.
///
/// Every constructor and operator normalises to two decimal places using
/// round-half-away-from-zero, so the salary, EMI and fee calculators all
/// round the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, 2));
    pub const ONE: Money = Money(Decimal::from_parts(100, 0, 0, false, 2));
    pub const PAISA: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(round_currency(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s.trim())?))
    }

    /// create from integer amount (rupees, dollars)
    pub fn from_major(amount: i64) -> Self {
        Money::from_decimal(Decimal::from(amount))
    }

    /// create from minor amount (paise, cents)
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, CURRENCY_DP))
    }

    /// Parse a user-supplied amount, falling back to zero.
    ///
    /// Missing or non-numeric input is an `InvalidInput` condition that is
    /// recovered here rather than surfaced: payroll and fee screens always
    /// need a number to render.
    pub fn parse_lenient(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Money::ZERO;
        }

        match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
            Ok(d) if d.abs() <= MAX_AMOUNT => Money::from_decimal(d),
            Ok(_) => {
                tracing::debug!(input = trimmed, "out-of-range amount treated as zero");
                Money::ZERO
            }
            Err(_) => {
                tracing::debug!(input = trimmed, "non-numeric amount treated as zero");
                Money::ZERO
            }
        }
    }

    /// lenient conversion from a raw json field (number, numeric string, null)
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => Money::parse_lenient(&n.to_string()),
            serde_json::Value::String(s) => Money::parse_lenient(s),
            serde_json::Value::Null => Money::ZERO,
            other => {
                tracing::debug!(input = %other, "non-numeric amount treated as zero");
                Money::ZERO
            }
        }
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// magnitude no larger than [`MAX_AMOUNT`]
    pub fn is_within_bounds(&self) -> bool {
        self.0.abs() <= MAX_AMOUNT
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// subtraction floored at zero
    pub fn saturating_sub(self, other: Self) -> Self {
        (self - other).max(Money::ZERO)
    }

    /// `self * numerator / denominator`, multiplying before dividing so the
    /// result carries no intermediate rounding; overflow yields zero
    pub fn prorate(&self, numerator: u32, denominator: u32) -> Self {
        if denominator == 0 {
            return Money::ZERO;
        }
        match self
            .0
            .checked_mul(Decimal::from(numerator))
            .and_then(|scaled| scaled.checked_div(Decimal::from(denominator)))
        {
            Some(d) => Money::from_decimal(d),
            None => {
                tracing::debug!(amount = %self.0, numerator, denominator, "proration overflowed, treated as zero");
                Money::ZERO
            }
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_decimal(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_decimal(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        *self = *self - other;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 * other)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 / other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

/// percentage with two decimal places (e.g. 33.33 for a third)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);
    pub const HUNDRED: Percentage = Percentage(Decimal::ONE_HUNDRED);

    /// `part / whole * 100`; an empty whole counts as fully done
    pub fn of(part: u32, whole: u32) -> Self {
        if whole == 0 {
            return Percentage::HUNDRED;
        }
        let p = Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole);
        Percentage(round_currency(p))
    }

    /// get as decimal (e.g. 50 for 50%)
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
