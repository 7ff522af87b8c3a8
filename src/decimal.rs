use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::errors::{BillingError, Result};

/// Money with a fixed 2 decimal place scale, never negative.
///
/// Construction rejects negative values and values carrying more than two
/// fractional digits. The only rounding entry point is
/// [`Money::from_decimal_rounded`], used exactly once at the end of fee
/// calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal, rejecting negatives and sub-cent precision
    pub fn new(d: Decimal) -> Result<Self> {
        if d.is_sign_negative() {
            return Err(BillingError::InvalidAmount { amount: d });
        }
        if d.normalize().scale() > 2 {
            return Err(BillingError::InvalidAmount { amount: d });
        }
        let mut v = d;
        v.rescale(2);
        Ok(Money(v))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self> {
        let d = Decimal::from_str(s).map_err(|_| BillingError::InvalidData {
            message: format!("not a decimal amount: {s}"),
        })?;
        Money::new(d)
    }

    /// create from whole currency units
    pub fn from_major(amount: u64) -> Self {
        let mut v = Decimal::from(amount);
        v.rescale(2);
        Money(v)
    }

    /// create from minor units (cents)
    pub fn from_minor(cents: u64) -> Self {
        Money(Decimal::new(cents as i64, 2))
    }

    /// round an arbitrary-precision decimal to cents, half-up
    ///
    /// This is the single documented rounding step. Fee computations do their
    /// intermediate arithmetic on raw [`Decimal`] and re-enter `Money` here.
    pub fn from_decimal_rounded(d: Decimal) -> Result<Self> {
        if d.is_sign_negative() {
            return Err(BillingError::InvalidAmount { amount: d });
        }
        Ok(Self::round_non_negative(d))
    }

    /// rounding for values already known to be non-negative
    pub(crate) fn round_non_negative(d: Decimal) -> Self {
        let mut v = d
            .max(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        v.rescale(2);
        Money(v)
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// subtraction that refuses to go negative
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        let d = self.0 - other.0;
        if d.is_sign_negative() {
            None
        } else {
            Some(Money(d))
        }
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self> {
        Money::from_str_exact(s)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let d = <Decimal as Deserialize<'de>>::deserialize(deserializer)?;
        Money::new(d).map_err(serde::de::Error::custom)
    }
}

// Addition is closed over non-negative 2dp values, so it stays exact.
impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// monthly late-fee rate, a ratio in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal ratio (e.g. 0.05 for 5% per month)
    pub fn new(d: Decimal) -> Result<Self> {
        if d.is_sign_negative() || d > Decimal::ONE {
            return Err(BillingError::InvalidRate { rate: d });
        }
        Ok(Rate(d))
    }

    /// create from a whole percentage (e.g. 5 for 5% per month)
    pub fn from_percentage(p: u32) -> Result<Self> {
        Rate::new(Decimal::from(p) / Decimal::from(100))
    }

    /// get as decimal ratio
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let d = <Decimal as Deserialize<'de>>::deserialize(deserializer)?;
        Rate::new(d).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_fixed_scale_display() {
        let m = Money::from_major(1500);
        assert_eq!(m.to_string(), "1500.00");

        let m = Money::from_str_exact("37.5").unwrap();
        assert_eq!(m.to_string(), "37.50");
    }

    #[test]
    fn test_money_rejects_negative() {
        assert!(Money::new(dec!(-0.01)).is_err());
        assert!(Money::from_str_exact("-10").is_err());
    }

    #[test]
    fn test_money_rejects_sub_cent_precision() {
        assert!(Money::new(dec!(1.234)).is_err());
        // trailing zeros are not extra precision
        assert!(Money::new(dec!(1.230)).is_ok());
    }

    #[test]
    fn test_exact_addition_and_subtraction() {
        let a = Money::from_str_exact("0.10").unwrap();
        let b = Money::from_str_exact("0.20").unwrap();
        assert_eq!(a + b, Money::from_str_exact("0.30").unwrap());

        let c = Money::from_major(5);
        assert_eq!(
            c.checked_sub(Money::from_minor(1)).unwrap().to_string(),
            "4.99"
        );
        assert!(Money::from_minor(1).checked_sub(c).is_none());
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 2.5 cents rounds up to 3 cents
        let m = Money::from_decimal_rounded(dec!(0.025)).unwrap();
        assert_eq!(m, Money::from_minor(3));

        let m = Money::from_decimal_rounded(dec!(0.024)).unwrap();
        assert_eq!(m, Money::from_minor(2));
    }

    #[test]
    fn test_rate_range() {
        assert!(Rate::new(dec!(0)).is_ok());
        assert!(Rate::new(dec!(1)).is_ok());
        assert!(Rate::new(dec!(0.05)).is_ok());
        assert!(Rate::new(dec!(-0.01)).is_err());
        assert!(Rate::new(dec!(1.01)).is_err());
        assert!(Rate::from_percentage(101).is_err());
    }

    #[test]
    fn test_money_serde_round_trip() {
        let m = Money::from_str_exact("1234.56").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"1234.56\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        // deserialization enforces the same invariants as construction
        assert!(serde_json::from_str::<Money>("\"-5.00\"").is_err());
        assert!(serde_json::from_str::<Money>("\"1.999\"").is_err());
    }
}
