//! Strongly typed price and volume values shared by bars and bricks.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A behavioral contract for anything that behaves like a price.
pub trait PriceLike {
    fn value(&self) -> f64;

    fn is_finite(&self) -> bool {
        self.value().is_finite()
    }

    /// Formats a price with "Trader Precision" adaptive decimals.
    fn format_price(&self) -> String {
        let price = self.value();
        if price == 0.0 {
            return "$0.00".to_string();
        }

        let abs_price = price.abs();

        if abs_price >= 1000.0 {
            format!("${:.2}", price)
        } else if abs_price >= 1.0 {
            format!("${:.4}", price)
        } else if abs_price >= 0.01 {
            format!("${:.5}", price)
        } else {
            format!("${:.8}", price)
        }
    }
}

macro_rules! impl_into_price {
    ($from:ident) => {
        impl From<$from> for Price {
            fn from(p: $from) -> Self {
                Price::new(p.value())
            }
        }
    };
}

macro_rules! impl_from_price {
    ($to:ident) => {
        impl From<Price> for $to {
            fn from(p: Price) -> Self {
                $to::new(p.value())
            }
        }
    };
}

macro_rules! define_price_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name::new(v)
            }
        }

        impl $name {
            // Non-finite values pass through untouched so validation can see them
            pub const fn new(val: f64) -> Self {
                Self(val)
            }
        }

        impl Add for $name {
            type Output = f64;

            fn add(self, rhs: Self) -> Self::Output {
                self.value() + rhs.value()
            }
        }

        impl Sub for $name {
            type Output = f64;

            fn sub(self, rhs: Self) -> Self::Output {
                self.value() - rhs.value()
            }
        }

        impl PriceLike for $name {
            fn value(&self) -> f64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.format_price())
            }
        }
    };
}

macro_rules! impl_price_compare {
    ($a:ty, $b:ty) => {
        impl PartialEq<$b> for $a {
            fn eq(&self, other: &$b) -> bool {
                self.value() == other.value()
            }
        }

        impl PartialOrd<$b> for $a {
            fn partial_cmp(&self, other: &$b) -> Option<std::cmp::Ordering> {
                self.value().partial_cmp(&other.value())
            }
        }
    };
}

// Generate the Price Hierarchy
define_price_type!(Price);
define_price_type!(OpenPrice);
define_price_type!(HighPrice);
define_price_type!(LowPrice);
define_price_type!(ClosePrice);

impl Price {
    #[inline]
    pub fn min(self, other: Price) -> Price {
        if other < self { other } else { self }
    }

    #[inline]
    pub fn max(self, other: Price) -> Price {
        if other > self { other } else { self }
    }
}

impl_into_price!(OpenPrice);
impl_into_price!(HighPrice);
impl_into_price!(LowPrice);
impl_into_price!(ClosePrice);

impl_from_price!(LowPrice);
impl_from_price!(HighPrice);
impl_from_price!(OpenPrice);
impl_from_price!(ClosePrice);

impl_price_compare!(LowPrice, HighPrice);
impl_price_compare!(HighPrice, LowPrice);

impl_price_compare!(LowPrice, Price);
impl_price_compare!(HighPrice, Price);
impl_price_compare!(Price, LowPrice);
impl_price_compare!(Price, HighPrice);
impl_price_compare!(ClosePrice, Price);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BaseVol(f64);

impl BaseVol {
    pub const fn new(val: f64) -> Self {
        let v = if val < 0.0 { 0.0 } else { val };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for BaseVol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Height of one brick in absolute price units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct StepSize(f64);

impl StepSize {
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// A step is usable only when it is a finite, strictly positive number.
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Bit pattern used as a hash key (f64 itself is not `Hash`).
    pub(crate) fn cache_key(self) -> u64 {
        self.0.to_bits()
    }
}

impl From<f64> for StepSize {
    fn from(v: f64) -> Self {
        StepSize::new(v)
    }
}

impl std::fmt::Display for StepSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Price::new(self.0).format_price())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_validity() {
        assert!(StepSize::new(25.0).is_valid());
        assert!(!StepSize::new(0.0).is_valid());
        assert!(!StepSize::new(-1.0).is_valid());
        assert!(!StepSize::new(f64::NAN).is_valid());
        assert!(!StepSize::new(f64::INFINITY).is_valid());
    }

    #[test]
    fn test_cross_type_compare() {
        assert!(LowPrice::new(90.0) < HighPrice::new(110.0));
        assert!(Price::new(100.0) <= HighPrice::new(100.0));
        assert_eq!(Price::from(HighPrice::new(12.5)), Price::new(12.5));
    }

    #[test]
    fn test_format_price_precision() {
        assert_eq!(Price::new(12345.678).format_price(), "$12345.68");
        assert_eq!(Price::new(1.5).format_price(), "$1.5000");
        assert_eq!(Price::new(0.0).format_price(), "$0.00");
    }
}
