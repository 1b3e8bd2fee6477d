//! Compile-time unit safety for channel currents.
//!
//! Currents are stored in mA everywhere in external artifacts, with
//! conversion to A happening once at the field engine boundary.
//! Keeping that conversion in the type system (rather than a comment)
//! means a channel current can't be silently double-converted or left
//! unconverted.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! impl_unit_ops {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }
        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }
        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }
        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }
        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
    };
}

/// A current in milliamperes — the unit used in every external artifact
/// (CSV, JSON).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliamperes(pub f64);

/// A current in amperes — the unit used internally by the Field Engine.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amperes(pub f64);

impl_unit_ops!(Milliamperes);
impl_unit_ops!(Amperes);

impl Milliamperes {
    pub fn to_amperes(self) -> Amperes {
        Amperes(self.0 / 1000.0)
    }
}

impl Amperes {
    pub fn to_milliamperes(self) -> Milliamperes {
        Milliamperes(self.0 * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ma_to_a_roundtrip() {
        let ma = Milliamperes(250.0);
        let a = ma.to_amperes();
        assert_eq!(a.0, 0.25);
        assert_eq!(a.to_milliamperes().0, 250.0);
    }

    #[test]
    fn unit_arithmetic_stays_same_unit() {
        let a = Milliamperes(1.6) + Milliamperes(0.4);
        assert!((a.0 - 2.0).abs() < 1e-12);
    }
}
