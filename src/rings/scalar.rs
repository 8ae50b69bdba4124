use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Ring operations shared by numbers, fractions and polynomials.
pub trait Scalar:
    Clone
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + std::fmt::Debug
{
}

impl<T> Scalar for T where
    T: Clone
        + PartialEq
        + Zero
        + One
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Neg<Output = T>
        + std::fmt::Debug
{
}

/// A `Scalar` with exact (or at least total) division by non-zero values.
pub trait Field: Scalar + Div<Output = Self> {}

impl<T> Field for T where T: Scalar + Div<Output = T> {}

/// Ordered field elements that can be approximated by `f64`.
pub trait RealScalar: Field + PartialOrd + ToPrimitive + FromPrimitive {}

impl<T> RealScalar for T where T: Field + PartialOrd + ToPrimitive + FromPrimitive {}

pub fn abs<T: Scalar + PartialOrd>(x: T) -> T {
    if x < T::zero() {
        -x
    } else {
        x
    }
}

pub fn to_f64<T: ToPrimitive>(x: &T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::fraction::Fraction;

    fn assert_real<T: RealScalar>() {}

    #[test]
    fn test_blanket_impls() {
        assert_real::<f64>();
        assert_real::<Fraction>();
        assert_eq!(abs(-3i64), 3);
        assert_eq!(
            abs(Fraction::from(-7) / Fraction::from(2)),
            "7/2".parse::<Fraction>().unwrap()
        );
        assert_eq!(to_f64(&(Fraction::from(1) / Fraction::from(4))), 0.25);
    }
}
