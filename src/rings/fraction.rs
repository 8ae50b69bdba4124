use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::float::FloatCore;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::ops;
use std::str::FromStr;

/// Exact rational number. Always stored reduced, with a positive denominator.
#[derive(Debug, Clone)]
pub struct Fraction {
    num: BigInt,
    den: BigInt,
}

impl Fraction {
    /// Panics on a zero denominator, like integer division does.
    pub fn new(num: BigInt, den: BigInt) -> Self {
        if den.is_zero() {
            panic!("Denominator cannot be zero");
        }

        let g = &num.gcd(&den);
        let num = num / g;
        let den = den / g;

        if den < BigInt::zero() {
            return Self {
                num: -num,
                den: -den,
            };
        }
        Self { num, den }
    }

    pub fn checked_new(num: BigInt, den: BigInt) -> Result<Self> {
        if den.is_zero() {
            return Err(Error::DivideByZero(format!("{} / 0", num)));
        }
        Ok(Fraction::new(num, den))
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    pub fn abs(&self) -> Fraction {
        Fraction {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    pub fn recip(&self) -> Result<Fraction> {
        Fraction::checked_new(self.den.clone(), self.num.clone())
    }
}

impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut nums = s.split('/');
        let parse = |part: &str| {
            BigInt::parse_bytes(part.trim().as_bytes(), 10)
                .ok_or_else(|| Error::Value(format!("invalid number `{}`", part)))
        };
        let num = parse(nums.next().unwrap_or(""))?;
        let den = match nums.next() {
            Some(den) => parse(den)?,
            None => BigInt::one(),
        };
        if nums.next().is_some() {
            return Err(Error::Value(format!("invalid fraction `{}`", s)));
        }

        Fraction::checked_new(num, den)
    }
}

impl ops::Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        if self.den == rhs.den {
            return Fraction::new(self.num + rhs.num, self.den);
        }

        Fraction::new(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl ops::Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        self + -rhs
    }
}

impl ops::Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            num: -self.num,
            den: self.den,
        }
    }
}

impl ops::Div for Fraction {
    type Output = Fraction;

    fn div(self, rhs: Fraction) -> Fraction {
        Fraction::new(self.num * rhs.den, self.den * rhs.num)
    }
}

impl ops::Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl One for Fraction {
    fn one() -> Fraction {
        Fraction::from(BigInt::one())
    }
}

impl Zero for Fraction {
    fn zero() -> Fraction {
        Fraction::from(BigInt::zero())
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl From<BigInt> for Fraction {
    fn from(num: BigInt) -> Fraction {
        Fraction {
            num,
            den: BigInt::one(),
        }
    }
}

impl From<i32> for Fraction {
    fn from(value: i32) -> Fraction {
        Fraction::from(BigInt::from(value))
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Fraction {
        Fraction::from(BigInt::from(value))
    }
}

impl From<u64> for Fraction {
    fn from(value: u64) -> Fraction {
        Fraction::from(BigInt::from(value))
    }
}

impl ToPrimitive for Fraction {
    fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        self.num.to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        if !self.is_integer() {
            return None;
        }
        self.num.to_u64()
    }

    fn to_f64(&self) -> Option<f64> {
        // Keep both parts inside the f64 exponent range before dividing.
        let shift = self.num.bits().max(self.den.bits()).saturating_sub(1000);
        let num = (&self.num >> shift).to_f64()?;
        let den = (&self.den >> shift).to_f64()?;
        if den == 0.0 {
            return Some(if num < 0.0 {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            });
        }
        Some(num / den)
    }
}

impl FromPrimitive for Fraction {
    fn from_i64(n: i64) -> Option<Fraction> {
        Some(Fraction::from(n))
    }

    fn from_u64(n: u64) -> Option<Fraction> {
        Some(Fraction::from(n))
    }

    /// Exact: every finite f64 is a dyadic rational.
    fn from_f64(n: f64) -> Option<Fraction> {
        if !n.is_finite() {
            return None;
        }
        let (mantissa, exponent, sign) = FloatCore::integer_decode(n);
        let num = BigInt::from(mantissa) * BigInt::from(sign);
        if exponent >= 0 {
            Some(Fraction::from(num << exponent as usize))
        } else {
            Some(Fraction::new(num, BigInt::one() << (-exponent) as usize))
        }
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            return write!(f, "{}", self.num);
        }
        write!(f, "{} / {}", self.num, self.den)
    }
}

impl PartialEq<Fraction> for Fraction {
    fn eq(&self, rhs: &Fraction) -> bool {
        &self.num * &rhs.den == &rhs.num * &self.den
    }
}

impl PartialEq<i64> for Fraction {
    fn eq(&self, rhs: &i64) -> bool {
        self.num == &self.den * rhs
    }
}

impl PartialOrd<Fraction> for Fraction {
    fn partial_cmp(&self, rhs: &Fraction) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Eq for Fraction {}
impl Ord for Fraction {
    fn cmp(&self, rhs: &Fraction) -> Ordering {
        let a = &self.num * &rhs.den;
        let b = &rhs.num * &self.den;
        a.cmp(&b)
    }
}

// Normalized form is canonical, so hashing the parts agrees with `eq`.
impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num.hash(state);
        self.den.hash(state);
    }
}

impl std::iter::Sum<Fraction> for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::zero(), |acc, f| acc + f)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fr(s: &str) -> Fraction {
        s.parse().unwrap()
    }

    #[test]
    fn test_fraction_normalization() {
        let f = Fraction::new(BigInt::from(6), BigInt::from(-4));
        assert_eq!(f.numer(), &BigInt::from(-3));
        assert_eq!(f.denom(), &BigInt::from(2));
        assert_eq!(f.to_string(), "-3 / 2");
        assert_eq!(fr("10/5").to_string(), "2");
        assert!(fr("10/5").is_integer());
    }

    #[test]
    fn test_fraction_arithmetic() {
        assert_eq!(fr("1/2") + fr("1/3"), fr("5/6"));
        assert_eq!(fr("1/2") - fr("1/3"), fr("1/6"));
        assert_eq!(fr("2/3") * fr("9/4"), fr("3/2"));
        assert_eq!(fr("2/3") / fr("4/9"), fr("3/2"));
        assert_eq!(-fr("2/3"), fr("-2/3"));
        assert_eq!(fr("4/2"), 2);
        assert!(fr("1/3") < fr("1/2"));
        assert_eq!(
            vec![fr("1/4"), fr("1/4"), fr("1/2")].into_iter().sum::<Fraction>(),
            Fraction::one()
        );
    }

    #[test]
    fn test_fraction_parse_errors() {
        assert!(matches!("1/0".parse::<Fraction>(), Err(Error::DivideByZero(_))));
        assert!(matches!("x".parse::<Fraction>(), Err(Error::Value(_))));
        assert!(matches!("1/2/3".parse::<Fraction>(), Err(Error::Value(_))));
        assert!(matches!(Fraction::zero().recip(), Err(Error::DivideByZero(_))));
        assert_eq!(fr("-2/7").recip().unwrap(), fr("-7/2"));
    }

    #[test]
    fn test_fraction_primitive_conversions() {
        assert_eq!(fr("3/4").to_f64(), Some(0.75));
        assert_eq!(fr("3/4").to_i64(), None);
        assert_eq!(fr("-12").to_i64(), Some(-12));
        assert_eq!(Fraction::from_f64(0.375).unwrap(), fr("3/8"));
        assert_eq!(Fraction::from_f64(-2.5).unwrap(), fr("-5/2"));
        assert_eq!(Fraction::from_f64(1e20).unwrap(), fr("100000000000000000000"));
        assert!(Fraction::from_f64(f64::NAN).is_none());
    }
}
