use crate::config::{RootSearch, MAX_ROOT_RESOLUTION};
use crate::error::{Error, Result};
use crate::rings::scalar::{to_f64, Field, Scalar};
use itertools::{EitherOrBoth, Itertools};
use num_traits::{One, ToPrimitive, Zero};
use std::ops;

/// Univariate polynomial, coefficient `i` multiplying `x^i`.
///
/// Trailing zero coefficients are always trimmed, so the leading coefficient
/// is non-zero except for the zero polynomial, which is stored as `[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<T> {
    coefs: Vec<T>,
}

impl<T: Scalar> Polynomial<T> {
    pub fn new(mut coefs: Vec<T>) -> Polynomial<T> {
        while coefs.len() > 1 && coefs.last().map_or(false, |c| c.is_zero()) {
            coefs.pop();
        }
        if coefs.is_empty() {
            coefs.push(T::zero());
        }
        Polynomial { coefs }
    }

    /// `c * x^degree`
    pub fn monomial(c: T, degree: usize) -> Polynomial<T> {
        let mut coefs = vec![T::zero(); degree];
        coefs.push(c);
        Polynomial::new(coefs)
    }

    pub fn constant(c: T) -> Polynomial<T> {
        Polynomial::new(vec![c])
    }

    pub fn degree(&self) -> usize {
        self.coefs.len() - 1
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefs
    }

    pub fn coefficient(&self, i: usize) -> T {
        self.coefs.get(i).cloned().unwrap_or_else(T::zero)
    }

    pub fn leading_coefficient(&self) -> &T {
        &self.coefs[self.coefs.len() - 1]
    }

    /// Non-zero terms as `(degree, coefficient)`, highest degree first.
    pub fn terms(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.coefs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero())
    }

    pub fn evaluate(&self, x: &T) -> T {
        self.coefs
            .iter()
            .rev()
            .fold(T::zero(), |acc, c| acc * x.clone() + c.clone())
    }

    pub fn add_scalar(&self, c: &T) -> Polynomial<T> {
        let mut coefs = self.coefs.clone();
        coefs[0] = coefs[0].clone() + c.clone();
        Polynomial::new(coefs)
    }

    pub fn scale(&self, c: &T) -> Polynomial<T> {
        Polynomial::new(self.coefs.iter().map(|x| x.clone() * c.clone()).collect())
    }
}

impl<T: Field> Polynomial<T> {
    pub fn div_scalar(&self, c: &T) -> Result<Polynomial<T>> {
        if c.is_zero() {
            return Err(Error::DivideByZero("polynomial divided by zero".into()));
        }
        Ok(self.scale(&(T::one() / c.clone())))
    }

    /// Long division: returns `(quotient, remainder)` with
    /// `quotient * divisor + remainder == self` and the remainder either zero
    /// or of lower degree than the divisor.
    pub fn div_rem(&self, divisor: &Polynomial<T>) -> Result<(Polynomial<T>, Polynomial<T>)> {
        if divisor.is_zero() {
            return Err(Error::DivideByZero("division by the zero polynomial".into()));
        }
        let d = divisor.degree();
        if d == 0 {
            return Ok((self.div_scalar(&divisor.coefs[0])?, Polynomial::zero()));
        }
        if self.degree() < d {
            return Ok((Polynomial::zero(), self.clone()));
        }

        let lead = divisor.leading_coefficient().clone();
        let mut remainder = self.coefs.clone();
        let mut quotient = vec![T::zero(); self.degree() - d + 1];

        for shift in (0..quotient.len()).rev() {
            let top = shift + d;
            if remainder[top].is_zero() {
                continue;
            }
            let factor = remainder[top].clone() / lead.clone();
            for (i, c) in divisor.coefs[..d].iter().enumerate() {
                remainder[shift + i] = remainder[shift + i].clone() - factor.clone() * c.clone();
            }
            // Cleared exactly, even when T rounds.
            remainder[top] = T::zero();
            quotient[shift] = factor;
        }
        remainder.truncate(d);

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }
}

impl<T: Scalar + ToPrimitive> Polynomial<T> {
    pub fn evaluate_f64(&self, x: f64) -> f64 {
        self.coefs
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + to_f64(c))
    }

    /// Brackets real roots by walking `[-span, span]` in steps of
    /// `10^-resolution` and recording every sign change, stopping once
    /// `degree` roots are found.
    ///
    /// Roots of even multiplicity (no sign change) and roots outside the span
    /// are not reported.
    ///
    /// Only `|span|` matters and a non-finite span finds nothing. `resolution`
    /// is capped at `MAX_ROOT_RESOLUTION`. Work grows with
    /// `span * 10^resolution`, so callers should keep both small.
    pub fn find_rough_roots(&self, span: f64, resolution: u32) -> Vec<f64> {
        let mut roots = vec![];
        let degree = self.degree();
        if degree == 0 || !span.is_finite() {
            return roots;
        }

        let scale = 10f64.powi(resolution.min(MAX_ROOT_RESOLUTION) as i32);
        let half = (span.abs() * scale).round().min((i64::MAX / 2) as f64) as i64;
        let start = -half;
        let steps = 2 * half;
        let mut positive = self.evaluate_f64(start as f64 / scale) > 0.0;

        for k in 1..=steps {
            let x = (start + k) as f64 / scale;
            let last = positive;
            positive = self.evaluate_f64(x) > 0.0;

            if last != positive {
                roots.push((x * scale).round() / scale);
                if roots.len() == degree {
                    break;
                }
            }
        }
        roots
    }

    pub fn rough_roots(&self) -> Vec<f64> {
        let search = RootSearch::default();
        self.find_rough_roots(search.span, search.resolution)
    }
}

impl<T: Scalar> Zero for Polynomial<T> {
    fn zero() -> Polynomial<T> {
        Polynomial {
            coefs: vec![T::zero()],
        }
    }

    fn is_zero(&self) -> bool {
        self.coefs.len() == 1 && self.coefs[0].is_zero()
    }
}

impl<T: Scalar> One for Polynomial<T> {
    fn one() -> Polynomial<T> {
        Polynomial::constant(T::one())
    }
}

impl<T: Scalar> ops::Add<&Polynomial<T>> for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn add(self, rhs: &Polynomial<T>) -> Polynomial<T> {
        Polynomial::new(
            self.coefs
                .iter()
                .zip_longest(rhs.coefs.iter())
                .map(|pair| match pair {
                    EitherOrBoth::Both(a, b) => a.clone() + b.clone(),
                    EitherOrBoth::Left(a) => a.clone(),
                    EitherOrBoth::Right(b) => b.clone(),
                })
                .collect(),
        )
    }
}

impl<T: Scalar> ops::Sub<&Polynomial<T>> for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, rhs: &Polynomial<T>) -> Polynomial<T> {
        Polynomial::new(
            self.coefs
                .iter()
                .zip_longest(rhs.coefs.iter())
                .map(|pair| match pair {
                    EitherOrBoth::Both(a, b) => a.clone() - b.clone(),
                    EitherOrBoth::Left(a) => a.clone(),
                    EitherOrBoth::Right(b) => -b.clone(),
                })
                .collect(),
        )
    }
}

impl<T: Scalar> ops::Mul<&Polynomial<T>> for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: &Polynomial<T>) -> Polynomial<T> {
        let mut coefs = vec![T::zero(); self.coefs.len() + rhs.coefs.len() - 1];
        for (i, a) in self.coefs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coefs.iter().enumerate() {
                coefs[i + j] = coefs[i + j].clone() + a.clone() * b.clone();
            }
        }
        Polynomial::new(coefs)
    }
}

impl<T: Scalar> ops::Neg for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn neg(self) -> Polynomial<T> {
        Polynomial {
            coefs: self.coefs.iter().map(|c| -c.clone()).collect(),
        }
    }
}

// By-value operators, needed for `Polynomial<T>` to be a `Scalar` itself.
macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl<T: Scalar> ops::$imp for Polynomial<T> {
            type Output = Polynomial<T>;

            fn $method(self, rhs: Polynomial<T>) -> Polynomial<T> {
                ops::$imp::$method(&self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl<T: Scalar> ops::Neg for Polynomial<T> {
    type Output = Polynomial<T>;

    fn neg(self) -> Polynomial<T> {
        -&self
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
