use crate::error::{Error, Result};
use crate::rings::scalar::{abs, to_f64, RealScalar, Scalar};
use num_traits::{FromPrimitive, Zero};
use std::ops;

/// Which norm `Vector::magnitude` measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Norm {
    One,
    Euclidean,
    P(u32),
    Infinity,
}

/// Non-empty ordered sequence of scalars. Every operator returns a new vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    values: Vec<T>,
}

impl<T: Scalar> Vector<T> {
    pub fn new(values: Vec<T>) -> Result<Vector<T>> {
        if values.is_empty() {
            return Err(Error::Shape("a vector needs at least one element".into()));
        }
        Ok(Vector { values })
    }

    pub fn zeros(len: usize) -> Result<Vector<T>> {
        Vector::new(vec![T::zero(); len])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<T> {
        self.values
    }

    pub fn sum(&self) -> T {
        self.values
            .iter()
            .fold(T::zero(), |acc, x| acc + x.clone())
    }

    pub fn scale(&self, s: &T) -> Vector<T> {
        Vector {
            values: self.values.iter().map(|x| x.clone() * s.clone()).collect(),
        }
    }

    pub fn dot(&self, rhs: &Vector<T>) -> Result<T> {
        dot(&self.values, &rhs.values)
    }

    fn zip_with(&self, rhs: &Vector<T>, op: fn(T, T) -> T) -> Result<Vector<T>> {
        if self.len() != rhs.len() {
            return Err(Error::Shape(format!(
                "vectors of length {} and {}",
                self.len(),
                rhs.len()
            )));
        }
        Ok(Vector {
            values: self
                .values
                .iter()
                .zip(rhs.values.iter())
                .map(|(a, b)| op(a.clone(), b.clone()))
                .collect(),
        })
    }
}

impl<T: RealScalar> Vector<T> {
    /// Exact `Σ|x|`.
    pub fn l1_norm(&self) -> T {
        self.values
            .iter()
            .fold(T::zero(), |acc, x| acc + abs(x.clone()))
    }

    /// Largest element (not largest absolute value).
    pub fn max_element(&self) -> T {
        self.values[1..].iter().fold(self.values[0].clone(), |m, x| {
            if *x > m {
                x.clone()
            } else {
                m
            }
        })
    }

    pub fn magnitude(&self, norm: Norm) -> f64 {
        match norm {
            Norm::One => to_f64(&self.l1_norm()),
            Norm::Infinity => to_f64(&self.max_element()),
            Norm::Euclidean => self.p_norm(2),
            Norm::P(p) => self.p_norm(p),
        }
    }

    fn p_norm(&self, p: u32) -> f64 {
        let p = p as f64;
        self.values
            .iter()
            .map(|x| to_f64(x).abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p)
    }

    /// Rescales to unit length. Exact for `Norm::One` and `Norm::Infinity`.
    pub fn to_unit(&self, norm: Norm) -> Result<Vector<T>> {
        let factor = match norm {
            Norm::One | Norm::Infinity => {
                let magnitude = if norm == Norm::One {
                    self.l1_norm()
                } else {
                    self.max_element()
                };
                if magnitude.is_zero() {
                    return Err(Error::DivideByZero("vector has zero magnitude".into()));
                }
                T::one() / magnitude
            }
            Norm::Euclidean | Norm::P(_) => {
                let magnitude = self.magnitude(norm);
                if magnitude == 0.0 {
                    return Err(Error::DivideByZero("vector has zero magnitude".into()));
                }
                T::from_f64(1.0 / magnitude)
                    .ok_or_else(|| Error::Value(format!("magnitude {} not representable", magnitude)))?
            }
        };
        Ok(self.scale(&factor))
    }
}

pub(crate) fn dot<T: Scalar>(u: &[T], v: &[T]) -> Result<T> {
    if u.len() != v.len() {
        return Err(Error::Shape(format!(
            "dot product between lengths {} and {}",
            u.len(),
            v.len()
        )));
    }
    Ok(u
        .iter()
        .zip(v.iter())
        .fold(T::zero(), |acc, (a, b)| acc + a.clone() * b.clone()))
}

impl<T> ops::Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.values[i]
    }
}

impl<T: Scalar> ops::Add<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn add(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Scalar> ops::Sub<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn sub(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Scalar> ops::Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        Vector {
            values: self.values.iter().map(|x| -x.clone()).collect(),
        }
    }
}

impl<T: Scalar> TryFrom<Vec<T>> for Vector<T> {
    type Error = Error;

    fn try_from(values: Vec<T>) -> Result<Vector<T>> {
        Vector::new(values)
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::fraction::Fraction;

    fn fr(s: &str) -> Fraction {
        s.parse().unwrap()
    }

    #[test]
    fn test_vector_arithmetic() {
        let u = Vector::new(vec![1i64, 2, 3]).unwrap();
        let v = Vector::new(vec![4i64, 5, 6]).unwrap();

        assert_eq!((&u + &v).unwrap().into_inner(), vec![5, 7, 9]);
        assert_eq!((&v - &u).unwrap().into_inner(), vec![3, 3, 3]);
        assert_eq!(u.scale(&2).into_inner(), vec![2, 4, 6]);
        assert_eq!((-&u).into_inner(), vec![-1, -2, -3]);
        assert_eq!(u.dot(&v).unwrap(), 32);
        assert_eq!(u.sum(), 6);
        assert_eq!(u[2], 3);
    }

    #[test]
    fn test_vector_shape_errors() {
        let u = Vector::new(vec![1i64, 2]).unwrap();
        let v = Vector::new(vec![1i64, 2, 3]).unwrap();

        assert!(matches!(&u + &v, Err(Error::Shape(_))));
        assert!(matches!(u.dot(&v), Err(Error::Shape(_))));
        assert!(matches!(Vector::<i64>::new(vec![]), Err(Error::Shape(_))));
    }

    #[test]
    fn test_vector_norms() {
        let v = Vector::new(vec![3.0f64, -4.0]).unwrap();
        assert!((v.magnitude(Norm::Euclidean) - 5.0).abs() < 1e-12);
        assert_eq!(v.magnitude(Norm::One), 7.0);
        assert_eq!(v.magnitude(Norm::Infinity), 3.0);
        assert!((v.magnitude(Norm::P(3)) - 91f64.powf(1.0 / 3.0)).abs() < 1e-12);

        let unit = v.to_unit(Norm::Euclidean).unwrap();
        assert!((unit[0] - 0.6).abs() < 1e-12);
        assert!((unit[1] + 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_vector_to_unit_exact() {
        let v = Vector::new(vec![fr("1"), fr("2"), fr("5")]).unwrap();
        let unit = v.to_unit(Norm::One).unwrap();
        assert_eq!(unit.into_inner(), vec![fr("1/8"), fr("1/4"), fr("5/8")]);

        let unit = v.to_unit(Norm::Infinity).unwrap();
        assert_eq!(unit.into_inner(), vec![fr("1/5"), fr("2/5"), fr("1")]);

        let zero = Vector::new(vec![fr("0"), fr("0")]).unwrap();
        assert!(matches!(zero.to_unit(Norm::One), Err(Error::DivideByZero(_))));
        assert!(matches!(zero.to_unit(Norm::Euclidean), Err(Error::DivideByZero(_))));
    }
}
