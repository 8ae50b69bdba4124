use crate::error::{Error, Result};
use crate::matrix::matrix::Matrix;
use crate::rings::scalar::{Field, Scalar};
use log::trace;
use num_traits::Zero;

/// A single row operation on an `n`-row matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOperation<T> {
    Swap(usize, usize),
    Scale {
        row: usize,
        factor: T,
    },
    /// `target += factor * source`
    AddScaled {
        target: usize,
        source: usize,
        factor: T,
    },
    /// Replaces column `row` of the identity by `factors`: divides the pivot
    /// row by its pivot and clears every other entry of the pivot column.
    Pivot {
        row: usize,
        factors: Vec<T>,
    },
}

/// Identity matrix modified by one row operation. Left-multiplying by it
/// performs the operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementaryMatrix<T> {
    size: usize,
    operation: RowOperation<T>,
}

impl<T: Scalar> ElementaryMatrix<T> {
    pub fn swap(size: usize, a: usize, b: usize) -> Result<ElementaryMatrix<T>> {
        check_row(size, a)?;
        check_row(size, b)?;
        Ok(ElementaryMatrix {
            size,
            operation: RowOperation::Swap(a, b),
        })
    }

    pub fn scale(size: usize, row: usize, factor: T) -> Result<ElementaryMatrix<T>> {
        check_row(size, row)?;
        if factor.is_zero() {
            return Err(Error::Value("scaling a row by zero is not invertible".into()));
        }
        Ok(ElementaryMatrix {
            size,
            operation: RowOperation::Scale { row, factor },
        })
    }

    pub fn add_scaled(
        size: usize,
        target: usize,
        source: usize,
        factor: T,
    ) -> Result<ElementaryMatrix<T>> {
        check_row(size, target)?;
        check_row(size, source)?;
        if target == source {
            return Err(Error::Value(format!(
                "row {} cannot be added to itself",
                target
            )));
        }
        Ok(ElementaryMatrix {
            size,
            operation: RowOperation::AddScaled {
                target,
                source,
                factor,
            },
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn operation(&self) -> &RowOperation<T> {
        &self.operation
    }

    pub fn to_matrix(&self) -> Matrix<T> {
        let n = self.size;
        let mut cells = Matrix::<T>::identity(n).to_list();
        match &self.operation {
            RowOperation::Swap(a, b) => {
                if a != b {
                    cells[*a][*a] = T::zero();
                    cells[*b][*b] = T::zero();
                    cells[*a][*b] = T::one();
                    cells[*b][*a] = T::one();
                }
            }
            RowOperation::Scale { row, factor } => cells[*row][*row] = factor.clone(),
            RowOperation::AddScaled {
                target,
                source,
                factor,
            } => cells[*target][*source] = factor.clone(),
            RowOperation::Pivot { row, factors } => {
                for (r, factor) in factors.iter().enumerate() {
                    cells[r][*row] = factor.clone();
                }
            }
        }
        Matrix::from_cells(n, n, cells.into_iter().flatten().collect())
    }

    /// `self * m`.
    pub fn apply(&self, m: &Matrix<T>) -> Result<Matrix<T>> {
        &self.to_matrix() * m
    }
}

impl<T: Field> ElementaryMatrix<T> {
    /// The Gauss-Jordan step for column `col` of `m`, whose entry at
    /// `(col, col)` must be non-zero.
    pub fn pivot(m: &Matrix<T>, col: usize) -> Result<ElementaryMatrix<T>> {
        check_row(m.rows(), col)?;
        if col >= m.cols() {
            return Err(Error::Shape(format!(
                "pivot column {} outside {} columns",
                col,
                m.cols()
            )));
        }
        let pivot = m.at(col, col);
        if pivot.is_zero() {
            return Err(Error::DivideByZero(format!("pivot ({}, {}) is zero", col, col)));
        }
        trace!("pivoting on column {}", col);

        let factors = (0..m.rows())
            .map(|r| {
                if r == col {
                    T::one() / pivot.clone()
                } else {
                    -(m.at(r, col) / pivot.clone())
                }
            })
            .collect();
        Ok(ElementaryMatrix {
            size: m.rows(),
            operation: RowOperation::Pivot { row: col, factors },
        })
    }
}

fn check_row(size: usize, row: usize) -> Result<()> {
    if row >= size {
        return Err(Error::Shape(format!(
            "row {} outside a {}-row matrix",
            row, size
        )));
    }
    Ok(())
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
    fn test_elementary_operations() {
        let m = Matrix::from_list(vec![vec![1i64, 2], vec![3, 4], vec![5, 6]]).unwrap();

        let swap = ElementaryMatrix::swap(3, 0, 2).unwrap();
        assert_eq!(
            swap.apply(&m).unwrap().to_list(),
            vec![vec![5, 6], vec![3, 4], vec![1, 2]]
        );

        let scale = ElementaryMatrix::scale(3, 1, 10).unwrap();
        assert_eq!(
            scale.apply(&m).unwrap().to_list(),
            vec![vec![1, 2], vec![30, 40], vec![5, 6]]
        );

        let add = ElementaryMatrix::add_scaled(3, 2, 0, -5).unwrap();
        assert_eq!(
            add.apply(&m).unwrap().to_list(),
            vec![vec![1, 2], vec![3, 4], vec![0, -4]]
        );

        assert!(matches!(ElementaryMatrix::<i64>::swap(3, 0, 3), Err(Error::Shape(_))));
        assert!(matches!(ElementaryMatrix::scale(3, 0, 0i64), Err(Error::Value(_))));
        assert!(matches!(ElementaryMatrix::add_scaled(3, 1, 1, 2i64), Err(Error::Value(_))));
    }

    #[test]
    fn test_pivot_clears_column() {
        let m = Matrix::from_list(vec![
            vec![fr("2"), fr("4")],
            vec![fr("3"), fr("1")],
        ])
        .unwrap();
        let step = ElementaryMatrix::pivot(&m, 0).unwrap();
        assert_eq!(
            step.operation(),
            &RowOperation::Pivot {
                row: 0,
                factors: vec![fr("1/2"), fr("-3/2")]
            }
        );
        assert_eq!(
            step.apply(&m).unwrap().to_list(),
            vec![vec![fr("1"), fr("2")], vec![fr("0"), fr("-5")]]
        );

        let singular = Matrix::from_list(vec![vec![fr("0"), fr("1")], vec![fr("1"), fr("0")]]).unwrap();
        assert!(matches!(ElementaryMatrix::pivot(&singular, 0), Err(Error::DivideByZero(_))));
    }
}
