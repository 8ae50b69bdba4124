use crate::error::{Error, Result};
use crate::matrix::elementary::ElementaryMatrix;
use crate::matrix::vector::{self, Vector};
use crate::polynomial::Polynomial;
use crate::rings::scalar::{Field, Scalar};
use log::trace;
use num_traits::{One, Zero};
use std::ops;

/// Rectangular grid of scalars stored row-major. All rows have `cols` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Matrix<T> {
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<T>) -> Matrix<T> {
        debug_assert_eq!(rows * cols, cells.len());
        Matrix { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.cells[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Rows in order, as slices.
    pub fn iter_rows(&self) -> std::slice::Chunks<'_, T> {
        self.cells.chunks(self.cols)
    }

    pub fn map<U, F: Fn(&T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Fails unless there is at least one row, one column, and every row has
    /// the same length.
    pub fn from_list(lines: Vec<Vec<T>>) -> Result<Matrix<T>> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(Error::Shape("a matrix needs at least one cell".into()));
        }
        if let Some(bad) = lines.iter().position(|l| l.len() != cols) {
            return Err(Error::Shape(format!(
                "row {} has {} elements, expected {}",
                bad,
                lines[bad].len(),
                cols
            )));
        }

        Ok(Matrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    pub fn from_rows(rows: Vec<Vector<T>>) -> Result<Matrix<T>> {
        Matrix::from_list(rows.into_iter().map(Vector::into_inner).collect())
    }

    pub fn to_list(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(|line| line.into()).collect()
    }

    pub fn row_vectors(&self) -> Result<Vec<Vector<T>>> {
        self.iter_rows().map(|line| Vector::new(line.to_vec())).collect()
    }

    /// # Panics
    /// If `n == 0`; a matrix always has at least one row and column.
    pub fn identity(n: usize) -> Matrix<T> {
        assert!(n > 0, "identity matrix needs at least one row");
        Matrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { T::one() } else { T::zero() }))
                .collect(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix<T>> {
        if rows == 0 || cols == 0 {
            return Err(Error::Shape(format!("{}x{} matrix", rows, cols)));
        }
        Ok(Matrix {
            rows,
            cols,
            cells: vec![T::zero(); rows * cols],
        })
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col].clone()
    }

    pub fn column(&self, col: usize) -> Vec<T> {
        (0..self.rows).map(|r| self.at(r, col)).collect()
    }

    pub fn columns(&self) -> Vec<Vec<T>> {
        (0..self.cols).map(|c| self.column(c)).collect()
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_square() && (0..self.rows).all(|r| (0..r).all(|c| self.get(r, c) == self.get(c, r)))
    }

    pub fn transpose(&self) -> Matrix<T> {
        Matrix {
            rows: self.cols,
            cols: self.rows,
            cells: (0..self.cols)
                .flat_map(|c| (0..self.rows).map(move |r| self.at(r, c)))
                .collect(),
        }
    }

    pub fn scale(&self, scalar: &T) -> Matrix<T> {
        self.map(|x| x.clone() * scalar.clone())
    }

    /// Submatrix without row `i` and column `j`.
    pub fn get_minor_for(&self, i: usize, j: usize) -> Result<Matrix<T>> {
        if self.rows < 2 || self.cols < 2 {
            return Err(Error::Shape(format!(
                "{}x{} matrix has no minors",
                self.rows, self.cols
            )));
        }
        if i >= self.rows || j >= self.cols {
            return Err(Error::Shape(format!(
                "minor ({}, {}) outside a {}x{} matrix",
                i, j, self.rows, self.cols
            )));
        }
        Ok(self.minor(i, j))
    }

    fn minor(&self, i: usize, j: usize) -> Matrix<T> {
        Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            cells: self
                .iter_rows()
                .enumerate()
                .filter(|(r, _)| *r != i)
                .flat_map(|(_, row)| {
                    row.iter()
                        .enumerate()
                        .filter(|(c, _)| *c != j)
                        .map(|(_, x)| x.clone())
                })
                .collect(),
        }
    }

    /// Cofactor expansion along the first row. Factorial cost, so only
    /// suitable for small matrices.
    pub fn determinant(&self) -> Result<T> {
        if !self.is_square() {
            return Err(Error::Shape(format!(
                "determinant of a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        Ok(self.cofactor_expansion())
    }

    fn cofactor_expansion(&self) -> T {
        match self.rows {
            1 => self.at(0, 0),
            2 => self.at(0, 0) * self.at(1, 1) - self.at(0, 1) * self.at(1, 0),
            n => (0..n)
                .filter(|&j| !self.get(0, j).is_zero())
                .fold(T::zero(), |acc, j| {
                    let term = self.at(0, j) * self.minor(0, j).cofactor_expansion();
                    if j % 2 == 0 {
                        acc + term
                    } else {
                        acc - term
                    }
                }),
        }
    }

    /// `det(M - λI)` as a polynomial in λ.
    pub fn characteristic_polynomial(&self) -> Result<Polynomial<T>> {
        if !self.is_square() {
            return Err(Error::Shape(format!(
                "characteristic polynomial of a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        let cols = self.cols;
        let shifted = Matrix {
            rows: self.rows,
            cols,
            cells: self
                .cells
                .iter()
                .enumerate()
                .map(|(k, x)| {
                    if k / cols == k % cols {
                        Polynomial::new(vec![x.clone(), -T::one()])
                    } else {
                        Polynomial::constant(x.clone())
                    }
                })
                .collect(),
        };
        shifted.determinant()
    }
}

impl<T: Scalar + PartialOrd> Matrix<T> {
    /// Leading principal minor test.
    pub fn is_positive_definite(&self) -> Result<bool> {
        if !self.is_square() {
            return Err(Error::Shape(format!(
                "positive definiteness of a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        if self.rows == 1 {
            return Ok(*self.get(0, 0) > T::zero());
        }
        if self.determinant()? <= T::zero() {
            return Ok(false);
        }
        let last = self.rows - 1;
        self.minor(last, last).is_positive_definite()
    }
}

impl<T: Field> Matrix<T> {
    /// Gauss-Jordan elimination expressed as a product of elementary
    /// matrices. After every step `ans * self == work`, so once `work` is the
    /// identity `ans` is the inverse.
    pub fn inverse(&self) -> Result<Matrix<T>> {
        if !self.is_square() || self.determinant()?.is_zero() {
            return Err(Error::SingularMatrix);
        }

        let n = self.rows;
        let mut ans = Matrix::identity(n);
        let mut work = self.clone();

        for col in 0..n {
            let pivot_row = (col..n)
                .find(|&r| !work.get(r, col).is_zero())
                .ok_or_else(|| {
                    Error::Algorithm(format!("could not find a pivot for column {}", col))
                })?;

            if pivot_row != col {
                trace!("swapping rows {} and {}", col, pivot_row);
                let swap = ElementaryMatrix::swap(n, col, pivot_row)?;
                ans = swap.apply(&ans)?;
                work = swap.apply(&work)?;
            }

            let pivot = ElementaryMatrix::pivot(&work, col)?;
            ans = pivot.apply(&ans)?;
            work = pivot.apply(&work)?;
        }

        if work != Matrix::identity(n) {
            return Err(Error::Algorithm(
                "elimination did not reach the identity".into(),
            ));
        }
        Ok(ans)
    }

    /// `p = -1` is the inverse, `p = 0` the identity, `p > 0` repeated
    /// multiplication. Uncached; see `PowerCache` for the memoized form.
    pub fn power(&self, p: i32) -> Result<Matrix<T>> {
        if !self.is_square() {
            return Err(Error::Shape(format!(
                "power of a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        match p {
            p if p < -1 => Err(Error::Value(format!(
                "exponent {} is not supported, only p >= -1",
                p
            ))),
            -1 => self.inverse(),
            0 => Ok(Matrix::identity(self.rows)),
            _ => (1..p).try_fold(self.clone(), |acc, _| &acc * self),
        }
    }

    /// Solves the normal equations: `(AᵗA)⁻¹ Aᵗ b`.
    pub fn least_squares(&self, b: &Vector<T>) -> Result<Vector<T>> {
        let at = self.transpose();
        let normal = (&at * self)?.inverse()?;
        let projected = (&at * b)?;
        &normal * &projected
    }
}

impl<T: Scalar> ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.get(row, col)
    }
}

impl<T: Scalar> ops::Add<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn add(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Scalar> ops::Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn sub(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Scalar> Matrix<T> {
    fn zip_with(&self, rhs: &Matrix<T>, op: fn(T, T) -> T) -> Result<Matrix<T>> {
        if self.shape() != rhs.shape() {
            return Err(Error::Shape(format!(
                "{}x{} and {}x{} matrices are not the same shape",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| op(a.to_owned(), b.to_owned()))
                .collect(),
        })
    }
}

impl<T: Scalar> ops::Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn mul(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        if self.cols != rhs.rows {
            return Err(Error::Shape(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }

        Ok(Matrix {
            rows: self.rows,
            cols: rhs.cols,
            cells: (0..self.rows)
                .flat_map(|i| {
                    (0..rhs.cols).map(move |j| {
                        (0..self.cols).fold(T::zero(), |acc, k| acc + self.at(i, k) * rhs.at(k, j))
                    })
                })
                .collect(),
        })
    }
}

impl<T: Scalar> ops::Mul<&Vector<T>> for &Matrix<T> {
    type Output = Result<Vector<T>>;

    fn mul(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        if rhs.len() != self.cols {
            return Err(Error::Shape(format!(
                "vector of length {} against {} columns",
                rhs.len(),
                self.cols
            )));
        }
        let values = self
            .iter_rows()
            .map(|row| vector::dot(row, rhs.as_slice()))
            .collect::<Result<Vec<T>>>()?;
        Vector::new(values)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
