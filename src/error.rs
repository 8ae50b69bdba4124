use std::fmt;

/// Every failure the toolkit can report. Raised synchronously at the
/// violating call, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Dimension mismatch between operands, or a malformed grid.
    Shape(String),
    /// Inverse or least squares requested on a matrix with zero determinant
    /// (or a non-square one).
    SingularMatrix,
    /// Division by a zero scalar, zero polynomial or zero probability.
    DivideByZero(String),
    /// Invalid Markov chain parameters.
    Construction(String),
    /// Elimination found no pivot although the determinant is non-zero.
    Algorithm(String),
    /// Argument outside the supported domain.
    Value(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Shape(msg) => write!(f, "shape error: {}", msg),
            Error::SingularMatrix => write!(f, "matrix is singular"),
            Error::DivideByZero(msg) => write!(f, "division by zero: {}", msg),
            Error::Construction(msg) => write!(f, "invalid construction: {}", msg),
            Error::Algorithm(msg) => write!(f, "algorithm invariant violated: {}", msg),
            Error::Value(msg) => write!(f, "invalid value: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Shape("2x3 vs 3x3".into()).to_string(),
            "shape error: 2x3 vs 3x3"
        );
        assert_eq!(Error::SingularMatrix.to_string(), "matrix is singular");
        assert_eq!(
            Error::DivideByZero("zero polynomial".into()).to_string(),
            "division by zero: zero polynomial"
        );
    }
}
