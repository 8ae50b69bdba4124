//! Exact-arithmetic toolkit: matrices and vectors over any ring, univariate
//! polynomials, and discrete-time Markov chain analysis.

pub mod matrix {
    pub mod elementary;
    pub mod matrix;
    pub mod power_cache;
    pub mod vector;
}
pub mod rings {
    pub mod fraction;
    pub mod scalar;
}

pub mod config;
pub mod error;
pub mod markov_chain;
pub mod polynomial;

pub use error::{Error, Result};
pub use markov_chain::{ClassKind, CommunicationClass, MarkovChain};
pub use matrix::elementary::{ElementaryMatrix, RowOperation};
pub use matrix::matrix::Matrix;
pub use matrix::power_cache::PowerCache;
pub use matrix::vector::{Norm, Vector};
pub use polynomial::Polynomial;
pub use rings::fraction::Fraction;
pub use rings::scalar::{Field, RealScalar, Scalar};
