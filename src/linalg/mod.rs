//! Gaussian elimination kernels for the Radau iteration matrices.
//!
//! Each decomposition triangularizes its matrix in place with partial
//! pivoting and records the row interchanges in a [`Pivots`]; the matching
//! solve routine applies them together with forward and back substitution.
//! Kernels come in three layouts (full, band, upper Hessenberg) and each has
//! a complex counterpart operating on separate real and imaginary matrices.
//! Complex kernels pivot on `|Re| + |Im|`.
//!
//! Band matrices use the layout of [`decb`]: column `j` of the matrix is
//! column `j` of the buffer, the diagonal is physical row `ml + mu`, and the
//! first `ml` physical rows are workspace for fill-in.
//!
//! Calling a solve routine after its decomposition reported [`Singular`]
//! gives meaningless results.
//!
//! Reference: C. B. Moler, Algorithm 423, Linear Equation Solver, CACM 15 (1972);
//! EISPACK `elmhes`.

mod banded;
mod full;
mod hessenberg;

pub use banded::{decb, decbc, solb, solbc};
pub use full::{dec, decc, sol, solc};
pub use hessenberg::{dech, dechc, elmhes, hes_reduce, hes_restore, solh, solhc};

use thiserror::Error;

use crate::Float;

/// Zero pivot found at the given 0-based elimination stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("matrix is singular at elimination stage {0}")]
pub struct Singular(pub usize);

/// Row interchanges of a decomposition plus the sign of the determinant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivots {
    /// `ip[k]` is the pivot row chosen at stage `k`.
    pub(crate) ip: Vec<usize>,
    pub(crate) sign: i8,
}

impl Pivots {
    pub fn new(n: usize) -> Self {
        Self {
            ip: (0..n).collect(),
            sign: 1,
        }
    }

    /// `+1` or `-1` after a successful decomposition, `0` if it was singular.
    pub fn det_sign(&self) -> i8 {
        self.sign
    }

    /// Pivot row chosen at stage `k`.
    pub fn row(&self, k: usize) -> usize {
        self.ip[k]
    }

    pub fn len(&self) -> usize {
        self.ip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ip.is_empty()
    }

    fn singular(&mut self, k: usize) -> Result<(), Singular> {
        self.sign = 0;
        Err(Singular(k))
    }
}

/// Complex quotient `(br + i·bi) / (ar + i·ai)`.
#[inline]
pub(crate) fn cdiv(br: Float, bi: Float, ar: Float, ai: Float) -> (Float, Float) {
    let den = ar * ar + ai * ai;
    ((br * ar + bi * ai) / den, (bi * ar - br * ai) / den)
}
