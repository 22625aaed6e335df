// This code is part of Qiskit.
//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! SVD-based rank, pseudo-inverse and least squares on `ndarray` data.
//!
//! Design matrices are built with `ndarray`; the decompositions are done by `nalgebra`, and the
//! conversion happens at this boundary only.  Cutoffs follow the usual LAPACK-driver conventions
//! so that results agree with other numerical stacks.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{IdleTomographyError, Result};

/// Relative cutoff below which singular values are dropped by [pinv].
pub const PINV_RCOND: f64 = 1e-15;

fn to_dmatrix(a: ArrayView2<f64>) -> DMatrix<f64> {
    let (rows, cols) = a.dim();
    DMatrix::from_fn(rows, cols, |i, j| a[[i, j]])
}

fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}

/// Numerical rank of `a`: the number of singular values above
/// `max(sv) * max(rows, cols) * eps`.
pub fn matrix_rank(a: ArrayView2<f64>) -> usize {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return 0;
    }
    let singular_values = to_dmatrix(a).singular_values();
    let tol = singular_values.max() * rows.max(cols) as f64 * f64::EPSILON;
    singular_values.iter().filter(|s| **s > tol).count()
}

/// Moore-Penrose pseudo-inverse of `a`, of shape `(cols, rows)`.
///
/// Singular values at or below `PINV_RCOND` times the largest one are treated as zero, so a
/// rank-deficient `a` gives the minimum-norm inverse on its row space.
pub fn pinv(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Ok(Array2::zeros((cols, rows)));
    }
    let svd = to_dmatrix(a).svd(true, true);
    let cutoff = PINV_RCOND * svd.singular_values.max();
    let inverse = svd
        .pseudo_inverse(cutoff)
        .map_err(IdleTomographyError::Inversion)?;
    Ok(from_dmatrix(&inverse))
}

/// Minimum-norm least-squares solution of `a x = b`, ignoring singular values at or below
/// `rcond` times the largest.
pub fn lstsq(a: ArrayView2<f64>, b: ArrayView1<f64>, rcond: f64) -> Result<Array1<f64>> {
    let (rows, cols) = a.dim();
    if b.len() != rows {
        return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
    }
    if rows == 0 || cols == 0 {
        return Ok(Array1::zeros(cols));
    }
    let svd = to_dmatrix(a).svd(true, true);
    let cutoff = rcond * svd.singular_values.max();
    let rhs = DVector::from_iterator(rows, b.iter().copied());
    let solution = svd
        .solve(&rhs, cutoff)
        .map_err(IdleTomographyError::FitFailed)?;
    Ok(solution.iter().copied().collect())
}

/// The result of pseudo-inverting one design matrix.
#[derive(Clone, Debug)]
pub struct Inversion {
    /// `pinv(J) · observed`.
    pub rates: Array1<f64>,
    /// Numerical rank of `J`.
    pub rank: usize,
    /// Number of columns of `J`, i.e. of rates solved for.
    pub columns: usize,
}

impl Inversion {
    /// Is every rate independently determined by the data?
    #[inline]
    pub fn is_full_rank(&self) -> bool {
        self.rank >= self.columns
    }
}

/// Solve `J · rates = observed` in the minimum-norm least-squares sense.
pub fn invert_design_matrix(
    jacobian: ArrayView2<f64>,
    observed: ArrayView1<f64>,
) -> Result<Inversion> {
    let (rows, columns) = jacobian.dim();
    if observed.len() != rows {
        return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
    }
    let rank = matrix_rank(jacobian);
    let rates = pinv(jacobian)?.dot(&observed);
    Ok(Inversion {
        rates,
        rank,
        columns,
    })
}
