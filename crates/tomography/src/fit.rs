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

//! Observed error rates: the slope of a measured signal against the number of idle repetitions.

use idletomo_pauli::{Circuit, Outcome, PauliOp};
use ndarray::{Array1, Array2, Axis};

use crate::dataset::{DataSet, OutcomeCounts};
use crate::error::{IdleTomographyError, Result};
use crate::fidpairs::{idle_experiment, FidPair, PauliDicts};
use crate::linalg::lstsq;

/// The fitted signal of one outcome or observable of one fiducial pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservedRateInfo {
    rate: f64,
    fit_order: usize,
    fit_coeffs: Array1<f64>,
    data: Array1<f64>,
    weights: Array1<f64>,
}

impl ObservedRateInfo {
    /// The observed error rate per idle repetition.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub fn fit_order(&self) -> usize {
        self.fit_order
    }

    /// Polynomial coefficients, highest power first.
    #[inline]
    pub fn fit_coeffs(&self) -> &Array1<f64> {
        &self.fit_coeffs
    }

    /// The data point at each idle length.
    #[inline]
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    /// The fit weight of each data point.
    #[inline]
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }
}

fn check_fit_args(max_lengths: &[usize], fit_order: usize) -> Result<()> {
    if !(1..=2).contains(&fit_order) {
        return Err(IdleTomographyError::UnsupportedFitOrder(fit_order));
    }
    if max_lengths.is_empty() {
        return Err(IdleTomographyError::EmptyLengthSweep);
    }
    Ok(())
}

/// Weighted least-squares polynomial fit of degree `order`, coefficients highest power first.
///
/// Each row of the Vandermonde matrix and of `y` is multiplied by its weight and each column is
/// normalized before solving, with a relative singular-value cutoff of `len(x) * eps`.
pub fn polyfit(x: &[f64], y: &[f64], w: &[f64], order: usize) -> Result<Array1<f64>> {
    if y.len() != x.len() || w.len() != x.len() {
        return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
    }
    let mut lhs = Array2::from_shape_fn((x.len(), order + 1), |(i, j)| {
        x[i].powi((order - j) as i32) * w[i]
    });
    let rhs = Array1::from_shape_fn(y.len(), |i| y[i] * w[i]);
    let scale = lhs
        .map_axis(Axis(0), |col| col.dot(&col).sqrt())
        .mapv(|norm| if norm == 0.0 { 1.0 } else { norm });
    lhs /= &scale;
    let rcond = x.len() as f64 * f64::EPSILON;
    let coeffs = lstsq(lhs.view(), rhs.view(), rcond)?;
    Ok(coeffs / &scale)
}

/// Sign with `sign(0) == 0`.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// The rate read off fitted coefficients.
///
/// For a quadratic `c0 L^2 + c1 L + c2` this is the slope at the point where the fitted signal
/// would vanish; with no such point the linear coefficient is used.
fn rate_from_coeffs(coeffs: &Array1<f64>, fit_order: usize) -> f64 {
    if fit_order == 1 {
        return coeffs[0];
    }
    let det = coeffs[1] * coeffs[1] - 4.0 * coeffs[2] * coeffs[0];
    if det >= 0.0 {
        -sign(coeffs[0]) * det.sqrt()
    } else {
        coeffs[1]
    }
}

fn fit_rate(
    max_lengths: &[usize],
    data: Vec<f64>,
    weights: Vec<f64>,
    fit_order: usize,
) -> Result<ObservedRateInfo> {
    let x = max_lengths.iter().map(|&l| l as f64).collect::<Vec<_>>();
    let fit_coeffs = polyfit(&x, &data, &weights, fit_order)?;
    Ok(ObservedRateInfo {
        rate: rate_from_coeffs(&fit_coeffs, fit_order),
        fit_order,
        fit_coeffs,
        data: Array1::from(data),
        weights: Array1::from(weights),
    })
}

/// The counts of `fidpair` around each length of `idle`.
fn sweep_counts<'a>(
    dataset: &'a DataSet,
    fidpair: &FidPair,
    pauli_dicts: &PauliDicts,
    idle: &Circuit,
    max_lengths: &[usize],
) -> Result<Vec<&'a OutcomeCounts>> {
    let (prep, meas) = fidpair.to_circuits(pauli_dicts)?;
    max_lengths
        .iter()
        .map(|&length| dataset.counts(&idle_experiment(&prep, idle, length, &meas)))
        .collect()
}

/// Observed rate at which `outcome` appears when `fidpair` brackets a growing number of idles.
///
/// Each point is the observed frequency of `outcome`, weighted by the inverse of its binomial
/// standard deviation estimated with a `+1/+2` prior so that zero counts keep a finite weight.
pub fn get_obs_stochastic_err_rate(
    dataset: &DataSet,
    fidpair: &FidPair,
    pauli_dicts: &PauliDicts,
    idle: &Circuit,
    outcome: &Outcome,
    max_lengths: &[usize],
    fit_order: usize,
) -> Result<ObservedRateInfo> {
    check_fit_args(max_lengths, fit_order)?;
    let mut data = Vec::with_capacity(max_lengths.len());
    let mut weights = Vec::with_capacity(max_lengths.len());
    for counts in sweep_counts(dataset, fidpair, pauli_dicts, idle, max_lengths)? {
        let count = counts.get(outcome) as f64;
        let total = counts.total() as f64;
        let f = count / total;
        let fp = (count + 1.0) / (total + 2.0);
        data.push(f);
        weights.push(total.sqrt() / (fp * (1.0 - fp)).abs().sqrt());
    }
    fit_rate(max_lengths, data, weights, fit_order)
}

/// `count(+1 eigenvalue) - count(-1 eigenvalue)` of a weight-1 or weight-2 `Z`-type observable on
/// `support`, computed from raw bit strings.
fn eigenvalue_difference(
    counts: &OutcomeCounts,
    support: &[usize],
    num_qubits: usize,
) -> Result<f64> {
    let mut diff = 0.0;
    for (outcome, count) in counts.iter() {
        if outcome.num_qubits() != num_qubits {
            return Err(IdleTomographyError::QubitCountMismatch {
                expected: num_qubits,
                found: outcome.num_qubits(),
            });
        }
        let odd = support
            .iter()
            .fold(false, |parity, &qubit| parity ^ outcome.bit(qubit));
        if odd {
            diff -= count as f64;
        } else {
            diff += count as f64;
        }
    }
    Ok(diff)
}

/// Observed rate of change of the expectation value of `observable` when `fidpair` brackets a
/// growing number of idles.
///
/// The measured bit strings give the expectation in the frame after the measurement fiducial;
/// each point is mapped back to `observable` by the signs of the measured basis states on its
/// support.
pub fn get_obs_hamiltonian_err_rate(
    dataset: &DataSet,
    fidpair: &FidPair,
    pauli_dicts: &PauliDicts,
    idle: &Circuit,
    observable: &PauliOp,
    max_lengths: &[usize],
    fit_order: usize,
) -> Result<ObservedRateInfo> {
    check_fit_args(max_lengths, fit_order)?;
    let support = observable.support();
    if !(1..=2).contains(&support.len()) {
        return Err(IdleTomographyError::UnsupportedObservableWeight(
            support.len(),
        ));
    }
    if observable.num_qubits() != fidpair.num_qubits() {
        return Err(IdleTomographyError::QubitCountMismatch {
            expected: fidpair.num_qubits(),
            found: observable.num_qubits(),
        });
    }
    let meas_sign = support
        .iter()
        .map(|&qubit| fidpair.meas().sign(qubit).as_f64())
        .product::<f64>();

    let mut data = Vec::with_capacity(max_lengths.len());
    let mut weights = Vec::with_capacity(max_lengths.len());
    for counts in sweep_counts(dataset, fidpair, pauli_dicts, idle, max_lengths)? {
        let total = counts.total() as f64;
        let diff = eigenvalue_difference(counts, &support, fidpair.num_qubits())?;
        let fp = 0.5 + 0.5 * (diff + 1.0) / (total + 2.0);
        data.push(diff / total * meas_sign);
        weights.push(total.sqrt() / (fp * (1.0 - fp)).abs().sqrt());
    }
    fit_rate(max_lengths, data, weights, fit_order)
}
