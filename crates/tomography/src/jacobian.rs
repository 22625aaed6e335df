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

//! First-order response of one measured quantity to one error generator.
//!
//! Every function here computes a single entry of a design matrix: the derivative, at zero error
//! rate, of an outcome probability or observable expectation value with respect to the rate of a
//! single Hamiltonian, stochastic or affine error generator.  A `prep`/`meas` pair always
//! describes a product state and a product measurement, so each element factorizes over qubits.

use idletomo_pauli::{commute_parity, Basis, Outcome, Pauli, PauliOp, PauliState, Sign};

use crate::error::{IdleTomographyError, Result};

fn check_qubits(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(IdleTomographyError::QubitCountMismatch { expected, found });
    }
    Ok(())
}

/// The shared basis of `prep` and `meas` on `qubit`, or an error if they differ there.
fn shared_basis(prep: &PauliState, meas: &PauliState, qubit: usize) -> Result<Basis> {
    let basis = prep.basis(qubit);
    if basis != meas.basis(qubit) {
        return Err(IdleTomographyError::BasisMismatch { qubit });
    }
    Ok(basis)
}

/// Response of the expectation value of `observable` to a Hamiltonian `error`, starting from
/// `prep`.
///
/// To first order `d<O>/de = Tr(i[E, O] rho)`, which vanishes when the error and observable
/// commute.
pub fn hamiltonian_jac_element(
    prep: &PauliState,
    error: &PauliOp,
    observable: &PauliOp,
) -> Result<f64> {
    match error.icommutator_over_2(observable)? {
        Some(commutator) => Ok(commutator.statedot(prep)?),
        None => Ok(0.0),
    }
}

/// The outcome a stochastic Pauli `error` produces with certainty when `prep` is measured in
/// `meas`.
///
/// `prep` and `meas` must share their bases on every qubit, with independent signs.  A qubit
/// reads `0` when the signs agree, unless the error anticommutes with the basis there, which
/// inverts the bit.
pub fn stochastic_outcome(
    prep: &PauliState,
    error: &PauliOp,
    meas: &PauliState,
) -> Result<Outcome> {
    check_qubits(prep.num_qubits(), meas.num_qubits())?;
    check_qubits(prep.num_qubits(), error.num_qubits())?;
    let bits = (0..prep.num_qubits())
        .map(|qubit| {
            let basis = shared_basis(prep, meas, qubit)?;
            let signs_differ = prep.sign(qubit) != meas.sign(qubit);
            let commutes = commute_parity(Pauli::from(basis), error.pauli(qubit)) == 1;
            Ok(signs_differ == commutes)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Outcome::new(bits))
}

/// `1` if the stochastic `error` produces exactly `outcome`, and `0` otherwise.
pub fn stochastic_jac_element(
    prep: &PauliState,
    error: &PauliOp,
    meas: &PauliState,
    outcome: &Outcome,
) -> Result<f64> {
    let produced = stochastic_outcome(prep, error, meas)?;
    Ok(if produced == *outcome { 1.0 } else { 0.0 })
}

/// Response of the probability of `outcome` to an affine `error`.
///
/// An affine error labelled `ZI` is the map `AffZ ⊗ Id`, so an identity letter means "no affine
/// action on this qubit" rather than a shift along `I`.  The result is always `-1`, `0` or `1`.
pub fn affine_jac_element(
    prep: &PauliState,
    error: &PauliOp,
    meas: &PauliState,
    outcome: &Outcome,
) -> Result<f64> {
    check_qubits(prep.num_qubits(), meas.num_qubits())?;
    check_qubits(prep.num_qubits(), error.num_qubits())?;
    check_qubits(prep.num_qubits(), outcome.num_qubits())?;
    let mut product = 1.0;
    for qubit in 0..prep.num_qubits() {
        let basis = shared_basis(prep, meas, qubit)?;
        let bit = outcome.bit(qubit);
        let meas_sign = meas.sign(qubit);
        let factor = match error.pauli(qubit).basis() {
            None => {
                let out_sign = if bit { Sign::Minus } else { Sign::Plus };
                if prep.sign(qubit) * meas_sign * out_sign == Sign::Plus {
                    1.0
                } else {
                    0.0
                }
            }
            Some(letter) if letter != basis => 0.0,
            Some(_) if bit => -meas_sign.as_f64(),
            Some(_) => meas_sign.as_f64(),
        };
        if factor == 0.0 {
            return Ok(0.0);
        }
        product *= factor;
    }
    Ok(product)
}

/// Response of the expectation value of `observable` to an affine `error`, starting from `prep`.
///
/// `meas` only fixes the basis convention of the observable and does not enter the value.  The
/// result is a product of per-qubit factors drawn from `{0, ±1, 2}`; the factor `2` comes from
/// the observable not being normalized.
pub fn affine_jac_obs_element(
    prep: &PauliState,
    error: &PauliOp,
    meas: &PauliState,
    observable: &PauliOp,
) -> Result<f64> {
    check_qubits(prep.num_qubits(), meas.num_qubits())?;
    check_qubits(prep.num_qubits(), error.num_qubits())?;
    check_qubits(prep.num_qubits(), observable.num_qubits())?;
    let mut product = 1.0;
    for (qubit, (obs, err)) in observable
        .paulis()
        .iter()
        .zip(error.paulis().iter())
        .enumerate()
    {
        let factor = match (obs.is_identity(), err.is_identity()) {
            (true, true) => 1.0,
            (true, false) => 0.0,
            (false, true) => {
                if *obs == Pauli::from(prep.basis(qubit)) {
                    prep.sign(qubit).as_f64()
                } else {
                    0.0
                }
            }
            (false, false) => {
                if obs == err {
                    2.0
                } else {
                    0.0
                }
            }
        };
        if factor == 0.0 {
            return Ok(0.0);
        }
        product *= factor;
    }
    Ok(product)
}
