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

//! Enumeration of the errors, outcomes and observables that idle tomography tracks.
//!
//! The order produced here is the column order of every design matrix and the row order within
//! each fiducial pair, so it must not change.

use idletomo_pauli::{Outcome, Pauli, PauliOp, PauliState};
use itertools::Itertools;

use crate::error::{IdleTomographyError, Result};

const NON_IDENTITY: [Pauli; 3] = [Pauli::X, Pauli::Y, Pauli::Z];

fn check_weight(max_weight: usize) -> Result<()> {
    if !(1..=2).contains(&max_weight) {
        return Err(IdleTomographyError::UnsupportedWeight(max_weight));
    }
    Ok(())
}

/// Every Pauli error generator of weight at most `max_weight` on `num_qubits` qubits.
///
/// Weight-1 errors come first, qubit-major with letters `X`, `Y`, `Z`, then weight-2 errors over
/// qubit pairs `i < j` in lexicographic order with the letters of both qubits ranging over
/// `{X, Y, Z}`.
pub fn all_errors(num_qubits: usize, max_weight: usize) -> Result<Vec<PauliOp>> {
    check_weight(max_weight)?;
    let mut out = Vec::new();
    for qubit in 0..num_qubits {
        out.extend(
            NON_IDENTITY
                .iter()
                .map(|&letter| PauliOp::weight1(num_qubits, qubit, letter)),
        );
    }
    if max_weight >= 2 {
        for (i, j) in (0..num_qubits).tuple_combinations() {
            out.extend(
                NON_IDENTITY
                    .iter()
                    .cartesian_product(NON_IDENTITY.iter())
                    .map(|(&first, &second)| PauliOp::weight2(num_qubits, i, j, first, second)),
            );
        }
    }
    Ok(out)
}

/// The outcome seen with no error at all: each qubit reads `1` exactly when its prep and
/// measurement signs differ.
pub fn ideal_outcome(prep: &PauliState, meas: &PauliState) -> Result<Outcome> {
    if prep.num_qubits() != meas.num_qubits() {
        return Err(IdleTomographyError::QubitCountMismatch {
            expected: prep.num_qubits(),
            found: meas.num_qubits(),
        });
    }
    if let Some(qubit) = (0..prep.num_qubits()).find(|&q| prep.basis(q) != meas.basis(q)) {
        return Err(IdleTomographyError::BasisMismatch { qubit });
    }
    Ok(Outcome::new(
        prep.signs()
            .iter()
            .zip(meas.signs())
            .map(|(p, m)| p != m)
            .collect(),
    ))
}

/// Every outcome reached from the ideal one by flipping between one and `max_weight` bits.
///
/// Single flips come first in qubit order, then pairs `i < j`.  The ideal outcome itself is not
/// included.
pub fn all_outcomes(
    prep: &PauliState,
    meas: &PauliState,
    max_weight: usize,
) -> Result<Vec<Outcome>> {
    check_weight(max_weight)?;
    let ideal = ideal_outcome(prep, meas)?;
    let num_qubits = ideal.num_qubits();
    let mut out = (0..num_qubits)
        .map(|qubit| ideal.flip(&[qubit]))
        .collect::<Vec<_>>();
    if max_weight >= 2 {
        out.extend(
            (0..num_qubits)
                .tuple_combinations()
                .map(|(i, j)| ideal.flip(&[i, j])),
        );
    }
    Ok(out)
}

/// The Pauli observables of weight at most `max_weight` that are diagonal in the basis of
/// `meas`: the measured letter on one qubit (in qubit order), then on each pair `i < j`.
pub fn all_observables(meas: &PauliState, max_weight: usize) -> Result<Vec<PauliOp>> {
    check_weight(max_weight)?;
    let num_qubits = meas.num_qubits();
    let letter = |qubit: usize| Pauli::from(meas.basis(qubit));
    let mut out = (0..num_qubits)
        .map(|qubit| PauliOp::weight1(num_qubits, qubit, letter(qubit)))
        .collect::<Vec<_>>();
    if max_weight >= 2 {
        out.extend(
            (0..num_qubits)
                .tuple_combinations()
                .map(|(i, j)| PauliOp::weight2(num_qubits, i, j, letter(i), letter(j))),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels<T: ToString>(items: &[T]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn errors_are_weight_then_qubit_major() {
        let errors = all_errors(3, 2).unwrap();
        assert_eq!(errors.len(), 3 * 3 + 3 * 9);
        assert_eq!(
            labels(&errors[..6]),
            vec!["XII", "YII", "ZII", "IXI", "IYI", "IZI"]
        );
        assert_eq!(labels(&errors[9..12]), vec!["XXI", "XYI", "XZI"]);
        assert_eq!(errors[18].to_string(), "XIX");
        assert_eq!(errors.last().unwrap().to_string(), "IZZ");
        assert_eq!(all_errors(1, 2).unwrap().len(), 3);
    }

    #[test]
    fn unsupported_weights_fail() {
        assert!(matches!(
            all_errors(3, 3),
            Err(IdleTomographyError::UnsupportedWeight(3))
        ));
        assert!(matches!(
            all_errors(3, 0),
            Err(IdleTomographyError::UnsupportedWeight(0))
        ));
    }

    #[test]
    fn outcomes_flip_around_the_ideal() {
        let prep: PauliState = "+X-Y+Z".parse().unwrap();
        let meas: PauliState = "+X+Y+Z".parse().unwrap();
        assert_eq!(ideal_outcome(&prep, &meas).unwrap().to_string(), "010");
        assert_eq!(
            labels(&all_outcomes(&prep, &meas, 1).unwrap()),
            vec!["110", "000", "011"]
        );
        assert_eq!(
            labels(&all_outcomes(&prep, &meas, 2).unwrap()),
            vec!["110", "000", "011", "100", "111", "001"]
        );
    }

    #[test]
    fn outcomes_need_matching_bases() {
        let prep: PauliState = "XY".parse().unwrap();
        let meas: PauliState = "XZ".parse().unwrap();
        assert!(matches!(
            all_outcomes(&prep, &meas, 1),
            Err(IdleTomographyError::BasisMismatch { qubit: 1 })
        ));
    }

    #[test]
    fn observables_follow_the_measured_bases() {
        let meas: PauliState = "-Y+Z+X".parse().unwrap();
        assert_eq!(
            labels(&all_observables(&meas, 2).unwrap()),
            vec!["YII", "IZI", "IIX", "YZI", "YIX", "IZX"]
        );
    }
}
