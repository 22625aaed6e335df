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

//! Tiling of small fiducial-pair templates across a whole register.

use idletomo_pauli::PauliState;
use itertools::Itertools;

use crate::error::{IdleTomographyError, Result};
use crate::fidpairs::FidPair;

/// A `k`-coverage template for `num_qubits` positions.
///
/// Each row assigns a template position in `0..k` to every qubit.  For any `k` distinct qubits
/// and any assignment of distinct template positions to them, some row realizes that assignment,
/// so tiling a weight-`k` template along the rows reaches every ordered placement of it.
///
/// For `k = 2` a row is the value of one bit of each qubit's index, and its complement is the
/// next row: two distinct qubits differ in some bit, and one of the two rows orders them each
/// way.
pub fn kcoverage_template(num_qubits: usize, k: usize) -> Result<Vec<Vec<usize>>> {
    if k > num_qubits {
        return Err(IdleTomographyError::WeightExceedsQubits {
            weight: k,
            num_qubits,
        });
    }
    match k {
        1 => Ok(vec![vec![0; num_qubits]]),
        2 => {
            let num_bits = usize::BITS - (num_qubits - 1).leading_zeros();
            Ok((0..num_bits)
                .flat_map(|bit| {
                    let row = (0..num_qubits)
                        .map(|qubit| (qubit >> bit) & 1)
                        .collect::<Vec<_>>();
                    let complement = row.iter().map(|x| 1 - x).collect::<Vec<_>>();
                    [row, complement]
                })
                .collect())
        }
        _ => Err(IdleTomographyError::UnsupportedWeight(k)),
    }
}

fn tile_state(template: &PauliState, row: &[usize]) -> Result<PauliState> {
    Ok(PauliState::new(
        row.iter().map(|&pos| template.basis(pos)).collect(),
        row.iter().map(|&pos| template.sign(pos)).collect(),
    )?)
}

/// Expand weight-`k` template pairs into pairs on `num_qubits` qubits.
///
/// Templates are taken in order, and each is laid out along every row of
/// [kcoverage_template].  Repeated pairs are dropped, keeping the first.
pub fn tile_pauli_fidpairs(
    templates: &[FidPair],
    num_qubits: usize,
    k: usize,
) -> Result<Vec<FidPair>> {
    let rows = kcoverage_template(num_qubits, k)?;
    let mut tiled = Vec::with_capacity(templates.len() * rows.len());
    for template in templates {
        if template.num_qubits() != k {
            return Err(IdleTomographyError::QubitCountMismatch {
                expected: k,
                found: template.num_qubits(),
            });
        }
        for row in rows.iter() {
            tiled.push(FidPair::new(
                tile_state(template.prep(), row)?,
                tile_state(template.meas(), row)?,
            )?);
        }
    }
    Ok(tiled.into_iter().unique().collect())
}
