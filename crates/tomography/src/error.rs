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

use idletomo_pauli::{Basis, PauliError};
use thiserror::Error;

/// Everything that can go wrong while designing or analysing an idle-tomography experiment.
///
/// Precondition violations are reported before any work is done where they can be detected up
/// front; the remainder are raised at the point of detection.  Nothing here is retried.
#[derive(Error, Debug)]
pub enum IdleTomographyError {
    #[error("affine error rates cannot be extracted without also extracting stochastic ones")]
    AffineWithoutStochastic,
    #[error("error weight {0} is not supported; only weights 1 and 2 are")]
    UnsupportedWeight(usize),
    #[error("fit order {0} is not supported; only orders 1 and 2 are")]
    UnsupportedFitOrder(usize),
    #[error("expectation values of weight-{0} observables are not supported")]
    UnsupportedObservableWeight(usize),
    #[error("Hamiltonian template {template:?} has length {length} but the error weight is {weight}")]
    TemplateLength {
        template: String,
        length: usize,
        weight: usize,
    },
    #[error("prep and measurement bases differ on qubit {qubit}")]
    BasisMismatch { qubit: usize },
    #[error("expected {expected} qubits but found {found}")]
    QubitCountMismatch { expected: usize, found: usize },
    #[error("the Pauli dictionary has no entry for either sign of the {0} basis")]
    MissingBasis(Basis),
    #[error("cannot cover every {weight} of {num_qubits} qubits")]
    WeightExceedsQubits { weight: usize, num_qubits: usize },
    #[error("the dataset has no counts for circuit {0}")]
    MissingData(String),
    #[error("the dataset row for circuit {0} has no counts")]
    EmptyCounts(String),
    #[error("the sweep of idle lengths is empty")]
    EmptyLengthSweep,
    #[error("rank {rank} is out of range for {num_workers} workers")]
    InvalidRank { rank: usize, num_workers: usize },
    #[error("weighted polynomial fit failed: {0}")]
    FitFailed(&'static str),
    #[error("pseudo-inversion failed: {0}")]
    Inversion(&'static str),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    Pauli(#[from] PauliError),
}

pub type Result<T> = std::result::Result<T, IdleTomographyError>;
