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

//! Pauli-string primitives used by idle tomography.
//!
//! Everything here is a small value type: single-qubit letters ([Pauli], [Basis], [Sign]),
//! product-state preparations and measurements ([PauliState]), signed Pauli operators
//! ([PauliOp]), measured bit strings ([Outcome]), and the native-gate side of the world
//! ([Circuit], [PauliDict]).

pub mod circuit;
pub mod letters;
pub mod op;
pub mod outcome;
pub mod pauli_dict;
pub mod state;

pub use circuit::{Circuit, GateLabel, Layer};
pub use letters::{commute_parity, Basis, Pauli, Sign};
pub use op::PauliOp;
pub use outcome::Outcome;
pub use pauli_dict::PauliDict;
pub use state::PauliState;

use thiserror::Error;

/// Error cases from constructing or combining the Pauli value types.
///
/// All of these indicate that the caller handed over data that does not describe a valid object;
/// none of them are recoverable runtime conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PauliError {
    #[error("{0:?} is not a valid letter of the single-qubit alphabet")]
    InvalidLetter(char),
    #[error("'I' cannot appear in a Pauli state, which must name a basis on every qubit")]
    IdentityInState,
    #[error("{letters} basis letters were given with {signs} signs")]
    SignCountMismatch { letters: usize, signs: usize },
    #[error("operands act on different numbers of qubits ({left} and {right})")]
    QubitCountMismatch { left: usize, right: usize },
    #[error("{0:?} is not a valid outcome bit; expected '0' or '1'")]
    InvalidOutcomeBit(char),
    #[error("invalid Pauli dictionary key {0:?}; expected a basis letter with an optional sign, like \"+X\" or \"-Z\"")]
    InvalidDictKey(String),
    #[error("the Pauli dictionary has more than one entry for {0:?}")]
    DuplicateDictKey(String),
    #[error("{key:?} is not in the Pauli dictionary")]
    MissingDictEntry { key: String },
}
