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

use std::fmt;
use std::str::FromStr;

use crate::circuit::Circuit;
use crate::letters::{Basis, Sign};
use crate::pauli_dict::PauliDict;
use crate::PauliError;

/// A product state (or product measurement) along Pauli eigenbases, one basis and one sign per
/// qubit.
///
/// `+Z` is the `|0>` state, `-X` is `|->`, and so on.  Equality and hashing take the signs into
/// account; use [PauliState::same_bases] to compare only the bases.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct PauliState {
    bases: Vec<Basis>,
    signs: Vec<Sign>,
}

impl PauliState {
    /// Create a new state, checking that there is exactly one sign per basis letter.
    pub fn new(bases: Vec<Basis>, signs: Vec<Sign>) -> Result<Self, PauliError> {
        if bases.len() != signs.len() {
            return Err(PauliError::SignCountMismatch {
                letters: bases.len(),
                signs: signs.len(),
            });
        }
        Ok(Self { bases, signs })
    }

    /// Create a state with every sign positive.
    pub fn with_plus_signs(bases: Vec<Basis>) -> Self {
        let signs = vec![Sign::Plus; bases.len()];
        Self { bases, signs }
    }

    /// Parse a basis string such as `"XYZ"` with an explicit sign for each letter.
    pub fn from_letters(letters: &str, signs: Vec<Sign>) -> Result<Self, PauliError> {
        let bases = letters
            .chars()
            .map(Basis::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(bases, signs)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.bases.len()
    }

    #[inline]
    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    #[inline]
    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    #[inline]
    pub fn basis(&self, qubit: usize) -> Basis {
        self.bases[qubit]
    }

    #[inline]
    pub fn sign(&self, qubit: usize) -> Sign {
        self.signs[qubit]
    }

    /// Iterate over `(sign, basis)` for each qubit in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Sign, Basis)> + '_ {
        self.signs.iter().copied().zip(self.bases.iter().copied())
    }

    /// Do the two states use the same basis on every qubit, regardless of sign?
    #[inline]
    pub fn same_bases(&self, other: &PauliState) -> bool {
        self.bases == other.bases
    }

    /// The basis letters alone, e.g. `"XYZ"`.
    pub fn basis_label(&self) -> String {
        self.bases.iter().map(Basis::label).collect()
    }

    /// Translate this state into native gates using `dict`.
    ///
    /// Each qubit gets the gate sequence stored under its signed basis, and the per-qubit
    /// sequences are packed into parallel layers.
    pub fn to_circuit(&self, dict: &PauliDict) -> Result<Circuit, PauliError> {
        let per_qubit = self
            .iter()
            .map(|(sign, basis)| dict.gates_for(sign, basis))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Circuit::parallelize(
            per_qubit
                .into_iter()
                .enumerate()
                .map(|(qubit, gates)| (qubit as u32, gates)),
        ))
    }
}

impl fmt::Display for PauliState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (sign, basis) in self.iter() {
            write!(f, "{sign}{basis}")?;
        }
        Ok(())
    }
}

/// Parse either a bare basis string (`"XZ"`, all signs positive) or a signed one (`"+X-Z"`).
impl FromStr for PauliState {
    type Err = PauliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bases = Vec::with_capacity(s.len());
        let mut signs = Vec::with_capacity(s.len());
        let mut pending = None;
        for c in s.chars() {
            match c {
                '+' | '-' if pending.is_none() => {
                    pending = Some(if c == '+' { Sign::Plus } else { Sign::Minus })
                }
                _ => {
                    bases.push(Basis::try_from(c)?);
                    signs.push(pending.take().unwrap_or_default());
                }
            }
        }
        if let Some(sign) = pending {
            return Err(PauliError::InvalidLetter(sign.label()));
        }
        Self::new(bases, signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_and_bare_labels() {
        let bare: PauliState = "XZ".parse().unwrap();
        assert_eq!(bare.signs(), &[Sign::Plus, Sign::Plus]);
        let signed: PauliState = "+X-Z".parse().unwrap();
        assert_eq!(signed.bases(), &[Basis::X, Basis::Z]);
        assert_eq!(signed.signs(), &[Sign::Plus, Sign::Minus]);
        assert_eq!(signed.to_string(), "+X-Z");
        assert!(bare.same_bases(&signed));
        assert_ne!(bare, signed);
    }

    #[test]
    fn rejects_identity_and_dangling_signs() {
        assert_eq!(
            "XI".parse::<PauliState>(),
            Err(PauliError::IdentityInState)
        );
        assert_eq!(
            "X-".parse::<PauliState>(),
            Err(PauliError::InvalidLetter('-'))
        );
        assert_eq!(
            "X--Y".parse::<PauliState>(),
            Err(PauliError::InvalidLetter('-'))
        );
    }

    #[test]
    fn sign_count_is_checked() {
        assert_eq!(
            PauliState::from_letters("XY", vec![Sign::Plus]),
            Err(PauliError::SignCountMismatch {
                letters: 2,
                signs: 1
            })
        );
    }
}
