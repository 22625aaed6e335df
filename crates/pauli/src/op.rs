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

use crate::letters::{commute_parity, Pauli, Sign};
use crate::state::PauliState;
use crate::PauliError;

/// A dense N-qubit Pauli operator with an overall sign.
///
/// This doubles as the label of an error generator (where the sign is always positive) and as an
/// observable whose expectation value is tracked.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct PauliOp {
    paulis: Vec<Pauli>,
    sign: Sign,
}

impl PauliOp {
    pub fn new(paulis: Vec<Pauli>, sign: Sign) -> Self {
        Self { paulis, sign }
    }

    /// A positively-signed operator.
    pub fn from_paulis(paulis: Vec<Pauli>) -> Self {
        Self::new(paulis, Sign::Plus)
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self::from_paulis(vec![Pauli::I; num_qubits])
    }

    /// `pauli` on qubit `qubit`, identity elsewhere.
    pub fn weight1(num_qubits: usize, qubit: usize, pauli: Pauli) -> Self {
        let mut paulis = vec![Pauli::I; num_qubits];
        paulis[qubit] = pauli;
        Self::from_paulis(paulis)
    }

    /// `first` on qubit `i` and `second` on qubit `j`, identity elsewhere.
    pub fn weight2(num_qubits: usize, i: usize, j: usize, first: Pauli, second: Pauli) -> Self {
        let mut paulis = vec![Pauli::I; num_qubits];
        paulis[i] = first;
        paulis[j] = second;
        Self::from_paulis(paulis)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    #[inline]
    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    #[inline]
    pub fn pauli(&self, qubit: usize) -> Pauli {
        self.paulis[qubit]
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Number of qubits this operator acts on non-trivially.
    pub fn weight(&self) -> usize {
        self.paulis.iter().filter(|p| !p.is_identity()).count()
    }

    /// Indices of the qubits this operator acts on non-trivially, in increasing order.
    pub fn support(&self) -> Vec<usize> {
        self.paulis
            .iter()
            .enumerate()
            .filter_map(|(i, p)| (!p.is_identity()).then_some(i))
            .collect()
    }

    fn check_len(&self, other: usize) -> Result<(), PauliError> {
        if self.num_qubits() != other {
            return Err(PauliError::QubitCountMismatch {
                left: self.num_qubits(),
                right: other,
            });
        }
        Ok(())
    }

    /// Do the two operators commute?
    pub fn commutes_with(&self, other: &PauliOp) -> Result<bool, PauliError> {
        self.check_len(other.num_qubits())?;
        let parity = self
            .paulis
            .iter()
            .zip(other.paulis.iter())
            .fold(1, |acc, (a, b)| acc * commute_parity(*a, *b));
        Ok(parity == 1)
    }

    /// The operator `i [self, other] / 2`, or `None` if the two commute.
    ///
    /// For anticommuting Paulis `[P, Q] = 2PQ`, so this is `i PQ`, which is always a real signed
    /// Pauli.
    pub fn icommutator_over_2(&self, other: &PauliOp) -> Result<Option<PauliOp>, PauliError> {
        if self.commutes_with(other)? {
            return Ok(None);
        }
        // Start at one factor of `i` from the prefactor.
        let mut phase = 1u8;
        let paulis = self
            .paulis
            .iter()
            .zip(other.paulis.iter())
            .map(|(a, b)| {
                let (power, product) = a.compose(*b);
                phase = (phase + power) % 4;
                product
            })
            .collect::<Vec<_>>();
        // An odd number of anticommuting sites makes the product phase odd, so with the extra
        // `i` the total is real.
        debug_assert!(phase % 2 == 0);
        let phase_sign = if phase == 0 { Sign::Plus } else { Sign::Minus };
        Ok(Some(PauliOp::new(
            paulis,
            self.sign * other.sign * phase_sign,
        )))
    }

    /// `Tr(self · rho)` for the product state `rho` described by `state`.
    ///
    /// Each qubit contributes the state's sign where the letters agree and `1` where this operator
    /// is the identity; any other letter makes the whole trace vanish.
    pub fn statedot(&self, state: &PauliState) -> Result<f64, PauliError> {
        self.check_len(state.num_qubits())?;
        let mut ret = self.sign;
        for (pauli, (sign, basis)) in self.paulis.iter().zip(state.iter()) {
            if pauli.is_identity() {
                continue;
            }
            if *pauli != Pauli::from(basis) {
                return Ok(0.0);
            }
            ret = ret * sign;
        }
        Ok(ret.as_f64())
    }

    /// Normalized Hilbert-Schmidt overlap with another Pauli operator.
    pub fn dot(&self, other: &PauliOp) -> Result<f64, PauliError> {
        self.check_len(other.num_qubits())?;
        if self.paulis == other.paulis {
            Ok((self.sign * other.sign).as_f64())
        } else {
            Ok(0.0)
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign == Sign::Minus {
            write!(f, "-")?;
        }
        for pauli in self.paulis.iter() {
            write!(f, "{pauli}")?;
        }
        Ok(())
    }
}

/// Parse a label like `"XIZ"` or `"-YY"`.
impl FromStr for PauliOp {
    type Err = PauliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, letters) = match s.strip_prefix('-') {
            Some(rest) => (Sign::Minus, rest),
            None => (Sign::Plus, s.strip_prefix('+').unwrap_or(s)),
        };
        let paulis = letters
            .chars()
            .map(Pauli::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(paulis, sign))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(label: &str) -> PauliOp {
        label.parse().unwrap()
    }

    #[test]
    fn single_qubit_commutators() {
        // i[X, Y]/2 = i(iZ) = -Z
        assert_eq!(op("X").icommutator_over_2(&op("Y")).unwrap(), Some(op("-Z")));
        assert_eq!(op("Y").icommutator_over_2(&op("X")).unwrap(), Some(op("Z")));
        assert_eq!(op("Z").icommutator_over_2(&op("Y")).unwrap(), Some(op("X")));
        assert_eq!(op("X").icommutator_over_2(&op("X")).unwrap(), None);
        assert_eq!(op("I").icommutator_over_2(&op("Z")).unwrap(), None);
    }

    #[test]
    fn multi_qubit_commutator() {
        // XX and ZX anticommute on one site only.  i(XZ ⊗ XX) = i(-iY ⊗ I) = YI.
        assert_eq!(op("XX").icommutator_over_2(&op("ZX")).unwrap(), Some(op("YI")));
        // XX and ZZ anticommute on both sites, so they commute overall.
        assert_eq!(op("XX").icommutator_over_2(&op("ZZ")).unwrap(), None);
    }

    #[test]
    fn statedot_follows_letters_and_signs() {
        let state: PauliState = "+Z-X".parse().unwrap();
        assert_eq!(op("ZX").statedot(&state).unwrap(), -1.0);
        assert_eq!(op("ZI").statedot(&state).unwrap(), 1.0);
        assert_eq!(op("-IX").statedot(&state).unwrap(), 1.0);
        assert_eq!(op("YX").statedot(&state).unwrap(), 0.0);
        assert_eq!(op("II").statedot(&state).unwrap(), 1.0);
    }

    #[test]
    fn length_mismatches_are_errors() {
        assert_eq!(
            op("X").commutes_with(&op("XY")),
            Err(PauliError::QubitCountMismatch { left: 1, right: 2 })
        );
        assert_eq!(op("XY").dot(&op("XY")).unwrap(), 1.0);
        assert_eq!(op("XY").dot(&op("-XY")).unwrap(), -1.0);
        assert_eq!(op("XY").dot(&op("YX")).unwrap(), 0.0);
    }

    #[test]
    fn weight_and_support() {
        let error = PauliOp::weight2(4, 1, 3, Pauli::X, Pauli::Z);
        assert_eq!(error.to_string(), "IXIZ");
        assert_eq!(error.weight(), 2);
        assert_eq!(error.support(), vec![1, 3]);
    }
}
