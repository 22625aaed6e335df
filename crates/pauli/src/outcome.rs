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

use crate::PauliError;

/// A measured bit string, one bit per qubit, with qubit 0 written first.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Outcome {
    bits: Vec<bool>,
}

impl Outcome {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// The all-zero outcome.
    pub fn zeros(num_qubits: usize) -> Self {
        Self {
            bits: vec![false; num_qubits],
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    #[inline]
    pub fn bit(&self, qubit: usize) -> bool {
        self.bits[qubit]
    }

    /// A copy with the bits at `qubits` inverted.
    pub fn flip(&self, qubits: &[usize]) -> Outcome {
        let mut bits = self.bits.clone();
        for &qubit in qubits {
            bits[qubit] = !bits[qubit];
        }
        Self { bits }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter() {
            write!(f, "{}", if *bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl FromStr for Outcome {
    type Err = PauliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(PauliError::InvalidOutcomeBit(c)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_and_format() {
        let outcome: Outcome = "0110".parse().unwrap();
        assert_eq!(outcome.flip(&[0, 2]).to_string(), "1100");
        assert_eq!(outcome.count_ones(), 2);
        assert!(outcome.bit(1));
        assert_eq!(Outcome::zeros(3).to_string(), "000");
    }

    #[test]
    fn rejects_non_binary() {
        assert_eq!(
            "012".parse::<Outcome>(),
            Err(PauliError::InvalidOutcomeBit('2'))
        );
    }
}
