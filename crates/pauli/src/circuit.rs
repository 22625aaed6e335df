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

//! Native gate sequences.
//!
//! A [Circuit] is a list of [Layer]s, each of which is a set of [GateLabel]s applied at the same
//! time.  Only as much structure as idle tomography needs is modelled: circuits are compared and
//! hashed by value so they can key a dataset, and the idle block is just another circuit.

use std::fmt;

use smallvec::SmallVec;

/// A named gate acting on zero or more qubits.
///
/// A label with no qubits acts on the whole register; the global idle `Gi` is the usual example.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct GateLabel {
    name: String,
    qubits: SmallVec<[u32; 2]>,
}

impl GateLabel {
    pub fn new(name: impl Into<String>, qubits: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// A gate on a single qubit.
    pub fn on_qubit(name: impl Into<String>, qubit: u32) -> Self {
        Self::new(name, [qubit])
    }

    /// A gate acting on the whole register.
    pub fn global(name: impl Into<String>) -> Self {
        Self::new(name, [])
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn qubits(&self) -> &[u32] {
        &self.qubits
    }
}

impl fmt::Display for GateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for qubit in self.qubits.iter() {
            write!(f, ":{qubit}")?;
        }
        Ok(())
    }
}

/// Gates applied in parallel within one time step.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Layer {
    gates: Vec<GateLabel>,
}

impl Layer {
    pub fn new(gates: Vec<GateLabel>) -> Self {
        Self { gates }
    }

    #[inline]
    pub fn gates(&self) -> &[GateLabel] {
        &self.gates
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl From<GateLabel> for Layer {
    fn from(value: GateLabel) -> Self {
        Self { gates: vec![value] }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.gates.as_slice() {
            [single] => write!(f, "{single}"),
            gates => {
                write!(f, "[")?;
                for gate in gates {
                    write!(f, "{gate}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// An ordered sequence of layers.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Circuit {
    layers: Vec<Layer>,
}

impl Circuit {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// The empty circuit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A circuit with one layer per label, in order.
    pub fn from_labels(labels: impl IntoIterator<Item = GateLabel>) -> Self {
        Self {
            layers: labels.into_iter().map(Layer::from).collect(),
        }
    }

    /// Pack per-qubit gate-name sequences into parallel layers.
    ///
    /// Layer `k` holds the `k`-th gate of every qubit that has at least `k + 1` gates, with the
    /// qubits in the order given.
    pub fn parallelize<'a, S>(per_qubit: impl IntoIterator<Item = (u32, &'a [S])>) -> Self
    where
        S: AsRef<str> + 'a,
    {
        let per_qubit = per_qubit.into_iter().collect::<Vec<_>>();
        let depth = per_qubit
            .iter()
            .map(|(_, gates)| gates.len())
            .max()
            .unwrap_or(0);
        let layers = (0..depth)
            .map(|k| {
                Layer::new(
                    per_qubit
                        .iter()
                        .filter_map(|(qubit, gates)| {
                            gates
                                .get(k)
                                .map(|name| GateLabel::on_qubit(name.as_ref(), *qubit))
                        })
                        .collect(),
                )
            })
            .collect();
        Self { layers }
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Every gate in the circuit, layer by layer.
    pub fn labels(&self) -> impl Iterator<Item = &GateLabel> + '_ {
        self.layers.iter().flat_map(|layer| layer.gates.iter())
    }

    /// This circuit followed by `other`.
    pub fn concat(&self, other: &Circuit) -> Circuit {
        let mut layers = Vec::with_capacity(self.layers.len() + other.layers.len());
        layers.extend_from_slice(&self.layers);
        layers.extend_from_slice(&other.layers);
        Self { layers }
    }

    /// This circuit repeated `reps` times.  Zero repetitions give the empty circuit.
    pub fn repeat(&self, reps: usize) -> Circuit {
        let mut layers = Vec::with_capacity(self.layers.len() * reps);
        for _ in 0..reps {
            layers.extend_from_slice(&self.layers);
        }
        Self { layers }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers.is_empty() {
            return write!(f, "{{}}");
        }
        for layer in self.layers.iter() {
            write!(f, "{layer}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallelize_packs_by_position() {
        let q0 = ["Gx".to_string(), "Gx".to_string()];
        let q1: [String; 0] = [];
        let q2 = ["Gy".to_string()];
        let circuit = Circuit::parallelize([(0, &q0[..]), (1, &q1[..]), (2, &q2[..])]);
        assert_eq!(circuit.depth(), 2);
        assert_eq!(
            circuit.layers()[0].gates(),
            &[GateLabel::on_qubit("Gx", 0), GateLabel::on_qubit("Gy", 2)]
        );
        assert_eq!(circuit.layers()[1].gates(), &[GateLabel::on_qubit("Gx", 0)]);
        assert_eq!(circuit.to_string(), "[Gx:0Gy:2]Gx:0");
    }

    #[test]
    fn repeat_and_concat() {
        let idle = Circuit::from_labels([GateLabel::global("Gi")]);
        let prep = Circuit::from_labels([GateLabel::on_qubit("Gx", 0)]);
        let full = prep.concat(&idle.repeat(3)).concat(&prep);
        assert_eq!(full.depth(), 5);
        assert_eq!(full.to_string(), "Gx:0GiGiGiGx:0");
        assert!(idle.repeat(0).is_empty());
        assert_eq!(Circuit::empty().to_string(), "{}");
    }
}
