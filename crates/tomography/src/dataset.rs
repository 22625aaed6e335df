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

use hashbrown::HashMap;
use idletomo_pauli::{Circuit, Outcome};

use crate::error::{IdleTomographyError, Result};

/// Measured counts of each outcome of one circuit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    counts: HashMap<Outcome, u64>,
    total: u64,
}

impl OutcomeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `outcome`.
    pub fn add(&mut self, outcome: Outcome, count: u64) {
        *self.counts.entry(outcome).or_insert(0) += count;
        self.total += count;
    }

    /// Number of times `outcome` was seen.
    pub fn get(&self, outcome: &Outcome) -> u64 {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// All recorded outcomes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Outcome, u64)> + '_ {
        self.counts.iter().map(|(outcome, count)| (outcome, *count))
    }
}

impl FromIterator<(Outcome, u64)> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = (Outcome, u64)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (outcome, count) in iter {
            out.add(outcome, count);
        }
        out
    }
}

/// Outcome counts keyed by the circuit that produced them.
#[derive(Clone, Debug, Default)]
pub struct DataSet {
    rows: HashMap<Circuit, OutcomeCounts>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `outcome` for `circuit`.
    pub fn add_count(&mut self, circuit: Circuit, outcome: Outcome, count: u64) {
        self.rows.entry(circuit).or_default().add(outcome, count);
    }

    /// Add a batch of observations for `circuit`.
    pub fn add_counts(
        &mut self,
        circuit: Circuit,
        counts: impl IntoIterator<Item = (Outcome, u64)>,
    ) {
        let row = self.rows.entry(circuit).or_default();
        for (outcome, count) in counts {
            row.add(outcome, count);
        }
    }

    pub fn get(&self, circuit: &Circuit) -> Option<&OutcomeCounts> {
        self.rows.get(circuit)
    }

    /// The counts for `circuit`, which must be present and non-empty.
    pub fn counts(&self, circuit: &Circuit) -> Result<&OutcomeCounts> {
        let row = self
            .rows
            .get(circuit)
            .ok_or_else(|| IdleTomographyError::MissingData(circuit.to_string()))?;
        if row.total() == 0 {
            return Err(IdleTomographyError::EmptyCounts(circuit.to_string()));
        }
        Ok(row)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
