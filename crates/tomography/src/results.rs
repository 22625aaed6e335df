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

use idletomo_pauli::{Circuit, Outcome, PauliOp};
use indexmap::IndexMap;
use ndarray::Array1;

use crate::dataset::DataSet;
use crate::fidpairs::{FidPair, PauliDicts};
use crate::fit::ObservedRateInfo;

/// A class of error generator.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorClass {
    Hamiltonian,
    Stochastic,
    Affine,
}

impl ErrorClass {
    pub const ALL: [ErrorClass; 3] = [Self::Hamiltonian, Self::Stochastic, Self::Affine];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hamiltonian => "hamiltonian",
            Self::Stochastic => "stochastic",
            Self::Affine => "affine",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two kinds of experiment a fiducial pair can belong to.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExperimentKind {
    /// Prep and measurement share every basis; outcome probabilities see stochastic and affine
    /// errors.
    Stochastic,
    /// Prep and measurement bases differ; observable expectations see Hamiltonian errors.
    Hamiltonian,
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stochastic => "same-basis",
            Self::Hamiltonian => "different-basis",
        })
    }
}

/// What was fitted within one fiducial pair.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum ObservationTarget {
    Outcome(Outcome),
    Observable(PauliOp),
}

impl fmt::Display for ObservationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outcome(outcome) => write!(f, "{}", outcome),
            Self::Observable(observable) => write!(f, "<{}>", observable),
        }
    }
}

/// One row of a design matrix together with the fit it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct RateObservation {
    pub info: ObservedRateInfo,
    /// Response to the stochastic (then affine) errors for outcomes, or to the Hamiltonian
    /// errors for observables.
    pub jacobian_row: Array1<f64>,
    /// Response of an observable to the affine errors, when affine rates were requested.
    pub affine_jacobian_row: Option<Array1<f64>>,
}

/// Every observation of one fiducial pair, in enumeration order.
pub type PairObservations = IndexMap<ObservationTarget, RateObservation>;

/// Which inversion a [RankDeficiency] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InversionStage {
    StochasticAffine,
    Hamiltonian,
    Joint,
}

impl fmt::Display for InversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StochasticAffine => "stochastic/affine",
            Self::Hamiltonian => "hamiltonian",
            Self::Joint => "joint",
        })
    }
}

/// A design matrix that could not determine every rate on its own.  The minimum-norm estimate
/// was still used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankDeficiency {
    pub stage: InversionStage,
    pub rank: usize,
    pub columns: usize,
}

impl fmt::Display for RankDeficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} jacobian has rank {} < {} columns",
            self.stage, self.rank, self.columns
        )
    }
}

/// Everything an idle-tomography analysis produced.
#[derive(Clone, Debug)]
pub struct IdleTomographyResults<'a> {
    pub(crate) dataset: &'a DataSet,
    pub(crate) max_lengths: Vec<usize>,
    pub(crate) max_err_weight: usize,
    pub(crate) fit_order: usize,
    pub(crate) pauli_dicts: PauliDicts,
    pub(crate) idle: Circuit,
    pub(crate) errors: Vec<PauliOp>,
    pub(crate) intrinsic_rates: IndexMap<ErrorClass, Array1<f64>>,
    pub(crate) pauli_fidpairs: IndexMap<ExperimentKind, Vec<FidPair>>,
    pub(crate) observed_rate_infos: IndexMap<ExperimentKind, Vec<PairObservations>>,
    pub(crate) rank_deficiencies: Vec<RankDeficiency>,
}

impl<'a> IdleTomographyResults<'a> {
    pub fn dataset(&self) -> &'a DataSet {
        self.dataset
    }

    pub fn max_lengths(&self) -> &[usize] {
        &self.max_lengths
    }

    pub fn max_err_weight(&self) -> usize {
        self.max_err_weight
    }

    pub fn fit_order(&self) -> usize {
        self.fit_order
    }

    pub fn pauli_dicts(&self) -> &PauliDicts {
        &self.pauli_dicts
    }

    pub fn idle(&self) -> &Circuit {
        &self.idle
    }

    /// The error generators, in the order of every rate vector.
    pub fn errors(&self) -> &[PauliOp] {
        &self.errors
    }

    /// The intrinsic rates of each extracted class, indexed like [Self::errors].
    pub fn intrinsic_rates(&self) -> &IndexMap<ErrorClass, Array1<f64>> {
        &self.intrinsic_rates
    }

    /// The rates of one class, if it was extracted.
    pub fn rates(&self, class: ErrorClass) -> Option<&Array1<f64>> {
        self.intrinsic_rates.get(&class)
    }

    /// The intrinsic rate of `error` in `class`, if that class was extracted and `error` is one
    /// of [Self::errors].
    pub fn intrinsic_rate(&self, class: ErrorClass, error: &PauliOp) -> Option<f64> {
        let index = self.errors.iter().position(|e| e == error)?;
        self.rates(class).map(|rates| rates[index])
    }

    pub fn pauli_fidpairs(&self) -> &IndexMap<ExperimentKind, Vec<FidPair>> {
        &self.pauli_fidpairs
    }

    /// Per-pair observations of each experiment kind, in the order of [Self::pauli_fidpairs].
    pub fn observed_rate_infos(&self) -> &IndexMap<ExperimentKind, Vec<PairObservations>> {
        &self.observed_rate_infos
    }

    pub fn rank_deficiencies(&self) -> &[RankDeficiency] {
        &self.rank_deficiencies
    }
}

impl fmt::Display for IdleTomographyResults<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Idle tomography results: {} errors up to weight {}, fit order {}, lengths {:?}",
            self.errors.len(),
            self.max_err_weight,
            self.fit_order,
            self.max_lengths
        )?;
        for (index, error) in self.errors.iter().enumerate() {
            write!(f, "  {:<8}", error.to_string())?;
            for (class, rates) in self.intrinsic_rates.iter() {
                write!(f, " {}={:+.4e}", class, rates[index])?;
            }
            writeln!(f)?;
        }
        for deficiency in self.rank_deficiencies.iter() {
            writeln!(f, "  warning: {}", deficiency)?;
        }
        Ok(())
    }
}
