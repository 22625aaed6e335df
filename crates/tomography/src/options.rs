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

use idletomo_pauli::{PauliDict, Sign};
use thiserror::Error;

use crate::error::Result;
use crate::fidpairs::{preferred_signs_from_paulidict, BasisSigns, FidPair};

/// How the stacked design matrices are inverted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JacobianMode {
    /// Invert the stochastic/affine block first, then the Hamiltonian block with the affine
    /// contribution removed.
    #[default]
    Separate,
    /// Invert one joint matrix over every requested class.
    Together,
}

impl JacobianMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Separate => "separate",
            Self::Together => "together",
        }
    }
}

impl fmt::Display for JacobianMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown jacobian mode {0:?}")]
pub struct UnknownJacobianMode(pub String);

impl FromStr for JacobianMode {
    type Err = UnknownJacobianMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "separate" => Ok(Self::Separate),
            "together" => Ok(Self::Together),
            _ => Err(UnknownJacobianMode(s.to_owned())),
        }
    }
}

/// Which sign of each basis to prepare or measure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignPreference {
    /// Whichever sign has the shorter gate sequence in the dictionary.
    #[default]
    Auto,
    /// Fixed signs for `X`, `Y` and `Z`.
    Explicit(BasisSigns),
}

impl SignPreference {
    /// The concrete signs to use with `dict`.
    pub fn resolve(&self, dict: &PauliDict) -> Result<BasisSigns> {
        match self {
            Self::Auto => preferred_signs_from_paulidict(dict),
            Self::Explicit(signs) => Ok(*signs),
        }
    }
}

impl From<[Sign; 3]> for SignPreference {
    fn from(signs: [Sign; 3]) -> Self {
        Self::Explicit(signs)
    }
}

/// Knobs of [crate::do_idle_tomography] that most callers leave alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvancedOptions {
    pub jacobian_mode: JacobianMode,
    pub preferred_prep_signs: SignPreference,
    pub preferred_meas_signs: SignPreference,
    /// Order of the polynomial fitted to each signal against idle length; 1 or 2.
    pub fit_order: usize,
    /// Use these fiducial pairs instead of generating them.  Pairs whose prep and measurement
    /// bases agree everywhere feed the stochastic stage, the rest the Hamiltonian stage.
    pub pauli_fidpairs: Option<Vec<FidPair>>,
    /// Hamiltonian templates, one letter per qubit of the error weight.
    pub ham_tmpl: Option<Vec<String>>,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            jacobian_mode: JacobianMode::Separate,
            preferred_prep_signs: SignPreference::Auto,
            preferred_meas_signs: SignPreference::Auto,
            fit_order: 1,
            pauli_fidpairs: None,
            ham_tmpl: None,
        }
    }
}
