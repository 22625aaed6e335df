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

//! Idle tomography: estimating the Hamiltonian, stochastic and affine error rates of an idle
//! operation from bit-string counts.
//!
//! The pipeline is
//!
//! 1. choose Pauli fiducial pairs covering every error up to the requested weight
//!    ([fidpairs::idle_tomography_fidpairs]);
//! 2. for each pair and each outcome or observable, fit the measured signal against the number of
//!    idle repetitions ([fit]) and compute the first-order response of that signal to every error
//!    ([jacobian]);
//! 3. pseudo-invert the stacked responses to get the intrinsic rates
//!    ([orchestrator::do_idle_tomography]).

use std::env;

pub mod context;
pub mod dataset;
pub mod enumerate;
pub mod error;
pub mod fidpairs;
pub mod fit;
pub mod jacobian;
pub mod linalg;
pub mod options;
pub mod orchestrator;
pub mod results;
pub mod tiling;


pub use context::ExecutionContext;
pub use dataset::{DataSet, OutcomeCounts};
pub use error::{IdleTomographyError, Result};
pub use fidpairs::{FidPair, PauliDicts};
pub use fit::ObservedRateInfo;
pub use options::{AdvancedOptions, JacobianMode, SignPreference};
pub use orchestrator::do_idle_tomography;
pub use results::{ErrorClass, ExperimentKind, IdleTomographyResults};

/// Should the per-worker slices of an analysis be spread over the rayon pool?
///
/// Follows the same convention as other tools run under a process-level parallel harness: if
/// `IDLETOMO_IN_PARALLEL` is `TRUE` we are already one of many processes and stay on one thread,
/// unless `IDLETOMO_FORCE_THREADS` is also `TRUE`.
pub fn getenv_use_multiple_threads() -> bool {
    let parallel_context = env::var("IDLETOMO_IN_PARALLEL")
        .unwrap_or_else(|_| "FALSE".to_string())
        .to_uppercase()
        == "TRUE";
    let force_threads = env::var("IDLETOMO_FORCE_THREADS")
        .unwrap_or_else(|_| "FALSE".to_string())
        .to_uppercase()
        == "TRUE";
    !parallel_context || force_threads
}
