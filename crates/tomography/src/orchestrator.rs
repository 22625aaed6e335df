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

//! The full analysis: fit every observation, build the design matrices and invert them.

use idletomo_pauli::{Circuit, PauliOp};
use indexmap::IndexMap;
use ndarray::{s, Array1, Array2};
use tracing::{debug, info, instrument, warn};

use crate::context::ExecutionContext;
use crate::dataset::DataSet;
use crate::enumerate::{all_errors, all_observables, all_outcomes};
use crate::error::{IdleTomographyError, Result};
use crate::fidpairs::{default_ham_templates, idle_tomography_fidpairs, FidPair, PauliDicts};
use crate::fit::{get_obs_hamiltonian_err_rate, get_obs_stochastic_err_rate};
use crate::jacobian::{
    affine_jac_element, affine_jac_obs_element, hamiltonian_jac_element, stochastic_jac_element,
};
use crate::linalg::invert_design_matrix;
use crate::options::{AdvancedOptions, JacobianMode};
use crate::results::{
    ErrorClass, ExperimentKind, IdleTomographyResults, InversionStage, ObservationTarget,
    PairObservations, RankDeficiency, RateObservation,
};

/// The read-only inputs every worker needs to turn one fiducial pair into observations.
struct PairAnalysis<'a> {
    dataset: &'a DataSet,
    pauli_dicts: &'a PauliDicts,
    idle: &'a Circuit,
    errors: &'a [PauliOp],
    max_lengths: &'a [usize],
    max_err_weight: usize,
    fit_order: usize,
    include_affine: bool,
}

impl PairAnalysis<'_> {
    fn row(&self, element: impl Fn(&PauliOp) -> Result<f64>) -> Result<Array1<f64>> {
        self.errors.iter().map(element).collect()
    }

    /// One observation per outcome reachable by a low-weight bit flip, with stochastic then
    /// affine responses in the row.
    fn stochastic(&self, pair: &FidPair) -> Result<PairObservations> {
        info!(%pair, "stochastic fiducial pair");
        let (prep, meas) = (pair.prep(), pair.meas());
        let mut observations = PairObservations::new();
        for outcome in all_outcomes(prep, meas, self.max_err_weight)? {
            let info = get_obs_stochastic_err_rate(
                self.dataset,
                pair,
                self.pauli_dicts,
                self.idle,
                &outcome,
                self.max_lengths,
                self.fit_order,
            )?;
            debug!(%outcome, rate = info.rate(), "outcome");
            let mut jacobian_row =
                self.row(|error| stochastic_jac_element(prep, error, meas, &outcome))?;
            if self.include_affine {
                let affine = self.row(|error| affine_jac_element(prep, error, meas, &outcome))?;
                jacobian_row.append(ndarray::Axis(0), affine.view())?;
            }
            observations.insert(
                ObservationTarget::Outcome(outcome),
                RateObservation {
                    info,
                    jacobian_row,
                    affine_jacobian_row: None,
                },
            );
        }
        Ok(observations)
    }

    /// One observation per low-weight observable diagonal in the measured basis.
    fn hamiltonian(&self, pair: &FidPair) -> Result<PairObservations> {
        info!(%pair, "hamiltonian fiducial pair");
        let (prep, meas) = (pair.prep(), pair.meas());
        let mut observations = PairObservations::new();
        for observable in all_observables(meas, self.max_err_weight)? {
            let info = get_obs_hamiltonian_err_rate(
                self.dataset,
                pair,
                self.pauli_dicts,
                self.idle,
                &observable,
                self.max_lengths,
                self.fit_order,
            )?;
            debug!(%observable, rate = info.rate(), "observable");
            let jacobian_row =
                self.row(|error| hamiltonian_jac_element(prep, error, &observable))?;
            let affine_jacobian_row = if self.include_affine {
                Some(self.row(|error| affine_jac_obs_element(prep, error, meas, &observable))?)
            } else {
                None
            };
            observations.insert(
                ObservationTarget::Observable(observable),
                RateObservation {
                    info,
                    jacobian_row,
                    affine_jacobian_row,
                },
            );
        }
        Ok(observations)
    }
}

/// Stack `rows`, each of length `columns`, into a matrix.
fn stack_rows<'b>(
    rows: impl Iterator<Item = &'b Array1<f64>>,
    columns: usize,
) -> Result<Array2<f64>> {
    let mut num_rows = 0;
    let mut flat = Vec::new();
    for row in rows {
        flat.extend(row.iter().copied());
        num_rows += 1;
    }
    Ok(Array2::from_shape_vec((num_rows, columns), flat)?)
}

/// The gathered design matrix of one stage.
#[derive(Clone, Debug)]
pub(crate) struct StageSystem {
    pub jacobian: Array2<f64>,
    pub observed: Array1<f64>,
    /// Hamiltonian stage only: the response of each observable to the affine errors.
    pub affine_jacobian: Option<Array2<f64>>,
}

impl StageSystem {
    fn gather(
        pairs: &[PairObservations],
        columns: usize,
        affine_columns: Option<usize>,
    ) -> Result<Self> {
        let observations = || pairs.iter().flat_map(|pair| pair.values());
        let jacobian = stack_rows(observations().map(|obs| &obs.jacobian_row), columns)?;
        let observed = observations().map(|obs| obs.info.rate()).collect();
        let affine_jacobian = match affine_columns {
            Some(columns) => Some(stack_rows(
                observations().filter_map(|obs| obs.affine_jacobian_row.as_ref()),
                columns,
            )?),
            None => None,
        };
        Ok(Self {
            jacobian,
            observed,
            affine_jacobian,
        })
    }
}

/// The single system solved in [JacobianMode::Together].
///
/// Columns are the Hamiltonian, stochastic and affine blocks of the requested classes, in that
/// order.  Hamiltonian rows come first, with the affine block filled by their affine response;
/// stochastic rows follow with a zero Hamiltonian block.
pub(crate) fn joint_system(
    num_errors: usize,
    hamiltonian: Option<&StageSystem>,
    stochastic: Option<&StageSystem>,
    include_affine: bool,
) -> (Array2<f64>, Array1<f64>) {
    let ham_columns = if hamiltonian.is_some() { num_errors } else { 0 };
    let sto_columns = if stochastic.is_some() { num_errors } else { 0 };
    let aff_columns = if include_affine { num_errors } else { 0 };
    let ham_rows = hamiltonian.map_or(0, |stage| stage.jacobian.nrows());
    let sto_rows = stochastic.map_or(0, |stage| stage.jacobian.nrows());

    let mut jacobian = Array2::zeros((
        ham_rows + sto_rows,
        ham_columns + sto_columns + aff_columns,
    ));
    if let Some(stage) = hamiltonian {
        jacobian
            .slice_mut(s![..ham_rows, ..ham_columns])
            .assign(&stage.jacobian);
        if let Some(affine) = stage.affine_jacobian.as_ref() {
            jacobian
                .slice_mut(s![..ham_rows, ham_columns + sto_columns..])
                .assign(affine);
        }
    }
    if let Some(stage) = stochastic {
        jacobian
            .slice_mut(s![ham_rows.., ham_columns..])
            .assign(&stage.jacobian);
    }
    let observed = hamiltonian
        .into_iter()
        .chain(stochastic)
        .flat_map(|stage| stage.observed.iter().copied())
        .collect();
    (jacobian, observed)
}

fn invert_stage(
    stage: InversionStage,
    jacobian: &Array2<f64>,
    observed: &Array1<f64>,
    deficiencies: &mut Vec<RankDeficiency>,
) -> Result<Array1<f64>> {
    let inversion = invert_design_matrix(jacobian.view(), observed.view())?;
    let (rank, columns) = (inversion.rank, inversion.columns);
    info!(%stage, rows = jacobian.nrows(), columns, rank, "inverted jacobian");
    if !inversion.is_full_rank() {
        warn!(
            %stage,
            rank,
            columns,
            "jacobian is rank deficient; using the minimum-norm estimate"
        );
        deficiencies.push(RankDeficiency {
            stage,
            rank,
            columns,
        });
    }
    Ok(inversion.rates)
}

fn check_preconditions(
    max_lengths: &[usize],
    max_err_weight: usize,
    extract_stochastic: bool,
    extract_affine: bool,
    options: &AdvancedOptions,
) -> Result<()> {
    if extract_affine && !extract_stochastic {
        return Err(IdleTomographyError::AffineWithoutStochastic);
    }
    if !(1..=2).contains(&options.fit_order) {
        return Err(IdleTomographyError::UnsupportedFitOrder(options.fit_order));
    }
    if !(1..=2).contains(&max_err_weight) {
        return Err(IdleTomographyError::UnsupportedWeight(max_err_weight));
    }
    if max_lengths.is_empty() {
        return Err(IdleTomographyError::EmptyLengthSweep);
    }
    Ok(())
}

/// Estimate the intrinsic Hamiltonian, stochastic and affine rates of every error up to weight
/// `max_err_weight` from `dataset`.
///
/// `dataset` must hold counts for `prep + idle * L + meas` for every fiducial pair used and every
/// `L` in `max_lengths`, as produced by [crate::fidpairs::make_idle_tomography_list] with the same
/// arguments.  The stochastic and affine stage runs first, then the Hamiltonian stage; in
/// [JacobianMode::Separate] the affine rates from the first stage correct the second.
///
/// Work is split across the workers of `context`.  The coordinator returns the results; every
/// other rank computes its share of the fits and returns `None`.
#[allow(clippy::too_many_arguments)]
#[instrument(skip_all, fields(
    num_qubits = num_qubits,
    max_err_weight = max_err_weight,
    mode = %options.jacobian_mode,
    rank = context.rank()
))]
pub fn do_idle_tomography<'a>(
    num_qubits: usize,
    dataset: &'a DataSet,
    max_lengths: &[usize],
    pauli_dicts: &PauliDicts,
    idle: &Circuit,
    max_err_weight: usize,
    extract_hamiltonian: bool,
    extract_stochastic: bool,
    extract_affine: bool,
    options: &AdvancedOptions,
    context: &ExecutionContext,
) -> Result<Option<IdleTomographyResults<'a>>> {
    check_preconditions(
        max_lengths,
        max_err_weight,
        extract_stochastic,
        extract_affine,
        options,
    )?;
    let errors = all_errors(num_qubits, max_err_weight)?;
    let num_errors = errors.len();

    let (stochastic_pairs, hamiltonian_pairs) = match options.pauli_fidpairs.as_ref() {
        Some(explicit) => {
            if let Some(pair) = explicit.iter().find(|pair| pair.num_qubits() != num_qubits) {
                return Err(IdleTomographyError::QubitCountMismatch {
                    expected: num_qubits,
                    found: pair.num_qubits(),
                });
            }
            explicit
                .iter()
                .cloned()
                .partition::<Vec<_>, _>(|pair| pair.same_bases())
        }
        None => {
            let prep_signs = options.preferred_prep_signs.resolve(&pauli_dicts.prep)?;
            let meas_signs = options.preferred_meas_signs.resolve(&pauli_dicts.meas)?;
            let ham_tmpl = match options.ham_tmpl.as_ref() {
                Some(tmpl) => tmpl.clone(),
                None => default_ham_templates(max_err_weight)?,
            };
            let stochastic = if extract_stochastic {
                idle_tomography_fidpairs(
                    num_qubits,
                    max_err_weight,
                    false,
                    true,
                    extract_affine,
                    &ham_tmpl,
                    prep_signs,
                    meas_signs,
                )?
            } else {
                Vec::new()
            };
            let hamiltonian = if extract_hamiltonian {
                idle_tomography_fidpairs(
                    num_qubits,
                    max_err_weight,
                    true,
                    false,
                    false,
                    &ham_tmpl,
                    prep_signs,
                    meas_signs,
                )?
            } else {
                Vec::new()
            };
            (stochastic, hamiltonian)
        }
    };

    let analysis = PairAnalysis {
        dataset,
        pauli_dicts,
        idle,
        errors: &errors,
        max_lengths,
        max_err_weight,
        fit_order: options.fit_order,
        include_affine: extract_affine,
    };
    let separate = options.jacobian_mode == JacobianMode::Separate;
    let mut deficiencies = Vec::new();
    let mut stochastic_rates = None;
    let mut affine_rates = None;
    let mut hamiltonian_rates = None;

    let stochastic_stage = if extract_stochastic {
        info!(num_pairs = stochastic_pairs.len(), "stochastic/affine stage");
        let gathered = context.run_workers(&stochastic_pairs, |pair| analysis.stochastic(pair))?;
        match gathered {
            Some(observations) => {
                let columns = if extract_affine { 2 * num_errors } else { num_errors };
                let system = StageSystem::gather(&observations, columns, None)?;
                if separate {
                    let rates = invert_stage(
                        InversionStage::StochasticAffine,
                        &system.jacobian,
                        &system.observed,
                        &mut deficiencies,
                    )?;
                    stochastic_rates = Some(rates.slice(s![..num_errors]).to_owned());
                    if extract_affine {
                        affine_rates = Some(rates.slice(s![num_errors..]).to_owned());
                    }
                }
                Some((system, observations))
            }
            None => None,
        }
    } else {
        None
    };

    let hamiltonian_stage = if extract_hamiltonian {
        info!(num_pairs = hamiltonian_pairs.len(), "hamiltonian stage");
        let gathered =
            context.run_workers(&hamiltonian_pairs, |pair| analysis.hamiltonian(pair))?;
        match gathered {
            Some(observations) => {
                let affine_columns = extract_affine.then_some(num_errors);
                let system = StageSystem::gather(&observations, num_errors, affine_columns)?;
                if separate {
                    let observed = match (affine_rates.as_ref(), system.affine_jacobian.as_ref()) {
                        (Some(affine), Some(jacobian)) => &system.observed - &jacobian.dot(affine),
                        _ => system.observed.clone(),
                    };
                    hamiltonian_rates = Some(invert_stage(
                        InversionStage::Hamiltonian,
                        &system.jacobian,
                        &observed,
                        &mut deficiencies,
                    )?);
                }
                Some((system, observations))
            }
            None => None,
        }
    } else {
        None
    };

    if !context.is_coordinator() {
        return Ok(None);
    }

    if !separate {
        let (jacobian, observed) = joint_system(
            num_errors,
            hamiltonian_stage.as_ref().map(|(system, _)| system),
            stochastic_stage.as_ref().map(|(system, _)| system),
            extract_affine,
        );
        let rates = invert_stage(InversionStage::Joint, &jacobian, &observed, &mut deficiencies)?;
        let mut offset = 0;
        let mut take = |wanted: bool| {
            wanted.then(|| {
                let block = rates.slice(s![offset..offset + num_errors]).to_owned();
                offset += num_errors;
                block
            })
        };
        hamiltonian_rates = take(extract_hamiltonian);
        stochastic_rates = take(extract_stochastic);
        affine_rates = take(extract_affine);
    }

    let mut intrinsic_rates = IndexMap::new();
    for (class, rates) in [
        (ErrorClass::Hamiltonian, hamiltonian_rates),
        (ErrorClass::Stochastic, stochastic_rates),
        (ErrorClass::Affine, affine_rates),
    ] {
        if let Some(rates) = rates {
            intrinsic_rates.insert(class, rates);
        }
    }

    let mut pauli_fidpairs = IndexMap::new();
    let mut observed_rate_infos = IndexMap::new();
    if let Some((_, observations)) = stochastic_stage {
        pauli_fidpairs.insert(ExperimentKind::Stochastic, stochastic_pairs);
        observed_rate_infos.insert(ExperimentKind::Stochastic, observations);
    }
    if let Some((_, observations)) = hamiltonian_stage {
        pauli_fidpairs.insert(ExperimentKind::Hamiltonian, hamiltonian_pairs);
        observed_rate_infos.insert(ExperimentKind::Hamiltonian, observations);
    }

    Ok(Some(IdleTomographyResults {
        dataset,
        max_lengths: max_lengths.to_vec(),
        max_err_weight,
        fit_order: options.fit_order,
        pauli_dicts: pauli_dicts.clone(),
        idle: idle.clone(),
        errors,
        intrinsic_rates,
        pauli_fidpairs,
        observed_rate_infos,
        rank_deficiencies: deficiencies,
    }))
}
