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

//! Synthetic datasets whose outcome probabilities follow the first-order error model exactly.

#![allow(dead_code)]

use idletomo_pauli::{Circuit, GateLabel, Outcome, PauliOp};
use idletomo_tomography::enumerate::{all_errors, all_observables, all_outcomes, ideal_outcome};
use idletomo_tomography::fidpairs::{
    default_ham_templates, idle_experiment, idle_tomography_fidpairs,
    preferred_signs_from_paulidict,
};
use idletomo_tomography::jacobian::{
    affine_jac_element, affine_jac_obs_element, hamiltonian_jac_element, stochastic_jac_element,
};
use idletomo_tomography::{DataSet, FidPair, PauliDicts};
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use rand_pcg::Pcg64;
use tracing_subscriber::EnvFilter;

pub const SHOTS: u64 = 1_000_000;
pub const LENGTHS: [usize; 4] = [1, 2, 4, 8];

/// Route analysis logs to the test harness.  Set `RUST_LOG=idletomo_tomography=debug` to see
/// per-outcome progress.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn idle() -> Circuit {
    Circuit::from_labels([GateLabel::global("Gi")])
}

/// Intrinsic rates of every error, in the order of `all_errors`.
#[derive(Clone, Debug)]
pub struct Rates {
    pub errors: Vec<PauliOp>,
    pub hamiltonian: Vec<f64>,
    pub stochastic: Vec<f64>,
    pub affine: Vec<f64>,
}

impl Rates {
    pub fn zero(num_qubits: usize, max_weight: usize) -> Self {
        let errors = all_errors(num_qubits, max_weight).unwrap();
        let n = errors.len();
        Self {
            errors,
            hamiltonian: vec![0.0; n],
            stochastic: vec![0.0; n],
            affine: vec![0.0; n],
        }
    }

    pub fn index(&self, label: &str) -> usize {
        let error: PauliOp = label.parse().unwrap();
        self.errors.iter().position(|e| *e == error).unwrap()
    }

    pub fn with_hamiltonian(mut self, label: &str, rate: f64) -> Self {
        let index = self.index(label);
        self.hamiltonian[index] = rate;
        self
    }

    pub fn with_stochastic(mut self, label: &str, rate: f64) -> Self {
        let index = self.index(label);
        self.stochastic[index] = rate;
        self
    }

    pub fn with_affine(mut self, label: &str, rate: f64) -> Self {
        let index = self.index(label);
        self.affine[index] = rate;
        self
    }
}

fn dot(row: impl Iterator<Item = f64>, rates: &[f64]) -> f64 {
    row.zip(rates).map(|(j, r)| j * r).sum()
}

/// The fiducial pairs the analysis generates by default, with affine sign patterns included.
pub fn default_pairs(num_qubits: usize, max_weight: usize) -> Vec<FidPair> {
    let dicts = PauliDicts::standard();
    let prep_signs = preferred_signs_from_paulidict(&dicts.prep).unwrap();
    let meas_signs = preferred_signs_from_paulidict(&dicts.meas).unwrap();
    let tmpl = default_ham_templates(max_weight).unwrap();
    idle_tomography_fidpairs(
        num_qubits, max_weight, true, true, true, &tmpl, prep_signs, meas_signs,
    )
    .unwrap()
}

/// The outcome distribution of every circuit of `pairs` at every length.
///
/// Same-basis pairs move probability from the ideal outcome to each flipped outcome at the
/// first-order rate.  Different-basis pairs on one qubit follow the first-order observable
/// expectation; on more qubits every observable expectation must vanish and the distribution is
/// uniform.
pub fn distributions(
    pairs: &[FidPair],
    max_weight: usize,
    rates: &Rates,
) -> Vec<(Circuit, Vec<(Outcome, f64)>)> {
    let dicts = PauliDicts::standard();
    let mut out = Vec::new();
    for pair in pairs {
        let (prep, meas) = (pair.prep(), pair.meas());
        let (prep_circuit, meas_circuit) = pair.to_circuits(&dicts).unwrap();
        let per_length = if pair.same_bases() {
            let ideal = ideal_outcome(prep, meas).unwrap();
            let slopes = all_outcomes(prep, meas, max_weight)
                .unwrap()
                .into_iter()
                .map(|outcome| {
                    let sto = rates
                        .errors
                        .iter()
                        .map(|e| stochastic_jac_element(prep, e, meas, &outcome).unwrap());
                    let aff = rates
                        .errors
                        .iter()
                        .map(|e| affine_jac_element(prep, e, meas, &outcome).unwrap());
                    let slope = dot(sto, &rates.stochastic) + dot(aff, &rates.affine);
                    (outcome, slope)
                })
                .collect::<Vec<_>>();
            LENGTHS
                .iter()
                .map(|&length| {
                    let mut dist = slopes
                        .iter()
                        .map(|(outcome, slope)| (outcome.clone(), slope * length as f64))
                        .collect::<Vec<_>>();
                    let flipped = dist.iter().map(|(_, p)| p).sum::<f64>();
                    dist.push((ideal.clone(), 1.0 - flipped));
                    dist
                })
                .collect::<Vec<_>>()
        } else {
            let observables = all_observables(meas, max_weight).unwrap();
            let slopes = observables
                .iter()
                .map(|obs| {
                    let ham = rates
                        .errors
                        .iter()
                        .map(|e| hamiltonian_jac_element(prep, e, obs).unwrap());
                    let aff = rates
                        .errors
                        .iter()
                        .map(|e| affine_jac_obs_element(prep, e, meas, obs).unwrap());
                    dot(ham, &rates.hamiltonian) + dot(aff, &rates.affine)
                })
                .collect::<Vec<_>>();
            LENGTHS
                .iter()
                .map(|&length| {
                    if pair.num_qubits() == 1 {
                        // The bit strings see the signed expectation of the measured letter.
                        let signed = slopes[0] * length as f64 * meas.sign(0).as_f64();
                        let p0 = 0.5 * (1.0 + signed);
                        vec![
                            (Outcome::new(vec![false]), p0),
                            (Outcome::new(vec![true]), 1.0 - p0),
                        ]
                    } else {
                        assert!(slopes.iter().all(|s| *s == 0.0));
                        let n = pair.num_qubits();
                        let p = 1.0 / (1u64 << n) as f64;
                        (0..1usize << n)
                            .map(|bits| {
                                let outcome = Outcome::new(
                                    (0..n).map(|q| (bits >> q) & 1 == 1).collect(),
                                );
                                (outcome, p)
                            })
                            .collect()
                    }
                })
                .collect()
        };
        for (&length, dist) in LENGTHS.iter().zip(per_length) {
            out.push((
                idle_experiment(&prep_circuit, &idle(), length, &meas_circuit),
                dist,
            ));
        }
    }
    out
}

/// Counts equal to `SHOTS` times each probability.
pub fn exact_dataset(distributions: &[(Circuit, Vec<(Outcome, f64)>)]) -> DataSet {
    let mut data = DataSet::new();
    for (circuit, dist) in distributions {
        assert!(data.get(circuit).is_none(), "duplicate circuit {circuit}");
        data.add_counts(
            circuit.clone(),
            dist.iter().map(|(outcome, p)| {
                assert!(*p >= 0.0, "negative probability for {outcome}");
                (outcome.clone(), (p * SHOTS as f64).round() as u64)
            }),
        );
    }
    data
}

/// `SHOTS` multinomial samples of each distribution.
pub fn sampled_dataset(distributions: &[(Circuit, Vec<(Outcome, f64)>)], seed: u64) -> DataSet {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut data = DataSet::new();
    for (circuit, dist) in distributions {
        let mut remaining = SHOTS;
        let mut mass = 1.0;
        let mut counts = Vec::with_capacity(dist.len());
        for (i, (outcome, p)) in dist.iter().enumerate() {
            let count = if i + 1 == dist.len() {
                remaining
            } else {
                let q = (p / mass).clamp(0.0, 1.0);
                Binomial::new(remaining, q).unwrap().sample(&mut rng)
            };
            counts.push((outcome.clone(), count));
            remaining -= count;
            mass -= p;
        }
        data.add_counts(circuit.clone(), counts);
    }
    data
}

/// The exact dataset for the default pairs.
pub fn default_dataset(num_qubits: usize, max_weight: usize, rates: &Rates) -> DataSet {
    exact_dataset(&distributions(
        &default_pairs(num_qubits, max_weight),
        max_weight,
        rates,
    ))
}
