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

//! Fiducial pairs: which Pauli states to prepare and measure around the repeated idle.

use std::fmt;

use idletomo_pauli::{Basis, Circuit, PauliDict, PauliState, Sign};
use itertools::Itertools;

use crate::error::{IdleTomographyError, Result};
use crate::options::SignPreference;
use crate::tiling::tile_pauli_fidpairs;

/// A preferred sign for each of the `X`, `Y` and `Z` bases, indexed by [Basis::index].
pub type BasisSigns = [Sign; 3];

/// A preparation and a measurement on the same number of qubits.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct FidPair {
    prep: PauliState,
    meas: PauliState,
}

impl FidPair {
    pub fn new(prep: PauliState, meas: PauliState) -> Result<Self> {
        if prep.num_qubits() != meas.num_qubits() {
            return Err(IdleTomographyError::QubitCountMismatch {
                expected: prep.num_qubits(),
                found: meas.num_qubits(),
            });
        }
        Ok(Self { prep, meas })
    }

    #[inline]
    pub fn prep(&self) -> &PauliState {
        &self.prep
    }

    #[inline]
    pub fn meas(&self) -> &PauliState {
        &self.meas
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.prep.num_qubits()
    }

    /// Do prep and measurement use the same basis on every qubit?  Pairs that do are used for
    /// stochastic and affine errors, the rest for Hamiltonian errors.
    #[inline]
    pub fn same_bases(&self) -> bool {
        self.prep.same_bases(&self.meas)
    }

    /// The native preparation and measurement circuits of this pair.
    pub fn to_circuits(&self, dicts: &PauliDicts) -> Result<(Circuit, Circuit)> {
        Ok((
            self.prep.to_circuit(&dicts.prep)?,
            self.meas.to_circuit(&dicts.meas)?,
        ))
    }
}

impl fmt::Display for FidPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.prep, self.meas)
    }
}

/// The preparation and measurement translation tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PauliDicts {
    pub prep: PauliDict,
    pub meas: PauliDict,
}

impl PauliDicts {
    pub fn new(prep: PauliDict, meas: PauliDict) -> Self {
        Self { prep, meas }
    }

    /// [PauliDict::standard_prep] and [PauliDict::standard_meas].
    pub fn standard() -> Self {
        Self::new(PauliDict::standard_prep(), PauliDict::standard_meas())
    }
}

/// The Hamiltonian templates used when none are given.
pub fn default_ham_templates(max_weight: usize) -> Result<Vec<String>> {
    let templates: &[&str] = match max_weight {
        1 => &["X", "Y", "Z"],
        2 => &["ZY", "ZX", "XZ", "YZ", "YX", "XY"],
        _ => return Err(IdleTomographyError::UnsupportedWeight(max_weight)),
    };
    Ok(templates.iter().map(|s| s.to_string()).collect())
}

fn signed_state(bases: Vec<Basis>, signs: impl Fn(usize, Basis) -> Sign) -> Result<PauliState> {
    let signs = bases
        .iter()
        .enumerate()
        .map(|(pos, basis)| signs(pos, *basis))
        .collect();
    Ok(PauliState::new(bases, signs)?)
}

/// Sign patterns applied on top of the preferred signs of each stochastic template.
///
/// Affine rates need both signs of every basis; for two qubits, flipping both is redundant with
/// flipping neither.
fn flip_patterns(max_weight: usize, include_affine: bool) -> Result<Vec<Vec<Sign>>> {
    use Sign::{Minus, Plus};
    if !include_affine {
        return Ok(vec![vec![Plus; max_weight]]);
    }
    match max_weight {
        1 => Ok(vec![vec![Plus], vec![Minus]]),
        2 => Ok(vec![vec![Plus, Plus], vec![Plus, Minus], vec![Minus, Plus]]),
        _ => Err(IdleTomographyError::UnsupportedWeight(max_weight)),
    }
}

/// The fiducial pairs needed to extract every requested class of error up to weight `max_weight`
/// on `num_qubits` qubits.
///
/// Stochastic (and affine) pairs prepare and measure in the same basis; one template is built
/// per sign pattern and per basis tuple, in that nesting.  Hamiltonian pairs come from
/// `ham_tmpl`: each letter is prepared along its cyclic predecessor and measured along its
/// cyclic successor.  All templates are tiled across the register, stochastic pairs first.
#[allow(clippy::too_many_arguments)]
pub fn idle_tomography_fidpairs<S: AsRef<str>>(
    num_qubits: usize,
    max_weight: usize,
    include_hamiltonian: bool,
    include_stochastic: bool,
    include_affine: bool,
    ham_tmpl: &[S],
    preferred_prep_signs: BasisSigns,
    preferred_meas_signs: BasisSigns,
) -> Result<Vec<FidPair>> {
    if include_affine && !include_stochastic {
        return Err(IdleTomographyError::AffineWithoutStochastic);
    }
    let mut fidpairs = Vec::new();

    if include_stochastic {
        let mut templates = Vec::new();
        for flips in flip_patterns(max_weight, include_affine)? {
            for bases in (0..max_weight)
                .map(|_| Basis::ALL.iter().copied())
                .multi_cartesian_product()
            {
                let prep = signed_state(bases.clone(), |pos, basis| {
                    flips[pos] * preferred_prep_signs[basis.index()]
                })?;
                let meas = signed_state(bases, |pos, basis| {
                    flips[pos] * preferred_meas_signs[basis.index()]
                })?;
                templates.push(FidPair::new(prep, meas)?);
            }
        }
        fidpairs.extend(tile_pauli_fidpairs(&templates, num_qubits, max_weight)?);
    }

    if include_hamiltonian {
        let mut templates = Vec::with_capacity(ham_tmpl.len());
        for template in ham_tmpl {
            let template = template.as_ref();
            let length = template.chars().count();
            if length != max_weight {
                return Err(IdleTomographyError::TemplateLength {
                    template: template.to_owned(),
                    length,
                    weight: max_weight,
                });
            }
            let letters = template
                .chars()
                .map(Basis::try_from)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let prep = signed_state(letters.iter().map(Basis::prev).collect(), |_, basis| {
                preferred_prep_signs[basis.index()]
            })?;
            let meas = signed_state(letters.iter().map(Basis::next).collect(), |_, basis| {
                preferred_meas_signs[basis.index()]
            })?;
            templates.push(FidPair::new(prep, meas)?);
        }
        fidpairs.extend(tile_pauli_fidpairs(&templates, num_qubits, max_weight)?);
    }

    Ok(fidpairs)
}

/// The sign of each basis whose entry in `dict` has the fewest gates.
///
/// Ties go to `+`.  A basis with only one signed entry uses that sign, and a basis with neither
/// is an error.
pub fn preferred_signs_from_paulidict(dict: &PauliDict) -> Result<BasisSigns> {
    let mut out = [Sign::Plus; 3];
    for basis in Basis::ALL {
        out[basis.index()] = match (dict.get(Sign::Plus, basis), dict.get(Sign::Minus, basis)) {
            (Some(plus), Some(minus)) if plus.len() <= minus.len() => Sign::Plus,
            (Some(_), Some(_)) => Sign::Minus,
            (Some(_), None) => Sign::Plus,
            (None, Some(_)) => Sign::Minus,
            (None, None) => return Err(IdleTomographyError::MissingBasis(basis)),
        };
    }
    Ok(out)
}

fn circuit_to_state(circuit: &Circuit, dict: &PauliDict, num_qubits: usize) -> Option<PauliState> {
    let mut per_qubit = vec![Vec::new(); num_qubits];
    for label in circuit.labels() {
        let [qubit] = label.qubits() else {
            return None;
        };
        per_qubit.get_mut(*qubit as usize)?.push(label.name());
    }
    let (signs, bases): (Vec<_>, Vec<_>) = per_qubit
        .iter()
        .map(|names| dict.lookup(names.as_slice()))
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .unzip();
    PauliState::new(bases, signs).ok()
}

/// Translate native `(prep, meas)` circuit pairs back into Pauli fiducial pairs.
///
/// Every gate must act on exactly one qubit below `num_qubits`, and each qubit's gate names must
/// match a dictionary entry exactly.  Pairs that cannot be translated are left out.
pub fn fidpairs_to_pauli_fidpairs(
    pairs: &[(Circuit, Circuit)],
    dicts: &PauliDicts,
    num_qubits: usize,
) -> Vec<FidPair> {
    pairs
        .iter()
        .filter_map(|(prep, meas)| {
            let prep = circuit_to_state(prep, &dicts.prep, num_qubits)?;
            let meas = circuit_to_state(meas, &dicts.meas, num_qubits)?;
            FidPair::new(prep, meas).ok()
        })
        .collect()
}

/// The circuit `prep`, then `length` repetitions of `idle`, then `meas`.
pub fn idle_experiment(prep: &Circuit, idle: &Circuit, length: usize, meas: &Circuit) -> Circuit {
    prep.concat(&idle.repeat(length)).concat(meas)
}

/// Every circuit an idle-tomography run needs: each generated fiducial pair, translated to native
/// gates, around each idle length in `max_lengths`.
///
/// Circuits are grouped by fiducial pair.  `ham_tmpl` defaults to [default_ham_templates].
#[allow(clippy::too_many_arguments)]
pub fn make_idle_tomography_list(
    num_qubits: usize,
    pauli_dicts: &PauliDicts,
    max_lengths: &[usize],
    max_err_weight: usize,
    include_hamiltonian: bool,
    include_stochastic: bool,
    include_affine: bool,
    ham_tmpl: Option<&[String]>,
    preferred_prep_signs: &SignPreference,
    preferred_meas_signs: &SignPreference,
    idle: &Circuit,
) -> Result<Vec<Circuit>> {
    let prep_signs = preferred_prep_signs.resolve(&pauli_dicts.prep)?;
    let meas_signs = preferred_meas_signs.resolve(&pauli_dicts.meas)?;
    let default_tmpl;
    let ham_tmpl = match ham_tmpl {
        Some(tmpl) => tmpl,
        None => {
            default_tmpl = default_ham_templates(max_err_weight)?;
            &default_tmpl[..]
        }
    };
    let fidpairs = idle_tomography_fidpairs(
        num_qubits,
        max_err_weight,
        include_hamiltonian,
        include_stochastic,
        include_affine,
        ham_tmpl,
        prep_signs,
        meas_signs,
    )?;
    let mut experiments = Vec::with_capacity(fidpairs.len() * max_lengths.len());
    for pair in fidpairs.iter() {
        let (prep, meas) = pair.to_circuits(pauli_dicts)?;
        experiments.extend(
            max_lengths
                .iter()
                .map(|&length| idle_experiment(&prep, idle, length, &meas)),
        );
    }
    Ok(experiments)
}

#[cfg(test)]
mod tests {
    use super::*;

    use idletomo_pauli::GateLabel;

    const PLUS: BasisSigns = [Sign::Plus; 3];

    #[test]
    fn stochastic_and_affine_templates() {
        let no_ham: [&str; 0] = [];
        let pairs = idle_tomography_fidpairs(2, 1, false, true, true, &no_ham, PLUS, PLUS).unwrap();
        assert_eq!(pairs.len(), 6);
        for pair in pairs.iter() {
            assert_eq!(pair.num_qubits(), 2);
            assert!(pair.same_bases());
        }
        let labels = pairs.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                "(+X+X, +X+X)",
                "(+Y+Y, +Y+Y)",
                "(+Z+Z, +Z+Z)",
                "(-X-X, -X-X)",
                "(-Y-Y, -Y-Y)",
                "(-Z-Z, -Z-Z)",
            ]
        );
    }

    #[test]
    fn affine_needs_low_weight_and_stochastic() {
        let tmpl = default_ham_templates(2).unwrap();
        assert!(matches!(
            idle_tomography_fidpairs(1, 3, true, true, true, &tmpl, PLUS, PLUS),
            Err(IdleTomographyError::UnsupportedWeight(3))
        ));
        assert!(matches!(
            idle_tomography_fidpairs(2, 1, true, false, true, &tmpl, PLUS, PLUS),
            Err(IdleTomographyError::AffineWithoutStochastic)
        ));
    }

    #[test]
    fn hamiltonian_templates_are_cyclic_shifts() {
        let tmpl = default_ham_templates(2).unwrap();
        let prep_signs = [Sign::Plus, Sign::Minus, Sign::Plus];
        let meas_signs = [Sign::Minus, Sign::Plus, Sign::Plus];
        let pairs =
            idle_tomography_fidpairs(3, 2, true, false, false, &tmpl, prep_signs, meas_signs)
                .unwrap();
        assert!(!pairs.is_empty());
        for pair in pairs.iter() {
            assert!(!pair.same_bases());
            for qubit in 0..3 {
                let prep = pair.prep().basis(qubit);
                let meas = pair.meas().basis(qubit);
                assert_eq!(meas, prep.prev());
                assert_eq!(pair.prep().sign(qubit), prep_signs[prep.index()]);
                assert_eq!(pair.meas().sign(qubit), meas_signs[meas.index()]);
            }
        }
        // "ZY" prepares along (Y, X) and measures along (X, Z), laid out along the row [0, 1, 0].
        assert_eq!(pairs[0].to_string(), "(-Y+X-Y, -X+Z-X)");
    }

    #[test]
    fn template_length_is_checked() {
        assert!(matches!(
            idle_tomography_fidpairs(3, 2, true, false, false, &["XYZ"], PLUS, PLUS),
            Err(IdleTomographyError::TemplateLength { length: 3, weight: 2, .. })
        ));
    }

    #[test]
    fn preferred_signs_pick_the_shorter_sequence() {
        let dicts = PauliDicts::standard();
        assert_eq!(
            preferred_signs_from_paulidict(&dicts.prep).unwrap(),
            [Sign::Plus, Sign::Minus, Sign::Plus]
        );
        assert_eq!(
            preferred_signs_from_paulidict(&dicts.meas).unwrap(),
            [Sign::Minus, Sign::Plus, Sign::Plus]
        );
        let partial = PauliDict::from_entries([
            ("-X", vec!["Gy"]),
            ("+Y", vec!["Gx"]),
            ("-Y", vec!["Gx"]),
        ])
        .unwrap();
        assert!(matches!(
            preferred_signs_from_paulidict(&partial),
            Err(IdleTomographyError::MissingBasis(Basis::Z))
        ));
        let with_z = PauliDict::from_entries([
            ("-X", vec!["Gy"]),
            ("+Y", vec!["Gx"]),
            ("-Y", vec!["Gx"]),
            ("Z", Vec::new()),
        ])
        .unwrap();
        assert_eq!(
            preferred_signs_from_paulidict(&with_z).unwrap(),
            [Sign::Minus, Sign::Plus, Sign::Plus]
        );
    }

    #[test]
    fn gate_sequences_round_trip() {
        let dicts = PauliDicts::standard();
        let prep_signs = preferred_signs_from_paulidict(&dicts.prep).unwrap();
        let meas_signs = preferred_signs_from_paulidict(&dicts.meas).unwrap();
        let tmpl = default_ham_templates(2).unwrap();
        let pairs =
            idle_tomography_fidpairs(3, 2, true, true, true, &tmpl, prep_signs, meas_signs)
                .unwrap();
        let circuits = pairs
            .iter()
            .map(|pair| pair.to_circuits(&dicts).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(fidpairs_to_pauli_fidpairs(&circuits, &dicts, 3), pairs);
    }

    #[test]
    fn unconvertible_sequences_are_skipped() {
        let dicts = PauliDicts::standard();
        let good = (
            Circuit::from_labels([GateLabel::on_qubit("Gy", 0)]),
            Circuit::from_labels([GateLabel::on_qubit("Gx", 0)]),
        );
        let unknown_gate = (
            Circuit::from_labels([GateLabel::on_qubit("Gz", 0)]),
            Circuit::empty(),
        );
        let global_gate = (Circuit::from_labels([GateLabel::global("Gi")]), Circuit::empty());
        let outside = (Circuit::from_labels([GateLabel::on_qubit("Gx", 3)]), Circuit::empty());
        let converted = fidpairs_to_pauli_fidpairs(
            &[unknown_gate, good, global_gate, outside],
            &dicts,
            1,
        );
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].to_string(), "(+X, +Y)");
    }

    #[test]
    fn experiment_list_brackets_each_length() {
        let dicts = PauliDicts::standard();
        let idle = Circuit::from_labels([GateLabel::global("Gi")]);
        let experiments = make_idle_tomography_list(
            1,
            &dicts,
            &[1, 2, 4],
            1,
            true,
            true,
            false,
            None,
            &SignPreference::Auto,
            &SignPreference::Auto,
            &idle,
        )
        .unwrap();
        // Three stochastic pairs and three Hamiltonian pairs, three lengths each.
        assert_eq!(experiments.len(), 18);
        // The first pair is (+X, -X): `Gy` then `Gy`.
        assert_eq!(experiments[0].to_string(), "Gy:0GiGy:0");
        assert_eq!(experiments[2].to_string(), "Gy:0GiGiGiGiGy:0");
    }
}
