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

//! Translation tables between signed Pauli bases and native gate sequences.

use indexmap::IndexMap;

use crate::letters::{Basis, Sign};
use crate::PauliError;

/// A mapping from a signed basis (`"+X"`, `"-Z"`, ...) to the native gate names that prepare or
/// measure in it on a single qubit.
///
/// Entries keep their insertion order.  The bare key `"X"` is the same as `"+X"`, and giving both
/// is an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PauliDict {
    entries: IndexMap<(Sign, Basis), Vec<String>>,
}

fn parse_key(key: &str) -> Result<(Sign, Basis), PauliError> {
    let invalid = || PauliError::InvalidDictKey(key.to_owned());
    let mut chars = key.chars();
    let (sign, letter) = match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), None, None) => (Sign::Plus, letter),
        (Some('+'), Some(letter), None) => (Sign::Plus, letter),
        (Some('-'), Some(letter), None) => (Sign::Minus, letter),
        _ => return Err(invalid()),
    };
    let basis = Basis::try_from(letter).map_err(|_| invalid())?;
    Ok((sign, basis))
}

fn key_label(sign: Sign, basis: Basis) -> String {
    format!("{sign}{basis}")
}

impl PauliDict {
    /// Build a dictionary from `(key, gate names)` entries, with keys like `"+X"`, `"X"` or `"-Y"`.
    pub fn from_entries<K, G, S>(
        entries: impl IntoIterator<Item = (K, G)>,
    ) -> Result<Self, PauliError>
    where
        K: AsRef<str>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = IndexMap::new();
        for (key, gates) in entries {
            let key = parse_key(key.as_ref())?;
            let gates = gates.into_iter().map(Into::into).collect();
            if out.insert(key, gates).is_some() {
                return Err(PauliError::DuplicateDictKey(key_label(key.0, key.1)));
            }
        }
        Ok(Self { entries: out })
    }

    /// Single-qubit preparations from `|0>` using `Gx` and `Gy` quarter turns.
    pub fn standard_prep() -> Self {
        Self::from_known([
            ((Sign::Plus, Basis::X), vec!["Gy"]),
            ((Sign::Plus, Basis::Y), vec!["Gx", "Gx", "Gx"]),
            ((Sign::Plus, Basis::Z), vec![]),
            ((Sign::Minus, Basis::X), vec!["Gy", "Gy", "Gy"]),
            ((Sign::Minus, Basis::Y), vec!["Gx"]),
            ((Sign::Minus, Basis::Z), vec!["Gx", "Gx"]),
        ])
    }

    /// Single-qubit measurement rotations into the computational basis, the inverses of
    /// [PauliDict::standard_prep].
    pub fn standard_meas() -> Self {
        Self::from_known([
            ((Sign::Plus, Basis::X), vec!["Gy", "Gy", "Gy"]),
            ((Sign::Plus, Basis::Y), vec!["Gx"]),
            ((Sign::Plus, Basis::Z), vec![]),
            ((Sign::Minus, Basis::X), vec!["Gy"]),
            ((Sign::Minus, Basis::Y), vec!["Gx", "Gx", "Gx"]),
            ((Sign::Minus, Basis::Z), vec!["Gx", "Gx"]),
        ])
    }

    fn from_known(entries: [((Sign, Basis), Vec<&str>); 6]) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, gates)| (key, gates.into_iter().map(str::to_owned).collect()))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, sign: Sign, basis: Basis) -> Option<&[String]> {
        self.entries.get(&(sign, basis)).map(Vec::as_slice)
    }

    /// Like [PauliDict::get], but a missing entry is an error.
    pub fn gates_for(&self, sign: Sign, basis: Basis) -> Result<&[String], PauliError> {
        self.get(sign, basis).ok_or_else(|| PauliError::MissingDictEntry {
            key: key_label(sign, basis),
        })
    }

    /// The signed basis whose gate sequence is exactly `gates`.
    ///
    /// If several entries share a sequence the one inserted last is returned.
    pub fn lookup<S: AsRef<str>>(&self, gates: &[S]) -> Option<(Sign, Basis)> {
        self.entries
            .iter()
            .rev()
            .find(|(_, value)| {
                value.len() == gates.len()
                    && value.iter().zip(gates).all(|(a, b)| a == b.as_ref())
            })
            .map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = ((Sign, Basis), &[String])> + '_ {
        self.entries.iter().map(|(key, value)| (*key, value.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_plus_keys_coincide() {
        let dict =
            PauliDict::from_entries([("X", vec!["Gy"]), ("-X", vec!["Gy", "Gy", "Gy"])]).unwrap();
        assert_eq!(dict.get(Sign::Plus, Basis::X), Some(&["Gy".to_string()][..]));
        assert_eq!(
            PauliDict::from_entries([("X", vec!["Gy"]), ("+X", vec!["Gy"])]),
            Err(PauliError::DuplicateDictKey("+X".to_owned()))
        );
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for key in ["", "Q", "+I", "XX", "*X", "+-X"] {
            assert_eq!(
                PauliDict::from_entries([(key, Vec::<String>::new())]),
                Err(PauliError::InvalidDictKey(key.to_owned())),
                "{key}"
            );
        }
    }

    #[test]
    fn missing_entries_are_reported() {
        let dict = PauliDict::from_entries([("Z", Vec::<String>::new())]).unwrap();
        assert_eq!(
            dict.gates_for(Sign::Minus, Basis::Y),
            Err(PauliError::MissingDictEntry {
                key: "-Y".to_owned()
            })
        );
    }

    #[test]
    fn standard_dicts_invert() {
        let prep = PauliDict::standard_prep();
        let meas = PauliDict::standard_meas();
        assert_eq!(prep.len(), 6);
        assert_eq!(meas.len(), 6);
        for ((sign, basis), gates) in prep.iter() {
            assert_eq!(prep.lookup(gates), Some((sign, basis)));
        }
        assert_eq!(meas.lookup(&["Gx"]), Some((Sign::Plus, Basis::Y)));
        assert_eq!(meas.lookup(&["Gz"]), None);
    }
}
