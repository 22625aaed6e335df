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
use std::ops::Mul;

use crate::PauliError;

/// Named handle to the alphabet of single-qubit Pauli operators, including the identity.
///
/// # Representation
///
/// The two bits are the symplectic representation of the operator, with Z in the Lsb0 and X in
/// the Lsb1, so `0b10` <-> `X`, `0b01` <-> `Z`, `0b11` <-> `Y` and `0b00` <-> `I`.  Phases are
/// never stored here; `Y` is exactly the Pauli Y matrix.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Pauli {
    I = 0b00,
    X = 0b10,
    Y = 0b11,
    Z = 0b01,
}

impl Pauli {
    /// Single-letter label of the operator.
    #[inline]
    pub fn label(&self) -> char {
        match self {
            Self::I => 'I',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }

    /// Attempt to convert an ASCII byte into a `Pauli`.
    #[inline]
    pub fn try_from_u8(value: u8) -> Result<Self, PauliError> {
        match value {
            b'I' => Ok(Self::I),
            b'X' => Ok(Self::X),
            b'Y' => Ok(Self::Y),
            b'Z' => Ok(Self::Z),
            _ => Err(PauliError::InvalidLetter(value as char)),
        }
    }

    /// Does this operator include an X component in its ZX representation?
    #[inline]
    pub fn has_x_component(&self) -> bool {
        ((*self as u8) & (Self::X as u8)) != 0
    }

    /// Does this operator include a Z component in its ZX representation?
    #[inline]
    pub fn has_z_component(&self) -> bool {
        ((*self as u8) & (Self::Z as u8)) != 0
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::I
    }

    /// The basis this operator measures in, or `None` for the identity.
    #[inline]
    pub fn basis(&self) -> Option<Basis> {
        match self {
            Self::I => None,
            Self::X => Some(Basis::X),
            Self::Y => Some(Basis::Y),
            Self::Z => Some(Basis::Z),
        }
    }

    /// Multiply two single-qubit Paulis, `self * other`.
    ///
    /// Returns the power of `i` in the phase of the product (in `0..4`) and the resulting
    /// operator, so `X.compose(Y) == (1, Z)` because `XY = iZ`.
    pub fn compose(self, other: Pauli) -> (u8, Pauli) {
        use Pauli::*;
        match (self, other) {
            (I, p) | (p, I) => (0, p),
            (X, Y) => (1, Z),
            (Y, Z) => (1, X),
            (Z, X) => (1, Y),
            (Y, X) => (3, Z),
            (Z, Y) => (3, X),
            (X, Z) => (3, Y),
            // Every remaining case is a letter times itself.
            _ => (0, I),
        }
    }
}

impl From<Basis> for Pauli {
    fn from(value: Basis) -> Pauli {
        match value {
            Basis::X => Pauli::X,
            Basis::Y => Pauli::Y,
            Basis::Z => Pauli::Z,
        }
    }
}

impl TryFrom<char> for Pauli {
    type Error = PauliError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii() {
            Self::try_from_u8(value as u8)
        } else {
            Err(PauliError::InvalidLetter(value))
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `1` if the two single-qubit operators commute and `-1` if they anticommute.
///
/// The identity commutes with everything, and every letter commutes with itself; any two
/// distinct non-identity letters anticommute.
#[inline]
pub fn commute_parity(left: Pauli, right: Pauli) -> i8 {
    let (l, r) = (left as u8, right as u8);
    // Symplectic product of the (z, x) bit pairs.
    let anticommutes = ((l & 0b01) & (r >> 1)) ^ ((l >> 1) & (r & 0b01));
    if anticommutes == 0 {
        1
    } else {
        -1
    }
}

/// One of the three single-qubit Pauli eigenbases.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Basis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Basis {
    /// All bases in their canonical order.
    pub const ALL: [Basis; 3] = [Basis::X, Basis::Y, Basis::Z];

    #[inline]
    pub fn label(&self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }

    /// Index of this basis into per-basis tables, following [Basis::ALL].
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Cyclic successor: `X -> Y -> Z -> X`.
    #[inline]
    pub fn next(&self) -> Basis {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::Z,
            Self::Z => Self::X,
        }
    }

    /// Cyclic predecessor: `X -> Z -> Y -> X`.
    #[inline]
    pub fn prev(&self) -> Basis {
        match self {
            Self::X => Self::Z,
            Self::Y => Self::X,
            Self::Z => Self::Y,
        }
    }
}

impl TryFrom<char> for Basis {
    type Error = PauliError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'X' => Ok(Self::X),
            'Y' => Ok(Self::Y),
            'Z' => Ok(Self::Z),
            'I' => Err(PauliError::IdentityInState),
            _ => Err(PauliError::InvalidLetter(value)),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The sign of a Pauli eigenstate, or of a whole Pauli operator.
#[repr(i8)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    #[default]
    Plus = 1,
    Minus = -1,
}

impl Sign {
    #[inline]
    pub fn value(&self) -> i8 {
        *self as i8
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.value() as f64
    }

    #[inline]
    pub fn flipped(&self) -> Sign {
        match self {
            Self::Plus => Self::Minus,
            Self::Minus => Self::Plus,
        }
    }

    #[inline]
    pub fn label(&self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }

    /// Sign with the given numeric value.  Any non-negative value counts as `Plus`.
    #[inline]
    pub fn from_value(value: i8) -> Sign {
        if value < 0 {
            Self::Minus
        } else {
            Self::Plus
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        if self == rhs {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTERS: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    #[test]
    fn parity_matches_letter_rule() {
        for left in LETTERS {
            for right in LETTERS {
                let expected = if left.is_identity() || right.is_identity() || left == right {
                    1
                } else {
                    -1
                };
                assert_eq!(commute_parity(left, right), expected, "{left}{right}");
            }
        }
    }

    #[test]
    fn compose_phases_are_antisymmetric() {
        for left in LETTERS {
            for right in LETTERS {
                let (forward, op_forward) = left.compose(right);
                let (backward, op_backward) = right.compose(left);
                assert_eq!(op_forward, op_backward);
                if commute_parity(left, right) == 1 {
                    assert_eq!(forward, backward);
                } else {
                    assert_eq!((forward + 2) % 4, backward);
                }
            }
        }
    }

    #[test]
    fn cyclic_shifts_invert_each_other() {
        for basis in Basis::ALL {
            assert_eq!(basis.next().prev(), basis);
            assert_ne!(basis.next(), basis);
            assert_ne!(basis.prev(), basis);
        }
        assert_eq!(Basis::Z.next(), Basis::X);
        assert_eq!(Basis::X.prev(), Basis::Z);
    }

    #[test]
    fn sign_product() {
        assert_eq!(Sign::Minus * Sign::Minus, Sign::Plus);
        assert_eq!(Sign::Plus * Sign::Minus, Sign::Minus);
        assert_eq!(Sign::Minus.flipped(), Sign::Plus);
        assert_eq!(Sign::from_value(-1).as_f64(), -1.0);
    }

    #[test]
    fn basis_rejects_identity() {
        assert_eq!(Basis::try_from('I'), Err(PauliError::IdentityInState));
        assert_eq!(Basis::try_from('Q'), Err(PauliError::InvalidLetter('Q')));
        assert_eq!(Pauli::try_from('I'), Ok(Pauli::I));
    }
}
