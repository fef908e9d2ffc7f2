//! Atoms, and the quantifiers bound to them.
//!
//! An atom is a 1-based index into the quantifier prefix.
//! The id 0 is reserved as a sentinel throughout the library (e.g. for ring lists and
//! watched dependencies).
//!
//! Internally atoms are ordered by prefix position: if `v < w` then `v` is quantified
//! at the same or a more outer block than `w`.
//! Parsers maintain the map from external names to internal atoms.

/// An atom.
pub type Atom = u32;

/// The quantifier an atom is bound by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantifier {
    /// An existentially quantified atom.
    Existential,

    /// A universally quantified atom.
    Universal,
}

impl Quantifier {
    /// The quantifier of the opposing player.
    pub fn other(self) -> Self {
        match self {
            Self::Existential => Self::Universal,
            Self::Universal => Self::Existential,
        }
    }
}

impl std::fmt::Display for Quantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Existential => write!(f, "e"),
            Self::Universal => write!(f, "a"),
        }
    }
}
