//! Constraint kinds, and the polarity conventions which make clauses and terms symmetric.
//!
//! # Primaries and secondaries
//!
//! For a constraint of some kind, a literal is *primary* if the quantifier of its atom
//! matches the kind: existential literals are primary in clauses, universal literals
//! are primary in terms.
//! Only primary literals may be asserted by a constraint; a secondary literal
//! participates in propagation only while a primary of the constraint depends on it.
//!
//! # Disabling polarity
//!
//! A literal *disables* its constraint when it is assigned the polarity which settles
//! the constraint outright: true satisfies a clause, false falsifies a term.
//! A disabled constraint is inert, in the sense that it can neither propagate nor
//! conflict until a backtrack.
//!
//! # Orientation
//!
//! A clause asserts the remaining literal itself while a term asserts the complement of
//! the remaining literal, as the universal player moves to refute a term.
//! Both are `literal ^ kind`, and [BitXor] is implemented to keep that arithmetic
//! readable where it matters.

use crate::structures::{atom::Quantifier, literal::Literal};

/// The kinds of constraint: clauses and terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// A disjunction of literals.
    Clause = 0,

    /// A conjunction of literals.
    Term = 1,
}

/// Both constraint kinds, for iteration in a fixed order.
pub const CONSTRAINT_KINDS: [ConstraintKind; 2] = [ConstraintKind::Clause, ConstraintKind::Term];

impl ConstraintKind {
    /// The kind as an index into kind-split structures.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The quantifier of primary literals of the kind.
    pub fn primary_quantifier(self) -> Quantifier {
        match self {
            Self::Clause => Quantifier::Existential,
            Self::Term => Quantifier::Universal,
        }
    }

    /// The polarity at which an assigned literal disables a constraint of the kind.
    pub fn disabling_polarity(self) -> bool {
        match self {
            Self::Clause => true,
            Self::Term => false,
        }
    }

    /// The other kind.
    pub fn other(self) -> Self {
        match self {
            Self::Clause => Self::Term,
            Self::Term => Self::Clause,
        }
    }
}

impl std::ops::BitXor<ConstraintKind> for Literal {
    type Output = Literal;

    /// The literal a constraint of the given kind asserts when this literal remains:
    /// the literal itself for clauses, its complement for terms.
    fn bitxor(self, kind: ConstraintKind) -> Literal {
        match kind {
            ConstraintKind::Clause => self,
            ConstraintKind::Term => !self,
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clause => write!(f, "clause"),
            Self::Term => write!(f, "term"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation() {
        let l = Literal::new(3, true);
        assert_eq!(l ^ ConstraintKind::Clause, l);
        assert_eq!(l ^ ConstraintKind::Term, !l);
    }

    #[test]
    fn primaries() {
        assert_eq!(
            ConstraintKind::Clause.primary_quantifier(),
            Quantifier::Existential
        );
        assert_eq!(
            ConstraintKind::Term.primary_quantifier(),
            Quantifier::Universal
        );
        assert!(ConstraintKind::Clause.disabling_polarity());
        assert!(!ConstraintKind::Term.disabling_polarity());
    }
}
