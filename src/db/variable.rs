/*!
The variable store: quantifiers, values, levels, antecedents, and the trail.

The store is the single owner of assignment state.
Reads and writes from every other subsystem are routed through its interface.

The trail records assignments in enqueue order, with the start index of each decision
level noted aside, so a level is a contiguous slice of the trail and backtracking
truncates to a prefix.
*/

use crate::{
    db::{CRef, LevelIndex},
    structures::{
        atom::{Atom, Quantifier},
        literal::Literal,
    },
};

/// The variable store.
pub struct VariableStore {
    quantifier: Vec<Quantifier>,
    auxiliary: Vec<bool>,
    value: Vec<Option<bool>>,
    level: Vec<LevelIndex>,
    antecedent: Vec<CRef>,
    trail_position: Vec<u32>,
    name: Vec<String>,

    trail: Vec<Literal>,
    level_break: Vec<usize>,
}

impl Default for VariableStore {
    fn default() -> Self {
        // Index 0 is padding, so variables index the store directly.
        VariableStore {
            quantifier: vec![Quantifier::Existential],
            auxiliary: vec![false],
            value: vec![None],
            level: vec![0],
            antecedent: vec![CRef::NONE],
            trail_position: vec![0],
            name: vec![String::default()],

            trail: Vec::default(),
            level_break: Vec::default(),
        }
    }
}

impl VariableStore {
    /// Adds a variable bound by `quantifier`, with the given external `name`.
    /// Returns the fresh (internal) atom.
    pub fn add_variable(&mut self, quantifier: Quantifier, auxiliary: bool, name: String) -> Atom {
        self.quantifier.push(quantifier);
        self.auxiliary.push(auxiliary);
        self.value.push(None);
        self.level.push(0);
        self.antecedent.push(CRef::NONE);
        self.trail_position.push(0);
        self.name.push(name);
        (self.quantifier.len() - 1) as Atom
    }

    /// The last variable added, or 0 if no variable has been added.
    pub fn last_variable(&self) -> Atom {
        (self.quantifier.len() - 1) as Atom
    }

    /// A count of variables in the store.
    pub fn variable_count(&self) -> usize {
        self.quantifier.len() - 1
    }

    /// The quantifier binding `v`.
    pub fn quantifier(&self, v: Atom) -> Quantifier {
        self.quantifier[v as usize]
    }

    /// True if `v` was introduced by circuit flattening, false otherwise.
    pub fn is_auxiliary(&self, v: Atom) -> bool {
        self.auxiliary[v as usize]
    }

    /// The external name of `v`.
    pub fn name(&self, v: Atom) -> &str {
        &self.name[v as usize]
    }

    /// True if `v` has a value, false otherwise.
    pub fn is_assigned(&self, v: Atom) -> bool {
        self.value[v as usize].is_some()
    }

    /// The value of `v`, if any.
    pub fn value_of(&self, v: Atom) -> Option<bool> {
        self.value[v as usize]
    }

    /// The value of `v`.
    ///
    /// To be used only when `v` is known to be assigned.
    pub fn assignment(&self, v: Atom) -> bool {
        self.value[v as usize] == Some(true)
    }

    /// The decision level at which `v` was assigned.
    ///
    /// Stale after unassignment; read only while `v` is assigned.
    pub fn decision_level_of(&self, v: Atom) -> LevelIndex {
        self.level[v as usize]
    }

    /// The position of `v` on the trail.
    ///
    /// Stale after unassignment; read only while `v` is assigned.
    pub fn trail_position(&self, v: Atom) -> u32 {
        self.trail_position[v as usize]
    }

    /// The antecedent of `v`: the constraint which forced `v`, or [CRef::NONE] for a
    /// decision or an unassigned variable.
    pub fn antecedent(&self, v: Atom) -> CRef {
        self.antecedent[v as usize]
    }

    /// Rewrites the antecedent of `v`, for use during constraint relocation.
    pub fn set_antecedent(&mut self, v: Atom, antecedent: CRef) {
        self.antecedent[v as usize] = antecedent;
    }

    /// Records `literal` on the trail at the current decision level, with the given
    /// antecedent.
    pub fn assign(&mut self, literal: Literal, antecedent: CRef) {
        let v = literal.atom() as usize;
        debug_assert!(self.value[v].is_none());
        self.value[v] = Some(literal.polarity());
        self.level[v] = self.decision_level();
        self.antecedent[v] = antecedent;
        self.trail_position[v] = self.trail.len() as u32;
        self.trail.push(literal);
    }

    /// Clears the value and antecedent of `v`.
    fn unassign(&mut self, v: Atom) {
        self.value[v as usize] = None;
        self.antecedent[v as usize] = CRef::NONE;
    }

    /// True if every variable is assigned, false otherwise.
    pub fn all_assigned(&self) -> bool {
        self.trail.len() == self.variable_count()
    }

    /// The current decision level.
    pub fn decision_level(&self) -> LevelIndex {
        self.level_break.len() as LevelIndex
    }

    /// Opens a fresh decision level.
    pub fn push_decision_level(&mut self) {
        self.level_break.push(self.trail.len());
    }

    /// The trail, in enqueue order.
    pub fn trail(&self) -> &[Literal] {
        &self.trail
    }

    /// Removes assignments above `target`, invoking `freed` for each literal removed in
    /// reverse-trail order.
    ///
    /// Each callback happens after the value of the literal's variable is cleared, so
    /// partial backtrack state is observed consistently.
    pub fn unassign_to(&mut self, target: LevelIndex, mut freed: impl FnMut(Literal)) {
        if target >= self.decision_level() {
            return;
        }
        let keep = self.level_break[target as usize];
        while self.trail.len() > keep {
            // The pop is sound: keep is below the current trail length.
            let literal = self.trail.pop().unwrap();
            self.unassign(literal.atom());
            freed(literal);
        }
        self.level_break.truncate(target as usize);
    }

    /// Removes every assignment, level zero included, invoking `freed` for each
    /// literal removed in reverse-trail order.
    ///
    /// Level-zero assignments are relative to the dependency relation in force when
    /// they were derived; when the relation grows they may no longer be derivable, and
    /// the trail is rebuilt from nothing.
    pub fn unassign_all(&mut self, mut freed: impl FnMut(Literal)) {
        while let Some(literal) = self.trail.pop() {
            self.unassign(literal.atom());
            freed(literal);
        }
        self.level_break.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_prefix_on_backtrack() {
        let mut store = VariableStore::default();
        for _ in 0..4 {
            store.add_variable(Quantifier::Existential, false, String::default());
        }

        store.assign(Literal::new(1, true), CRef::NONE);
        store.push_decision_level();
        store.assign(Literal::new(2, false), CRef::NONE);
        store.assign(Literal::new(3, true), CRef(0));
        store.push_decision_level();
        store.assign(Literal::new(4, true), CRef::NONE);

        assert_eq!(store.decision_level(), 2);
        assert_eq!(store.decision_level_of(3), 1);

        let mut freed = Vec::new();
        store.unassign_to(1, |l| freed.push(l));

        assert_eq!(freed, vec![Literal::new(4, true)]);
        assert_eq!(store.trail().len(), 3);
        assert!(!store.is_assigned(4));
        assert!(store.is_assigned(3));
        assert_eq!(store.antecedent(4), CRef::NONE);
    }
}
