/*!
Variable move-to-front decision heuristics.

Variables sit on a circular doubly-linked list with per-variable timestamps which
increase towards the front.
A `next_search` cursor walks from the front towards the back; variables which become
eligible with better timestamps than the cursor collect on an overflow queue which is
consulted first and drained at each backtrack.

On learning, the assigned variables of the learnt constraint move to the front
(arbitrary order, or sorted by quantifier depth so the innermost ends at the very
front).
The prefix specialisation never moves, so decisions follow the initial quantifier
order.

The split variant keeps two independent lists, one consulted in *existential mode*
(learning on terms) and one in *universal mode* (learning on clauses), toggling the
active mode after a configured number of restarts.
*/

use std::collections::BinaryHeap;

use rand::Rng;

use crate::{
    db::{dependency::DependencyManager, variable::VariableStore, LevelIndex},
    structures::{atom::Atom, constraint::ConstraintKind, literal::Literal},
};

use super::{phase::HeuristicCommon, DecisionMode};

#[derive(Clone)]
struct ListEntry {
    prev: Atom,
    next: Atom,
    timestamp: i64,
}

/// One move-to-front decision state: list, cursor, and overflow queue.
pub struct VmtfList {
    entries: Vec<ListEntry>,
    list_head: Atom,
    next_search: Atom,
    overflow: BinaryHeap<(i64, Atom)>,
}

impl Default for VmtfList {
    fn default() -> Self {
        VmtfList {
            entries: vec![ListEntry {
                prev: 0,
                next: 0,
                timestamp: 0,
            }],
            list_head: 0,
            next_search: 0,
            overflow: BinaryHeap::default(),
        }
    }
}

impl VmtfList {
    /// Appends a variable at the back of the list.
    /// An auxiliary variable forms a singleton list of its own, so the walk never
    /// reaches it.
    pub fn add_variable(&mut self, auxiliary: bool) {
        let fresh = self.entries.len() as Atom;
        if self.list_head == 0 {
            self.entries.push(ListEntry {
                prev: fresh,
                next: fresh,
                timestamp: 0,
            });
            self.list_head = fresh;
            self.next_search = fresh;
        } else if auxiliary {
            self.entries.push(ListEntry {
                prev: fresh,
                next: fresh,
                timestamp: 0,
            });
        } else {
            let head = self.list_head;
            let old_last = self.entries[head as usize].prev;
            self.entries.push(ListEntry {
                prev: old_last,
                next: head,
                timestamp: 0,
            });
            self.entries[head as usize].prev = fresh;
            self.entries[old_last as usize].next = fresh;
        }
    }

    /// Stamps the list back-to-front with ascending timestamps.
    pub fn stamp(&mut self, timestamp: &mut i64) {
        let head = self.list_head;
        if head == 0 {
            return;
        }
        let mut at = head;
        loop {
            at = self.entries[at as usize].prev;
            self.entries[at as usize].timestamp = *timestamp;
            *timestamp += 1;
            if at == head {
                break;
            }
        }
    }

    /// Restamps from zero, for timestamp overflow and mode toggles.
    pub fn reset_timestamps(&mut self, timestamp: &mut i64) {
        *timestamp = 0;
        self.stamp(timestamp);
    }

    fn timestamp(&self, v: Atom) -> i64 {
        self.entries[v as usize].timestamp
    }

    fn detach(&mut self, v: Atom) {
        let prev = self.entries[v as usize].prev;
        let next = self.entries[v as usize].next;
        self.entries[prev as usize].next = next;
        self.entries[next as usize].prev = prev;
    }

    /// Moves `v` to the front of the list.
    pub fn move_to_front(&mut self, v: Atom, auxiliary: &[bool], timestamp: &mut i64) {
        let head = self.list_head;
        if head == v || auxiliary[v as usize] {
            return;
        }

        if *timestamp == i64::MAX - 1 {
            self.reset_timestamps(timestamp);
        }
        *timestamp += 1;
        self.entries[v as usize].timestamp = *timestamp;

        self.detach(v);

        let head_prev = self.entries[head as usize].prev;
        self.entries[head as usize].prev = v;
        self.entries[v as usize].next = head;
        self.entries[v as usize].prev = head_prev;
        self.entries[head_prev as usize].next = v;
        self.list_head = v;
    }

    /// Moves `v` to the back of the list.
    pub fn move_to_back(&mut self, v: Atom, auxiliary: &[bool], timestamp: &mut i64) {
        let head = self.list_head;
        if auxiliary[v as usize] || (head == v && self.entries[v as usize].next == v) {
            return;
        }

        if *timestamp == i64::MAX - 1 {
            self.reset_timestamps(timestamp);
        }
        *timestamp += 1;
        self.entries[v as usize].timestamp = -*timestamp;

        if self.next_search == v {
            self.next_search = self.entries[v as usize].next;
        }
        if self.list_head == v {
            // The head slides; the list order is otherwise unchanged.
            self.list_head = self.entries[v as usize].next;
        } else {
            self.detach(v);
            let head_prev = self.entries[head as usize].prev;
            self.entries[head as usize].prev = v;
            self.entries[v as usize].next = head;
            self.entries[v as usize].prev = head_prev;
            self.entries[head_prev as usize].next = v;
        }
    }

    /// Notes `v` as eligible: queued if its timestamp beats the cursor's.
    pub fn note_eligible(&mut self, v: Atom, auxiliary: &[bool]) {
        if !auxiliary[v as usize] && self.timestamp(v) > self.timestamp(self.next_search) {
            self.overflow.push((self.timestamp(v), v));
        }
    }

    /// Promotes the cursor to `v` if `v` carries a better timestamp.
    pub fn promote(&mut self, v: Atom) {
        if self.timestamp(v) > self.timestamp(self.next_search) {
            self.next_search = v;
        }
    }

    /// Drains the overflow queue, promoting entries which remain eligible.
    pub fn drain_overflow(
        &mut self,
        eligible: impl Fn(Atom) -> bool,
    ) {
        while let Some((_, v)) = self.overflow.pop() {
            if eligible(v) && self.timestamp(v) > self.timestamp(self.next_search) {
                self.next_search = v;
            }
        }
    }

    /// The next decision candidate: the overflow queue first, then the list walk.
    pub fn choose(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        while let Some((_, v)) = self.overflow.peek() {
            if variables.is_assigned(*v) {
                self.overflow.pop();
            } else {
                break;
            }
        }
        if let Some((_, v)) = self.overflow.pop() {
            return Some(v);
        }

        if self.next_search == 0 {
            return None;
        }
        while !dependencies.is_decision_candidate(self.next_search, variables)
            && self.entries[self.next_search as usize].next != self.list_head
        {
            self.next_search = self.entries[self.next_search as usize].next;
        }
        match dependencies.is_decision_candidate(self.next_search, variables) {
            true => Some(self.next_search),
            false => None,
        }
    }

    /// Moves the assigned variables of a learnt constraint to the front.
    /// With `by_prefix` the variables move outermost first, leaving the innermost at
    /// the very front.
    pub fn move_learnt(
        &mut self,
        literals: &[Literal],
        by_prefix: bool,
        variables: &VariableStore,
        auxiliary: &[bool],
        timestamp: &mut i64,
    ) {
        if by_prefix {
            let mut to_move: Vec<Atom> = literals
                .iter()
                .map(|l| l.atom())
                .filter(|v| variables.is_assigned(*v))
                .collect();
            to_move.sort_unstable();
            for v in to_move {
                self.move_to_front(v, auxiliary, timestamp);
            }
        } else {
            for literal in literals {
                let v = literal.atom();
                if variables.is_assigned(v) {
                    self.move_to_front(v, auxiliary, timestamp);
                }
            }
        }
    }

    /// Moves the assigned variables of a learnt constraint to the back.
    pub fn move_learnt_back(
        &mut self,
        literals: &[Literal],
        variables: &VariableStore,
        auxiliary: &[bool],
        timestamp: &mut i64,
    ) {
        for literal in literals {
            let v = literal.atom();
            if variables.is_assigned(v) {
                self.move_to_back(v, auxiliary, timestamp);
            }
        }
    }

    /// Restarts the walk from the front.
    pub fn rewind(&mut self) {
        self.next_search = self.list_head;
    }
}

/// The single-list orderings.
pub enum VmtfOrdering {
    /// Move assigned variables of a learnt constraint to the front, in constraint
    /// order.
    Arbitrary,

    /// Move sorted by quantifier depth, innermost to the very front.
    ByPrefix,

    /// Never move: decisions follow the prefix.
    Static,
}

/// The VMTF decision heuristic, covering the dep-learn, order, and prefix variants.
pub struct VmtfHeuristic {
    pub common: HeuristicCommon,
    ordering: VmtfOrdering,
    list: VmtfList,
    timestamp: i64,
}

impl VmtfHeuristic {
    pub fn new(common: HeuristicCommon, ordering: VmtfOrdering) -> Self {
        VmtfHeuristic {
            common,
            ordering,
            list: VmtfList::default(),
            timestamp: 0,
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool) {
        self.common.add_variable(auxiliary);
        self.list.add_variable(auxiliary);
    }

    pub fn notify_start(&mut self) {
        self.list.stamp(&mut self.timestamp);
    }

    pub fn notify_assigned(&mut self, literal: Literal) {
        self.common.note_assignment(literal);
    }

    pub fn notify_unassigned(
        &mut self,
        literal: Literal,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        let v = literal.atom();
        if !self.common.is_auxiliary(v)
            && self
                .common
                .eligible_after_backtrack(v, variables, dependencies)
        {
            self.list.promote(v);
        }
    }

    pub fn notify_eligible(&mut self, v: Atom) {
        self.list.note_eligible(v, &self.common.auxiliary);
    }

    pub fn notify_learned(&mut self, literals: &[Literal], variables: &VariableStore) {
        match self.ordering {
            VmtfOrdering::Static => {}
            VmtfOrdering::Arbitrary => self.list.move_learnt(
                literals,
                false,
                variables,
                &self.common.auxiliary,
                &mut self.timestamp,
            ),
            VmtfOrdering::ByPrefix => self.list.move_learnt(
                literals,
                true,
                variables,
                &self.common.auxiliary,
                &mut self.timestamp,
            ),
        }
    }

    pub fn notify_backtrack(
        &mut self,
        level_before: LevelIndex,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        self.common.backtrack_level_before = level_before;
        let common = &self.common;
        self.list.drain_overflow(|v| {
            common.eligible_after_backtrack(v, variables, dependencies)
        });
    }

    pub fn choose_variable(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        self.list.choose(variables, dependencies)
    }

    pub fn select_phase(
        &mut self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> bool {
        self.common.select_phase(v, variables, dependencies, rng)
    }
}

/// The split VMTF decision heuristic: one list per decision mode.
pub struct SplitVmtfHeuristic {
    pub common: HeuristicCommon,
    existential: VmtfList,
    universal: VmtfList,
    mode: DecisionMode,
    mode_cycles: u32,
    cycle_counter: u32,
    always_move: bool,
    move_by_prefix: bool,
    timestamp: i64,
}

impl SplitVmtfHeuristic {
    pub fn new(
        common: HeuristicCommon,
        mode: DecisionMode,
        mode_cycles: u32,
        always_move: bool,
        move_by_prefix: bool,
    ) -> Self {
        SplitVmtfHeuristic {
            common,
            existential: VmtfList::default(),
            universal: VmtfList::default(),
            mode,
            mode_cycles,
            cycle_counter: 0,
            always_move,
            move_by_prefix,
            timestamp: 0,
        }
    }

    fn current(&mut self) -> &mut VmtfList {
        match self.mode {
            DecisionMode::Existential => &mut self.existential,
            DecisionMode::Universal => &mut self.universal,
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool) {
        self.common.add_variable(auxiliary);
        self.existential.add_variable(auxiliary);
        self.universal.add_variable(auxiliary);
    }

    pub fn notify_start(&mut self) {
        self.existential.stamp(&mut self.timestamp);
        self.universal.stamp(&mut self.timestamp);
    }

    pub fn notify_assigned(&mut self, literal: Literal) {
        self.common.note_assignment(literal);
    }

    pub fn notify_unassigned(
        &mut self,
        literal: Literal,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        let v = literal.atom();
        if !self.common.is_auxiliary(v)
            && self
                .common
                .eligible_after_backtrack(v, variables, dependencies)
        {
            self.current().promote(v);
        }
    }

    pub fn notify_eligible(&mut self, v: Atom) {
        let auxiliary = std::mem::take(&mut self.common.auxiliary);
        self.current().note_eligible(v, &auxiliary);
        self.common.auxiliary = auxiliary;
    }

    pub fn notify_learned(
        &mut self,
        literals: &[Literal],
        kind: ConstraintKind,
        variables: &VariableStore,
    ) {
        let by_prefix = self.move_by_prefix;
        let auxiliary = std::mem::take(&mut self.common.auxiliary);
        if self.always_move {
            let list = match kind {
                ConstraintKind::Term => &mut self.existential,
                ConstraintKind::Clause => &mut self.universal,
            };
            list.move_learnt(literals, by_prefix, variables, &auxiliary, &mut self.timestamp);
        } else if self.mode.learns_on(kind) {
            let timestamp = &mut self.timestamp;
            match self.mode {
                DecisionMode::Existential => &mut self.existential,
                DecisionMode::Universal => &mut self.universal,
            }
            .move_learnt(literals, by_prefix, variables, &auxiliary, timestamp);
        } else {
            let timestamp = &mut self.timestamp;
            match self.mode {
                DecisionMode::Existential => &mut self.existential,
                DecisionMode::Universal => &mut self.universal,
            }
            .move_learnt_back(literals, variables, &auxiliary, timestamp);
        }
        self.common.auxiliary = auxiliary;
    }

    pub fn notify_backtrack(
        &mut self,
        level_before: LevelIndex,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        self.common.backtrack_level_before = level_before;
        let common = &self.common;
        let list = match self.mode {
            DecisionMode::Existential => &mut self.existential,
            DecisionMode::Universal => &mut self.universal,
        };
        list.drain_overflow(|v| common.eligible_after_backtrack(v, variables, dependencies));
    }

    pub fn notify_restart(&mut self) {
        self.cycle_counter += 1;
        if self.cycle_counter >= self.mode_cycles {
            self.cycle_counter = 0;
            self.mode = self.mode.other();
            let timestamp = &mut self.timestamp;
            let list = match self.mode {
                DecisionMode::Existential => &mut self.existential,
                DecisionMode::Universal => &mut self.universal,
            };
            list.reset_timestamps(timestamp);
            list.rewind();
            self.common.phases.notify_toggle_mode();
        }
    }

    pub fn choose_variable(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        self.current().choose(variables, dependencies)
    }

    pub fn select_phase(
        &mut self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> bool {
        self.common.select_phase(v, variables, dependencies, rng)
    }
}
