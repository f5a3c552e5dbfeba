//! The variable-binding environment threaded through a proof.
//!
//! Rule-local variables live in a dense vector sized at allocation (one
//! frame per rule invocation); global and query-local variables live in a
//! sparse map. An absent slot means "unbound".

use crate::term::{Term, Var};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::fmt;

/// A partial mapping from variables to terms: the current substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    rules: Vec<Option<Term>>,
    named: HashMap<Var, Term>,
}

impl Bindings {
    /// An empty environment with `r_count` rule-local slots.
    pub fn new(r_count: usize) -> Self {
        Self {
            rules: vec![None; r_count],
            named: HashMap::new(),
        }
    }

    /// Number of rule-local slots in this frame.
    pub fn r_count(&self) -> usize {
        self.rules.len()
    }

    /// A sibling environment: same frame size, nothing bound.
    pub fn fork(&self) -> Bindings {
        Bindings::new(self.rules.len())
    }

    /// Look up a variable. `None` means unbound.
    pub fn get(&self, v: Var) -> Option<&Term> {
        match v {
            Var::Rule(i) => self.rules.get(i as usize)?.as_ref(),
            _ => self.named.get(&v),
        }
    }

    /// Bind a variable. A trivial self-binding is skipped so a bound
    /// variable's image never references itself directly.
    pub fn put(&mut self, v: Var, t: Term) {
        if matches!(&t, Term::Var(w) if *w == v) {
            return;
        }
        match v {
            Var::Rule(i) => {
                let idx = i as usize;
                if idx >= self.rules.len() {
                    self.rules.resize(idx + 1, None);
                }
                self.rules[idx] = Some(t);
            }
            _ => {
                self.named.insert(v, t);
            }
        }
    }

    /// Chase a term through variable bindings until an unbound variable or
    /// a non-variable is reached. Does not recurse into structure.
    pub fn walk(&self, t: &Term) -> Term {
        let mut current = t.clone();
        let mut seen: SmallVec<[Var; 8]> = SmallVec::new();
        loop {
            let v = match current {
                Term::Var(v) => v,
                bound => return bound,
            };
            if seen.contains(&v) {
                return Term::Var(v);
            }
            match self.get(v) {
                Some(next) => {
                    seen.push(v);
                    current = next.clone();
                }
                None => return Term::Var(v),
            }
        }
    }

    /// Union of two environments, reusing `other`'s storage. On keys bound
    /// in both, `other` wins.
    pub fn combine(self, mut other: Bindings) -> Bindings {
        if other.rules.len() < self.rules.len() {
            other.rules.resize(self.rules.len(), None);
        }
        for (slot, value) in other.rules.iter_mut().zip(self.rules) {
            if slot.is_none() {
                *slot = value;
            }
        }
        for (v, t) in self.named {
            other.named.entry(v).or_insert(t);
        }
        other
    }

    /// The fully resolved value of a variable in this environment, if any.
    pub fn value_of(&self, v: Var) -> Option<Term> {
        self.get(v).map(|t| t.substitute(self))
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.rules.iter().filter(|s| s.is_some()).count() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterator over `(variable, bound term)` pairs, rule-local slots
    /// first.
    pub fn iter(&self) -> impl Iterator<Item = (Var, &Term)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (Var::Rule(i as u32), t)))
            .chain(self.named.iter().map(|(v, t)| (*v, t)))
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for (i, slot) in self.rules.iter().enumerate() {
            if let Some(t) = slot {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                write!(f, "_R{i}->{t}")?;
            }
        }
        for (v, t) in &self.named {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{v}->{t}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{atom, variable};

    // ========== PUT / GET ==========

    #[test]
    fn new_environment_is_unbound_everywhere() {
        let bds = Bindings::new(3);
        assert_eq!(bds.get(Var::Rule(0)), None);
        assert_eq!(bds.get(Var::Query(0)), None);
        assert_eq!(bds.get(Var::named("X")), None);
        assert!(bds.is_empty());
    }

    #[test]
    fn rule_slots_are_dense() {
        let mut bds = Bindings::new(2);
        bds.put(Var::Rule(1), atom("a"));
        assert_eq!(bds.get(Var::Rule(1)), Some(&atom("a")));
        assert_eq!(bds.get(Var::Rule(0)), None);
        assert_eq!(bds.r_count(), 2);
    }

    #[test]
    fn put_extends_the_frame_when_needed() {
        let mut bds = Bindings::new(0);
        bds.put(Var::Rule(4), atom("a"));
        assert_eq!(bds.get(Var::Rule(4)), Some(&atom("a")));
    }

    #[test]
    fn globals_and_query_locals_share_the_sparse_store() {
        let mut bds = Bindings::new(0);
        bds.put(Var::named("X"), atom("a"));
        bds.put(Var::Query(0), atom("b"));
        assert_eq!(bds.get(Var::named("X")), Some(&atom("a")));
        assert_eq!(bds.get(Var::Query(0)), Some(&atom("b")));
        assert_eq!(bds.len(), 2);
    }

    #[test]
    fn trivial_self_binding_is_skipped() {
        let mut bds = Bindings::new(1);
        bds.put(Var::Rule(0), Term::Var(Var::Rule(0)));
        bds.put(Var::named("X"), variable("X"));
        assert!(bds.is_empty());
    }

    // ========== WALK ==========

    #[test]
    fn walk_chases_chains_to_the_end() {
        let mut bds = Bindings::new(0);
        bds.put(Var::named("X"), variable("Y"));
        bds.put(Var::named("Y"), variable("Z"));
        assert_eq!(bds.walk(&variable("X")), variable("Z"));
    }

    #[test]
    fn walk_stops_at_the_first_non_variable() {
        let mut bds = Bindings::new(0);
        let inner = Term::from(crate::complex!("f", "Y"));
        bds.put(Var::named("X"), inner.clone());
        bds.put(Var::named("Y"), atom("a"));
        // Walk is shallow: the structure is returned as bound, with Y intact.
        assert_eq!(bds.walk(&variable("X")), inner);
    }

    #[test]
    fn walk_of_a_non_variable_is_identity() {
        let bds = Bindings::new(0);
        assert_eq!(bds.walk(&atom("a")), atom("a"));
    }

    // ========== FORK / COMBINE ==========

    #[test]
    fn fork_is_empty_but_keeps_the_frame_size() {
        let mut bds = Bindings::new(3);
        bds.put(Var::Rule(0), atom("a"));
        let forked = bds.fork();
        assert_eq!(forked.r_count(), 3);
        assert!(forked.is_empty());
    }

    #[test]
    fn combine_is_a_union() {
        let mut a = Bindings::new(2);
        a.put(Var::Rule(0), atom("left"));
        a.put(Var::named("X"), atom("x"));
        let mut b = Bindings::new(2);
        b.put(Var::Rule(1), atom("right"));
        b.put(Var::named("Y"), atom("y"));

        let c = a.combine(b);
        assert_eq!(c.get(Var::Rule(0)), Some(&atom("left")));
        assert_eq!(c.get(Var::Rule(1)), Some(&atom("right")));
        assert_eq!(c.get(Var::named("X")), Some(&atom("x")));
        assert_eq!(c.get(Var::named("Y")), Some(&atom("y")));
    }

    #[test]
    fn combine_prefers_the_right_hand_side_on_overlap() {
        let mut a = Bindings::new(1);
        a.put(Var::Rule(0), atom("old"));
        a.put(Var::named("X"), atom("old"));
        let mut b = Bindings::new(1);
        b.put(Var::Rule(0), atom("new"));
        b.put(Var::named("X"), atom("new"));

        let c = a.combine(b);
        assert_eq!(c.get(Var::Rule(0)), Some(&atom("new")));
        assert_eq!(c.get(Var::named("X")), Some(&atom("new")));
    }

    #[test]
    fn combine_widens_to_the_larger_frame() {
        let mut a = Bindings::new(3);
        a.put(Var::Rule(2), atom("deep"));
        let b = Bindings::new(1);
        let c = a.combine(b);
        assert_eq!(c.get(Var::Rule(2)), Some(&atom("deep")));
        assert!(c.r_count() >= 3);
    }

    // ========== VALUE_OF ==========

    #[test]
    fn value_of_resolves_through_structure() {
        let mut bds = Bindings::new(0);
        bds.put(Var::named("X"), Term::from(crate::complex!("f", "Y")));
        bds.put(Var::named("Y"), atom("a"));
        assert_eq!(
            bds.value_of(Var::named("X")),
            Some(Term::from(crate::complex!("f", "a")))
        );
    }

    #[test]
    fn value_of_unbound_is_none() {
        let bds = Bindings::new(0);
        assert_eq!(bds.value_of(Var::named("X")), None);
    }

    #[test]
    fn iter_lists_rule_slots_before_named_entries() {
        let mut bds = Bindings::new(2);
        bds.put(Var::named("X"), atom("x"));
        bds.put(Var::Rule(1), atom("r"));
        let entries: Vec<_> = bds.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Var::Rule(1), &atom("r")));
        assert_eq!(entries[1], (Var::named("X"), &atom("x")));
    }
}
