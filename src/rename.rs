//! Variable scopes: the renamers that freshen clause and query variables.
//!
//! A rule is freshened once, at installation, by mapping every variable it
//! mentions to a dense rule-local slot. A query is freshened once per
//! invocation by mapping every variable to a dense query-local slot; the
//! query scope additionally remembers which slot each original variable
//! went to, which is exactly the information answer projection needs.

use crate::term::Var;
use hashbrown::HashMap;

/// Maps variables into a fresh scope. Mapping the same variable twice
/// yields the same result.
pub trait VarMapper {
    fn map(&mut self, v: Var) -> Var;
}

/// Renames every distinct variable to a dense rule-local index.
/// Used once per rule, at installation.
#[derive(Debug, Default)]
pub struct RuleScope {
    slots: HashMap<Var, u32>,
}

impl RuleScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct rule-local slots handed out so far.
    pub fn count(&self) -> u32 {
        self.slots.len() as u32
    }
}

impl VarMapper for RuleScope {
    fn map(&mut self, v: Var) -> Var {
        let next = self.slots.len() as u32;
        Var::Rule(*self.slots.entry(v).or_insert(next))
    }
}

/// Renames every distinct variable to a dense query-local index,
/// remembering the mapping for answer projection.
///
/// Rule-local variables of the enclosing frame get a dense side table
/// sized to that frame; everything else (globals, and query-locals of an
/// outer invocation) goes through a small association list, which keeps
/// projection order deterministic.
#[derive(Debug)]
pub struct QueryScope {
    rule_slots: Vec<Option<u32>>,
    named: Vec<(Var, u32)>,
    next: u32,
}

impl QueryScope {
    /// A scope for a query whose enclosing frame has `r_count` rule-local
    /// slots (zero for a top-level query).
    pub fn new(r_count: usize) -> Self {
        Self {
            rule_slots: vec![None; r_count],
            named: Vec::new(),
            next: 0,
        }
    }

    /// Number of distinct query-local slots handed out so far.
    pub fn count(&self) -> u32 {
        self.next
    }

    fn alloc(&mut self) -> u32 {
        let p = self.next;
        self.next += 1;
        p
    }

    /// The projection map: each original variable paired with the
    /// query-local index it was renamed to.
    pub fn iter(&self) -> impl Iterator<Item = (Var, u32)> + '_ {
        self.rule_slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|p| (Var::Rule(i as u32), p)))
            .chain(self.named.iter().copied())
    }
}

impl VarMapper for QueryScope {
    fn map(&mut self, v: Var) -> Var {
        match v {
            Var::Rule(i) => {
                let idx = i as usize;
                if idx >= self.rule_slots.len() {
                    self.rule_slots.resize(idx + 1, None);
                }
                if let Some(p) = self.rule_slots[idx] {
                    return Var::Query(p);
                }
                let p = self.alloc();
                self.rule_slots[idx] = Some(p);
                Var::Query(p)
            }
            other => {
                if let Some(&(_, p)) = self.named.iter().find(|(k, _)| *k == other) {
                    return Var::Query(p);
                }
                let p = self.alloc();
                self.named.push((other, p));
                Var::Query(p)
            }
        }
    }
}
