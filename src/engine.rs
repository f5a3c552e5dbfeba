//! The resolution driver: depth-first SLD resolution with left-to-right
//! clause and goal selection.
//!
//! A `Machine` holds rules indexed by `(functor, arity)`. A query is
//! localized into fresh query-local variables, candidate rules are tried
//! in insertion order against a fresh rule-local frame each, and every
//! successful proof is projected back onto the variables the caller
//! wrote. Answers stream lazily; see `stream`.

use crate::arith;
use crate::bindings::Bindings;
use crate::goal::{Goal, Rule};
use crate::rename::{QueryScope, RuleScope};
use crate::stream::{spawn_producer, AnswerStream, Emit};
use crate::symbol::NameId;
use crate::term::{Complex, Term, Var};
use crate::trace::{debug, trace};
use crate::unify::match_terms;
use hashbrown::HashMap;
use std::sync::Arc;

pub(crate) type PredKey = (NameId, usize);

/// The installed rule base. Queries hold an `Arc` snapshot of it, so
/// installation never disturbs a running query.
#[derive(Debug, Clone, Default)]
struct RuleIndex {
    rules: HashMap<PredKey, Vec<Arc<Rule>>>,
}

impl RuleIndex {
    fn insert(&mut self, rule: Rule) {
        self.rules
            .entry(rule.head.key())
            .or_default()
            .push(Arc::new(rule));
    }

    fn candidates(&self, key: &PredKey) -> &[Arc<Rule>] {
        self.rules.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A knowledge base plus the machinery to query it.
///
/// Installation requires `&mut self`; queries take a snapshot and are
/// safe to run while the embedding keeps the machine around. A machine
/// is single-writer: serialize installation with queries.
#[derive(Debug, Default)]
pub struct Machine {
    index: Arc<RuleIndex>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fact: a rule with no body.
    pub fn add_fact(&mut self, head: Complex) {
        self.add_rule(crate::goal::rule(head, Vec::<Goal>::new()));
    }

    /// Install a rule, freshening every variable in its head and body
    /// into dense rule-local slots and recording how many the rule needs.
    pub fn add_rule(&mut self, rule: Rule) {
        let mut scope = RuleScope::new();
        let head = rule.head.rename(&mut scope);
        let body = rule.body.map(|g| g.rename(&mut scope));
        let stored = Rule {
            head,
            body,
            r_count: scope.count(),
        };
        debug!(rule = %stored, r_count = stored.r_count, "rule installed");
        Arc::make_mut(&mut self.index).insert(stored);
    }

    /// Query a predicate. Answers are keyed by the variables appearing in
    /// `query` and stream lazily in the documented search order.
    pub fn match_query(&self, query: &Complex) -> AnswerStream {
        let index = Arc::clone(&self.index);
        let query = query.clone();
        spawn_producer(move |emit| solve_query(&index, &query, None, emit))
    }

    /// Prove an arbitrary goal. Answers are keyed by the goal's own
    /// variables; no query-localization is applied at this level.
    pub fn prove(&self, goal: Goal) -> AnswerStream {
        let index = Arc::clone(&self.index);
        spawn_producer(move |emit| prove(&index, &goal, Bindings::new(0), emit))
    }

    #[cfg(test)]
    pub(crate) fn installed(&self, functor: &str, arity: usize) -> Vec<Arc<Rule>> {
        let key = (crate::symbol::atoms().intern(functor), arity);
        self.index.rules.get(&key).cloned().unwrap_or_default()
    }
}

/// Resolve one predicate call: localize the query, try each candidate
/// rule in insertion order, and emit a projected answer per proof.
///
/// `outer` is the caller's environment when the query comes from a rule
/// body; its frame size decides how the localized variables project back.
/// Returns false once the consumer has gone away.
fn solve_query(
    index: &RuleIndex,
    query: &Complex,
    outer: Option<&Bindings>,
    emit: Emit<'_>,
) -> bool {
    let outer_r = outer.map_or(0, Bindings::r_count);
    let mut scope = QueryScope::new(outer_r);
    let localized = query.rename(&mut scope);
    trace!(query = %localized, "query");

    for rule in index.candidates(&localized.key()) {
        let Some(frame) = match_head(rule, &localized) else {
            trace!(head = %rule.head, "head mismatch");
            continue;
        };
        match &rule.body {
            // A head-matched fact yields a single answer.
            None => {
                let answer = project(&scope, outer_r, frame);
                trace!(answer = %answer, "answer");
                if !emit(answer) {
                    return false;
                }
            }
            Some(body) => {
                let keep = prove(index, body, frame, &mut |sln| {
                    let answer = project(&scope, outer_r, sln);
                    trace!(answer = %answer, "answer");
                    emit(answer)
                });
                if !keep {
                    return false;
                }
            }
        }
    }
    true
}

/// Unify a rule's head with a localized query under a fresh rule-local
/// frame. `None` means the head does not match.
fn match_head(rule: &Rule, query: &Complex) -> Option<Bindings> {
    let mut frame = Bindings::new(rule.r_count as usize);
    for (head_arg, query_arg) in rule.head.args.iter().zip(&query.args) {
        if !match_terms(head_arg, query_arg, &mut frame) {
            return None;
        }
    }
    Some(frame)
}

/// Project a finished proof onto the variables the caller wrote: walk each
/// localized slot through the final bindings and export the result, so no
/// rule- or query-local variable escapes the frame.
fn project(scope: &QueryScope, outer_r: usize, mut bds: Bindings) -> Bindings {
    let mut answer = Bindings::new(outer_r);
    for (source, p_index) in scope.iter() {
        let value = Term::Var(Var::Query(p_index)).export(&mut bds);
        answer.put(source, value);
    }
    answer
}

/// Prove a goal under `bds`. Every emitted answer is a full environment
/// extending `bds`, so conjunction suffixes and projections can read
/// everything established so far. Returns false on cancellation.
fn prove(index: &RuleIndex, goal: &Goal, bds: Bindings, emit: Emit<'_>) -> bool {
    match goal {
        Goal::And(goals) => prove_conjunction(index, goals, bds, emit),
        Goal::Or(alts) => {
            for alt in alts {
                if !prove(index, alt, bds.clone(), emit) {
                    return false;
                }
            }
            true
        }
        Goal::Call(ct) => {
            let call = ct.substitute(&bds);
            solve_query(index, &call, Some(&bds), &mut |sln| {
                emit(bds.clone().combine(sln))
            })
        }
        Goal::Builtin(op, lhs, rhs) => {
            let mut bds = bds;
            if arith::judge(*op, lhs, rhs, &mut bds) {
                emit(bds)
            } else {
                true
            }
        }
    }
}

/// Prove a conjunction: consume the single-solution prefix by mutating
/// `bds` in place, then fan out on the first multi-solution goal and
/// prove the suffix under each of its answers.
fn prove_conjunction(index: &RuleIndex, goals: &[Goal], mut bds: Bindings, emit: Emit<'_>) -> bool {
    let mut next = 0;
    while next < goals.len() && goals[next].single_solution() {
        if !process(&goals[next], &mut bds) {
            // Proof failure here fails the whole conjunction, which is an
            // ordinary empty result, not a cancellation.
            return true;
        }
        next += 1;
    }
    if next == goals.len() {
        return emit(bds);
    }

    let first = &goals[next];
    let rest = &goals[next + 1..];
    prove(index, first, bds, &mut |sln| {
        if rest.is_empty() {
            emit(sln)
        } else {
            prove_conjunction(index, rest, sln, emit)
        }
    })
}

/// Evaluate a goal that has at most one solution, mutating `bds`.
///
/// # Panics
///
/// A goal that reaches here despite claiming multiple solutions is an
/// internal invariant violation.
fn process(goal: &Goal, bds: &mut Bindings) -> bool {
    match goal {
        Goal::And(goals) => goals.iter().all(|g| process(g, bds)),
        Goal::Or(alts) => match alts.as_slice() {
            [] => false,
            [only] => process(only, bds),
            _ => panic!(
                "disjunction of {} alternatives claimed a single solution",
                alts.len()
            ),
        },
        Goal::Builtin(op, lhs, rhs) => arith::judge(*op, lhs, rhs, bds),
        Goal::Call(ct) => panic!("call to {ct} reached the determinate evaluator"),
    }
}

#[cfg(test)]
#[path = "tests/engine.rs"]
mod tests;
