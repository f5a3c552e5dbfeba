//! Goals and rules: the bodies the resolution driver proves.
//!
//! A goal is a conjunction, a disjunction, a call to a user-defined
//! predicate, or a binary built-in. A rule pairs a complex head with an
//! optional body goal; installation freshens its variables into dense
//! rule-local slots (see `Machine::add_rule`).

use crate::bindings::Bindings;
use crate::rename::VarMapper;
use crate::term::{Complex, OpKind, Term};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goal {
    /// Prove every goal in order; bindings flow left to right.
    And(Vec<Goal>),
    /// Try alternatives in order; yield every alternative's answers.
    Or(Vec<Goal>),
    /// Call a user-defined predicate.
    Call(Complex),
    /// A comparison or `is`.
    Builtin(OpKind, Term, Term),
}

impl Goal {
    /// Does this goal have at most one solution per invocation?
    ///
    /// Built-ins always do; conjunctions of single-solution goals do; a
    /// disjunction only when it has at most one alternative.
    pub fn single_solution(&self) -> bool {
        match self {
            Goal::And(goals) => goals.iter().all(Goal::single_solution),
            Goal::Or(alts) => match alts.as_slice() {
                [] => true,
                [only] => only.single_solution(),
                _ => false,
            },
            Goal::Call(_) => false,
            Goal::Builtin(_, _, _) => true,
        }
    }

    /// Apply the current substitution to every term inside the goal.
    pub fn substitute(&self, bds: &Bindings) -> Goal {
        match self {
            Goal::And(goals) => Goal::And(goals.iter().map(|g| g.substitute(bds)).collect()),
            Goal::Or(alts) => Goal::Or(alts.iter().map(|g| g.substitute(bds)).collect()),
            Goal::Call(ct) => Goal::Call(ct.substitute(bds)),
            Goal::Builtin(op, lhs, rhs) => {
                Goal::Builtin(*op, lhs.substitute(bds), rhs.substitute(bds))
            }
        }
    }

    /// Replace every variable in the goal through `scope`.
    pub fn rename<M: VarMapper>(&self, scope: &mut M) -> Goal {
        match self {
            Goal::And(goals) => Goal::And(goals.iter().map(|g| g.rename(scope)).collect()),
            Goal::Or(alts) => Goal::Or(alts.iter().map(|g| g.rename(scope)).collect()),
            Goal::Call(ct) => Goal::Call(ct.rename(scope)),
            Goal::Builtin(op, lhs, rhs) => {
                Goal::Builtin(*op, lhs.rename(scope), rhs.rename(scope))
            }
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::And(goals) => join(f, goals, ", "),
            Goal::Or(alts) => join(f, alts, "; "),
            Goal::Call(ct) => write!(f, "{ct}"),
            Goal::Builtin(op, lhs, rhs) => write!(f, "{lhs} {op} {rhs}"),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, goals: &[Goal], sep: &str) -> fmt::Result {
    for (i, g) in goals.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{g}")?;
    }
    Ok(())
}

/// A conjunction goal.
pub fn and<I>(goals: I) -> Goal
where
    I: IntoIterator,
    I::Item: Into<Goal>,
{
    Goal::And(goals.into_iter().map(Into::into).collect())
}

/// A disjunction goal.
pub fn or<I>(goals: I) -> Goal
where
    I: IntoIterator,
    I::Item: Into<Goal>,
{
    Goal::Or(goals.into_iter().map(Into::into).collect())
}

impl From<Complex> for Goal {
    fn from(ct: Complex) -> Goal {
        Goal::Call(ct)
    }
}

impl From<Term> for Goal {
    /// A complex term becomes a call, an operator expression a built-in.
    ///
    /// # Panics
    ///
    /// Any other term shape is ill-formed input.
    fn from(t: Term) -> Goal {
        match t {
            Term::Op(op, lhs, rhs) => Goal::Builtin(op, *lhs, *rhs),
            Term::Complex(ct) => Goal::Call(ct),
            other => panic!("term `{other}` is not a goal"),
        }
    }
}

/// A clause: a head and an optional body. A fact is a rule with no body.
///
/// Before installation the head and body mention the variables the
/// embedding wrote; `Machine::add_rule` rewrites them all to rule-local
/// slots and records the count here.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) head: Complex,
    pub(crate) body: Option<Goal>,
    pub(crate) r_count: u32,
}

impl Rule {
    pub fn head(&self) -> &Complex {
        &self.head
    }

    pub fn body(&self) -> Option<&Goal> {
        self.body.as_ref()
    }

    /// Number of rule-local slots an invocation frame needs.
    pub fn r_var_count(&self) -> u32 {
        self.r_count
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if let Some(body) = &self.body {
            write!(f, " :- {body}")?;
        }
        f.write_str(".")
    }
}

/// Build a rule from a head and body goals. No body makes a fact; one
/// goal is the body as-is; several are conjoined.
pub fn rule<I>(head: Complex, body: I) -> Rule
where
    I: IntoIterator,
    I::Item: Into<Goal>,
{
    let mut goals: Vec<Goal> = body.into_iter().map(Into::into).collect();
    let body = match goals.len() {
        0 => None,
        1 => goals.pop(),
        _ => Some(Goal::And(goals)),
    };
    Rule {
        head,
        body,
        r_count: 0,
    }
}
