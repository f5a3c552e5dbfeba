//! sldlog - an embeddable Prolog-style logic engine.
//!
//! The embedding builds terms, facts and rules through typed
//! constructors, installs them into a [`Machine`], and pulls answer
//! substitutions one at a time from an [`AnswerStream`]:
//!
//! ```
//! use sldlog::{complex, rule, Machine, Var};
//!
//! let mut m = Machine::new();
//! m.add_fact(complex!("parent", "david", "xiaoxi"));
//! m.add_rule(rule(
//!     complex!("child", "X", "Y"),
//!     [complex!("parent", "Y", "X")],
//! ));
//!
//! let mut answers = m.match_query(&complex!("child", "C", "david"));
//! let first = answers.next().unwrap();
//! assert_eq!(first.value_of(Var::named("C")), Some("xiaoxi".into()));
//! ```
//!
//! Clause order is insertion order, goals run left to right, and the
//! search is depth-first, so answer enumeration order is deterministic.

pub mod arith;
pub mod bindings;
pub mod engine;
pub mod goal;
pub mod rename;
pub mod stream;
pub mod symbol;
pub mod term;
pub mod trace;
pub mod unify;

pub use bindings::Bindings;
pub use engine::Machine;
pub use goal::{and, or, rule, Goal, Rule};
pub use stream::AnswerStream;
pub use term::{
    atom, complex, empty_list, first_left, head_tail, int, list, op, variable, Complex, OpKind,
    Term, Var,
};
