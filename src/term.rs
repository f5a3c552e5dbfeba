//! The term algebra: atoms, integers, variables, complex terms, lists and
//! built-in operator expressions.
//!
//! Terms are immutable trees. Every transformation (substitution under a
//! bindings environment, export across a frame boundary, renaming into a
//! fresh variable scope) builds new term values and leaves its input
//! untouched.

use crate::bindings::Bindings;
use crate::rename::VarMapper;
use crate::symbol::{self, atoms, var_names, NameId, FRESH_PREFIX};
use std::fmt;

/// A logic variable: a kind tag plus an index within that kind.
///
/// - `Global` variables are process-wide; user-named ones come from the
///   variable name pool, engine-generated ones carry the reserved
///   `_AUTO_` prefix so the two spaces never collide.
/// - `Query` variables are allocated densely per top-level query
///   invocation.
/// - `Rule` variables are allocated densely per rule definition; each
///   invocation gets its own frame of that size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Var {
    Global(NameId),
    Query(u32),
    Rule(u32),
}

impl Var {
    /// A user-named global variable.
    ///
    /// # Panics
    ///
    /// Panics if the name starts with the reserved `_AUTO_` prefix.
    pub fn named(name: &str) -> Var {
        assert!(
            !name.starts_with(FRESH_PREFIX),
            "variable name `{name}` uses the reserved prefix `{FRESH_PREFIX}`"
        );
        Var::Global(var_names().intern(name))
    }

    /// A freshly generated global variable, distinct from every other.
    pub fn fresh() -> Var {
        Var::Global(symbol::fresh_name())
    }

    pub fn is_global(self) -> bool {
        matches!(self, Var::Global(_))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Global(id) => f.write_str(var_names().name_of(*id)),
            Var::Query(i) => write!(f, "_P{i}"),
            Var::Rule(i) => write!(f, "_R{i}"),
        }
    }
}

/// Binary built-in operators: comparisons, `is`, and integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Gt,
    Ge,
    Lt,
    Le,
    Ne,
    Is,
    Add,
    Sub,
    Mul,
    Div,
}

impl OpKind {
    /// Parse an operator from its surface spelling.
    ///
    /// # Panics
    ///
    /// Unknown op-strings are a programmer error and panic.
    pub fn parse(op: &str) -> OpKind {
        match op {
            ">" => OpKind::Gt,
            ">=" | "=>" => OpKind::Ge,
            "<" => OpKind::Lt,
            "<=" | "=<" => OpKind::Le,
            "!=" | "=\\=" => OpKind::Ne,
            "is" => OpKind::Is,
            "+" => OpKind::Add,
            "-" => OpKind::Sub,
            "*" => OpKind::Mul,
            "/" => OpKind::Div,
            other => panic!("unknown op-string: {other}"),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            OpKind::Gt => ">",
            OpKind::Ge => ">=",
            OpKind::Lt => "<",
            OpKind::Le => "<=",
            OpKind::Ne => "!=",
            OpKind::Is => "is",
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
        }
    }

    /// True for `+`, `-`, `*`, `/` - the operators `compute` evaluates.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, OpKind::Add | OpKind::Sub | OpKind::Mul | OpKind::Div)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A functor applied to an ordered argument sequence. The vehicle of
/// predicates and compound data; indexed by `(functor, arity)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub functor: NameId,
    pub args: Vec<Term>,
}

impl Complex {
    pub fn new(functor: &str, args: Vec<Term>) -> Complex {
        Complex {
            functor: atoms().intern(functor),
            args,
        }
    }

    /// The rule-index key: functor handle plus arity.
    pub fn key(&self) -> (NameId, usize) {
        (self.functor, self.args.len())
    }

    pub fn substitute(&self, bds: &Bindings) -> Complex {
        Complex {
            functor: self.functor,
            args: self.args.iter().map(|a| a.substitute(bds)).collect(),
        }
    }

    pub fn export(&self, bds: &mut Bindings) -> Complex {
        Complex {
            functor: self.functor,
            args: self.args.iter().map(|a| a.export(bds)).collect(),
        }
    }

    pub fn rename<M: VarMapper>(&self, scope: &mut M) -> Complex {
        Complex {
            functor: self.functor,
            args: self.args.iter().map(|a| a.rename(scope)).collect(),
        }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(atoms().name_of(self.functor))?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A term of the object language.
///
/// `List` is the flat spelling `[a, b, c]`; `Cons` is the head/tail
/// spelling `[H|T]` and collapses back to `List` whenever its tail
/// resolves to one. `FirstLeft` decomposes an atom's name into its first
/// character and the remainder, enabling character-wise matching over
/// string-as-atom data. `Op` is a binary built-in expression; it only has
/// meaning to the built-in evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Atom(NameId),
    Int(i64),
    Var(Var),
    Complex(Complex),
    List(Vec<Term>),
    Cons(Box<Term>, Box<Term>),
    FirstLeft(Box<Term>, Box<Term>),
    Op(OpKind, Box<Term>, Box<Term>),
}

impl Term {
    /// Replace every variable by the end of its chain in `bds`, recursing
    /// into the replacement. Unbound variables stay as they are.
    pub fn substitute(&self, bds: &Bindings) -> Term {
        match self {
            Term::Atom(_) | Term::Int(_) => self.clone(),
            Term::Var(_) => {
                let walked = bds.walk(self);
                match walked {
                    Term::Var(_) => walked,
                    bound => bound.substitute(bds),
                }
            }
            Term::Complex(ct) => Term::Complex(ct.substitute(bds)),
            Term::List(elts) => Term::List(elts.iter().map(|t| t.substitute(bds)).collect()),
            Term::Cons(head, tail) => {
                rebuild_cons(head.substitute(bds), tail.substitute(bds))
            }
            Term::FirstLeft(first, rest) => {
                rebuild_first_left(first.substitute(bds), rest.substitute(bds))
            }
            Term::Op(op, lhs, rhs) => Term::Op(
                *op,
                Box::new(lhs.substitute(bds)),
                Box::new(rhs.substitute(bds)),
            ),
        }
    }

    /// Like `substitute`, but safe to hand across a frame boundary: any
    /// rule-local or query-local variable still reachable is replaced by a
    /// fresh global, and the replacement is recorded in `bds` so shared
    /// internals export to the same symbol.
    pub fn export(&self, bds: &mut Bindings) -> Term {
        match self {
            Term::Atom(_) | Term::Int(_) => self.clone(),
            Term::Var(_) => {
                let walked = bds.walk(self);
                match walked {
                    Term::Var(v @ (Var::Rule(_) | Var::Query(_))) => {
                        let fresh = Term::Var(Var::fresh());
                        bds.put(v, fresh.clone());
                        fresh
                    }
                    Term::Var(_) => walked,
                    bound => bound.export(bds),
                }
            }
            Term::Complex(ct) => Term::Complex(ct.export(bds)),
            Term::List(elts) => Term::List(elts.iter().map(|t| t.export(bds)).collect()),
            Term::Cons(head, tail) => rebuild_cons(head.export(bds), tail.export(bds)),
            Term::FirstLeft(first, rest) => {
                rebuild_first_left(first.export(bds), rest.export(bds))
            }
            Term::Op(op, lhs, rhs) => Term::Op(
                *op,
                Box::new(lhs.export(bds)),
                Box::new(rhs.export(bds)),
            ),
        }
    }

    /// Replace every variable by `scope.map(v)`.
    pub fn rename<M: VarMapper>(&self, scope: &mut M) -> Term {
        match self {
            Term::Atom(_) | Term::Int(_) => self.clone(),
            Term::Var(v) => Term::Var(scope.map(*v)),
            Term::Complex(ct) => Term::Complex(ct.rename(scope)),
            Term::List(elts) => Term::List(elts.iter().map(|t| t.rename(scope)).collect()),
            Term::Cons(head, tail) => {
                Term::Cons(Box::new(head.rename(scope)), Box::new(tail.rename(scope)))
            }
            Term::FirstLeft(first, rest) => Term::FirstLeft(
                Box::new(first.rename(scope)),
                Box::new(rest.rename(scope)),
            ),
            Term::Op(op, lhs, rhs) => Term::Op(
                *op,
                Box::new(lhs.rename(scope)),
                Box::new(rhs.rename(scope)),
            ),
        }
    }

    /// Does `needle` occur anywhere in this term?
    pub fn contains_var(&self, needle: Var) -> bool {
        match self {
            Term::Atom(_) | Term::Int(_) => false,
            Term::Var(v) => *v == needle,
            Term::Complex(ct) => ct.args.iter().any(|t| t.contains_var(needle)),
            Term::List(elts) => elts.iter().any(|t| t.contains_var(needle)),
            Term::Cons(a, b) | Term::FirstLeft(a, b) | Term::Op(_, a, b) => {
                a.contains_var(needle) || b.contains_var(needle)
            }
        }
    }
}

/// Merge a cons cell back into a flat list when its tail is one.
fn rebuild_cons(head: Term, tail: Term) -> Term {
    match tail {
        Term::List(mut elts) => {
            elts.insert(0, head);
            Term::List(elts)
        }
        tail => Term::Cons(Box::new(head), Box::new(tail)),
    }
}

/// Merge a first/rest decomposition back into a plain atom when both
/// components are atoms.
fn rebuild_first_left(first: Term, rest: Term) -> Term {
    match (first, rest) {
        (Term::Atom(f), Term::Atom(r)) => {
            let joined = format!("{}{}", atoms().name_of(f), atoms().name_of(r));
            Term::Atom(atoms().intern(&joined))
        }
        (first, rest) => Term::FirstLeft(Box::new(first), Box::new(rest)),
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(id) => f.write_str(atoms().name_of(*id)),
            Term::Int(i) => write!(f, "{i}"),
            Term::Var(v) => write!(f, "{v}"),
            Term::Complex(ct) => write!(f, "{ct}"),
            Term::List(elts) => {
                f.write_str("[")?;
                for (i, elt) in elts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{elt}")?;
                }
                f.write_str("]")
            }
            Term::Cons(head, tail) => write!(f, "[{head}|{tail}]"),
            Term::FirstLeft(first, rest) => write!(f, "{first}+{rest}"),
            Term::Op(op, lhs, rhs) => write!(f, "{lhs} {op} {rhs}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// An atom term, always; no lexical dispatch.
pub fn atom(name: &str) -> Term {
    Term::Atom(atoms().intern(name))
}

/// An integer term.
pub fn int(i: i64) -> Term {
    Term::Int(i)
}

/// A named global variable term.
///
/// # Panics
///
/// Panics if the name starts with the reserved `_AUTO_` prefix.
pub fn variable(name: &str) -> Term {
    Term::Var(Var::named(name))
}

/// A complex term (functor applied to arguments).
pub fn complex(functor: &str, args: Vec<Term>) -> Complex {
    Complex::new(functor, args)
}

/// A flat list term.
pub fn list(elts: Vec<Term>) -> Term {
    Term::List(elts)
}

/// The empty flat list.
pub fn empty_list() -> Term {
    Term::List(Vec::new())
}

/// A head/tail list cell `[H|T]`. For `[X, Y|Z]` nest: `[X|[Y|Z]]`.
pub fn head_tail(head: impl Into<Term>, tail: impl Into<Term>) -> Term {
    Term::Cons(Box::new(head.into()), Box::new(tail.into()))
}

/// A first/rest decomposition of a string-as-atom.
pub fn first_left(first: impl Into<Term>, rest: impl Into<Term>) -> Term {
    Term::FirstLeft(Box::new(first.into()), Box::new(rest.into()))
}

/// A binary built-in expression, `op(X, "is", op(N, "-", 1))` style.
///
/// # Panics
///
/// Panics on op-strings outside the supported set.
pub fn op(lhs: impl Into<Term>, op_str: &str, rhs: impl Into<Term>) -> Term {
    Term::Op(
        OpKind::parse(op_str),
        Box::new(lhs.into()),
        Box::new(rhs.into()),
    )
}

fn is_variable_start(c: char) -> bool {
    c == '_' || c.is_ascii_uppercase()
}

impl From<&str> for Term {
    /// The lexical convenience rule: names starting with `_` or an
    /// uppercase letter become variables, everything else an atom.
    fn from(s: &str) -> Term {
        match s.chars().next() {
            Some(c) if is_variable_start(c) => variable(s),
            _ => atom(s),
        }
    }
}

impl From<i64> for Term {
    fn from(i: i64) -> Term {
        Term::Int(i)
    }
}

impl From<i32> for Term {
    fn from(i: i32) -> Term {
        Term::Int(i as i64)
    }
}

impl From<Var> for Term {
    fn from(v: Var) -> Term {
        Term::Var(v)
    }
}

impl From<Complex> for Term {
    fn from(ct: Complex) -> Term {
        Term::Complex(ct)
    }
}

/// Build a complex term from a functor and mixed arguments, converting
/// each through `Term::from` (so `1` is an integer, `"X"` a variable,
/// `"a"` an atom).
#[macro_export]
macro_rules! complex {
    ($functor:expr $(, $arg:expr)* $(,)?) => {
        $crate::term::complex($functor, vec![$($crate::term::Term::from($arg)),*])
    };
}

/// Build a flat list term from mixed elements, converting each through
/// `Term::from`.
#[macro_export]
macro_rules! list {
    ($($elt:expr),* $(,)?) => {
        $crate::term::list(vec![$($crate::term::Term::from($elt)),*])
    };
}
