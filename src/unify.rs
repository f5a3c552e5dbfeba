//! First-order unification over the term algebra.
//!
//! `match_terms` mutates a `Bindings` in place and reports success. On
//! failure the environment may hold bindings from already-matched
//! prefixes; callers discard it (the driver forks a fresh frame per
//! candidate rule). There is no occurs check: a variable is never bound
//! to itself directly, and nothing in the goal language can close a cycle
//! through structure.

use crate::bindings::Bindings;
use crate::symbol::atoms;
use crate::term::{atom, Term, Var};

/// Unify two terms under `bds`, extending it on success.
pub fn match_terms(l: &Term, r: &Term, bds: &mut Bindings) -> bool {
    let l = bds.walk(l);
    let r = bds.walk(r);

    match (l, r) {
        // Two variables: bind both to one fresh global so subsequent
        // lookups of either reach the same symbol. The same variable on
        // both sides is already matched.
        (Term::Var(lv), Term::Var(rv)) => {
            if lv != rv {
                let shared = Term::Var(Var::fresh());
                bds.put(lv, shared.clone());
                bds.put(rv, shared);
            }
            true
        }
        (Term::Var(v), bound) | (bound, Term::Var(v)) => {
            bds.put(v, bound);
            true
        }
        (l, r) => match_concrete(&l, &r, bds),
    }
}

/// Dispatch over walked, non-variable pairs. Each pairing has exactly one
/// arm; mixed pairs are written once and matched in either order.
fn match_concrete(l: &Term, r: &Term, bds: &mut Bindings) -> bool {
    match (l, r) {
        (Term::Atom(a), Term::Atom(b)) => a == b,

        (Term::Int(a), Term::Int(b)) => a == b,

        // Character-wise decomposition of a string-as-atom: the name must
        // be non-empty; its first character matches `first`, the remainder
        // matches `rest`.
        (Term::Atom(name), Term::FirstLeft(first, rest))
        | (Term::FirstLeft(first, rest), Term::Atom(name)) => {
            let text = atoms().name_of(*name);
            let Some(c) = text.chars().next() else {
                return false;
            };
            let split = c.len_utf8();
            match_terms(first, &atom(&text[..split]), bds)
                && match_terms(rest, &atom(&text[split..]), bds)
        }

        (Term::FirstLeft(f1, r1), Term::FirstLeft(f2, r2)) => {
            match_terms(f1, f2, bds) && match_terms(r1, r2, bds)
        }

        (Term::Complex(a), Term::Complex(b)) => {
            a.functor == b.functor
                && a.args.len() == b.args.len()
                && a.args
                    .iter()
                    .zip(&b.args)
                    .all(|(x, y)| match_terms(x, y, bds))
        }

        (Term::List(a), Term::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| match_terms(x, y, bds))
        }

        // A flat list against a cons cell peels one element off the front.
        (Term::List(elts), Term::Cons(head, tail))
        | (Term::Cons(head, tail), Term::List(elts)) => {
            let Some((first, rest)) = elts.split_first() else {
                return false;
            };
            match_terms(head, first, bds) && match_terms(tail, &Term::List(rest.to_vec()), bds)
        }

        (Term::Cons(h1, t1), Term::Cons(h2, t2)) => {
            match_terms(h1, h2, bds) && match_terms(t1, t2, bds)
        }

        (Term::Op(op1, l1, r1), Term::Op(op2, l2, r2)) => {
            op1 == op2 && match_terms(l1, l2, bds) && match_terms(r1, r2, bds)
        }

        _ => false,
    }
}
