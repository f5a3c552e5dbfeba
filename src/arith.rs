//! The built-in evaluator: integer arithmetic, comparisons and `is`.
//!
//! Arithmetic failure (a non-integer operand, division by zero) is proof
//! failure, never an abort. Arithmetic wraps at the 64-bit boundary;
//! division truncates toward zero.

use crate::bindings::Bindings;
use crate::term::{OpKind, Term};
use crate::unify::match_terms;

/// Evaluate an arithmetic expression to an integer. Integers evaluate to
/// themselves; `+`, `-`, `*`, `/` evaluate both sides recursively. Any
/// other shape fails.
pub fn compute(t: &Term) -> Option<i64> {
    match t {
        Term::Int(i) => Some(*i),
        Term::Op(op, lhs, rhs) => {
            let l = compute(lhs)?;
            let r = compute(rhs)?;
            match op {
                OpKind::Add => Some(l.wrapping_add(r)),
                OpKind::Sub => Some(l.wrapping_sub(r)),
                OpKind::Mul => Some(l.wrapping_mul(r)),
                OpKind::Div => {
                    if r == 0 {
                        None
                    } else {
                        Some(l.wrapping_div(r))
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Judge a comparison or `is` goal under the current bindings, mutating
/// them in place for `is`. Comparisons require both sides to resolve to
/// integers; they do not evaluate arithmetic.
///
/// # Panics
///
/// An arithmetic operator used directly as a goal is an internal
/// invariant violation.
pub fn judge(op: OpKind, lhs: &Term, rhs: &Term, bds: &mut Bindings) -> bool {
    match op {
        OpKind::Gt | OpKind::Ge | OpKind::Lt | OpKind::Le | OpKind::Ne => {
            match (lhs.substitute(bds), rhs.substitute(bds)) {
                (Term::Int(a), Term::Int(b)) => match op {
                    OpKind::Gt => a > b,
                    OpKind::Ge => a >= b,
                    OpKind::Lt => a < b,
                    OpKind::Le => a <= b,
                    OpKind::Ne => a != b,
                    _ => unreachable!(),
                },
                _ => false,
            }
        }
        OpKind::Is => {
            let target = lhs.substitute(bds);
            match compute(&rhs.substitute(bds)) {
                Some(value) => match_terms(&target, &Term::Int(value), bds),
                None => false,
            }
        }
        _ => panic!("arithmetic operator `{op}` is not provable as a goal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{atom, int, op, variable, Var};

    // ========== COMPUTE ==========

    #[test]
    fn integers_compute_to_themselves() {
        assert_eq!(compute(&int(7)), Some(7));
    }

    #[test]
    fn nested_expressions_compute_recursively() {
        // (2 + 3) * (10 - 4) = 30
        let e = op(op(2, "+", 3), "*", op(10, "-", 4));
        assert_eq!(compute(&e), Some(30));
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(compute(&op(7, "/", 2)), Some(3));
        assert_eq!(compute(&op(-7, "/", 2)), Some(-3));
        assert_eq!(compute(&op(7, "/", -2)), Some(-3));
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(compute(&op(1, "/", 0)), None);
    }

    #[test]
    fn arithmetic_wraps_at_the_64_bit_boundary() {
        assert_eq!(compute(&op(i64::MAX, "+", 1)), Some(i64::MIN));
        assert_eq!(compute(&op(i64::MIN, "/", -1)), Some(i64::MIN));
    }

    #[test]
    fn non_integer_operands_fail() {
        assert_eq!(compute(&op(atom("a"), "+", 1)), None);
        assert_eq!(compute(&atom("a")), None);
        assert_eq!(compute(&variable("X")), None);
    }

    #[test]
    fn comparison_operators_do_not_compute() {
        assert_eq!(compute(&op(1, "<", 2)), None);
    }

    // ========== COMPARISONS ==========

    #[test]
    fn comparisons_on_integers() {
        let mut bds = Bindings::new(0);
        assert!(judge(OpKind::Gt, &int(2), &int(1), &mut bds));
        assert!(!judge(OpKind::Gt, &int(1), &int(1), &mut bds));
        assert!(judge(OpKind::Ge, &int(1), &int(1), &mut bds));
        assert!(judge(OpKind::Lt, &int(1), &int(2), &mut bds));
        assert!(judge(OpKind::Le, &int(2), &int(2), &mut bds));
        assert!(judge(OpKind::Ne, &int(1), &int(2), &mut bds));
        assert!(!judge(OpKind::Ne, &int(2), &int(2), &mut bds));
    }

    #[test]
    fn comparisons_resolve_bound_variables() {
        let mut bds = Bindings::new(0);
        bds.put(Var::named("N"), int(5));
        assert!(judge(OpKind::Gt, &variable("N"), &int(0), &mut bds));
    }

    #[test]
    fn comparing_an_unbound_variable_is_proof_failure() {
        let mut bds = Bindings::new(0);
        assert!(!judge(OpKind::Gt, &variable("N"), &int(0), &mut bds));
    }

    #[test]
    fn comparing_an_unevaluated_expression_is_proof_failure() {
        // Comparisons take integers, not expressions.
        let mut bds = Bindings::new(0);
        assert!(!judge(OpKind::Gt, &op(1, "+", 1), &int(0), &mut bds));
    }

    #[test]
    fn comparing_atoms_is_proof_failure() {
        let mut bds = Bindings::new(0);
        assert!(!judge(OpKind::Gt, &atom("b"), &atom("a"), &mut bds));
    }

    // ========== IS ==========

    #[test]
    fn is_binds_an_unbound_left_side() {
        let mut bds = Bindings::new(0);
        assert!(judge(OpKind::Is, &variable("X"), &op(2, "*", 3), &mut bds));
        assert_eq!(bds.value_of(Var::named("X")), Some(int(6)));
    }

    #[test]
    fn is_checks_a_bound_left_side() {
        let mut bds = Bindings::new(0);
        bds.put(Var::named("X"), int(6));
        assert!(judge(OpKind::Is, &variable("X"), &op(2, "*", 3), &mut bds));
        assert!(!judge(OpKind::Is, &variable("X"), &op(2, "*", 4), &mut bds));
    }

    #[test]
    fn is_resolves_variables_on_the_right_side() {
        let mut bds = Bindings::new(0);
        bds.put(Var::named("N"), int(5));
        assert!(judge(
            OpKind::Is,
            &variable("X"),
            &op(variable("N"), "-", 1),
            &mut bds
        ));
        assert_eq!(bds.value_of(Var::named("X")), Some(int(4)));
    }

    #[test]
    fn is_with_an_unevaluable_right_side_is_proof_failure() {
        let mut bds = Bindings::new(0);
        assert!(!judge(OpKind::Is, &variable("X"), &atom("a"), &mut bds));
        assert!(!judge(
            OpKind::Is,
            &variable("X"),
            &op(variable("Unbound"), "+", 1),
            &mut bds
        ));
    }

    // ========== INVARIANTS ==========

    #[test]
    #[should_panic(expected = "not provable as a goal")]
    fn arithmetic_operator_as_goal_is_an_invariant_violation() {
        let mut bds = Bindings::new(0);
        judge(OpKind::Add, &int(1), &int(2), &mut bds);
    }
}
