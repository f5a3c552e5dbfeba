//! Query benchmarks using Criterion.
//!
//! Run with: `cargo bench`
//!
//! These measure the core resolution loop: head matching over a fact
//! base, recursive arithmetic, backtracking fan-out, and list traversal.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sldlog::goal::Goal;
use sldlog::term::{empty_list, head_tail, op, Term};
use sldlog::{complex, rule, Machine};

fn factorial_machine() -> Machine {
    let mut m = Machine::new();
    m.add_fact(complex!("factorial", 0, 1));
    m.add_rule(rule(
        complex!("factorial", "N", "F"),
        vec![
            Goal::from(op("N", ">", 0)),
            Goal::from(op("N1", "is", op("N", "-", 1))),
            Goal::from(complex!("factorial", "N1", "F1")),
            Goal::from(op("F", "is", op("N", "*", "F1"))),
        ],
    ));
    m
}

fn ancestry_machine(depth: i64) -> Machine {
    let mut m = Machine::new();
    for i in 0..depth {
        m.add_fact(complex!("parent", format!("p{i}").as_str(), format!("p{}", i + 1).as_str()));
    }
    m.add_rule(rule(
        complex!("descendant", "X", "Y"),
        [complex!("parent", "X", "Y")],
    ));
    m.add_rule(rule(
        complex!("descendant", "X", "Y"),
        vec![
            Goal::from(complex!("parent", "X", "Z")),
            Goal::from(complex!("descendant", "Z", "Y")),
        ],
    ));
    m
}

fn reverse_machine() -> Machine {
    let mut m = Machine::new();
    m.add_fact(complex!("reverse", empty_list(), "X", "X"));
    m.add_rule(rule(
        complex!("reverse", head_tail("X", "Y"), "Z", "W"),
        [complex!("reverse", "Y", head_tail("X", "Z"), "W")],
    ));
    m
}

fn bench_head_match(c: &mut Criterion) {
    let mut m = Machine::new();
    for i in 0..64 {
        m.add_fact(complex!("like", format!("who{i}").as_str(), format!("what{i}").as_str()));
    }

    c.bench_function("head_match_64_facts", |b| {
        b.iter(|| {
            let q = complex!("like", "X", "Y");
            black_box(m.match_query(black_box(&q)).count())
        });
    });
}

fn bench_factorial(c: &mut Criterion) {
    let m = factorial_machine();
    let mut group = c.benchmark_group("factorial");

    for n in [6i64, 12] {
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, &n| {
            b.iter(|| {
                let q = complex!("factorial", n, "X");
                black_box(m.match_query(black_box(&q)).count())
            });
        });
    }

    group.finish();
}

fn bench_descendant(c: &mut Criterion) {
    let mut group = c.benchmark_group("descendant");

    for depth in [4i64, 8] {
        let m = ancestry_machine(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, _| {
            b.iter(|| {
                let q = complex!("descendant", "P", "Q");
                black_box(m.match_query(black_box(&q)).count())
            });
        });
    }

    group.finish();
}

fn bench_list_reverse(c: &mut Criterion) {
    let m = reverse_machine();
    let elements: Vec<Term> = (0..16).map(Term::from).collect();

    c.bench_function("reverse_16_elements", |b| {
        b.iter(|| {
            let q = complex!(
                "reverse",
                Term::List(elements.clone()),
                empty_list(),
                "X"
            );
            black_box(m.match_query(black_box(&q)).count())
        });
    });
}

criterion_group!(
    benches,
    bench_head_match,
    bench_factorial,
    bench_descendant,
    bench_list_reverse
);
criterion_main!(benches);
