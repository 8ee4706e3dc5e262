use criterion::{black_box, criterion_group, criterion_main, Criterion};
use decalc_rs::{Bindings, Compiler, Evaluator, FormulaParser};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const RATING_FORMULA: &str = "(a+b+c+d+ee+f+g)*h*i*j*m/k/l";

fn random_bindings() -> Bindings {
    ["a", "b", "c", "d", "ee", "f", "g", "h", "i", "j", "m", "k", "l"]
        .iter()
        .map(|name| {
            let value = 1.0 + rand::random::<f64>() * 100.0;
            (name.to_string(), Decimal::from_f64(value).unwrap())
        })
        .collect()
}

/// Benchmark the three execution strategies on the rating formula
fn benchmark_rating_formula(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rating Formula Evaluation");

    let bindings = random_bindings();
    let ast = FormulaParser::parse_formula(RATING_FORMULA).unwrap();
    let compiled = Compiler::compile(&ast);

    group.bench_function("parse_and_interpret", |b| {
        b.iter(|| Evaluator::evaluate_formula(black_box(RATING_FORMULA), black_box(&bindings)))
    });

    group.bench_function("interpret_pre_parsed", |b| {
        b.iter(|| Evaluator::evaluate(black_box(&ast), black_box(&bindings)))
    });

    group.bench_function("compiled_run", |b| {
        b.iter(|| compiled.run(black_box(&bindings)))
    });

    group.finish();
}

/// Benchmark the compile-once/execute-many pattern against fresh binding sets
fn benchmark_many_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("Many Records");

    let records: Vec<Bindings> = (0..100).map(|_| random_bindings()).collect();
    let ast = FormulaParser::parse_formula(RATING_FORMULA).unwrap();
    let compiled = Compiler::compile(&ast);

    group.bench_function("interpret_per_record", |b| {
        b.iter(|| {
            for record in &records {
                let _ = Evaluator::evaluate(black_box(&ast), record);
            }
        })
    });

    group.bench_function("compiled_per_record", |b| {
        b.iter(|| {
            for record in &records {
                let _ = compiled.run(black_box(record));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_rating_formula, benchmark_many_records);
criterion_main!(benches);
