use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlcraft::{AnsiDialect, Dialect, PropertyPath, Select, stmt};

fn dialect() -> Arc<dyn Dialect> {
    Arc::new(AnsiDialect)
}

/// Build a SELECT with `n` WHERE terms:
/// SELECT * FROM "t" WHERE ("col0" = ? AND "col1" = ? ...)
fn build_select(n: usize) -> Select {
    let mut select = stmt::select(dialect(), "t");
    for i in 0..n {
        select = select
            .where_(PropertyPath::new(format!("col{i}")).eq(i as i64))
            .unwrap();
    }
    select
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut select = build_select(n);
                black_box(select.sql().unwrap().len());
            });
        });
    }

    group.finish();
}

fn bench_cached_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/cached_render");

    for n in [1, 10, 100] {
        let mut select = build_select(n);
        select.sql().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(select.sql().unwrap().len()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let mut select = stmt::select(dialect(), "t")
                    .where_(PropertyPath::new("id").in_list(values.iter().copied()))
                    .unwrap();
                black_box(select.sql().unwrap().len());
            });
        });
    }

    group.finish();
}

fn bench_full_statement(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/full_statement");

    group.bench_function("select_all_clauses", |b| {
        b.iter(|| {
            let mut select = stmt::select(dialect(), "Person")
                .alias("q")
                .where_(PropertyPath::aliased("q", "age").between(16, 21))
                .unwrap()
                .group_by(PropertyPath::aliased("q", "city"))
                .unwrap()
                .having(PropertyPath::new("n").gt(1))
                .unwrap()
                .order_by(PropertyPath::aliased("q", "lastName"))
                .unwrap()
                .limit(50)
                .unwrap()
                .offset(100)
                .unwrap();
            black_box(select.sql().unwrap().len());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_build_and_render,
    bench_cached_render,
    bench_in_list,
    bench_full_statement
);
criterion_main!(benches);
