//! Parser benchmarks. Run with: `cargo bench --package glimmer-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glimmer_par::Parser;

fn parse_source(source: &str) -> usize {
    let mut parser = Parser::new(source);
    parser.parse_program().len()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "x = 42";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("assign_statement", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = r#"
        add = fn(x: int, y: int) -> int {
            return x + y
        }

        fib = fn(n: int) -> int {
            if n == 0 { return 0 }
            else if n == 1 { return 1 }
            else { return fib(n - 1) + fib(n - 2) }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("functions", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        process = fn(n: int) -> int {
            if n < 0 { return -1 }
            else if n == 0 { return 0 }
            else {
                sum = 0
                for i=0, i<n, i=i+1 {
                    sum += i
                }
                return sum
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("control_flow", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_collections(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_collections");

    let source = r#"
        data = [1, 2, 3, 4, 5]
        lookup = {"one": 1, "two": 2, "three": 3}
        empty = []int

        for i, v in data {
            print(i, v)
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("collections", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
        newAdder = fn(x: int) -> fn(int) -> int {
            fn(y: int) -> int { x + y }
        }

        addTwo = newAdder(2)
        r = range(0, 10, 2)
        x = 0
        for { x += 1; if x >= 10 { break } }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("complex_source", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_control_flow,
    bench_parser_collections,
    bench_parser_complex
);
criterion_main!(benches);
