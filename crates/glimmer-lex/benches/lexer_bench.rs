//! Lexer benchmarks. Run with: `cargo bench --package glimmer-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glimmer_lex::Lexer;

fn lexer_token_count(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    loop {
        let tok = lexer.next_token();
        if tok.is_eof() {
            break;
        }
        count += 1;
    }
    count
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "x = 42; add = fn(a:int, b:int)->int { return a + b; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_assignment", |b| {
        b.iter(|| lexer_token_count(black_box("x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        fib = fn(n: int) -> int {
            if n == 0 { return 0 }
            else if n == 1 { return 1 }
            else { return fib(n - 1) + fib(n - 2) }
        }

        data = [1, 2, 3, 4, 5]
        lookup = {"one": 1, "two": 2, "three": 3}

        for i, v in data {
            print(i, v)
        }

        r = range(0, 10, 2)
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_token_count(black_box("s = \"hello\";")))
    });

    group.bench_function("long_string", |b| {
        let source =
            "s = \"This is a longer string that contains some text for benchmarking purposes.\";";
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("x = 123456;")))
    });

    group.bench_function("float", |b| {
        b.iter(|| lexer_token_count(black_box("x = 3.14159;")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("x = 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("very_long_variable_name = 42;")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "a = 1; b = 2; c = 3; d = 4; e = 5;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
