//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package wavec-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wavec_lex::Lexer;
use wavec_util::{FileId, Handler};

fn lexer_token_count(source: &str) -> usize {
    let mut handler = Handler::new();
    let stream = Lexer::new(source, FileId::new(0), &mut handler).tokenize();
    stream.len()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "x := 42\nfor i in 0 .. 10 {\n    y := x + i\n    return y\n}\n";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_decl", |b| {
        b.iter(|| lexer_token_count(black_box("x := 42\n")))
    });

    group.bench_function("loop_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        fibonacci :: (n: int) -> int => {
            if n <= 1 {
                return n
            }
            return fibonacci(n - 1) + fibonacci(n - 2)
        }

        struct Point {
            x: int,
            y: int,
        }

        enum Color {
            Red,
            Green,
            Blue,
        }
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
        b.iter(|| lexer_token_count(black_box("s := \"hello\"\n")))
    });

    group.bench_function("long_string", |b| {
        let source =
            "s := \"This is a longer string that contains some text for benchmarking purposes.\"\n";
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.bench_function("multiline_string", |b| {
        let source = "s := \"\"\"line one\nline two\nline three\"\"\"\n";
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("x := 123456\n")))
    });

    group.bench_function("float", |b| {
        b.iter(|| lexer_token_count(black_box("x := 3.14159\n")))
    });

    group.bench_function("hex", |b| {
        b.iter(|| lexer_token_count(black_box("x := 0xDEADBEEF\n")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("x := 42\n")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("very_long_variable_name := 42\n")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "a := 1\nb := 2\nc := 3\nd := 4\ne := 5\n",
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
