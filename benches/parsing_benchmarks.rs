use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pkgreq_language_server::{locate_header, read_declarations, ParsedVersion};
use std::hint::black_box;

/// Dependency list text with the given number of declarations
fn generate_declarations(count: usize, pattern: &str) -> String {
    let mut text = String::from("(");

    for i in 0..count {
        match pattern {
            "plain" => text.push_str(&format!("(pkg-{} \"{}.{}\") ", i, i % 7, i % 13)),
            "prerelease" => text.push_str(&format!("(pkg-{} \"{}.0-beta{}\") ", i, i % 5, i % 3)),
            "malformed" => match i % 3 {
                0 => text.push_str(&format!("(pkg-{} \"1.0\") ", i)),
                1 => text.push_str(&format!("(\"pkg-{}\" \"1.0\") ", i)),
                2 => text.push_str(&format!("(pkg-{}) ", i)),
                _ => unreachable!(),
            },
            _ => text.push_str(&format!("pkg-{} ", i)),
        }
    }

    text.push(')');
    text
}

/// Package file whose header sits after `preamble` comment lines
fn generate_package(preamble: usize) -> String {
    let mut content = String::from(";;; big.el --- Big package  -*- lexical-binding: t -*-\n");
    for i in 0..preamble {
        content.push_str(&format!(";; Commentary line {} describing the package\n", i));
    }
    content.push_str(";; Package-Requires: ((emacs \"26.1\") (seq \"2.24\"))\n");
    content.push_str(";;; Code:\n(provide 'big)\n;;; big.el ends here\n");
    content
}

fn bench_version_parsing(c: &mut Criterion) {
    let versions = vec![
        ("simple", "1.0"),
        ("long", "20240101.1530.2.17"),
        ("prerelease", "2.0-beta3"),
        ("snapshot", "1.2snapshot"),
        ("invalid", "1.0.0.x"),
    ];

    let mut group = c.benchmark_group("version_parsing");

    for (name, version) in versions {
        group.bench_with_input(BenchmarkId::new("parse", name), &version, |b, version| {
            b.iter(|| black_box(ParsedVersion::parse(black_box(version))))
        });
    }

    group.finish();
}

fn bench_declaration_reading(c: &mut Criterion) {
    let sizes = vec![1, 10, 100, 1_000];
    let patterns = vec!["plain", "prerelease", "malformed"];

    let mut group = c.benchmark_group("declaration_reading");

    for &size in &sizes {
        for pattern in &patterns {
            let text = generate_declarations(size, pattern);

            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{}_{}", pattern, size), size),
                &text,
                |b, text| b.iter(|| black_box(read_declarations(black_box(text)))),
            );
        }
    }

    group.finish();
}

fn bench_header_location(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_location");

    for &preamble in &[10, 1_000, 10_000] {
        let content = generate_package(preamble);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("locate_header", preamble),
            &content,
            |b, content| b.iter(|| black_box(locate_header(black_box(content)))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_version_parsing,
    bench_declaration_reading,
    bench_header_location
);
criterion_main!(benches);
