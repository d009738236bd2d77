//! Header similarity benchmarks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use recon::HeaderSimilarityMapper;
use recon::similarity::ratio;

fn headers(n: usize, prefix: &str) -> Vec<String> {
    const WORDS: &[&str] = &[
        "username", "first name", "last name", "email address", "department", "role",
        "manager", "project", "start date", "employee id", "cost center", "location",
    ];
    (0..n)
        .map(|i| format!("{}{} {}", prefix, WORDS[i % WORDS.len()], i / WORDS.len()))
        .collect()
}

fn bench_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio");

    for (a, b) in [
        ("username", "user name"),
        ("employee identification number", "employee_id_number"),
        ("primary contact email address", "contact e-mail (primary)"),
    ] {
        group.bench_with_input(BenchmarkId::new("pair", a), &(a, b), |bench, (a, b)| {
            bench.iter(|| black_box(ratio(a, b)))
        });
    }

    group.finish();
}

fn bench_propose(c: &mut Criterion) {
    let mut group = c.benchmark_group("propose_mapping");
    let mapper = HeaderSimilarityMapper::new();

    for n in [10, 50, 200].iter() {
        let reference = headers(*n, "");
        let target = headers(*n, "src_");

        group.bench_with_input(BenchmarkId::new("headers", n), n, |b, _| {
            b.iter(|| black_box(mapper.propose(&reference, &target)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ratio, bench_propose);
criterion_main!(benches);
