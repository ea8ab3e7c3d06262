use std::path::PathBuf;

use case_classifier::{normalize, ArtifactPaths, Readiness};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SHORT: &str = "Wire transfer to vendor";
const LONG: &str = "The client reports that on 2023-04-12 a wire transfer of $12,500 was sent \
    to a vendor account that was later closed. The invoice (#4471) was marked URGENT!! and \
    the bank has refused to reverse the payment. A court hearing is expected next month; \
    the client also mentions an unrelated lease dispute with the landlord.";

fn setup_readiness() -> Readiness {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let readiness = Readiness::load(&ArtifactPaths::in_dir(dir));
    assert!(readiness.is_ready(), "fixture artifacts failed to load");
    readiness
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normalize");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| b.iter(|| normalize(black_box(SHORT))));
    group.bench_function("long_text", |b| b.iter(|| normalize(black_box(LONG))));

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let readiness = setup_readiness();
    let mut group = c.benchmark_group("Predict");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| {
        b.iter(|| readiness.predict(black_box(SHORT)).unwrap())
    });
    group.bench_function("long_text", |b| {
        b.iter(|| readiness.predict(black_box(LONG)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_predict);
criterion_main!(benches);
