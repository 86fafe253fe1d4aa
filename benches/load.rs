use std::collections::BTreeMap;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use envload::EnvLoader;

fn bench_load(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let env_path = dir.path().join(".env");
    write_file(&env_path, &make_env_content(2_000));

    let mut group = c.benchmark_group("load_in_memory");
    for segment_size in [16usize, envload::DEFAULT_SEGMENT_SIZE] {
        group.bench_with_input(
            BenchmarkId::from_parameter(segment_size),
            &segment_size,
            |b, &segment_size| {
                b.iter(|| {
                    let mut sink = BTreeMap::<String, String>::new();
                    EnvLoader::new()
                        .path(&env_path)
                        .segment_size(segment_size)
                        .load_into(&mut sink)
                        .expect("load should succeed")
                });
            },
        );
    }
    group.finish();
}

fn make_env_content(entries: usize) -> String {
    let mut content = String::with_capacity(entries * 32);
    for idx in 0..entries {
        content.push_str("KEY_");
        content.push_str(&idx.to_string());
        content.push_str("=\"some quoted value\"\n");
    }
    content
}

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("failed to write test file");
}

criterion_group!(benches, bench_load);
criterion_main!(benches);
