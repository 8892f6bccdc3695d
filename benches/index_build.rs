//! Benchmarks for 1-to-N index construction and the compact view.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use kge_dataset::index::{build, prepare_index, Direction};
use kge_dataset::triples::TripleArray;

const ROWS: usize = 200_000;
const ENTITIES: u32 = 15_000;
const RELATIONS: u32 = 240;

fn random_triples() -> TripleArray {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    (0..ROWS)
        .map(|_| {
            [
                rng.gen_range(0..ENTITIES),
                rng.gen_range(0..RELATIONS),
                rng.gen_range(0..ENTITIES),
            ]
        })
        .collect::<Vec<_>>()
        .into()
}

fn bench_build_sp(c: &mut Criterion) {
    let triples = random_triples();
    c.bench_function("build_sp_200k", |bench| {
        bench.iter(|| black_box(build(&triples, Direction::Sp)))
    });
}

fn bench_build_po(c: &mut Criterion) {
    let triples = random_triples();
    c.bench_function("build_po_200k", |bench| {
        bench.iter(|| black_box(build(&triples, Direction::Po)))
    });
}

fn bench_prepare(c: &mut Criterion) {
    let index = build(&random_triples(), Direction::Sp);
    c.bench_function("prepare_index_200k", |bench| {
        bench.iter(|| black_box(prepare_index(&index)))
    });
}

criterion_group!(benches, bench_build_sp, bench_build_po, bench_prepare);
criterion_main!(benches);
