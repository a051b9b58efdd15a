// Ranking and comparison benchmarks over synthetic snapshot tables
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use salesim::{
    DimensionRegistry, FeatureComparator, FeatureStore, FeatureVector, RankWindow, RankingEngine,
    RankingRow, RankingTable, Scope, Weights,
};

const FOCALS: usize = 50;

fn sale(i: usize) -> String {
    format!("fr_FR{}", 100_000 + i)
}

fn generate_rows(registry: &DimensionRegistry, peers_per_dimension: usize) -> Vec<RankingRow> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut rows = Vec::new();
    for focal in 0..FOCALS {
        for key in registry.keys() {
            let mut scores: Vec<(usize, f64)> = (0..peers_per_dimension)
                .map(|_| (rng.random_range(0..FOCALS * 20), rng.random_range(0.0..1.0)))
                .collect();
            scores.sort_by(|a, b| b.1.total_cmp(&a.1));
            let mut seen = std::collections::HashSet::new();
            let mut rank = 0u32;
            for (peer, similarity) in scores {
                if peer == focal || !seen.insert(peer) {
                    continue;
                }
                rank += 1;
                rows.push(RankingRow::new(sale(focal), sale(peer), key, similarity, rank));
            }
        }
    }
    rows
}

fn generate_table(registry: &DimensionRegistry, peers_per_dimension: usize) -> RankingTable {
    RankingTable::new(generate_rows(registry, peers_per_dimension)).unwrap()
}

fn generate_features(registry: &DimensionRegistry, features_per_dimension: usize) -> (DimensionRegistry, FeatureStore) {
    let mut rng = StdRng::seed_from_u64(7);
    let mapping: std::collections::HashMap<String, Vec<String>> = registry
        .iter()
        .map(|d| {
            let columns = (0..features_per_dimension)
                .map(|i| d.column_for(&format!("f{}", i)))
                .collect();
            (d.key.clone(), columns)
        })
        .collect();
    let registry = registry.clone().with_feature_columns(&mapping).unwrap();

    let columns: Vec<String> = registry.all_columns().into_iter().map(str::to_string).collect();
    let mut store = FeatureStore::new(columns.clone());
    for i in 0..FOCALS {
        let vector: FeatureVector = columns
            .iter()
            .map(|c| (c.clone(), if rng.random_bool(0.3) { 1.0 } else { 0.0 }))
            .collect();
        store.insert(sale(i).into(), vector);
    }
    (registry, store)
}

fn benchmark_thematic(c: &mut Criterion) {
    let registry = DimensionRegistry::builtin();
    let mut group = c.benchmark_group("thematic");

    for peers in [10, 100, 1000].iter() {
        let table = generate_table(&registry, *peers);
        let engine = RankingEngine::new(&registry, &table);
        let window = RankWindow::new(1, 10).unwrap();
        group.bench_with_input(BenchmarkId::new("rank_by_dimension", peers), peers, |b, _| {
            b.iter(|| {
                black_box(engine.rank_by_dimension(&sale(3), "location", window).unwrap());
            });
        });
    }
    group.finish();
}

fn benchmark_weighted(c: &mut Criterion) {
    let registry = DimensionRegistry::builtin();
    let keys: Vec<&str> = registry.keys().collect();
    let mut group = c.benchmark_group("weighted");

    for peers in [10, 100, 1000].iter() {
        let table = generate_table(&registry, *peers);
        let engine = RankingEngine::new(&registry, &table);
        let weights = Weights::uniform(&registry, &keys).unwrap();
        let window = RankWindow::new(1, 10).unwrap();
        group.bench_with_input(BenchmarkId::new("all_dimensions", peers), peers, |b, _| {
            b.iter(|| {
                black_box(engine.rank_weighted(&sale(3), &weights, window).unwrap());
            });
        });
    }
    group.finish();
}

fn benchmark_table_build(c: &mut Criterion) {
    let registry = DimensionRegistry::builtin();
    let rows = generate_rows(&registry, 100);

    c.bench_function("ranking_table_build", |b| {
        b.iter(|| black_box(RankingTable::new(rows.clone()).unwrap()));
    });
}

fn benchmark_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    for features in [5, 50, 200].iter() {
        let (registry, store) = generate_features(&DimensionRegistry::builtin(), *features);
        let comparator = FeatureComparator::new(&registry, &store);
        group.bench_with_input(BenchmarkId::new("all", features), features, |b, _| {
            b.iter(|| {
                black_box(comparator.diff(&sale(1), &sale(2), &Scope::All).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_thematic, benchmark_weighted, benchmark_table_build, benchmark_diff);
criterion_main!(benches);
