use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dirgraph::graph::{edge, labels, weighted, AdjacencyForm, DirectedGraph, LabelMap, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random graph with `size` nodes and four out-edges per node
fn random_graph(size: u64) -> DirectedGraph {
    let mut rng = StdRng::seed_from_u64(size);
    let mut graph = DirectedGraph::new("bench", 1.0);
    graph.auto_add_nodes(size as usize, &LabelMap::new());
    for source in 0..size {
        for _ in 0..4 {
            let target = rng.gen_range(0..size);
            graph
                .add_edges(&[edge(source, target)], &weighted(rng.gen_range(1.0..10.0)))
                .unwrap();
        }
    }
    graph
}

/// Benchmark node and edge insertion throughput
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    for size in [100u64, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut graph = DirectedGraph::new("bench", 1.0);
                graph.auto_add_nodes(size as usize, &labels([("kind", "city")]));
                for i in 0..size {
                    graph
                        .add_edges(&[edge(i, (i + 1) % size)], &weighted((i % 7) as f64))
                        .unwrap();
                }
                criterion::black_box(graph.size());
            });
        });
    }
    group.finish();
}

/// Benchmark dense and sparse adjacency computation
fn bench_adjacency(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjacency");

    for size in [100u64, 1000].iter() {
        let graph = random_graph(*size);
        group.bench_with_input(BenchmarkId::new("dense", size), size, |b, _| {
            b.iter(|| {
                criterion::black_box(graph.compute_adjacency(AdjacencyForm::Dense).unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("sparse", size), size, |b, _| {
            b.iter(|| {
                criterion::black_box(graph.compute_adjacency(AdjacencyForm::Sparse).unwrap())
            });
        });
    }
    group.finish();
}

/// Benchmark shortest path latency
fn bench_min_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_path");

    for size in [100u64, 1000, 10_000].iter() {
        let graph = random_graph(*size);
        let end = NodeId::new(size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| criterion::black_box(graph.min_path(NodeId::new(0), end).ok()));
        });
    }
    group.finish();
}

/// Benchmark deep copy of a graph
fn bench_copy(c: &mut Criterion) {
    let graph = random_graph(1000);
    c.bench_function("copy_1000", |b| {
        b.iter(|| criterion::black_box(graph.copy()));
    });
}

criterion_group!(benches, bench_insertion, bench_adjacency, bench_min_path, bench_copy);
criterion_main!(benches);
