//! Benchmarks for Meshcast admission
//!
//! Measures performance of:
//! - Baseline BFS over square grids
//! - Client ranking
//! - Full admission runs at different grid sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use meshcast_admission::{AdmissionController, CapacityModel, Client, PriorityRanking};
use meshcast_topology::{Baseline, NodeId, Topology, UNBOUNDED_CAPACITY};

/// Square grid with the provider in a corner and a client on every third node.
fn grid(side: u32, capacity: u32) -> (Topology, Vec<Client>) {
    let id = |x: u32, y: u32| NodeId(y * side + x);
    let mut builder = Topology::builder().provider(id(0, 0), UNBOUNDED_CAPACITY);
    let mut clients = Vec::new();

    for y in 0..side {
        for x in 0..side {
            let node = id(x, y);
            if node == id(0, 0) {
                continue;
            }
            if node.value() % 3 == 0 {
                builder = builder.client(node, capacity);
                clients.push(Client::new(node, u64::from(node.value() % 17), 2.0));
            } else {
                builder = builder.router(node, capacity);
            }
            if x > 0 {
                builder = builder.edge(id(x - 1, y), node);
            }
            if y > 0 {
                builder = builder.edge(id(x, y - 1), node);
            }
        }
    }
    (builder.build().expect("grid topology"), clients)
}

/// Benchmark unconstrained BFS
fn bench_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("baseline");

    for &side in &[8u32, 32, 64] {
        let (topology, _) = grid(side, 4);
        group.throughput(Throughput::Elements(u64::from(side * side)));
        group.bench_with_input(BenchmarkId::from_parameter(side), &topology, |b, t| {
            b.iter(|| Baseline::compute(black_box(t)))
        });
    }
    group.finish();
}

/// Benchmark ranking alone
fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for &side in &[8u32, 32, 64] {
        let (topology, clients) = grid(side, 4);
        let baseline = Baseline::compute(&topology);
        group.throughput(Throughput::Elements(clients.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &clients, |b, cs| {
            b.iter(|| PriorityRanking::new(black_box(cs), &baseline).count())
        });
    }
    group.finish();
}

/// Benchmark complete admission runs
fn bench_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission");
    group.sample_size(20);

    for &side in &[8u32, 16, 32] {
        let (topology, clients) = grid(side, 4);
        group.throughput(Throughput::Elements(clients.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(side),
            &(topology, clients),
            |b, (t, cs)| {
                let controller = AdmissionController::new(t);
                b.iter(|| {
                    let mut capacity = CapacityModel::from_topology(t);
                    controller
                        .run(black_box(cs), &mut capacity)
                        .map(|a| a.paths.len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_baseline, bench_ranking, bench_admission);
criterion_main!(benches);
