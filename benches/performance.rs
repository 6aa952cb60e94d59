use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringvec::RingVec;

fn bench_push_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_cycle");

    for size in [16, 256, 4096].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("wrapping_push", size), size, |b, &size| {
            b.iter(|| {
                let mut ring = RingVec::with_capacity(size).unwrap();
                // Two full laps: the second one exercises the eviction path.
                for i in 0..size * 2 {
                    black_box(ring.push(i));
                }
                black_box(ring.len())
            });
        });
    }
    group.finish();
}

fn bench_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_access");

    for size in [256, 4096].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("get_operations", size), size, |b, &size| {
            let mut ring = RingVec::with_capacity(size).unwrap();
            for i in 0..size + size / 2 {
                ring.push(i);
            }

            b.iter(|| {
                for pos in 0..size {
                    black_box(ring.get(pos));
                }
            });
        });
    }
    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");

    for size in [256, 4096].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("newest_first", size), size, |b, &size| {
            let mut ring = RingVec::with_capacity(size).unwrap();
            for i in 0..size + size / 2 {
                ring.push(i);
            }

            b.iter(|| {
                let sum: usize = ring.iter().sum();
                black_box(sum)
            });
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");

    group.bench_function("grow_then_shrink", |b| {
        b.iter(|| {
            let mut ring: RingVec<u64> = RingVec::new();
            ring.resize(1024, 7).unwrap();
            ring.resize(64, 0).unwrap();
            ring.shrink_to_fit();
            black_box(ring.capacity())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_push_cycle,
    bench_random_access,
    bench_iteration,
    bench_resize
);
criterion_main!(benches);
