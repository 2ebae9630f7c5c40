use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lanecount::{generate, CounterKernel};

const SIZES: [usize; 3] = [1 << 10, 64 << 10, 1 << 20];

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");
    for size in SIZES {
        let buffer = generate(size, 32, 42).expect("buffer allocates");
        group.throughput(Throughput::Bytes(size as u64));
        for kernel in CounterKernel::ALL {
            group.bench_with_input(BenchmarkId::new(kernel.name(), size), &buffer, |b, buf| {
                b.iter(|| black_box(kernel.count(buf, black_box(b'e'))));
            });
        }
    }
    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_by_alignment");
    group.sample_size(30);
    for alignment in [1usize, 8, 16, 64] {
        let buffer = generate(64 << 10, alignment, 42).expect("buffer allocates");
        group.throughput(Throughput::Bytes(buffer.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(alignment),
            &buffer,
            |b, buf| b.iter(|| black_box(CounterKernel::Vectorized.count(buf, b'e'))),
        );
    }
    group.finish();
}

fn bench_frequency_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("frequency_table");
    group.sample_size(20);
    let buffer = generate(64 << 10, 32, 42).expect("buffer allocates");
    group.throughput(Throughput::Bytes(buffer.len() as u64));
    for kernel in CounterKernel::ALL {
        group.bench_function(kernel.name(), |b| {
            b.iter(|| black_box(kernel.frequency_table(&buffer)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_count, bench_alignment, bench_frequency_table);
criterion_main!(benches);
