//! LZW stage benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hzw_lzw::{LzwConfig, decode, encode};
use std::hint::black_box;

type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    pub fn random(size: usize) -> Vec<u8> {
        let mut seed: u64 = 0x123456789ABCDEF0;
        (0..size)
            .map(|_| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                (seed >> 32) as u8
            })
            .collect()
    }

    pub fn text_like(size: usize) -> Vec<u8> {
        b"The quick brown fox jumps over the lazy dog. \
          Pack my box with five dozen liquor jugs. "
            .iter()
            .cycle()
            .take(size)
            .copied()
            .collect()
    }
}

const SIZES: [(&str, usize); 2] = [("64KB", 64 * 1024), ("1MB", 1024 * 1024)];

const PATTERNS: [(&str, PatternGenerator); 3] = [
    ("uniform", test_data::uniform),
    ("random", test_data::random),
    ("text", test_data::text_like),
];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzw_encode");

    for (size_name, size) in SIZES {
        for (pattern_name, generator) in PATTERNS {
            let data = generator(size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(pattern_name, size_name),
                &data,
                |b, data| b.iter(|| encode(black_box(data), LzwConfig::DEFAULT).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzw_decode");

    for (size_name, size) in SIZES {
        for (pattern_name, generator) in PATTERNS {
            let codes = encode(&generator(size), LzwConfig::DEFAULT).unwrap();
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(pattern_name, size_name),
                &codes,
                |b, codes| b.iter(|| decode(black_box(codes), LzwConfig::DEFAULT).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzw_width");
    let data = test_data::text_like(256 * 1024);

    for bits in [9u8, 12, 16] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(bits), &data, |b, data| {
            b.iter(|| encode(black_box(data), LzwConfig::new(bits)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_widths);
criterion_main!(benches);
