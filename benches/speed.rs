use chacha_wide::cipher::{KeyIvInit, StreamCipher};
use chacha_wide::{ChaCha8, ChaCha12, ChaCha20, init_state, xor_keystream};
use cipher::{Iv, Key};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

// A generic function to benchmark any cipher that implements the required traits.
fn bench_cipher<C>(c: &mut Criterion, name: &str)
where
    C: KeyIvInit + StreamCipher,
{
    let mut group = c.benchmark_group(name);

    // Benchmark throughput for different buffer sizes.
    for size in [1024, 4096, 16384, 65536].iter() {
        let mut buffer = vec![0u8; *size];
        let key = Key::<C>::default();
        let nonce = Iv::<C>::default();
        let mut cipher = C::new(&key, &nonce);

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| cipher.apply_keystream(&mut buffer));
        });
    }
    group.finish();
}

// Benchmark the raw slice-level dispatch path.
fn bench_raw(c: &mut Criterion) {
    let mut group = c.benchmark_group("xor_keystream");

    for size in [1024, 4096, 16384, 65536].iter() {
        let src = vec![0u8; *size];
        let mut dst = vec![0u8; *size];
        let mut state = init_state(&[0u8; 32], &[0u8; 12], 0);

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| xor_keystream(&mut state, &mut dst, &src, 20));
        });
    }
    group.finish();
}

// Main benchmark function that sets up and runs all benchmarks.
fn benchmarks(c: &mut Criterion) {
    bench_cipher::<ChaCha8>(c, "ChaCha8");
    bench_cipher::<ChaCha12>(c, "ChaCha12");
    bench_cipher::<ChaCha20>(c, "ChaCha20");
    bench_raw(c);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
