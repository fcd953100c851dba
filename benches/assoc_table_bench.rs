use assoc_table::{Address, AssocTable, ByteString};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::ffi::CString;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> CString {
    CString::new(format!("k{:016x}", n)).expect("hex digits contain no NUL")
}

// 10k pseudo-random picks from 0..n.
fn picks(n: usize) -> Vec<usize> {
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..10_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            (s as usize) % n
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    let keys: Vec<CString> = lcg(1).take(100_000).map(key).collect();
    let vals: Vec<u64> = (0..100_000).collect();

    c.bench_function("table::string_insert_fresh_100k", |b| {
        b.iter_batched(
            || AssocTable::<u64, ByteString>::with_scheme(ByteString),
            |mut t| {
                for (k, v) in keys.iter().zip(&vals) {
                    t.insert(k, v).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("table::identity_insert_fresh_100k", |b| {
        b.iter_batched(
            AssocTable::<u64>::new,
            |mut t| {
                for v in &vals {
                    t.insert(Address::of(v), v).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    let keys: Vec<CString> = lcg(3).take(100_000).map(key).collect();
    let vals: Vec<u64> = (0..100_000).collect();

    c.bench_function("table::string_insert_presized_100k", |b| {
        b.iter_batched(
            || AssocTable::<u64, ByteString>::with_capacity_and_scheme(262_144, ByteString),
            |mut t| {
                for (k, v) in keys.iter().zip(&vals) {
                    t.insert(k, v).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    let keys: Vec<CString> = lcg(5).take(110_000).map(key).collect();
    let vals: Vec<u64> = (0..110_000).collect();
    let targets = picks(keys.len());

    c.bench_function("table::string_remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let mut t = AssocTable::<u64, ByteString>::with_scheme(ByteString);
                for (k, v) in keys.iter().zip(&vals) {
                    t.insert(k, v).unwrap();
                }
                t
            },
            |mut t| {
                for &i in &targets {
                    black_box(t.remove(&keys[i]));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_10k(c: &mut Criterion) {
    let keys: Vec<CString> = lcg(7).take(100_000).map(key).collect();
    let vals: Vec<u64> = (0..100_000).collect();
    let mut t = AssocTable::<u64, ByteString>::with_scheme(ByteString);
    for (k, v) in keys.iter().zip(&vals) {
        t.insert(k, v).unwrap();
    }
    let hits: Vec<&CString> = picks(keys.len()).into_iter().map(|i| &keys[i]).collect();
    let misses: Vec<CString> = lcg(0xdead_beef).take(10_000).map(key).collect();

    c.bench_function("table::string_get_hit_10k_on_100k", |b| {
        b.iter(|| {
            for k in &hits {
                black_box(t.get(k));
            }
        })
    });

    c.bench_function("table::string_get_miss_10k_on_100k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(t.get(k));
            }
        })
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    let vals: Vec<u64> = (0..100_000).collect();
    let mut t = AssocTable::<u64>::new();
    for v in &vals {
        t.insert(Address::of(v), v).unwrap();
    }

    c.bench_function("table::iter_all_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in t.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("table::cursor_walk_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            let mut cur = t.begin();
            while let Some(v) = t.value(cur) {
                sum = sum.wrapping_add(*v);
                cur = t.advance(cur);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_get_10k,
              bench_iter_100k
}
criterion_main!(benches_insert, benches_ops);
