//! Container hot-path benchmarks: membership and end-push across both
//! encodings, and the promotion cliff itself.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use tessera_collections::{End, List, Set};
use tessera_core::{CollectionLimits, Literal, Value};

fn bench_set_membership(c: &mut Criterion) {
    let limits = CollectionLimits::default();
    let n = 256;

    let mut packed = Set::new_intset();
    for v in 0..n {
        packed.insert(&Literal::from_int(v), &limits);
    }

    let mut hashed = Set::new_hash();
    for v in 0..n {
        hashed.insert(&Literal::from_int(v), &limits);
    }

    let mut group = c.benchmark_group("set_membership");
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("intset", |b| {
        b.iter(|| {
            for v in 0..n {
                black_box(packed.contains(&Literal::from_int(v)));
            }
        })
    });
    group.bench_function("hashtable", |b| {
        b.iter(|| {
            for v in 0..n {
                black_box(hashed.contains(&Literal::from_int(v)));
            }
        })
    });
    group.finish();
}

fn bench_set_promotion(c: &mut Criterion) {
    let limits = CollectionLimits::default();
    let n = limits.set_max_intset_entries as i64 + 1;

    c.bench_function("set_fill_through_promotion", |b| {
        b.iter(|| {
            let mut set = Set::new_intset();
            for v in 0..n {
                set.insert(&Literal::from_int(v), &limits);
            }
            black_box(set.len())
        })
    });
}

fn bench_list_push_pop(c: &mut Criterion) {
    let limits = CollectionLimits::default();
    let n = 64usize;

    let mut group = c.benchmark_group("list_push_pop");
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("ziplist", |b| {
        b.iter(|| {
            let mut list = List::new();
            for i in 0..n {
                list.push(Value::Int(i as i64), End::Tail, &limits);
            }
            while let Some(v) = list.pop(End::Head) {
                black_box(v);
            }
        })
    });
    group.bench_function("linked", |b| {
        b.iter(|| {
            let mut list = List::new();
            list.convert_to_linked();
            for i in 0..n {
                list.push(Value::Int(i as i64), End::Tail, &limits);
            }
            while let Some(v) = list.pop(End::Head) {
                black_box(v);
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_set_membership,
    bench_set_promotion,
    bench_list_push_pop
);
criterion_main!(benches);
