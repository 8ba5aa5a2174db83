use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use tickstore::{create_timer_pair, CounterState, DerivedState, Store, TimerOptions};

fn store_update_benchmark(c: &mut Criterion) {
    let store = Store::new(CounterState::default());

    c.bench_function("store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            store.update(|state| {
                state.count = black_box(i);
            });
            i += 1;
        });
    });
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::new(CounterState::default());

        let _subscriptions: Vec<_> = (0..*subscriber_count)
            .map(|_| {
                store.subscribe(|_| {
                    // Empty subscriber
                })
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.update(|state| state.count = black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn derive_benchmark(c: &mut Criterion) {
    c.bench_function("derive_state", |b| {
        let state = CounterState {
            count: 21,
            is_running: true,
        };
        b.iter(|| DerivedState::from(black_box(&state)));
    });
}

fn timer_reset_benchmark(c: &mut Criterion) {
    let pair = create_timer_pair(TimerOptions::default());

    c.bench_function("timer_reset_with_view", |b| {
        b.iter(|| {
            pair.counter.reset();
            black_box(pair.derived.get());
        });
    });
}

criterion_group!(
    benches,
    store_update_benchmark,
    store_subscribe_benchmark,
    derive_benchmark,
    timer_reset_benchmark,
);
criterion_main!(benches);
