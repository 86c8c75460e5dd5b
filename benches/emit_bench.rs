use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use typed_events::{event_map, Dispatcher, Listener};

event_map! {
    Metrics {
        Sample(u64),
        Idle,
    }
}

fn summing_listener(total: &Arc<AtomicU64>) -> Listener<Sample> {
    let total = Arc::clone(total);
    Listener::<Sample>::new(move |(value,)| {
        total.fetch_add(*value, Ordering::Relaxed);
        Ok(())
    })
}

fn benchmark_emit_fan_out(c: &mut Criterion) {
    for listener_count in [1usize, 8, 64] {
        let total = Arc::new(AtomicU64::new(0));
        let metrics = Dispatcher::<Metrics>::new();
        metrics.set_max_listeners(0);
        for _ in 0..listener_count {
            metrics.on(summing_listener(&total));
        }

        c.bench_function(&format!("emit_{listener_count}_listeners"), |b| {
            b.iter(|| metrics.emit::<Sample>(black_box((1,))))
        });
    }
}

fn benchmark_emit_without_listeners(c: &mut Criterion) {
    let metrics = Dispatcher::<Metrics>::new();

    c.bench_function("emit_no_listeners", |b| {
        b.iter(|| metrics.emit::<Idle>(black_box(())))
    });
}

fn benchmark_once_churn(c: &mut Criterion) {
    let total = Arc::new(AtomicU64::new(0));
    let metrics = Dispatcher::<Metrics>::new();
    let listener = summing_listener(&total);

    c.bench_function("once_register_and_fire", |b| {
        b.iter(|| {
            metrics.once(listener.clone());
            black_box(metrics.emit::<Sample>((1,)))
        })
    });
}

fn benchmark_off_in_long_sequence(c: &mut Criterion) {
    let total = Arc::new(AtomicU64::new(0));
    let metrics = Dispatcher::<Metrics>::new();
    metrics.set_max_listeners(0);
    for _ in 0..128 {
        metrics.on(summing_listener(&total));
    }
    let tail = summing_listener(&total);

    c.bench_function("on_then_off_at_tail_of_128", |b| {
        b.iter(|| {
            metrics.on(tail.clone());
            metrics.off(black_box(&tail));
        })
    });
}

criterion_group!(
    benches,
    benchmark_emit_fan_out,
    benchmark_emit_without_listeners,
    benchmark_once_churn,
    benchmark_off_in_long_sequence
);
criterion_main!(benches);
