//! Ticket queue benchmarks: uncontended acquisition and chained hand-off.

use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};
use turnstile_core::TicketQueue;

fn bench_uncontended(c: &mut Criterion) {
    let queue = TicketQueue::new();
    c.bench_function("ticket_acquire_release_uncontended", |b| {
        b.iter(|| drop(queue.acquire()));
    });
}

fn bench_handoff_pair(c: &mut Criterion) {
    c.bench_function("ticket_handoff_two_threads", |b| {
        b.iter(|| {
            let queue = Arc::new(TicketQueue::new());
            let held = queue.acquire();
            let waiter = {
                let queue = Arc::clone(&queue);
                thread::spawn(move || drop(queue.acquire()))
            };
            drop(held);
            waiter.join().expect("waiter panicked");
        });
    });
}

criterion_group!(benches, bench_uncontended, bench_handoff_pair);
criterion_main!(benches);
