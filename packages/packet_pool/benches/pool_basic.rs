//! Basic benchmarks for the `packet_pool` crate.
//!
//! The interesting numbers are the allocation counts: after the pool is
//! built, the steady-state allocate/release cycle must not touch the heap.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use new_zealand::nz;
use packet_pool::PacketPool;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("packet_pool");

    let allocs_op = allocs.operation("build_default");
    group.bench_function("build_default", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(PacketPool::new()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("allocate_release_cycle");
    group.bench_function("allocate_release_cycle", |b| {
        b.iter_custom(|iters| {
            let mut pool = PacketPool::builder().capacity(nz!(16)).build();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut packet = pool.allocate();
                packet.set_len(black_box(64));
                pool.release(black_box(packet));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("drain_refill_16");
    group.bench_function("drain_refill_16", |b| {
        b.iter_custom(|iters| {
            let mut pool = PacketPool::builder().capacity(nz!(16)).build();
            let mut checked_out = Vec::with_capacity(16);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                while !pool.is_exhausted() {
                    checked_out.push(pool.allocate());
                }

                while let Some(packet) = checked_out.pop() {
                    pool.release(packet);
                }
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("try_allocate_exhausted");
    group.bench_function("try_allocate_exhausted", |b| {
        b.iter_custom(|iters| {
            let mut pool = PacketPool::builder().capacity(nz!(1)).build();
            let _held = pool.allocate();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(pool.try_allocate());
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
