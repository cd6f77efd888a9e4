//! Allocator and list throughput under pool reuse

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use fastpool::allocator::{BlockSource, FixedAllocator, HeapSource, SizeClassSet};
use fastpool::list::List;
use std::alloc::Layout;

/// One acquire/release cycle: pool free list against the system heap
fn bench_block_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_cycle");
    group.throughput(Throughput::Elements(1));

    group.bench_function("fixed_pool", |b| {
        let allocator = FixedAllocator::new(24, 100_000).unwrap();
        b.iter(|| {
            let block = allocator.acquire_block().unwrap();
            black_box(block);
            unsafe { allocator.release_block(block) };
        });
    });

    group.bench_function("heap", |b| {
        let layout = Layout::from_size_align(24, 8).unwrap();
        b.iter(|| {
            let block = HeapSource.allocate(layout).unwrap();
            black_box(block);
            unsafe { HeapSource.deallocate(block, layout) };
        });
    });

    group.finish();
}

/// Fill-and-drain of a 1000 element list: pooled nodes against heap nodes
fn bench_list_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_churn");
    group.throughput(Throughput::Elements(1000));

    let classes = SizeClassSet::standard();

    group.bench_function("pooled_nodes", |b| {
        b.iter(|| {
            let mut list: List<u64, &SizeClassSet> = List::new_in(&classes);
            for i in 0..1000u64 {
                list.push_back(i).unwrap();
            }
            while let Some(v) = list.pop_front() {
                black_box(v);
            }
        });
    });

    group.bench_function("heap_nodes", |b| {
        b.iter(|| {
            let mut list: List<u64, HeapSource> = List::new_in(HeapSource);
            for i in 0..1000u64 {
                list.push_back(i).unwrap();
            }
            while let Some(v) = list.pop_front() {
                black_box(v);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_block_cycle, bench_list_churn);
criterion_main!(benches);
