//! Pool lifecycle under sustained acquire/release load

use std::alloc::Layout;

use fastpool::allocator::{
    BlockSource, FixedAllocator, SizeClassSet, STANDARD_BLOCKS_PER_POOL, STANDARD_CLASS_SIZES,
};

fn layout_20() -> Layout {
    Layout::from_size_align(20, 4).expect("valid layout")
}

#[test]
fn interleaved_cycles_stay_in_one_pool() {
    let set =
        SizeClassSet::new(&STANDARD_CLASS_SIZES, STANDARD_BLOCKS_PER_POOL).expect("valid set");
    let layout = layout_20();
    let class = set.lookup(layout).expect("size 20 is registered");

    // Push two, pop one: net growth of one block per two iterations, with
    // constant churn through the free list.
    let mut held = Vec::new();
    for i in 0..100_000 {
        held.push(set.allocate(layout).expect("pool allocation"));
        if i % 2 == 1 {
            let ptr = held.swap_remove(held.len() / 2);
            unsafe { set.deallocate(ptr, layout) };
        }
    }

    assert_eq!(class.pool_count(), 1, "free blocks were reused, not leaked");
    assert_eq!(class.in_use_blocks(), held.len());

    for ptr in held.drain(..) {
        unsafe { set.deallocate(ptr, layout) };
    }
    assert_eq!(class.in_use_blocks(), 0);
    assert_eq!(class.free_blocks(), STANDARD_BLOCKS_PER_POOL);
}

#[test]
fn full_drain_and_refill_reuses_the_pool() {
    let set =
        SizeClassSet::new(&STANDARD_CLASS_SIZES, STANDARD_BLOCKS_PER_POOL).expect("valid set");
    let layout = layout_20();
    let class = set.lookup(layout).expect("size 20 is registered");

    for _ in 0..2 {
        let mut held = Vec::with_capacity(STANDARD_BLOCKS_PER_POOL);
        for _ in 0..STANDARD_BLOCKS_PER_POOL {
            held.push(set.allocate(layout).expect("pool allocation"));
        }
        for ptr in held.drain(..) {
            unsafe { set.deallocate(ptr, layout) };
        }
    }

    assert_eq!(
        class.pool_count(),
        1,
        "a full drain-and-refill cycle must not allocate a second pool"
    );
    assert_eq!(class.stats().total_acquires, 2 * STANDARD_BLOCKS_PER_POOL as u64);
}

#[test]
fn released_addresses_come_back() {
    let alloc = FixedAllocator::new(20, 64).expect("valid config");

    let first = alloc.acquire_block().expect("acquire");
    unsafe { alloc.release_block(first) };

    for _ in 0..1000 {
        let block = alloc.acquire_block().expect("acquire");
        assert_eq!(block, first, "the free list head cycles through reuse");
        unsafe { alloc.release_block(block) };
    }
    assert_eq!(alloc.pool_count(), 1);
}

#[test]
fn growth_is_demand_driven() {
    let alloc = FixedAllocator::new(24, 16).expect("valid config");
    let mut held = Vec::new();

    for expected_pools in 1..=4 {
        for _ in 0..16 {
            held.push(alloc.acquire_block().expect("acquire"));
        }
        assert_eq!(alloc.pool_count(), expected_pools);
    }

    // Release everything; the pools stay with the allocator.
    for block in held.drain(..) {
        unsafe { alloc.release_block(block) };
    }
    assert_eq!(alloc.pool_count(), 4);
    assert_eq!(alloc.free_blocks(), 64);
}
