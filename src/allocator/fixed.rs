//! Fixed-size-class allocator
//!
//! # Safety
//!
//! This module implements a growable pool allocator for one block size:
//! - Blocks are carved out of pools, contiguous batches allocated as one
//!   growth step and never returned to the system until drop
//! - Free blocks form a singly-linked intrusive list threaded through the
//!   first machine word of each block
//! - All mutable state lives behind a mutex, so a shared instance (the
//!   process-wide registry) is sound to use from safe code
//!
//! ## Invariants
//!
//! - A block is either on the free list or live payload, never both
//! - The free-list link word is only meaningful while the block is free;
//!   `acquire_block` logically destroys it before handing the block out
//! - Pools keep their creation order and are never shrunk or merged
//! - `free_count` equals the length of the free list

use core::alloc::Layout;
use core::ptr::{self, NonNull};
use std::alloc::{alloc, dealloc};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{AllocError, AllocResult};

/// Alignment of every pool buffer. Block addresses inside a pool are only as
/// aligned as the block size allows; see [`FixedAllocator::block_align`].
const POOL_ALIGN: usize = core::mem::align_of::<usize>();

/// One growth step: a contiguous batch of blocks owned by the allocator.
struct Pool {
    base: NonNull<u8>,
    layout: Layout,
}

/// Mutable allocator state, guarded by the mutex in [`FixedAllocator`].
struct State {
    /// Pools in creation order, never reordered or freed before drop
    pools: Vec<Pool>,
    /// Head of the intrusive free list, null when empty
    free_head: *mut u8,
    /// Number of blocks currently on the free list
    free_count: usize,
    total_acquires: u64,
    total_releases: u64,
    peak_in_use: usize,
}

// SAFETY: State is Send despite the raw pointers.
// - base pointers refer to buffers exclusively owned by this State
// - free_head points into those same buffers or is null
// - No pointer aliases memory owned elsewhere, so moving the State (inside
//   its allocator) to another thread moves the whole ownership graph
unsafe impl Send for State {}

/// Pool allocator for a single block size
///
/// Serves blocks of exactly `block_size` bytes from a growable set of pools.
/// Freed blocks go back on the free list and are reused before any new pool
/// is allocated; pooled memory is only returned to the system when the
/// allocator is dropped.
///
/// # Memory layout
/// ```text
/// pool: [Block0][Block1][Block2]...[BlockN-1]
///          ↓       ↓                   ↓
///       [free] → [free] → ... → [free] → null
/// ```
///
/// The first word of each free block stores the link to the next free block.
pub struct FixedAllocator {
    /// Size of each block in bytes, exactly as requested
    block_size: usize,
    /// Alignment guaranteed for every block this allocator hands out
    block_align: usize,
    /// Blocks added per growth step
    blocks_per_pool: usize,
    /// Layout of one pool buffer
    pool_layout: Layout,
    state: Mutex<State>,
}

/// Point-in-time snapshot of a [`FixedAllocator`]'s counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStats {
    /// Size of each block in bytes
    pub block_size: usize,
    /// Blocks added per growth step
    pub blocks_per_pool: usize,
    /// Pools allocated so far
    pub pool_count: usize,
    /// Blocks currently on the free list
    pub free_blocks: usize,
    /// Blocks currently handed out
    pub in_use_blocks: usize,
    /// Blocks acquired over the allocator's lifetime
    pub total_acquires: u64,
    /// Blocks released over the allocator's lifetime
    pub total_releases: u64,
    /// Highest number of blocks simultaneously in use
    pub peak_in_use: usize,
}

impl FixedAllocator {
    /// Creates an allocator for blocks of `block_size` bytes, growing by
    /// `blocks_per_pool` blocks at a time. No memory is allocated until the
    /// first [`acquire_block`](Self::acquire_block).
    ///
    /// # Errors
    /// Returns an error if:
    /// - `block_size` cannot hold a free-list link
    /// - `blocks_per_pool` is zero
    /// - one pool would overflow `usize`
    pub fn new(block_size: usize, blocks_per_pool: usize) -> AllocResult<Self> {
        if block_size < core::mem::size_of::<*mut u8>() {
            return Err(AllocError::invalid_config(
                "block size too small for free-list link",
            ));
        }
        if blocks_per_pool == 0 {
            return Err(AllocError::invalid_config("pool quantum must be non-zero"));
        }

        let pool_bytes = block_size
            .checked_mul(blocks_per_pool)
            .ok_or(AllocError::invalid_config("pool size overflows usize"))?;
        let pool_layout = Layout::from_size_align(pool_bytes, POOL_ALIGN)
            .map_err(|_| AllocError::invalid_config("pool size overflows usize"))?;

        // Block i sits at base + i * block_size in an 8-aligned buffer, so
        // the alignment every block satisfies is the largest power of two
        // dividing both the stride and the buffer alignment.
        let block_align = (1usize << block_size.trailing_zeros()).min(POOL_ALIGN);

        Ok(Self {
            block_size,
            block_align,
            blocks_per_pool,
            pool_layout,
            state: Mutex::new(State {
                pools: Vec::new(),
                free_head: ptr::null_mut(),
                free_count: 0,
                total_acquires: 0,
                total_releases: 0,
                peak_in_use: 0,
            }),
        })
    }

    /// Returns the size of each block in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the alignment guaranteed for every block
    pub fn block_align(&self) -> usize {
        self.block_align
    }

    /// Returns the number of blocks added per growth step
    pub fn blocks_per_pool(&self) -> usize {
        self.blocks_per_pool
    }

    /// Returns the number of pools allocated so far
    pub fn pool_count(&self) -> usize {
        self.state.lock().pools.len()
    }

    /// Returns the number of blocks currently on the free list
    pub fn free_blocks(&self) -> usize {
        self.state.lock().free_count
    }

    /// Returns the number of blocks currently handed out
    pub fn in_use_blocks(&self) -> usize {
        let state = self.state.lock();
        self.in_use(&state)
    }

    /// Checks whether `ptr` points into memory owned by this allocator
    pub fn contains(&self, ptr: *const u8) -> bool {
        let state = self.state.lock();
        self.pool_of(&state, ptr).is_some()
    }

    /// Returns a snapshot of the allocator's counters
    pub fn stats(&self) -> FixedStats {
        let state = self.state.lock();
        FixedStats {
            block_size: self.block_size,
            blocks_per_pool: self.blocks_per_pool,
            pool_count: state.pools.len(),
            free_blocks: state.free_count,
            in_use_blocks: self.in_use(&state),
            total_acquires: state.total_acquires,
            total_releases: state.total_releases,
            peak_in_use: state.peak_in_use,
        }
    }

    /// Hands out one uninitialized block of exactly `block_size` bytes
    ///
    /// Pops the free-list head, growing by one pool first if the list is
    /// empty. The block's link word must not be read after this call.
    ///
    /// # Errors
    /// Propagates out-of-memory if a new pool cannot be allocated.
    pub fn acquire_block(&self) -> AllocResult<NonNull<u8>> {
        let mut state = self.state.lock();

        if state.free_head.is_null() {
            self.grow(&mut state)?;
        }

        let head = state.free_head;
        // SAFETY: head is non-null (grow succeeded or the list was non-empty)
        // and points to a free block of at least a word, whose first bytes
        // hold the link written by grow() or release_block().
        state.free_head = unsafe { read_link(head) };
        state.free_count -= 1;
        state.total_acquires += 1;
        let in_use = self.in_use(&state);
        if in_use > state.peak_in_use {
            state.peak_in_use = in_use;
        }

        NonNull::new(head).ok_or(AllocError::out_of_memory(self.block_size))
    }

    /// Returns a block to the free list
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - `ptr` was returned by [`acquire_block`](Self::acquire_block) on this
    ///   exact allocator
    /// - `ptr` has not already been released
    /// - No reads or writes through `ptr` happen after this call
    ///
    /// Violations corrupt the free list. Debug builds assert that `ptr` lies
    /// on a block boundary inside one of this allocator's pools; release
    /// builds perform no validation.
    pub unsafe fn release_block(&self, ptr: NonNull<u8>) {
        let mut state = self.state.lock();

        debug_assert!(
            self.block_offset(&state, ptr.as_ptr()).is_some(),
            "block released to the wrong allocator or off a block boundary"
        );

        // SAFETY: per the caller's contract ptr is a live block of
        // block_size >= word bytes owned by this allocator, so its first
        // bytes may be repurposed as the free-list link.
        unsafe { write_link(ptr.as_ptr(), state.free_head) };
        state.free_head = ptr.as_ptr();
        state.free_count += 1;
        state.total_releases += 1;
    }

    fn in_use(&self, state: &State) -> usize {
        state.pools.len() * self.blocks_per_pool - state.free_count
    }

    /// Allocates one pool and links its blocks onto the free list
    fn grow(&self, state: &mut State) -> AllocResult<()> {
        // SAFETY: pool_layout has non-zero size (validated in new: block_size
        // and blocks_per_pool are both non-zero).
        let raw = unsafe { alloc(self.pool_layout) };
        let base =
            NonNull::new(raw).ok_or(AllocError::out_of_memory(self.pool_layout.size()))?;

        // Link the new blocks in address order, the last one picking up the
        // current head (always null today, but grow stays correct if called
        // with a non-empty list).
        let mut prev = state.free_head;
        for i in (0..self.blocks_per_pool).rev() {
            // SAFETY: i * block_size < pool_layout.size(), so the block lies
            // inside the buffer just allocated and has block_size >= word
            // bytes for the link.
            unsafe {
                let block = base.as_ptr().add(i * self.block_size);
                write_link(block, prev);
                prev = block;
            }
        }
        state.free_head = prev;
        state.free_count += self.blocks_per_pool;
        state.pools.push(Pool {
            base,
            layout: self.pool_layout,
        });

        debug!(
            block_size = self.block_size,
            pool_count = state.pools.len(),
            blocks_per_pool = self.blocks_per_pool,
            "fixed allocator grew by one pool"
        );
        Ok(())
    }

    /// Finds the pool containing `ptr`, if any
    fn pool_of<'a>(&self, state: &'a State, ptr: *const u8) -> Option<&'a Pool> {
        let addr = ptr as usize;
        state.pools.iter().find(|pool| {
            let start = pool.base.as_ptr() as usize;
            addr >= start && addr < start + pool.layout.size()
        })
    }

    /// Offset of `ptr` within its pool, if `ptr` is on a block boundary
    fn block_offset(&self, state: &State, ptr: *const u8) -> Option<usize> {
        let pool = self.pool_of(state, ptr)?;
        let offset = ptr as usize - pool.base.as_ptr() as usize;
        if offset % self.block_size == 0 {
            Some(offset)
        } else {
            None
        }
    }
}

impl Drop for FixedAllocator {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for pool in state.pools.drain(..) {
            // SAFETY: base was returned by alloc with exactly this layout and
            // is freed exactly once here.
            unsafe { dealloc(pool.base.as_ptr(), pool.layout) };
        }
    }
}

impl core::fmt::Debug for FixedAllocator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FixedAllocator")
            .field("block_size", &self.block_size)
            .field("block_align", &self.block_align)
            .field("blocks_per_pool", &self.blocks_per_pool)
            .field("pool_count", &state.pools.len())
            .field("free_blocks", &state.free_count)
            .finish()
    }
}

/// Reads the free-list link from the first word of a free block
///
/// # Safety
/// `block` must point to a free block of at least `size_of::<*mut u8>()`
/// bytes whose link word was previously written by [`write_link`].
#[inline]
unsafe fn read_link(block: *const u8) -> *mut u8 {
    // Unaligned access: block sizes such as 12 or 20 put blocks off pointer
    // alignment, so the link word cannot be read as an aligned *mut u8.
    unsafe { block.cast::<*mut u8>().read_unaligned() }
}

/// Writes the free-list link into the first word of a free block
///
/// # Safety
/// `block` must point to writable memory of at least `size_of::<*mut u8>()`
/// bytes holding no live payload.
#[inline]
unsafe fn write_link(block: *mut u8, next: *mut u8) {
    unsafe { block.cast::<*mut u8>().write_unaligned(next) };
}
