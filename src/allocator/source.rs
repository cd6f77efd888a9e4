//! Raw block sources
//!
//! [`BlockSource`] is the seam between the typed adapter and the memory that
//! backs it: registered sizes come from the size-class pools, everything else
//! from the system heap. Sources are cheap values; the container embeds one
//! by composition.

use core::alloc::Layout;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc};

use super::classes::SizeClassSet;
use crate::error::{AllocError, AllocResult};

/// Supplier of raw memory blocks described by a [`Layout`]
pub trait BlockSource {
    /// Allocates a block of `layout.size()` bytes, uninitialized
    ///
    /// Zero-sized layouts succeed with a dangling, well-aligned pointer.
    ///
    /// # Errors
    /// Propagates out-of-memory from the backing pool or heap.
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>>;

    /// Returns a block obtained from [`allocate`](Self::allocate)
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - `ptr` was returned by `allocate` on this source with this exact
    ///   `layout`
    /// - `ptr` has not already been deallocated
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

impl<S: BlockSource + ?Sized> BlockSource for &S {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract, same source.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// System-heap source
///
/// Every request goes straight to the global allocator; nothing is pooled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapSource;

impl BlockSource for HeapSource {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        if layout.size() == 0 {
            // Well-aligned dangling pointer, never dereferenced
            return Ok(dangling_for(layout));
        }

        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc(layout) };
        NonNull::new(raw).ok_or(AllocError::out_of_memory(layout.size()))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        // SAFETY: ptr came from alloc with this layout (caller's contract).
        unsafe { dealloc(ptr.as_ptr(), layout) };
    }
}

/// Pool-backed source routing through the process-wide registry
///
/// Registered sizes draw from [`SizeClassSet::global`]; any other size falls
/// back to the heap. All instances are interchangeable, so nodes allocated
/// through one `PoolSource` may be freed through another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSource;

impl BlockSource for PoolSource {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        SizeClassSet::global().allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract; the global set routes by layout exactly
        // as it did on allocation.
        unsafe { SizeClassSet::global().deallocate(ptr, layout) }
    }
}

impl BlockSource for SizeClassSet {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        match self.lookup(layout) {
            Some(class) => class.acquire_block(),
            None => HeapSource.allocate(layout),
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        match self.lookup(layout) {
            // SAFETY: lookup is deterministic in the layout, so this is the
            // class that served the allocation (caller's contract).
            Some(class) => unsafe { class.release_block(ptr) },
            // SAFETY: the allocation missed the registry and came from the
            // heap with this layout.
            None => unsafe { HeapSource.deallocate(ptr, layout) },
        }
    }
}

fn dangling_for(layout: Layout) -> NonNull<u8> {
    // Layout alignments are non-zero powers of two.
    let addr = layout.align();
    NonNull::new(addr as *mut u8).unwrap_or(NonNull::dangling())
}
