//! Typed allocation adapter
//!
//! [`Typed<T, S>`] turns a raw [`BlockSource`] into a per-element-type
//! facade: allocate and free arrays of `T`, construct and destroy values in
//! place, and retarget the same source to a different element type. The
//! container uses retargeting to allocate its node type through whatever
//! source the caller supplied for the element type.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;

use super::source::{BlockSource, PoolSource};
use crate::error::{AllocError, AllocResult};

/// Per-type allocation facade over a [`BlockSource`]
///
/// Stateless beyond the source it wraps; every instance over an
/// interchangeable source is itself interchangeable.
pub struct Typed<T, S: BlockSource = PoolSource> {
    source: S,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Typed<T, PoolSource> {
    /// Creates an adapter over the process-wide pool registry
    pub fn new() -> Self {
        Self::new_in(PoolSource)
    }
}

impl<T> Default for Typed<T, PoolSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: BlockSource> Typed<T, S> {
    /// Creates an adapter over an explicit source
    pub fn new_in(source: S) -> Self {
        Self {
            source,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Largest element count [`allocate`](Self::allocate) can address
    pub fn max_size(&self) -> usize {
        let size = core::mem::size_of::<T>();
        if size == 0 {
            usize::MAX
        } else {
            (isize::MAX as usize) / size
        }
    }

    /// Allocates uninitialized storage for `count` values of `T`
    ///
    /// Zero-sized requests (ZST element or `count == 0`) succeed without
    /// touching the source.
    ///
    /// # Errors
    /// Returns [`AllocError::ExceedsMax`] when `count` overflows the
    /// addressable range, or propagates out-of-memory from the source.
    pub fn allocate(&self, count: usize) -> AllocResult<NonNull<T>> {
        if count > self.max_size() {
            return Err(AllocError::exceeds_max(count, self.max_size()));
        }
        let layout = Layout::array::<T>(count)
            .map_err(|_| AllocError::exceeds_max(count, self.max_size()))?;
        Ok(self.source.allocate(layout)?.cast())
    }

    /// Frees storage for `count` values of `T`
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - `ptr` was returned by [`allocate`](Self::allocate) with the same
    ///   `count` on this source (or an interchangeable one)
    /// - All values in the storage have already been destroyed
    /// - `ptr` is not used after this call
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        // allocate succeeded with this count, so the layout is valid.
        let Ok(layout) = Layout::array::<T>(count) else {
            return;
        };
        // SAFETY: forwarded contract, same layout as on allocation.
        unsafe { self.source.deallocate(ptr.cast(), layout) };
    }

    /// Moves `value` into uninitialized storage at `ptr`
    ///
    /// # Safety
    /// `ptr` must be valid for writes of `T` and hold no live value.
    pub unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: per the caller's contract the slot is writable and vacant.
        unsafe { ptr.as_ptr().write(value) };
    }

    /// Drops the value at `ptr` in place without releasing its storage
    ///
    /// # Safety
    /// `ptr` must point to a live, initialized `T` that is not used again.
    pub unsafe fn destroy(&self, ptr: NonNull<T>) {
        // SAFETY: per the caller's contract the slot holds a live value.
        unsafe { ptr.as_ptr().drop_in_place() };
    }

    /// Produces an adapter for element type `U` over the same source
    pub fn retarget<U>(&self) -> Typed<U, S>
    where
        S: Clone,
    {
        Typed {
            source: self.source.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S: BlockSource + Clone> Clone for Typed<T, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S: BlockSource + core::fmt::Debug> core::fmt::Debug for Typed<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Typed").field("source", &self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::classes::SizeClassSet;
    use crate::allocator::source::HeapSource;

    #[test]
    fn construct_destroy_round_trip() {
        let typed: Typed<String, HeapSource> = Typed::new_in(HeapSource);
        let ptr = typed.allocate(1).expect("allocation");
        unsafe {
            typed.construct(ptr, String::from("pooled"));
            assert_eq!(ptr.as_ref(), "pooled");
            typed.destroy(ptr);
            typed.deallocate(ptr, 1);
        }
    }

    #[test]
    fn registered_size_draws_from_pool() {
        let set = SizeClassSet::new(&[16], 8).expect("valid set");
        let typed: Typed<[u64; 2], &SizeClassSet> = Typed::new_in(&set);

        let ptr = typed.allocate(1).expect("pool allocation");
        assert!(set.classes()[0].contains(ptr.as_ptr().cast()));
        unsafe { typed.deallocate(ptr, 1) };
        assert_eq!(set.classes()[0].in_use_blocks(), 0);
    }

    #[test]
    fn array_requests_bypass_pools() {
        let set = SizeClassSet::new(&[16], 8).expect("valid set");
        let typed: Typed<u64, &SizeClassSet> = Typed::new_in(&set);

        // 4 * 8 = 32 bytes, not a registered class.
        let ptr = typed.allocate(4).expect("heap fallback");
        assert!(!set.classes()[0].contains(ptr.as_ptr().cast()));
        unsafe { typed.deallocate(ptr, 4) };
    }

    #[test]
    fn retarget_shares_the_source() {
        let set = SizeClassSet::new(&[16, 24], 8).expect("valid set");
        let for_u32: Typed<u32, &SizeClassSet> = Typed::new_in(&set);
        let for_pair = for_u32.retarget::<[u64; 3]>();

        // 24 bytes, registered in the same set.
        let ptr = for_pair.allocate(1).expect("pool allocation");
        let class = set
            .lookup(Layout::new::<[u64; 3]>())
            .expect("registered size");
        assert!(class.contains(ptr.as_ptr().cast()));
        unsafe { for_pair.deallocate(ptr, 1) };
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let typed: Typed<u64, HeapSource> = Typed::new_in(HeapSource);
        let err = typed.allocate(usize::MAX).unwrap_err();
        assert!(matches!(err, AllocError::ExceedsMax { .. }));
    }

    #[test]
    fn zero_count_allocates_nothing() {
        let typed: Typed<u64, HeapSource> = Typed::new_in(HeapSource);
        let ptr = typed.allocate(0).expect("zero-sized allocation");
        unsafe { typed.deallocate(ptr, 0) };
    }
}
