//! Size-class registry
//!
//! Routes allocation requests to the [`FixedAllocator`] responsible for a
//! registered byte size. The set is immutable after construction; the
//! process-wide default is initialized once through [`SizeClassSet::global`].

use core::alloc::Layout;
use std::sync::OnceLock;

use tracing::debug;

use super::fixed::FixedAllocator;
use crate::error::{AllocError, AllocResult};

/// Byte sizes served by the standard registry
pub const STANDARD_CLASS_SIZES: [usize; 4] = [12, 16, 20, 24];

/// Blocks added per pool growth step in the standard registry
pub const STANDARD_BLOCKS_PER_POOL: usize = 100_000;

static GLOBAL_CLASSES: OnceLock<SizeClassSet> = OnceLock::new();

/// Immutable set of size classes
///
/// Each registered byte size owns one [`FixedAllocator`]; sizes outside the
/// set are reported as no match and callers fall back to the heap. A set can
/// be constructed explicitly and passed around, or shared process-wide via
/// [`global`](Self::global).
#[derive(Debug)]
pub struct SizeClassSet {
    /// Classes sorted by block size, duplicates rejected at construction
    classes: Vec<FixedAllocator>,
}

impl SizeClassSet {
    /// Creates a set serving exactly `sizes`, each growing by
    /// `blocks_per_pool` blocks at a time
    ///
    /// # Errors
    /// Returns an error if `sizes` contains a duplicate or any size is
    /// rejected by [`FixedAllocator::new`].
    pub fn new(sizes: &[usize], blocks_per_pool: usize) -> AllocResult<Self> {
        let mut sorted = sizes.to_vec();
        sorted.sort_unstable();
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(AllocError::invalid_config("duplicate size class"));
        }

        let classes = sorted
            .into_iter()
            .map(|size| FixedAllocator::new(size, blocks_per_pool))
            .collect::<AllocResult<Vec<_>>>()?;
        Ok(Self { classes })
    }

    /// Creates the standard set: sizes 12, 16, 20 and 24 bytes, 100 000
    /// blocks per pool
    pub fn standard() -> Self {
        match Self::new(&STANDARD_CLASS_SIZES, STANDARD_BLOCKS_PER_POOL) {
            Ok(set) => set,
            // Standard sizes are validated by construction
            Err(_) => unreachable!("standard size classes are valid"),
        }
    }

    /// Returns the process-wide set, initializing it on first use
    ///
    /// First call wins; every caller observes the same standard set for the
    /// rest of the process lifetime.
    pub fn global() -> &'static SizeClassSet {
        GLOBAL_CLASSES.get_or_init(|| {
            debug!(
                sizes = ?STANDARD_CLASS_SIZES,
                blocks_per_pool = STANDARD_BLOCKS_PER_POOL,
                "initialized global size-class registry"
            );
            Self::standard()
        })
    }

    /// Finds the class serving `layout`, or `None` if the size is not
    /// registered or the class cannot guarantee the requested alignment
    pub fn lookup(&self, layout: Layout) -> Option<&FixedAllocator> {
        self.classes
            .iter()
            .find(|class| class.block_size() == layout.size())
            .filter(|class| layout.align() <= class.block_align())
    }

    /// Returns the registered classes in ascending size order
    pub fn classes(&self) -> &[FixedAllocator] {
        &self.classes
    }
}

impl Default for SizeClassSet {
    fn default() -> Self {
        Self::standard()
    }
}
