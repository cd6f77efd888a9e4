//! Fixed-size-class pool allocation
//!
//! Layered bottom-up:
//! - [`fixed`]: one size class, growable pools and an intrusive free list
//! - [`classes`]: the immutable size-class registry and its process default
//! - [`source`]: the raw [`BlockSource`] seam, pools with heap fallback
//! - [`typed`]: the per-element-type facade the container allocates through

pub mod classes;
pub mod fixed;
pub mod source;
pub mod typed;

pub use classes::{STANDARD_BLOCKS_PER_POOL, STANDARD_CLASS_SIZES, SizeClassSet};
pub use fixed::{FixedAllocator, FixedStats};
pub use source::{BlockSource, HeapSource, PoolSource};
pub use typed::Typed;
