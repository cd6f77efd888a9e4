//! Fixed-size-class pool allocation and a pool-backed linked list
//!
//! This crate provides two tightly coupled building blocks:
//!
//! - A pool allocator for a small registry of fixed block sizes, reusing
//!   freed blocks through an intrusive free list instead of returning them
//!   to the heap
//! - A doubly linked [`List`] whose node memory comes from any
//!   [`BlockSource`], with splice, merge, sort, reverse and unique as
//!   pointer-level operations
//!
//! # Example
//!
//! ```
//! use fastpool::List;
//!
//! fn main() -> Result<(), fastpool::AllocError> {
//!     let mut list = List::new();
//!     list.push_back(3)?;
//!     list.push_back(1)?;
//!     list.push_back(2)?;
//!     list.sort();
//!     assert_eq!(list.pop_front(), Some(1));
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod allocator;
pub mod error;
pub mod list;
pub mod utils;

pub use allocator::{BlockSource, FixedAllocator, HeapSource, PoolSource, SizeClassSet, Typed};
pub use error::{AllocError, AllocResult};
pub use list::{CursorMut, List};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
