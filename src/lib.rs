//! # mapalloc - A First-Fit Block Allocator over `mmap`
//!
//! This crate provides a small **free-list allocator**: a [`Heap`] hands out
//! blocks of memory carved from regions obtained with `mmap(2)`, and takes them
//! back for reuse.
//!
//! ## Overview
//!
//! Every region the heap obtains starts with a block header. All headers are
//! linked into one chain sorted by address:
//!
//! ```text
//!   Block chain:
//!
//!   head
//!    │
//!    ▼
//!   ┌────────┬──────────┐   ┌────────┬───────┐   ┌────────┬──────────────┐
//!   │ header │ used     │──▶│ header │ free  │──▶│ header │ used         │──▶ null
//!   └────────┴──────────┘   └────────┴───────┘   └────────┴──────────────┘
//!   lower addresses ────────────────────────────────────────▶ higher addresses
//! ```
//!
//! - **Acquire** scans the chain for the first free block that fits. A block
//!   with enough spare room is split, and the tail becomes a new free block.
//!   When nothing fits, one fresh region of `size + HEADER_SIZE` bytes is
//!   requested from the page provider.
//! - **Release** marks the block free and merges it with physically adjacent
//!   free neighbours.
//!
//! Memory is never returned to the operating system.
//!
//! ## Crate Structure
//!
//! ```text
//!   mapalloc
//!   ├── align      - Alignment macro and checked rounding
//!   ├── config     - ALIGNMENT, MIN_BLOCK_SIZE, HEADER_SIZE
//!   ├── block      - Block header layout (internal)
//!   ├── free_list  - First-fit search and sorted insertion (internal)
//!   ├── split      - Block splitting (internal)
//!   ├── coalesce   - Merging adjacent free blocks (internal)
//!   ├── provider   - PageProvider, Mmap, BumpPages
//!   ├── error      - AllocError
//!   └── heap       - Heap, HeapStats, BlockInfo
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mapalloc::Heap;
//!
//! let mut heap = Heap::new();
//!
//! let ptr = heap.acquire(64) as *mut u64;
//! assert!(!ptr.is_null());
//!
//! unsafe {
//!     ptr.write(42);
//!     assert_eq!(ptr.read(), 42);
//!
//!     heap.release(ptr as *mut u8);
//! }
//!
//! // The same block comes back for a request of the same size.
//! assert_eq!(heap.acquire(64) as *mut u64, ptr);
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Heap` is neither `Send` nor `Sync`
//! - **No validation**: releasing a foreign pointer or releasing twice is
//!   undefined behaviour
//! - **One region per miss**: small requests are not batched into shared
//!   regions
//! - **Unix-only**: the default provider requires `libc` and `mmap`

pub mod align;
mod block;
mod coalesce;
pub mod config;
pub mod error;
mod free_list;
mod heap;
pub mod provider;
mod split;

pub use error::AllocError;
pub use heap::{BlockInfo, Blocks, Heap, HeapStats};
pub use provider::{BumpPages, Mmap, PageProvider};
