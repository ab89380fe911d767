//! Compile-time tunables shared by every part of the heap.

use std::mem;

use crate::{align, block::Block};

/// Every payload size and payload address is a multiple of this.
pub const ALIGNMENT: usize = 8;

/// Smallest payload a split remainder may have. A free block is only split
/// when the leftover can hold a header plus this many bytes.
pub const MIN_BLOCK_SIZE: usize = 16;

/// Bytes occupied by a block header, padded to [`ALIGNMENT`].
pub const HEADER_SIZE: usize = align!(mem::size_of::<Block>());

/// Alignment of the buffer reserved by [`BumpPages`](crate::provider::BumpPages).
pub const PAGE_SIZE: usize = 4096;

const _: () = assert!(ALIGNMENT.is_power_of_two());
const _: () = assert!(mem::align_of::<Block>() <= ALIGNMENT);
const _: () = assert!(MIN_BLOCK_SIZE % ALIGNMENT == 0);
