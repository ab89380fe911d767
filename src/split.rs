use std::ptr;

use log::trace;

use crate::block::Block;
use crate::config::{HEADER_SIZE, MIN_BLOCK_SIZE};

/// Trims a just-claimed `block` down to `size` payload bytes, turning the
/// tail into a free block linked right after it. Returns the remainder, or
/// null when the tail is too small to hold a header plus
/// [`MIN_BLOCK_SIZE`] bytes and the block is handed out whole.
///
/// # Safety
///
/// `block` must point at a live, chained header with `size <= block.size`,
/// and `size` must be a multiple of the alignment.
pub unsafe fn split(
  block: *mut Block,
  size: usize,
) -> *mut Block {
  unsafe {
    let available = (*block).size;
    if available < size + HEADER_SIZE + MIN_BLOCK_SIZE {
      return ptr::null_mut();
    }

    let remainder = Block::write(
      Block::payload(block).add(size),
      Block::new(available - size - HEADER_SIZE, true, (*block).next),
    );

    (*block).size = size;
    (*block).next = remainder;

    trace!(
      "split {block:p}: {available} -> {size} + {} free at {remainder:p}",
      (*remainder).size
    );

    remainder
  }
}
