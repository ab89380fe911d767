use log::trace;

use crate::block::Block;
use crate::config::HEADER_SIZE;

/// Merges every run of free, physically contiguous neighbours in the chain
/// into its first block. Returns how many headers were absorbed.
///
/// # Safety
///
/// `head` must be null or the head of a well-formed, address-sorted chain.
pub unsafe fn coalesce(head: *mut Block) -> usize {
  let mut merged = 0;

  unsafe {
    let mut current = head;

    while !current.is_null() && !(*current).next.is_null() {
      let next = (*current).next;

      if (*current).free && (*next).free && Block::adjacent(current, next) {
        (*current).size += HEADER_SIZE + (*next).size;
        (*current).next = (*next).next;
        merged += 1;
        trace!("merged {next:p} into {current:p}, now {} bytes", (*current).size);
      } else {
        current = next;
      }
    }
  }

  merged
}
