//! Address-ordered block chain: first-fit search and sorted insertion.
//!
//! The chain links every block the heap has produced, used and free alike,
//! in ascending header address. Searching skips used blocks by their flag.

use std::ptr;

use crate::block::Block;

/// First-fit scan: the lowest-addressed free block holding at least `size`
/// payload bytes, or null.
///
/// # Safety
///
/// `head` must be null or the head of a well-formed chain.
pub unsafe fn find_free(
  head: *mut Block,
  size: usize,
) -> *mut Block {
  unsafe {
    let mut current = head;

    while !current.is_null() {
      if (*current).free && (*current).size >= size {
        return current;
      }
      current = (*current).next;
    }

    ptr::null_mut()
  }
}

/// Links `block` into the chain rooted at `*head` so the chain stays sorted by
/// address. A block that is already linked is left where it is.
///
/// # Safety
///
/// `*head` must be null or the head of a well-formed chain, and `block` must
/// point at a live header that does not overlap any other chained block.
pub unsafe fn insert(
  head: &mut *mut Block,
  block: *mut Block,
) {
  unsafe {
    if head.is_null() || block < *head {
      (*block).next = *head;
      *head = block;
      return;
    }

    let mut current = *head;
    while !(*current).next.is_null() && (*current).next < block {
      current = (*current).next;
    }

    if current == block || (*current).next == block {
      return;
    }

    (*block).next = (*current).next;
    (*current).next = block;
  }
}

/// Iterates the chain from `head` in address order.
///
/// # Safety
///
/// The chain must stay well-formed and unmodified while the iterator is used.
#[cfg(test)]
pub unsafe fn walk(head: *mut Block) -> impl Iterator<Item = *mut Block> {
  let mut current = head;
  std::iter::from_fn(move || {
    if current.is_null() {
      return None;
    }
    let block = current;
    current = unsafe { (*block).next };
    Some(block)
  })
}
