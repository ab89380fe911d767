//! In-band block header.
//!
//! Every byte-to-header reinterpretation in the crate goes through this
//! module. The rest of the heap only follows `next` links and reads or
//! writes the three header fields.
//!
//! ```text
//!   ┌──────────────────────┬─────────────────────────────┐
//!   │ Block                │ payload                     │
//!   │  size: N             │                             │
//!   │  next: *mut Block    │      N bytes usable         │
//!   │  free: bool          │                             │
//!   └──────────────────────┴─────────────────────────────┘
//!   ▲                      ▲
//!   header                 header + HEADER_SIZE (returned to callers)
//! ```

use std::ptr;

use crate::config::HEADER_SIZE;

#[repr(C)]
pub struct Block {
  /// Payload bytes, never including the header.
  pub size: usize,
  pub next: *mut Block,
  pub free: bool,
}

impl Block {
  pub fn new(
    size: usize,
    free: bool,
    next: *mut Block,
  ) -> Self {
    Self { size, free, next }
  }

  /// Writes a fresh header at `at` and returns it.
  ///
  /// # Safety
  ///
  /// `at` must be valid for writes of `HEADER_SIZE` bytes and aligned for
  /// `Block`.
  pub unsafe fn write(
    at: *mut u8,
    header: Block,
  ) -> *mut Block {
    let block = at.cast::<Block>();
    unsafe { block.write(header) };
    block
  }

  /// Address of the payload that follows `block`'s header.
  ///
  /// # Safety
  ///
  /// `block` must point at a header written by [`Block::write`].
  #[inline]
  pub unsafe fn payload(block: *mut Block) -> *mut u8 {
    unsafe { block.cast::<u8>().add(HEADER_SIZE) }
  }

  /// Recovers the header from a payload pointer.
  ///
  /// # Safety
  ///
  /// `payload` must have been produced by [`Block::payload`].
  #[inline]
  pub unsafe fn from_payload(payload: *mut u8) -> *mut Block {
    unsafe { payload.sub(HEADER_SIZE) }.cast::<Block>()
  }

  /// First byte past `block`'s payload.
  ///
  /// # Safety
  ///
  /// `block` must point at a live header.
  #[inline]
  pub unsafe fn end(block: *mut Block) -> *mut u8 {
    unsafe { Block::payload(block).add((*block).size) }
  }

  /// Whether `second` starts exactly where `first`'s payload ends.
  ///
  /// # Safety
  ///
  /// Both pointers must point at live headers.
  #[inline]
  pub unsafe fn adjacent(
    first: *mut Block,
    second: *mut Block,
  ) -> bool {
    ptr::eq(unsafe { Block::end(first) }, second.cast::<u8>())
  }
}
