//! Sources of fresh memory regions for the heap.
//!
//! [`Mmap`] asks the kernel for anonymous private mappings. [`BumpPages`]
//! carves regions out of one buffer reserved up front, which makes region
//! addresses predictable and lets tests count provider calls.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE, mmap};
use log::debug;

use crate::align::align_up;
use crate::config::PAGE_SIZE;

/// A capability that hands out fresh memory regions and never takes them back.
///
/// # Safety
///
/// A region returned by `map(len)` must be at least `len` bytes long,
/// zero-initialized, readable and writable, aligned to at least
/// [`ALIGNMENT`](crate::config::ALIGNMENT), disjoint from every other region
/// the provider has returned, and valid for as long as the provider lives.
pub unsafe trait PageProvider {
  /// Returns a region of `len` bytes, or `None` when memory is exhausted.
  fn map(
    &mut self,
    len: usize,
  ) -> Option<NonNull<u8>>;
}

/// Anonymous `mmap(2)` regions. Mappings are never unmapped.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mmap;

unsafe impl PageProvider for Mmap {
  fn map(
    &mut self,
    len: usize,
  ) -> Option<NonNull<u8>> {
    let address = unsafe {
      mmap(
        ptr::null_mut(),
        len,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if address == MAP_FAILED {
      debug!("mmap of {len} bytes failed");
      return None;
    }

    NonNull::new(address.cast::<u8>())
  }
}

/// Deterministic provider over a single zeroed, page-aligned reservation.
///
/// Regions are handed out back to back, each rounded up to the allocator
/// alignment, so two consecutive requests are physically contiguous. Once
/// the reservation is used up every request fails. The reservation is freed
/// when the provider is dropped, which invalidates every region it produced.
pub struct BumpPages {
  base: NonNull<u8>,
  capacity: usize,
  offset: usize,
  requests: usize,
}

impl BumpPages {
  /// Reserves `capacity` bytes (rounded up to the alignment).
  ///
  /// # Panics
  ///
  /// Panics if `capacity` is zero or the reservation itself cannot be made.
  pub fn with_capacity(capacity: usize) -> Self {
    assert!(capacity > 0, "BumpPages needs a non-zero capacity");

    let layout = Self::layout(capacity);
    let base = unsafe { alloc::alloc_zeroed(layout) };
    let Some(base) = NonNull::new(base) else {
      alloc::handle_alloc_error(layout);
    };

    Self {
      base,
      capacity: layout.size(),
      offset: 0,
      requests: 0,
    }
  }

  /// Number of `map` calls so far, failed ones included.
  pub fn requests(&self) -> usize {
    self.requests
  }

  /// Bytes handed out so far.
  pub fn used(&self) -> usize {
    self.offset
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Start of the reservation; the first region always begins here.
  pub fn base(&self) -> *const u8 {
    self.base.as_ptr()
  }

  fn layout(capacity: usize) -> Layout {
    let size = align_up(capacity).expect("BumpPages capacity overflows");
    Layout::from_size_align(size, PAGE_SIZE).expect("BumpPages capacity overflows")
  }
}

unsafe impl PageProvider for BumpPages {
  fn map(
    &mut self,
    len: usize,
  ) -> Option<NonNull<u8>> {
    self.requests += 1;

    let len = align_up(len)?;
    let end = self.offset.checked_add(len)?;
    if len == 0 || end > self.capacity {
      debug!(
        "bump provider exhausted: {len} bytes requested, {} of {} left",
        self.capacity - self.offset,
        self.capacity
      );
      return None;
    }

    let region = unsafe { self.base.add(self.offset) };
    self.offset = end;
    Some(region)
  }
}

impl Drop for BumpPages {
  fn drop(&mut self) {
    unsafe { alloc::dealloc(self.base.as_ptr(), Self::layout(self.capacity)) };
  }
}
