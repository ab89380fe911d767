use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use log::{debug, trace};

use crate::align::align_up;
use crate::block::Block;
use crate::coalesce::coalesce;
use crate::config::HEADER_SIZE;
use crate::error::AllocError;
use crate::free_list;
use crate::provider::{Mmap, PageProvider};
use crate::split::split;

/// A first-fit heap over regions obtained from a [`PageProvider`].
///
/// Every block the heap has produced sits in one chain sorted by address.
/// Acquiring reuses the first free block that fits (splitting off the tail
/// when worthwhile) and only asks the provider for a new region on a miss.
/// Releasing marks the block free and merges it with free neighbours.
/// Memory is never handed back to the provider.
///
/// A `Heap` is neither `Send` nor `Sync`.
pub struct Heap<P: PageProvider = Mmap> {
  provider: P,
  head: *mut Block,
  first_region: *mut Block,
  mapped_bytes: usize,
  region_requests: usize,
}

/// Counters describing a [`Heap`] at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
  /// Bytes requested from the provider, headers included.
  pub mapped_bytes: usize,
  /// Successful provider requests.
  pub region_requests: usize,
  pub blocks: usize,
  pub free_blocks: usize,
  /// Payload bytes in free blocks.
  pub free_bytes: usize,
}

/// A snapshot of one block in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  /// Payload address, as returned by [`Heap::acquire`].
  pub addr: *mut u8,
  pub size: usize,
  pub free: bool,
}

impl Heap<Mmap> {
  pub const fn new() -> Self {
    Self::with_provider(Mmap)
  }
}

impl Default for Heap<Mmap> {
  fn default() -> Self {
    Self::new()
  }
}

impl<P: PageProvider> Heap<P> {
  pub const fn with_provider(provider: P) -> Self {
    Self {
      provider,
      head: ptr::null_mut(),
      first_region: ptr::null_mut(),
      mapped_bytes: 0,
      region_requests: 0,
    }
  }

  pub fn provider(&self) -> &P {
    &self.provider
  }

  /// Returns at least `size` usable bytes aligned to 8, or null when `size` is
  /// zero or no memory is available.
  pub fn acquire(
    &mut self,
    size: usize,
  ) -> *mut u8 {
    self
      .try_acquire(size)
      .map_or(ptr::null_mut(), NonNull::as_ptr)
  }

  /// Like [`acquire`](Self::acquire), but says why it failed.
  pub fn try_acquire(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
      return Err(AllocError::ZeroSize);
    }

    let aligned = align_up(size).ok_or(AllocError::OutOfMemory { requested: size })?;

    unsafe {
      let found = free_list::find_free(self.head, aligned);
      let block = if found.is_null() {
        self.request_region(aligned)?
      } else {
        (*found).free = false;
        split(found, aligned);
        trace!("reusing {found:p} ({} bytes) for {size}", (*found).size);
        found
      };

      Ok(NonNull::new_unchecked(Block::payload(block)))
    }
  }

  /// Gives the block behind `ptr` back to the heap. Null is ignored.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a pointer returned by this heap's
  /// [`acquire`](Self::acquire) that has not been released since.
  pub unsafe fn release(
    &mut self,
    ptr: *mut u8,
  ) {
    if ptr.is_null() {
      return;
    }

    unsafe {
      let block = Block::from_payload(ptr);
      (*block).free = true;
      trace!("released {block:p} ({} bytes)", (*block).size);

      free_list::insert(&mut self.head, block);
      coalesce(self.head);
    }
  }

  /// Walks the chain in address order.
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks {
      current: self.head,
      _heap: PhantomData,
    }
  }

  pub fn stats(&self) -> HeapStats {
    let mut stats = HeapStats {
      mapped_bytes: self.mapped_bytes,
      region_requests: self.region_requests,
      ..HeapStats::default()
    };

    for block in self.blocks() {
      stats.blocks += 1;
      if block.free {
        stats.free_blocks += 1;
        stats.free_bytes += block.size;
      }
    }

    stats
  }

  /// Payload address of the first block this heap ever created.
  pub fn first_region(&self) -> Option<NonNull<u8>> {
    if self.first_region.is_null() {
      return None;
    }
    NonNull::new(unsafe { Block::payload(self.first_region) })
  }

  /// Maps a region for one used block of `size` payload bytes and chains it.
  fn request_region(
    &mut self,
    size: usize,
  ) -> Result<*mut Block, AllocError> {
    let total = size
      .checked_add(HEADER_SIZE)
      .ok_or(AllocError::OutOfMemory { requested: size })?;

    let Some(region) = self.provider.map(total) else {
      debug!("no region for {size} bytes");
      return Err(AllocError::OutOfMemory { requested: size });
    };

    unsafe {
      let block = Block::write(region.as_ptr(), Block::new(size, false, ptr::null_mut()));

      if self.first_region.is_null() {
        self.first_region = block;
      }
      self.mapped_bytes += total;
      self.region_requests += 1;

      free_list::insert(&mut self.head, block);
      debug!("mapped {total} bytes at {block:p} for {size} bytes");

      Ok(block)
    }
  }
}

/// Iterator over a heap's blocks, see [`Heap::blocks`].
pub struct Blocks<'a> {
  current: *mut Block,
  _heap: PhantomData<&'a ()>,
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<BlockInfo> {
    if self.current.is_null() {
      return None;
    }

    unsafe {
      let block = self.current;
      self.current = (*block).next;
      Some(BlockInfo {
        addr: Block::payload(block),
        size: (*block).size,
        free: (*block).free,
      })
    }
  }
}
