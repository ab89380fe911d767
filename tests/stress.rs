//! Churn tests with fill-pattern corruption detection.
//!
//! Live allocations are filled with a pattern derived from their address and
//! size and verified before release. Overlapping blocks, bad splits or bad
//! merges show up as pattern mismatches. After every release the chain is
//! checked for free neighbours that should have been merged.

use mapalloc::config::{ALIGNMENT, HEADER_SIZE, PAGE_SIZE};
use mapalloc::{BumpPages, Heap, PageProvider};

/// Fill a buffer with a deterministic pattern derived from its address and size.
fn fill_pattern(
  ptr: *mut u8,
  size: usize,
) {
  let seed = ptr as usize ^ size;
  for i in 0..size {
    unsafe {
      *ptr.add(i) = ((seed.wrapping_add(i).wrapping_mul(0x9E37_79B9)) & 0xFF) as u8;
    }
  }
}

/// Verify the fill pattern. Returns true if intact.
fn check_pattern(
  ptr: *mut u8,
  size: usize,
) -> bool {
  let seed = ptr as usize ^ size;
  for i in 0..size {
    let expected = ((seed.wrapping_add(i).wrapping_mul(0x9E37_79B9)) & 0xFF) as u8;
    if unsafe { *ptr.add(i) } != expected {
      return false;
    }
  }
  true
}

/// No two chain neighbours that touch in memory may both be free.
fn assert_coalesced<P: PageProvider>(heap: &Heap<P>) {
  let blocks: Vec<_> = heap.blocks().collect();
  for pair in blocks.windows(2) {
    let (first, second) = (pair[0], pair[1]);
    assert!(first.addr < second.addr, "chain out of order");

    let touching = first.addr as usize + first.size + HEADER_SIZE == second.addr as usize;
    assert!(
      !(touching && first.free && second.free),
      "unmerged free neighbours at {:?} and {:?}",
      first.addr,
      second.addr
    );
  }
}

/// Small xorshift generator so runs are reproducible.
struct Rng(u64);

impl Rng {
  fn next(&mut self) -> u64 {
    self.0 ^= self.0 << 13;
    self.0 ^= self.0 >> 7;
    self.0 ^= self.0 << 17;
    self.0
  }

  fn below(
    &mut self,
    bound: usize,
  ) -> usize {
    (self.next() % bound as u64) as usize
  }
}

#[test]
fn stress_fill_pattern_batches() {
  let mut heap = Heap::with_provider(BumpPages::with_capacity(PAGE_SIZE * 256));
  let sizes: &[usize] = &[1, 7, 8, 16, 33, 64, 100, 256, 1000, 4096];
  let rounds = 20;

  let mut live: Vec<(*mut u8, usize)> = Vec::new();

  for round in 0..rounds {
    for &size in sizes {
      let ptr = heap.acquire(size);
      assert!(!ptr.is_null(), "acquire failed for size {size}");
      assert_eq!(ptr as usize % ALIGNMENT, 0);
      fill_pattern(ptr, size);
      live.push((ptr, size));
    }

    for &(ptr, size) in &live {
      assert!(
        check_pattern(ptr, size),
        "corruption detected at round {round}, size {size}"
      );
    }

    // Release every other allocation so the next batch reuses and splits.
    let mut keep = Vec::new();
    for (i, (ptr, size)) in live.drain(..).enumerate() {
      if i % 2 == 0 {
        unsafe { heap.release(ptr) };
        assert_coalesced(&heap);
      } else {
        keep.push((ptr, size));
      }
    }
    live = keep;
  }

  for (ptr, size) in live.drain(..) {
    assert!(check_pattern(ptr, size));
    unsafe { heap.release(ptr) };
    assert_coalesced(&heap);
  }

  let stats = heap.stats();
  assert_eq!(stats.free_blocks, stats.blocks);
}

#[test]
fn stress_random_churn() {
  let mut heap = Heap::with_provider(BumpPages::with_capacity(PAGE_SIZE * 1024));
  let mut rng = Rng(0x2545_F491_4F6C_DD1D);
  let mut live: Vec<(*mut u8, usize)> = Vec::new();

  for step in 0..5_000 {
    if live.is_empty() || rng.below(3) != 0 {
      let size = 1 + rng.below(512);
      let ptr = heap.acquire(size);
      assert!(!ptr.is_null(), "acquire({size}) failed at step {step}");
      fill_pattern(ptr, size);
      live.push((ptr, size));
    } else {
      let (ptr, size) = live.swap_remove(rng.below(live.len()));
      assert!(
        check_pattern(ptr, size),
        "corruption detected at step {step}, size {size}"
      );
      unsafe { heap.release(ptr) };
      assert_coalesced(&heap);
    }
  }

  for &(ptr, size) in &live {
    assert!(check_pattern(ptr, size));
  }
}

#[test]
fn stress_reuse_keeps_region_count_flat() {
  let mut heap = Heap::with_provider(BumpPages::with_capacity(PAGE_SIZE * 16));

  let ptrs: Vec<_> = (0..32).map(|_| heap.acquire(64)).collect();
  let regions = heap.stats().region_requests;

  for _ in 0..100 {
    for &ptr in &ptrs {
      unsafe { heap.release(ptr) };
    }
    for _ in 0..32 {
      assert!(!heap.acquire(64).is_null());
    }
  }

  assert_eq!(heap.stats().region_requests, regions);
}
