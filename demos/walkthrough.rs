use std::ptr;

use mapalloc::config::HEADER_SIZE;
use mapalloc::{Heap, PageProvider};

/// Prints every block in the chain, lowest address first.
fn print_chain<P: PageProvider>(
  label: &str,
  heap: &Heap<P>,
) {
  let stats = heap.stats();
  println!(
    "[{}] {} block(s), {} free byte(s), {} region request(s), {} byte(s) mapped",
    label, stats.blocks, stats.free_bytes, stats.region_requests, stats.mapped_bytes
  );
  for block in heap.blocks() {
    println!(
      "    {:?}  size = {:>5}  {}",
      block.addr,
      block.size,
      if block.free { "free" } else { "used" }
    );
  }
}

fn main() {
  let mut heap = Heap::new();
  println!("Header size: {HEADER_SIZE} bytes");

  unsafe {
    // --------------------------------------------------------------------
    // 1) Two small allocations, each in its own mapping.
    // --------------------------------------------------------------------
    let first = heap.acquire(10);
    let second = heap.acquire(20);
    assert!(!first.is_null() && !second.is_null(), "mmap failed");
    println!("\n[1] acquire(10) = {first:?}, acquire(20) = {second:?}");
    first.cast::<u32>().write(0xDEADBEEF);
    ptr::write_bytes(second, 0xAB, 20);
    print_chain("1", &heap);

    // --------------------------------------------------------------------
    // 2) Release the first one and ask for 8 bytes: the freed 16-byte
    //    block is reused whole, the leftover is too small to split.
    // --------------------------------------------------------------------
    heap.release(first);
    let reused = heap.acquire(8);
    assert!(!reused.is_null());
    println!(
      "\n[2] acquire(8) = {reused:?}, reused first block? {}",
      if reused == first { "yes" } else { "no" }
    );
    print_chain("2", &heap);

    // --------------------------------------------------------------------
    // 3) A large block, released and then split by a small request.
    // --------------------------------------------------------------------
    let large = heap.acquire(4096);
    assert!(!large.is_null(), "mmap failed");
    heap.release(large);
    let small = heap.acquire(64);
    assert!(!small.is_null());
    println!("\n[3] acquire(4096) = {large:?}, after release acquire(64) = {small:?}");
    print_chain("3", &heap);

    // --------------------------------------------------------------------
    // 4) Releasing the small block merges it back with its remainder.
    // --------------------------------------------------------------------
    heap.release(small);
    println!("\n[4] released {small:?}");
    print_chain("4", &heap);

    // --------------------------------------------------------------------
    // 5) Zero-byte requests always fail.
    // --------------------------------------------------------------------
    println!("\n[5] acquire(0) = {:?}", heap.try_acquire(0));

    heap.release(reused);
    heap.release(second);
    print_chain("end", &heap);
  }
}
