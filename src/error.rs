use thiserror::Error;

/// Why [`Heap::try_acquire`](crate::Heap::try_acquire) produced no memory.
///
/// [`Heap::acquire`](crate::Heap::acquire) collapses both variants into a
/// null pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  #[error("zero-byte allocation requested")]
  ZeroSize,
  #[error("out of memory: page provider could not supply {requested} bytes")]
  OutOfMemory { requested: usize },
}
