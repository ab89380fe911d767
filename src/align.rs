/// Rounds the given size up to the allocator alignment (8 bytes).
///
/// Usable in `const` context. Overflows on sizes close to `usize::MAX`; use
/// [`align_up`] where the input comes from a caller.
///
/// # Examples
///
/// ```rust
/// use mapalloc::align;
///
/// assert_eq!(align!(1), 8);
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(16), 16);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + $crate::config::ALIGNMENT - 1) & !($crate::config::ALIGNMENT - 1)
  };
}

/// Checked form of [`align!`]: `None` when rounding would overflow.
#[inline]
pub const fn align_up(size: usize) -> Option<usize> {
  match size.checked_add(crate::config::ALIGNMENT - 1) {
    Some(padded) => Some(padded & !(crate::config::ALIGNMENT - 1)),
    None => None,
  }
}
