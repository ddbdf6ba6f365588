use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// The process-wide empty allocation. Every zero-capacity [`RawBuf`] points here, which keeps the
/// terminator invariant alive without allocating. Must never be written through.
static EMPTY: u8 = 0;

/// Bookkeeping slack included when rounding allocation sizes, matching the two words of length and
/// capacity tracking that accompany every buffer.
const SLACK: usize = 2 * size_of::<usize>();

/// Rounds a requested capacity up to the allocator-friendly total footprint sequence (24, 40, 56,
/// ... bytes on 64-bit targets), counting the slack words and the terminator byte.
const fn bucket_mem(cap: usize) -> usize {
    ((cap.strict_add(SLACK + 8) >> 4) << 4) + 8
}

/// The usable capacity granted for a requested capacity: the footprint minus slack and terminator,
/// following the sequence 7, 23, 39, ... on 64-bit targets. Always at least `cap`.
pub(crate) const fn bucket_cap(cap: usize) -> usize {
    bucket_mem(cap) - SLACK - 1
}

/// The allocation behind a [`Buffer`](super::Buffer): a pointer and the usable capacity, excluding
/// the terminator byte. Holds `cap + 1` heap bytes when `cap > 0` and aliases [`EMPTY`] otherwise,
/// so the byte at offset `cap` is always available for the terminator.
pub(crate) struct RawBuf {
    pub(crate) ptr: NonNull<u8>,
    pub(crate) cap: usize,
}

impl RawBuf {
    /// Creates a capacity-zero RawBuf aliasing the shared empty sentinel. No allocation occurs
    /// until [`reserve`](RawBuf::reserve) is asked for more.
    pub fn new() -> RawBuf {
        RawBuf {
            // SAFETY: The address of a static is never null.
            ptr: unsafe { NonNull::new_unchecked((&raw const EMPTY).cast_mut()) },
            cap: 0,
        }
    }

    pub const fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Ensures the usable capacity is at least `cap`, reallocating at most once and preserving
    /// existing bytes. Returns the (possibly unchanged) granted capacity. Calling this again with
    /// the same request is a no-op.
    ///
    /// # Panics
    /// Panics if the rounded allocation size overflows.
    pub fn reserve(&mut self, cap: usize) -> usize {
        if cap <= self.cap {
            return self.cap;
        }

        let granted = bucket_cap(cap);
        let new_layout = Self::make_layout(granted + 1);

        let raw_ptr = if self.cap == 0 {
            // First allocation: the sentinel holds no payload, so there is nothing to carry over.
            // SAFETY: The layout has non-zero size.
            unsafe { alloc::alloc(new_layout) }
        } else {
            // SAFETY: ptr was allocated in the global allocator with the old layout, and the new
            // size is non-zero and within isize::MAX (checked by make_layout).
            unsafe {
                alloc::realloc(self.ptr.as_ptr(), Self::make_layout(self.cap + 1), new_layout.size())
            }
        };

        self.ptr = NonNull::new(raw_ptr).unwrap_or_else(|| alloc::handle_alloc_error(new_layout));
        self.cap = granted;
        granted
    }

    /// A helper function to create a [`Layout`] for `size` bytes.
    ///
    /// # Panics
    /// Panics if `size` exceeds [`isize::MAX`].
    fn make_layout(size: usize) -> Layout {
        Layout::array::<u8>(size).expect("Capacity overflow!")
    }
}

impl Drop for RawBuf {
    fn drop(&mut self) {
        if self.cap > 0 {
            // SAFETY: cap > 0 means ptr owns an allocation of cap + 1 bytes in the global
            // allocator. The sentinel case has cap == 0 and is never deallocated.
            unsafe {
                alloc::dealloc(self.ptr.as_ptr(), Self::make_layout(self.cap + 1));
            }
        }
    }
}
