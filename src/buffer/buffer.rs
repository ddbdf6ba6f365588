use std::borrow::{Borrow, BorrowMut};
use std::cmp::{self, Ordering};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut, Range};
use std::ptr;
use std::slice;

use super::raw::RawBuf;

/// The amortized growth target used by append and replace when capacity runs out: 13/8 (1.625)
/// times the current length, plus the requested increment, before bucket rounding.
fn amortized(len: usize, extra: usize) -> usize {
    (len.strict_mul(13) >> 3).strict_add(extra)
}

/// A growable, heap-allocated byte string which keeps a zero terminator behind its payload.
///
/// The payload is raw bytes - there is no UTF-8 requirement anywhere in the safe API. An empty
/// Buffer has capacity 0 and points at a shared static sentinel rather than an allocation, so
/// creating one is free. The terminator byte at `payload[len]` is maintained by every operation
/// and is visible through [`as_bytes_with_nul`](Buffer::as_bytes_with_nul), which makes the
/// contents directly usable as a C-style string when they contain no interior zero bytes.
///
/// Capacity only ever grows. Growth rounds the allocation up to a bucket sequence aligned with
/// common allocator size classes, granting capacities 7, 23, 39, ... so that repeated small
/// appends settle into O(1) amortized time.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of bytes in the Buffer.
/// - `m`: The number of bytes being added or removed.
/// - `i`: The position in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `pop` | `O(1)` |
/// | `append` | `O(m)`*, `O(n+m)` |
/// | `assign` | `O(m)` |
/// | `insert` | `O(n-i+m)` |
/// | `erase` | `O(n-i)` |
/// | `replace_range` | `O(n-i+m)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `find` | `O(n*m)` |
///
/// \* Amortized; growth reallocates and copies the existing payload.
///
/// \** If the Buffer already has enough capacity, `reserve` is `O(1)`.
pub struct Buffer {
    pub(crate) raw: RawBuf,
    pub(crate) len: usize,
}

impl Buffer {
    /// Returns the length of the payload in bytes, excluding the terminator.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let buf = Buffer::from_bytes(b"hello");
    /// assert_eq!(buf.len(), 5);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of payload bytes the current allocation can hold, excluding the
    /// terminator. A granted capacity is never implicitly reduced.
    pub const fn capacity(&self) -> usize {
        self.raw.cap
    }

    /// Returns true if the Buffer contains no bytes.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Creates an empty Buffer with capacity 0. No memory is allocated until a mutation requires
    /// growth; until then the Buffer aliases a shared static empty sentinel.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let buf = Buffer::new();
    /// assert_eq!(buf.len(), 0);
    /// assert_eq!(buf.capacity(), 0);
    /// assert_eq!(buf.as_bytes_with_nul(), &[0]);
    /// ```
    pub fn new() -> Buffer {
        Buffer {
            raw: RawBuf::new(),
            len: 0,
        }
    }

    /// Creates an empty Buffer whose capacity is at least `cap`, rounded up to the granted bucket
    /// size.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let buf = Buffer::with_capacity(10);
    /// assert!(buf.is_empty());
    /// assert_eq!(buf.capacity(), 23);
    /// ```
    pub fn with_capacity(cap: usize) -> Buffer {
        let mut buf = Buffer::new();
        buf.reserve(cap);
        buf
    }

    /// Creates a Buffer of `len` copies of `fill`.
    pub fn with_size(len: usize, fill: u8) -> Buffer {
        let mut buf = Buffer::new();
        buf.resize(len, fill);
        buf
    }

    /// Creates a Buffer holding a copy of `bytes`, sized to the optimal capacity for that length.
    /// An empty slice produces the sentinel Buffer without allocating.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let buf = Buffer::from_bytes(b"hello");
    /// assert_eq!(buf.as_bytes(), b"hello");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Buffer {
        let mut buf = Buffer::new();
        buf.assign(bytes);
        buf
    }

    /// Returns the payload as a slice of `len` bytes.
    pub const fn as_bytes(&self) -> &[u8] {
        // SAFETY: The first len payload bytes are always initialized; for the sentinel, len is 0
        // and the pointer is valid for zero reads.
        unsafe { slice::from_raw_parts(self.raw.as_ptr().cast_const(), self.len) }
    }

    /// Returns the payload plus the trailing zero terminator, `len + 1` bytes in total. This holds
    /// even for the sentinel Buffer, which exposes the shared static terminator.
    pub const fn as_bytes_with_nul(&self) -> &[u8] {
        // SAFETY: Every operation re-establishes the terminator at payload[len], and the sentinel
        // is itself a single zero byte, so len + 1 bytes are always initialized.
        unsafe { slice::from_raw_parts(self.raw.as_ptr().cast_const(), self.len + 1) }
    }

    /// Ensures capacity is at least `cap`, reallocating at most once while preserving the payload.
    /// Returns the granted capacity; a request at or below the current capacity changes nothing.
    ///
    /// # Panics
    /// Panics if the rounded allocation size overflows.
    pub fn reserve(&mut self, cap: usize) -> usize {
        let was_sentinel = self.raw.cap == 0;
        let granted = self.raw.reserve(cap);

        if was_sentinel && self.raw.cap > 0 {
            // A fresh allocation starts uninitialized; establish the terminator for len == 0.
            self.terminate();
        }
        granted
    }

    /// Resizes the payload to `new_len` bytes, filling any extension with `fill`.
    pub fn resize(&mut self, new_len: usize, fill: u8) {
        let old_len = self.len;
        self.reserve(new_len);

        if new_len > old_len {
            // SAFETY: Capacity now covers new_len bytes.
            unsafe {
                ptr::write_bytes(self.raw.as_ptr().add(old_len), fill, new_len - old_len);
            }
        }
        self.len = new_len;
        self.terminate();
    }

    /// Shortens the payload to `new_len` bytes. Requests at or beyond the current length do
    /// nothing; capacity is unaffected either way.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len {
            self.len = new_len;
            self.terminate();
        }
    }

    /// Empties the Buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Replaces the entire payload with a copy of `bytes`.
    ///
    /// Assigning an empty slice to a Buffer that has never allocated is a no-op, so repeated
    /// empty assignment stays at the sentinel.
    pub fn assign(&mut self, bytes: &[u8]) {
        if bytes.is_empty() && self.raw.cap == 0 {
            return;
        }
        self.reserve(bytes.len());

        // SAFETY: Capacity now covers the slice, and a slice argument can't alias our own
        // allocation while &mut self is held.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.raw.as_ptr(), bytes.len());
        }
        self.len = bytes.len();
        self.terminate();
    }

    /// Replaces the payload with a deep copy of `other`'s payload. The two Buffers share no
    /// storage afterward.
    pub fn copy_from(&mut self, other: &Buffer) {
        self.assign(other.as_bytes());
    }

    /// Appends a copy of `bytes` to the end of the payload, growing with the amortized policy.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let mut buf = Buffer::from_bytes(b"foo");
    /// buf.append(b"bar");
    /// assert_eq!(buf.as_bytes(), b"foobar");
    /// ```
    pub fn append(&mut self, bytes: &[u8]) {
        // SAFETY: A slice argument can't alias our own allocation while &mut self is held.
        unsafe { self.append_raw(bytes.as_ptr(), bytes.len()) }
    }

    /// Appends a copy of the Buffer's own `src` range onto its end. The source survives any
    /// reallocation triggered by growth, so doubling a Buffer by appending its full range onto
    /// itself is well defined.
    ///
    /// # Panics
    /// Panics if `src` is out of bounds of the payload.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let mut buf = Buffer::from_bytes(b"AB");
    /// buf.extend_from_within(0..2);
    /// assert_eq!(buf.as_bytes(), b"ABAB");
    /// ```
    pub fn extend_from_within(&mut self, src: Range<usize>) {
        self.check_range(&src);

        // SAFETY: The range was checked against len, and append_raw repairs the source pointer if
        // growth moves the allocation.
        unsafe {
            self.append_raw(self.raw.as_ptr().add(src.start).cast_const(), src.end - src.start);
        }
    }

    /// Appends a single byte.
    pub fn push(&mut self, byte: u8) {
        self.append(&[byte]);
    }

    /// Removes and returns the last payload byte, if any.
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            None
        } else {
            let byte = self.as_bytes()[self.len - 1];
            self.len -= 1;
            self.terminate();
            Some(byte)
        }
    }

    /// Inserts a copy of `bytes` at `pos`, shifting the tail right. `pos == len` appends.
    ///
    /// # Panics
    /// Panics if `pos` is beyond the end of the payload.
    pub fn insert(&mut self, pos: usize, bytes: &[u8]) {
        self.replace_range(pos, 0, bytes);
    }

    /// Removes up to `n` bytes starting at `pos`, shifting the tail left. A removal length
    /// reaching past the end is clamped, never an error.
    ///
    /// # Panics
    /// Panics if `pos` is beyond the end of the payload.
    pub fn erase(&mut self, pos: usize, n: usize) {
        self.check_pos(pos);
        let n = cmp::min(n, self.len - pos);

        if self.len > 0 {
            // SAFETY: pos + n <= len, so both ranges are in bounds; copy handles the overlap.
            unsafe {
                ptr::copy(
                    self.raw.as_ptr().add(pos + n).cast_const(),
                    self.raw.as_ptr().add(pos),
                    self.len - (pos + n),
                );
            }
            self.len -= n;
            self.terminate();
        }
    }

    /// The unified range-surgery primitive: removes up to `removed_len` bytes at `pos` and puts a
    /// copy of `bytes` in their place, shifting the tail to fit. Insertion is `removed_len == 0`,
    /// erasure is an empty `bytes`, and `pos == len` behaves as a pure append. The removal length
    /// is clamped to the available payload.
    ///
    /// # Panics
    /// Panics if `pos` is beyond the end of the payload.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let mut buf = Buffer::from_bytes(b"this is a test string.");
    /// buf.replace_range(9, 5, b"n example");
    /// assert_eq!(buf.as_bytes(), b"this is an example string.");
    /// ```
    pub fn replace_range(&mut self, pos: usize, removed_len: usize, bytes: &[u8]) {
        self.check_pos(pos);

        // SAFETY: pos was checked, and a slice argument can't alias our own allocation while
        // &mut self is held.
        unsafe { self.replace_raw(pos, removed_len, bytes.as_ptr(), bytes.len()) }
    }

    /// [`replace_range`](Buffer::replace_range) with the replacement taken from the Buffer's own
    /// `src` range, which may overlap the region being removed or shifted.
    ///
    /// # Panics
    /// Panics if `pos` or `src` is out of bounds of the payload.
    pub fn replace_from_within(&mut self, pos: usize, removed_len: usize, src: Range<usize>) {
        self.check_pos(pos);
        self.check_range(&src);

        // SAFETY: Both positions were checked, and replace_raw stages the source bytes before
        // the tail moves.
        unsafe {
            self.replace_raw(
                pos,
                removed_len,
                self.raw.as_ptr().add(src.start).cast_const(),
                src.end - src.start,
            );
        }
    }

    /// Moves the Buffer out from behind a mutable reference, leaving the sentinel in its place.
    pub fn take(&mut self) -> Buffer {
        mem::take(self)
    }
}

impl Buffer {
    /// Rewrites the terminator byte at `payload[len]`. For a capacity-zero Buffer the length is
    /// necessarily 0 and the shared sentinel already holds the terminator, so nothing is written.
    pub(crate) fn terminate(&mut self) {
        if self.raw.cap > 0 {
            // SAFETY: len <= cap and the allocation holds cap + 1 bytes, so the terminator slot
            // is in bounds.
            unsafe {
                self.raw.as_ptr().add(self.len).write(0);
            }
        }
    }

    /// Appends `n` bytes starting at `src`, which may point into this Buffer's own payload.
    ///
    /// # Safety
    /// `src` must be valid for `n` reads. If `src` points into this Buffer's allocation, then
    /// `src..src + n` must lie within the first `len` payload bytes.
    unsafe fn append_raw(&mut self, mut src: *const u8, n: usize) {
        if n == 0 {
            return;
        }
        let old_len = self.len;
        let new_len = old_len.strict_add(n);

        if new_len > self.raw.cap {
            // Capture the source offset before the allocation can move; if src points into the
            // payload, this is how it survives the reallocation.
            let offset = (src as usize).wrapping_sub(self.raw.as_ptr() as usize);
            self.reserve(amortized(old_len, n));

            if offset <= old_len {
                // SAFETY: An aliasing source started within the payload, so the repaired pointer
                // at the same offset is in bounds of the new allocation.
                src = unsafe { self.raw.as_ptr().add(offset).cast_const() };
            }
        }

        // SAFETY: Capacity covers new_len, the destination starts at offset old_len, and an
        // aliasing source ends at or before old_len, so the two ranges are disjoint.
        unsafe {
            ptr::copy_nonoverlapping(src, self.raw.as_ptr().add(old_len), n);
        }
        self.len = new_len;
        self.terminate();
    }

    /// Moves the payload tail starting at `from` so that it starts at `to` instead, growing with
    /// the amortized policy when shifting right.
    fn shift_tail(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let tail = self.len - from;
        let new_len = to.strict_add(tail);

        if new_len > self.raw.cap {
            self.reserve(amortized(self.len, to - from));
        }

        // SAFETY: Capacity covers new_len and both ranges are in bounds; copy handles the
        // overlap between them.
        unsafe {
            ptr::copy(
                self.raw.as_ptr().add(from).cast_const(),
                self.raw.as_ptr().add(to),
                tail,
            );
        }
        self.len = new_len;
        self.terminate();
    }

    /// Range-replace on raw source bytes. The replacement is staged through a scratch allocation
    /// before the tail shift, so `src` may alias any part of the payload - including the region
    /// being moved.
    ///
    /// # Safety
    /// `src` must be valid for `n` reads and `pos <= len` must hold.
    unsafe fn replace_raw(&mut self, pos: usize, removed_len: usize, src: *const u8, n: usize) {
        let removed = cmp::min(removed_len, self.len - pos);

        let mut scratch = RawBuf::new();
        if n > 0 {
            scratch.reserve(n);
            // SAFETY: The scratch allocation is fresh, holds at least n bytes, and is disjoint
            // from src.
            unsafe {
                ptr::copy_nonoverlapping(src, scratch.as_ptr(), n);
            }
        }

        self.shift_tail(pos + removed, pos + n);

        if n > 0 {
            // SAFETY: shift_tail set len to at least pos + n, so the destination is in bounds of
            // the payload and disjoint from the scratch allocation.
            unsafe {
                ptr::copy_nonoverlapping(scratch.as_ptr().cast_const(), self.raw.as_ptr().add(pos), n);
            }
        }
    }

    pub(crate) fn check_pos(&self, pos: usize) {
        assert!(
            pos <= self.len,
            "position {} out of bounds for buffer with {} bytes",
            pos,
            self.len
        );
    }

    pub(crate) fn check_range(&self, range: &Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.len,
            "range {:?} out of bounds for buffer with {} bytes",
            range,
            self.len
        );
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Buffer {
    /// Deep-copies the payload into a fresh allocation sized to the optimal capacity for the
    /// clone's own length, independent of the source's capacity.
    fn clone(&self) -> Self {
        Buffer::from_bytes(self.as_bytes())
    }
}

impl From<&[u8]> for Buffer {
    fn from(value: &[u8]) -> Self {
        Buffer::from_bytes(value)
    }
}

impl<const N: usize> From<&[u8; N]> for Buffer {
    fn from(value: &[u8; N]) -> Self {
        Buffer::from_bytes(value)
    }
}

impl Extend<u8> for Buffer {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for byte in iter.into_iter() {
            self.push(byte);
        }
    }

    fn extend_one(&mut self, byte: u8) {
        self.push(byte);
    }

    fn extend_reserve(&mut self, additional: usize) {
        self.reserve(self.len.strict_add(additional));
    }
}

impl FromIterator<u8> for Buffer {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut buf = Buffer::with_capacity(iter.size_hint().0);

        for byte in iter {
            buf.push(byte);
        }
        buf
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: The first len payload bytes are always initialized, and len is 0 whenever the
        // Buffer aliases the sentinel, so no write can ever reach the shared static.
        unsafe { slice::from_raw_parts_mut(self.raw.as_ptr(), self.len) }
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsMut<[u8]> for Buffer {
    fn as_mut(&mut self) -> &mut [u8] {
        self.deref_mut()
    }
}

impl Borrow<[u8]> for Buffer {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl BorrowMut<[u8]> for Buffer {
    fn borrow_mut(&mut self) -> &mut [u8] {
        self.as_mut()
    }
}

// SAFETY: A Buffer owns its allocation uniquely; the only shared state is the immutable empty
// sentinel, which is never written through.
unsafe impl Send for Buffer {}
// SAFETY: Buffer's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs.
unsafe impl Sync for Buffer {}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Buffer {}

impl PartialEq<[u8]> for Buffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for Buffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl Ord for Buffer {
    /// Lexical byte ordering over the tracked length, so interior zero bytes participate.
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for Buffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Buffer {
    /// Hashes the payload bytes only, consistent with [`Borrow<[u8]>`](Borrow).
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Debug for Buffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field_with("contents", |f| write!(f, "\"{}\"", self.as_bytes().escape_ascii()))
            .field("len", &self.len)
            .field("cap", &self.raw.cap)
            .finish()
    }
}
