use std::cmp;

use super::Buffer;

/// The not-found sentinel returned by the search methods. Positions are bounded by
/// [`isize::MAX`], so this value can never collide with a real offset (and is never 0, which is a
/// perfectly valid match position).
pub const NPOS: usize = usize::MAX >> 1;

impl Buffer {
    /// Returns the position of the first occurrence of `needle`, or [`NPOS`].
    pub fn find(&self, needle: &[u8]) -> usize {
        self.find_bounded(needle, 0, needle.len())
    }

    /// Returns the position of the first occurrence of `needle` at or after `pos`, or [`NPOS`].
    pub fn find_from(&self, needle: &[u8], pos: usize) -> usize {
        self.find_bounded(needle, pos, needle.len())
    }

    /// Searches for the first `min(max_needle_len, needle.len())` bytes of `needle`, starting no
    /// earlier than `pos`. A start position beyond the payload is itself not-found rather than an
    /// error, and an empty effective needle matches immediately at `pos`.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// # use byte_string::buffer::NPOS;
    /// let buf = Buffer::from_bytes(b"The quick brown fox jumps over the lazy dog.JPG");
    /// assert_eq!(buf.find_bounded(b"brown", 0, 5), 10);
    /// assert_eq!(buf.find_bounded(b"purple", 0, 6), NPOS);
    /// ```
    pub fn find_bounded(&self, needle: &[u8], pos: usize, max_needle_len: usize) -> usize {
        if pos > self.len() {
            return NPOS;
        }
        let needle = &needle[..cmp::min(max_needle_len, needle.len())];

        match find_in(&self.as_bytes()[pos..], needle) {
            Some(at) => pos + at,
            None => NPOS,
        }
    }

    /// Returns true if `needle` occurs anywhere in the payload.
    pub fn contains(&self, needle: &[u8]) -> bool {
        self.find(needle) != NPOS
    }

    /// Returns true if the payload begins with `prefix`, compared over the tracked length.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.as_bytes().starts_with(prefix)
    }

    /// Returns true if the payload ends with `suffix`, compared over the tracked length.
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.as_bytes().ends_with(suffix)
    }

    /// Builds a Buffer from `text` with every occurrence of `find` replaced by `repl`. An empty
    /// `find` replaces nothing. Built out of bounded searches and appends, so the output grows
    /// with the usual amortized policy.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let buf = Buffer::from_replace_all(b"one two two", b"two", b"three");
    /// assert_eq!(buf.as_bytes(), b"one three three");
    /// ```
    pub fn from_replace_all(text: &[u8], find: &[u8], repl: &[u8]) -> Buffer {
        let mut out = Buffer::new();
        let mut from = 0;

        if !find.is_empty() {
            while let Some(at) = find_in(&text[from..], find) {
                out.append(&text[from..from + at]);
                out.append(repl);
                from += at + find.len();
            }
        }
        out.append(&text[from..]);
        out
    }

    /// Replaces every occurrence of `find` in the payload with `repl`, in one rebuild.
    pub fn replace_all(&mut self, find: &[u8], repl: &[u8]) {
        let replaced = Buffer::from_replace_all(self.as_bytes(), find, repl);
        *self = replaced;
    }
}

/// Naive bounded substring search. An empty needle matches at offset 0; a needle longer than the
/// haystack never matches.
fn find_in(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
