use std::fmt::{self, Display, Formatter, Write};
use std::str::{self, Utf8Error};

use super::Buffer;

impl Buffer {
    /// Builds a Buffer from pre-formatted [`Arguments`](fmt::Arguments), typically via
    /// [`format_buf!`](crate::format_buf).
    ///
    /// The required length is measured with a dry-run formatting pass first, then exactly that
    /// much capacity is reserved and the arguments are formatted a second time straight into the
    /// payload. One allocation, no guessed sizes.
    ///
    /// # Panics
    /// Panics if a formatting trait implementation returns an error.
    ///
    /// # Examples
    /// ```
    /// # use byte_string::Buffer;
    /// let buf = Buffer::from_format(format_args!("{}-{:02}", "answer", 42));
    /// assert_eq!(buf.as_bytes(), b"answer-42");
    /// ```
    pub fn from_format(args: fmt::Arguments<'_>) -> Buffer {
        let mut buf = Buffer::new();
        buf.assign_format(args);
        buf
    }

    /// Replaces the payload with formatted text, using the same two-pass measure-then-format
    /// approach as [`from_format`](Buffer::from_format). The existing allocation is reused when
    /// large enough.
    ///
    /// # Panics
    /// Panics if a formatting trait implementation returns an error.
    pub fn assign_format(&mut self, args: fmt::Arguments<'_>) {
        let mut counter = LenCounter(0);
        fmt::write(&mut counter, args)
            .expect("a formatting trait implementation returned an error");

        self.clear();
        self.reserve(counter.0);
        fmt::write(self, args)
            .expect("a formatting trait implementation returned an error");
    }

    /// Borrows the payload as UTF-8 text, if it is valid.
    pub const fn to_str(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }
}

/// Builds a [`Buffer`] from a format string and arguments, like [`format!`] but without an
/// intermediate [`String`].
///
/// # Examples
/// ```
/// # use byte_string::format_buf;
/// let buf = format_buf!("{} + {} = {}", 1, 2, 1 + 2);
/// assert_eq!(buf.as_bytes(), b"1 + 2 = 3");
/// ```
#[macro_export]
macro_rules! format_buf {
    ($($arg:tt)*) => {
        $crate::buffer::Buffer::from_format(format_args!($($arg)*))
    };
}

/// First-pass writer which only measures how many bytes the formatted output needs.
struct LenCounter(usize);

impl Write for LenCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

impl Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes());
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.append(c.encode_utf8(&mut [0; 4]).as_bytes());
        Ok(())
    }
}

impl From<&str> for Buffer {
    fn from(value: &str) -> Self {
        Buffer::from_bytes(value.as_bytes())
    }
}

impl PartialEq<&str> for Buffer {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Display for Buffer {
    /// Writes the payload with non-printable bytes ASCII-escaped, making no UTF-8 assumption.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_bytes().escape_ascii())
    }
}
