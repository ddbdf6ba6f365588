use std::io::{self, BufRead, ErrorKind};

use derive_more::{Display, Error, From};

use super::Buffer;

/// An I/O failure during [`Buffer::read_delimited`]. Running out of stream is not an error; it is
/// reported through the `Ok(bool)` channel instead.
#[derive(Debug, Display, Error, From)]
#[display("error reading from stream")]
#[doc(cfg(feature = "read"))]
pub struct ReadError {
    source: io::Error,
}

impl Buffer {
    /// Reads bytes from `stream` into the Buffer, overwriting its previous contents, until
    /// `delim` or end-of-stream is reached. The delimiter is consumed from the stream but not
    /// stored.
    ///
    /// Returns `Ok(false)` only when zero bytes could be consumed because the stream was already
    /// exhausted; in that case the Buffer is left untouched. A delimiter with nothing before it is
    /// a successful read of an empty Buffer, and data ending without a delimiter is a successful
    /// read of whatever was there.
    ///
    /// # Examples
    /// ```
    /// # use std::io::Cursor;
    /// # use byte_string::Buffer;
    /// let mut stream = Cursor::new(b"abc\ndef");
    /// let mut buf = Buffer::new();
    ///
    /// assert!(buf.read_delimited(&mut stream, b'\n').unwrap());
    /// assert_eq!(buf.as_bytes(), b"abc");
    ///
    /// assert!(buf.read_delimited(&mut stream, b'\n').unwrap());
    /// assert_eq!(buf.as_bytes(), b"def");
    ///
    /// assert!(!buf.read_delimited(&mut stream, b'\n').unwrap());
    /// ```
    #[doc(cfg(feature = "read"))]
    pub fn read_delimited<R: BufRead>(&mut self, stream: &mut R, delim: u8) -> Result<bool, ReadError> {
        let mut consumed_any = false;

        loop {
            let chunk = match stream.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if chunk.is_empty() {
                // End of stream. Only a failed read if nothing was consumed at all.
                return Ok(consumed_any);
            }

            if !consumed_any {
                self.clear();
                consumed_any = true;
            }

            match chunk.iter().position(|&byte| byte == delim) {
                Some(at) => {
                    self.append(&chunk[..at]);
                    stream.consume(at + 1);
                    return Ok(true);
                },
                None => {
                    let taken = chunk.len();
                    self.append(chunk);
                    stream.consume(taken);
                },
            }
        }
    }

    /// [`read_delimited`](Buffer::read_delimited) with a newline delimiter.
    #[doc(cfg(feature = "read"))]
    pub fn read_line<R: BufRead>(&mut self, stream: &mut R) -> Result<bool, ReadError> {
        self.read_delimited(stream, b'\n')
    }
}
