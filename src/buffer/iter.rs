use std::iter::FusedIterator;

use super::Buffer;

impl IntoIterator for Buffer {
    type Item = u8;

    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { buf: self, front: 0 }
    }
}

/// An owned iterator over a [`Buffer`]'s payload bytes. See [`Buffer::into_iter`].
///
/// Front consumption advances an index; back consumption pops bytes off the Buffer itself, which
/// keeps the terminator invariant intact throughout iteration.
pub struct IntoIter {
    buf: Buffer,
    front: usize,
}

impl Iterator for IntoIter {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.buf.len() {
            let byte = self.buf[self.front];
            self.front += 1;
            Some(byte)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len() - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.buf.len() {
            self.buf.pop()
        } else {
            None
        }
    }
}

impl FusedIterator for IntoIter {}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.buf.len() - self.front
    }
}

// Borrowed iteration comes from Deref<Target = [u8]>: iter() and iter_mut() are the slice
// definitions.
