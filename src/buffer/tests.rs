#![cfg(test)]

use std::hash::{BuildHasher, RandomState};

use super::raw::bucket_cap;
use super::*;

macro_rules! assert_panics {
    ($run:block) => {
        assert!(
            std::panic::catch_unwind(|| $run).is_err(),
            "assertion failed to panic"
        );
    };
}

/// Checks the structural invariants that every reachable Buffer state must satisfy: the length
/// never exceeds the capacity and the terminator byte always follows the payload.
fn assert_invariants(buf: &Buffer) {
    assert!(buf.len() <= buf.capacity(), "len must never exceed capacity");
    assert_eq!(
        buf.as_bytes_with_nul()[buf.len()],
        0,
        "payload must always be followed by a zero terminator"
    );
}

#[test]
fn test_sentinel() {
    let a = Buffer::new();
    let b = Buffer::default();

    assert_eq!(a.len(), 0);
    assert_eq!(a.capacity(), 0);
    assert_eq!(a.as_bytes_with_nul(), &[0]);
    assert_eq!(
        a.raw.ptr, b.raw.ptr,
        "All empty Buffers should alias the same static sentinel."
    );
    assert_invariants(&a);

    let mut buf = Buffer::new();
    buf.clear();
    buf.truncate(10);
    buf.erase(0, 10);
    buf.assign(b"");
    assert_eq!(buf.pop(), None);
    assert_eq!(
        buf.capacity(),
        0,
        "No no-op mutation should move an empty Buffer off the sentinel."
    );

    buf.push(b'x');
    assert_ne!(
        buf.raw.ptr, a.raw.ptr,
        "The first growing mutation should allocate privately."
    );
    assert_invariants(&buf);
}

#[test]
fn test_growth_policy() {
    assert_eq!(bucket_cap(1), 7);
    assert_eq!(bucket_cap(7), 7);
    assert_eq!(bucket_cap(8), 23);
    assert_eq!(bucket_cap(23), 23);
    assert_eq!(bucket_cap(24), 39);

    let mut buf = Buffer::with_capacity(10);
    assert_eq!(buf.capacity(), 23);
    assert_eq!(
        buf.as_bytes_with_nul(),
        &[0],
        "A fresh allocation should carry a terminator before any content."
    );

    assert_eq!(buf.reserve(10), 23, "reserve below capacity should grant the current capacity.");
    assert_eq!(buf.capacity(), 23, "reserve should be idempotent for the same request.");

    buf.assign(b"hello");
    buf.reserve(100);
    assert_eq!(buf.as_bytes(), b"hello", "Payload should survive reallocation.");
    assert!(buf.capacity() >= 100);

    let cap = buf.capacity();
    buf.clear();
    buf.assign(b"x");
    assert_eq!(buf.capacity(), cap, "Capacity should never implicitly shrink.");
}

#[test]
fn test_from_bytes() {
    let buf = Buffer::from_bytes(b"hello");
    assert_eq!(buf.len(), 5);
    assert_eq!(buf.as_bytes(), b"hello");
    assert_eq!(buf.as_bytes_with_nul(), b"hello\0");
    assert_eq!(buf.capacity(), 7, "Five bytes should get the first capacity bucket.");
    assert_invariants(&buf);

    assert_eq!(
        Buffer::from_bytes(b"").capacity(),
        0,
        "An empty source should produce the sentinel without allocating."
    );

    assert_eq!(Buffer::from("hello"), Buffer::from(b"hello"));
}

#[test]
fn test_assign() {
    let mut buf = Buffer::from_bytes(b"short");
    buf.assign(b"a much longer replacement value");
    assert_eq!(buf.as_bytes(), b"a much longer replacement value");
    assert_invariants(&buf);

    let cap = buf.capacity();
    buf.assign(b"tiny");
    assert_eq!(buf.as_bytes(), b"tiny");
    assert_eq!(buf.capacity(), cap, "Assigning less should keep the allocation.");

    buf.assign(b"");
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), cap, "Assigning nothing should keep the allocation too.");

    let mut copy = Buffer::new();
    copy.copy_from(&buf);
    let other = Buffer::from_bytes(b"payload");
    copy.copy_from(&other);
    assert_eq!(copy, other);
    assert_ne!(
        copy.raw.ptr, other.raw.ptr,
        "copy_from should deep copy, not share storage."
    );
}

#[test]
fn test_append_self() {
    let mut buf = Buffer::from_bytes(b"AB");
    buf.extend_from_within(0..2);
    assert_eq!(buf.as_bytes(), b"ABAB");
    assert_eq!(buf.len(), 4);

    // Doubling through self-append must match doubling through a detached copy for lengths on
    // both sides of every growth trigger.
    for len in 1..=64 {
        let mut pattern = Buffer::new();
        for i in 0..len {
            pattern.push(b'a' + (i % 26) as u8);
        }

        let mut via_copy = pattern.clone();
        let detached = pattern.clone();
        via_copy.append(detached.as_bytes());

        let mut via_self = pattern;
        via_self.extend_from_within(0..len);

        assert_eq!(
            via_self, via_copy,
            "Self-append doubling should match append of a detached copy."
        );
        assert_invariants(&via_self);
    }

    let mut buf = Buffer::from_bytes(b"abcdef");
    buf.extend_from_within(1..3);
    assert_eq!(buf.as_bytes(), b"abcdefbc");

    assert_panics!({
        let mut buf = Buffer::from_bytes(b"abc");
        buf.extend_from_within(1..4)
    });
}

#[test]
fn test_replace_range() {
    let mut buf = Buffer::from_bytes(b"this is a test string.");
    buf.replace_range(9, 5, b"n example");
    assert_eq!(buf.as_bytes(), b"this is an example string.");
    assert_invariants(&buf);

    // Applying the inverse replacement restores the original content.
    buf.replace_range(9, 9, b" test");
    assert_eq!(buf.as_bytes(), b"this is a test string.");

    // Insertion and erasure are the degenerate forms.
    let mut buf = Buffer::from_bytes(b"hello world");
    buf.insert(5, b",");
    assert_eq!(buf.as_bytes(), b"hello, world");
    buf.insert(0, b">> ");
    assert_eq!(buf.as_bytes(), b">> hello, world");
    buf.insert(buf.len(), b"!");
    assert_eq!(buf.as_bytes(), b">> hello, world!");
    buf.replace_range(buf.len(), 0, b"!!");
    assert_eq!(buf.as_bytes(), b">> hello, world!!!");

    // An oversized removal length clamps to the available payload.
    let mut buf = Buffer::from_bytes(b"0123456789");
    buf.replace_range(5, 1000, b"");
    assert_eq!(buf.as_bytes(), b"01234");
    assert_invariants(&buf);

    assert_panics!({
        let mut buf = Buffer::from_bytes(b"abc");
        buf.replace_range(4, 0, b"x")
    });
}

#[test]
fn test_replace_from_within() {
    // The replacement source overlaps the region being removed and shifted.
    let mut buf = Buffer::from_bytes(b"abcdef");
    buf.replace_from_within(0, 2, 2..6);
    assert_eq!(buf.as_bytes(), b"cdefcdef");
    assert_invariants(&buf);

    let mut buf = Buffer::from_bytes(b"abcdef");
    buf.replace_from_within(4, 0, 0..4);
    assert_eq!(buf.as_bytes(), b"abcdabcdef");

    assert_panics!({
        let mut buf = Buffer::from_bytes(b"abc");
        buf.replace_from_within(0, 1, 2..5)
    });
}

#[test]
fn test_erase_and_truncate() {
    let mut buf = Buffer::from_bytes(b"hello world");
    buf.erase(5, 6);
    assert_eq!(buf.as_bytes(), b"hello");
    buf.erase(1, 2);
    assert_eq!(buf.as_bytes(), b"hlo");
    buf.erase(0, 100);
    assert!(buf.is_empty());
    assert_invariants(&buf);

    let mut buf = Buffer::from_bytes(b"hello");
    let cap = buf.capacity();
    buf.truncate(100);
    assert_eq!(buf.as_bytes(), b"hello", "Truncating beyond the length should do nothing.");
    buf.truncate(2);
    assert_eq!(buf.as_bytes(), b"he");
    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), cap, "clear should keep the allocation.");

    assert_panics!({
        let mut buf = Buffer::from_bytes(b"abc");
        buf.erase(4, 1)
    });
}

#[test]
fn test_resize() {
    let buf = Buffer::with_size(5, b'x');
    assert_eq!(buf.as_bytes(), b"xxxxx");
    assert_invariants(&buf);

    let mut buf = Buffer::from_bytes(b"ab");
    buf.resize(6, b'.');
    assert_eq!(buf.as_bytes(), b"ab....");
    buf.resize(1, b'?');
    assert_eq!(buf.as_bytes(), b"a", "Shrinking resize should ignore the fill byte.");

    let mut buf = Buffer::new();
    buf.resize(0, b'x');
    assert_eq!(buf.capacity(), 0, "A zero resize of an empty Buffer should stay at the sentinel.");
}

#[test]
fn test_push_pop() {
    let mut buf = Buffer::new();
    for byte in *b"abc" {
        buf.push(byte);
    }
    assert_eq!(buf.as_bytes(), b"abc");

    assert_eq!(buf.pop(), Some(b'c'));
    assert_eq!(buf.as_bytes_with_nul(), b"ab\0", "pop should move the terminator back.");
    assert_eq!(buf.pop(), Some(b'b'));
    assert_eq!(buf.pop(), Some(b'a'));
    assert_eq!(buf.pop(), None);
    assert_invariants(&buf);
}

#[test]
fn test_find() {
    let buf = Buffer::from_bytes(b"The quick brown fox jumps over the lazy dog.JPG");

    assert_eq!(buf.find_bounded(b"brown", 0, 5), 10);
    assert_eq!(buf.find(b"quick"), 4);
    assert_eq!(buf.find(b"purple"), NPOS);
    assert_eq!(
        buf.find_bounded(b"jumpers", 0, 4),
        20,
        "Only the bounded prefix of the needle should be searched for."
    );
    assert_eq!(buf.find_from(b"the", 0), 31);
    assert_eq!(buf.find_from(b"The", 1), NPOS);

    assert_eq!(
        buf.find_bounded(b"The", buf.len() + 1, 3),
        NPOS,
        "A start position beyond the payload should be not-found, never an error."
    );
    assert_eq!(buf.find_bounded(b"anything", 7, 0), 7, "An empty effective needle matches at pos.");
    assert_eq!(Buffer::new().find(b"x"), NPOS);
}

#[test]
fn test_comparisons() {
    let buf = Buffer::from_bytes(b"The quick brown fox.JPG");

    assert!(buf.starts_with(b"The q"));
    assert!(!buf.starts_with(b"he q"));
    assert!(buf.ends_with(b".JPG"));
    assert!(!buf.ends_with(b".PNG"));
    assert!(buf.contains(b"fox"));
    assert!(!buf.contains(b"cat"));

    assert!(buf.starts_with(b"") && buf.ends_with(b""), "Every Buffer has the empty affixes.");

    // Comparison covers the tracked length, so interior zero bytes participate.
    assert!(Buffer::from_bytes(b"ab\0a") > Buffer::from_bytes(b"ab"));
    assert!(Buffer::from_bytes(b"abc") < Buffer::from_bytes(b"abd"));
    assert_eq!(Buffer::from_bytes(b"same"), Buffer::from_bytes(b"same"));
    assert_eq!(Buffer::from_bytes(b"same"), b"same".as_slice());
    assert_eq!(Buffer::from_bytes(b"same"), "same");
}

#[test]
fn test_replace_all() {
    let buf = Buffer::from_replace_all(b"one two two", b"two", b"three");
    assert_eq!(buf.as_bytes(), b"one three three");

    let mut buf = Buffer::from_bytes(b"aaa");
    buf.replace_all(b"aa", b"b");
    assert_eq!(buf.as_bytes(), b"ba", "Matches should not overlap.");

    let mut buf = Buffer::from_bytes(b"unchanged");
    buf.replace_all(b"", b"zzz");
    assert_eq!(buf.as_bytes(), b"unchanged", "An empty pattern should replace nothing.");

    let mut buf = Buffer::from_bytes(b"spaced out words");
    buf.replace_all(b" ", b"");
    assert_eq!(buf.as_bytes(), b"spacedoutwords");
}

#[test]
fn test_format() {
    let buf = Buffer::from_format(format_args!("{}-{:02}", "answer", 4));
    assert_eq!(buf.as_bytes(), b"answer-04");
    assert_eq!(buf.len(), 9, "The dry-run pass should measure the exact length.");
    assert_invariants(&buf);

    let buf = crate::format_buf!("{} + {} = {}", 20, 22, 20 + 22);
    assert_eq!(buf.as_bytes(), b"20 + 22 = 42");

    let mut buf = Buffer::with_capacity(100);
    let cap = buf.capacity();
    buf.assign_format(format_args!("{:x}", 255));
    assert_eq!(buf.as_bytes(), b"ff");
    assert_eq!(buf.capacity(), cap, "Formatting into spare capacity should not reallocate.");

    assert_eq!(Buffer::from_format(format_args!("")).capacity(), 0);
}

#[test]
fn test_to_str_and_display() {
    let buf = Buffer::from_bytes(b"plain text");
    assert_eq!(buf.to_str(), Ok("plain text"));
    assert_eq!(format!("{buf}"), "plain text");

    let buf = Buffer::from_bytes(b"a\nb\xff");
    assert!(buf.to_str().is_err());
    assert_eq!(format!("{buf}"), "a\\nb\\xff", "Display should escape non-printable bytes.");
}

#[test]
fn test_adaptors() {
    let buf = Buffer::from_bytes(b"key material");

    let clone = buf.clone();
    assert_eq!(clone, buf);
    assert_ne!(clone.raw.ptr, buf.raw.ptr, "clone should own a separate allocation.");
    assert_eq!(
        clone.capacity(),
        bucket_cap(clone.len()),
        "A clone should be sized to its own optimal capacity."
    );

    let mut original = buf;
    original.push(b'!');
    assert_eq!(clone.as_bytes(), b"key material", "Mutating the source should not affect a clone.");

    let state = RandomState::new();
    assert_eq!(
        state.hash_one(&clone),
        state.hash_one(Buffer::from_bytes(b"key material")),
        "Equal Buffers should produce the same hash."
    );
    assert_eq!(
        state.hash_one(&clone),
        state.hash_one(clone.as_bytes()),
        "Borrow hash equality should be upheld."
    );
}

#[test]
fn test_take() {
    let mut buf = Buffer::from_bytes(b"contents");
    let moved = buf.take();

    assert_eq!(moved.as_bytes(), b"contents");
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.capacity(), 0, "take should reset the source to the sentinel.");
    assert_invariants(&buf);
}

#[test]
fn test_iterators() {
    let buf: Buffer = (b'a'..=b'e').collect();
    assert_eq!(buf.as_bytes(), b"abcde");

    let collected: Buffer = buf.iter().copied().collect();
    assert_eq!(collected, buf, "Collected borrowed iter should be equal.");

    let mut iter = buf.into_iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(b'a'));
    assert_eq!(iter.next_back(), Some(b'e'));
    assert_eq!(iter.next_back(), Some(b'd'));
    assert_eq!(iter.next(), Some(b'b'));
    assert_eq!(iter.next(), Some(b'c'));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    let mut buf = Buffer::from_bytes(b"ab");
    buf.extend(*b"cd");
    assert_eq!(buf.as_bytes(), b"abcd");
}

#[test]
fn test_mutable_slice_access() {
    let mut buf = Buffer::from_bytes(b"hello");
    buf[0] = b'H';
    buf.as_mut()[4] = b'O';
    assert_eq!(buf.as_bytes(), b"HellO");
    assert_eq!(
        buf.as_bytes_with_nul(),
        b"HellO\0",
        "Slice mutation can't touch the terminator."
    );
}

#[cfg(feature = "read")]
mod read {
    use std::io::Cursor;

    use super::super::*;

    #[test]
    fn test_read_delimited() {
        let mut stream = Cursor::new(b"abc\n".as_slice());
        let mut buf = Buffer::new();

        assert!(buf.read_delimited(&mut stream, b'\n').expect("cursor reads can't fail"));
        assert_eq!(buf.as_bytes(), b"abc");
        assert_eq!(stream.position(), 4, "The stream should sit just past the delimiter.");

        assert!(
            !buf.read_delimited(&mut stream, b'\n').expect("cursor reads can't fail"),
            "A read at end-of-stream with no bytes produced should fail."
        );
        assert_eq!(buf.as_bytes(), b"abc", "A failed read should leave the Buffer untouched.");
    }

    #[test]
    fn test_read_line() {
        let mut stream = Cursor::new(b"first\n\nlast".as_slice());
        let mut buf = Buffer::from_bytes(b"previous contents");

        assert!(buf.read_line(&mut stream).expect("cursor reads can't fail"));
        assert_eq!(buf.as_bytes(), b"first", "A read should overwrite prior content.");

        assert!(buf.read_line(&mut stream).expect("cursor reads can't fail"));
        assert!(
            buf.is_empty(),
            "An empty line followed by the delimiter is a successful empty read."
        );

        assert!(buf.read_line(&mut stream).expect("cursor reads can't fail"));
        assert_eq!(buf.as_bytes(), b"last", "Data before end-of-stream should be a successful read.");

        assert!(!buf.read_line(&mut stream).expect("cursor reads can't fail"));
    }

    #[test]
    fn test_read_growth() {
        let line: Buffer = std::iter::repeat_n(b'z', 10_000).collect();
        let mut raw = line.clone();
        raw.push(b'\n');

        let mut stream = Cursor::new(raw.as_bytes());
        let mut buf = Buffer::new();
        assert!(buf.read_delimited(&mut stream, b'\n').expect("cursor reads can't fail"));
        assert_eq!(buf, line, "Reads should grow across many chunks without losing bytes.");
    }
}
