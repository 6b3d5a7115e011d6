use bytes::Bytes;
use memchr::memmem;
use std::ops::Index;

/// A borrowed window over a refcounted byte buffer.
///
/// Cloning or re-slicing never copies the underlying bytes; child views keep
/// the same buffer alive through its reference count.
///
/// Slicing follows a normalize-and-clamp contract: negative indices count
/// from the end of the view, everything is clamped into `[0, len]`, and an
/// inverted range yields an empty view. Slicing never fails. The boundary
/// trimming in the parser relies on this exact behavior.
#[derive(Clone, Debug)]
pub(crate) struct ByteView {
    buf: Bytes,
}

impl ByteView {
    pub fn new(buf: Bytes) -> ByteView {
        ByteView { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Derives a zero-copy sub-view over `[start, end)` with normalized and
    /// clamped indices.
    pub fn slice(&self, start: isize, end: isize) -> ByteView {
        let start = self.normalize(start);
        let end = self.normalize(end);

        if start >= end {
            return ByteView::new(self.buf.slice(start..start));
        }

        ByteView::new(self.buf.slice(start..end))
    }

    fn normalize(&self, idx: isize) -> usize {
        let len = self.len() as isize;
        let idx = if idx < 0 { len + idx } else { idx };
        idx.max(0).min(len) as usize
    }

    /// Returns the offset of the first occurrence of `needle` at or after
    /// `from`, relative to this view.
    pub fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        if from > self.len() {
            return None;
        }

        memmem::find(&self.buf[from..], needle).map(|idx| from + idx)
    }

    /// Partitions the view on every non-overlapping occurrence of `delim`.
    ///
    /// The delimiter is consumed; the result always has at least one element,
    /// even if it is an empty trailing remainder.
    pub fn split(&self, delim: &[u8]) -> Vec<ByteView> {
        let mut parts = Vec::new();
        let mut start = 0;

        if !delim.is_empty() {
            while let Some(at) = self.find(delim, start) {
                parts.push(self.slice(start as isize, at as isize));
                start = at + delim.len();
            }
        }

        parts.push(self.slice(start as isize, self.len() as isize));
        parts
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl Index<usize> for ByteView {
    type Output = u8;

    fn index(&self, idx: usize) -> &u8 {
        &self.buf[idx]
    }
}

impl PartialEq<[u8]> for ByteView {
    fn eq(&self, other: &[u8]) -> bool {
        self.buf == other
    }
}

impl PartialEq<&[u8]> for ByteView {
    fn eq(&self, other: &&[u8]) -> bool {
        self.buf == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(data: &'static [u8]) -> ByteView {
        ByteView::new(Bytes::from_static(data))
    }

    #[test]
    fn test_slice_basic() {
        let v = view(b"hello world");
        assert_eq!(v.slice(0, 5), b"hello"[..]);
        assert_eq!(v.slice(6, 11), b"world"[..]);
        assert_eq!(v.len(), 11);
    }

    #[test]
    fn test_slice_negative_indices() {
        let v = view(b"hello world");
        assert_eq!(v.slice(0, -6), b"hello"[..]);
        assert_eq!(v.slice(-5, v.len() as isize), b"world"[..]);
        assert_eq!(v.slice(-5, -1), b"worl"[..]);
    }

    #[test]
    fn test_slice_clamps_out_of_range() {
        let v = view(b"abc");
        assert_eq!(v.slice(0, 100), b"abc"[..]);
        assert_eq!(v.slice(-100, 2), b"ab"[..]);
        assert_eq!(v.slice(0, -100), b""[..]);
    }

    #[test]
    fn test_slice_inverted_range_is_empty() {
        let v = view(b"abcdef");
        assert!(v.slice(4, 2).is_empty());
        assert!(v.slice(3, 3).is_empty());
    }

    #[test]
    fn test_slice_is_zero_copy() {
        let v = view(b"abcdef");
        let child = v.slice(2, 5);
        let grandchild = child.slice(1, -1);
        assert_eq!(child, b"cde"[..]);
        assert_eq!(grandchild, b"d"[..]);
    }

    #[test]
    fn test_find() {
        let v = view(b"one, two, one");
        assert_eq!(v.find(b"one", 0), Some(0));
        assert_eq!(v.find(b"one", 1), Some(10));
        assert_eq!(v.find(b"three", 0), None);
        assert_eq!(v.find(b"one", 11), None);
        assert_eq!(v.find(b"one", 100), None);
    }

    #[test]
    fn test_split() {
        let v = view(b"a; b; c");
        let parts = v.split(b"; ");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], b"a"[..]);
        assert_eq!(parts[1], b"b"[..]);
        assert_eq!(parts[2], b"c"[..]);
    }

    #[test]
    fn test_split_no_delimiter_yields_whole_view() {
        let v = view(b"abc");
        let parts = v.split(b",");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], b"abc"[..]);
    }

    #[test]
    fn test_split_trailing_delimiter_yields_empty_remainder() {
        let v = view(b"a\r\nb\r\n");
        let parts = v.split(b"\r\n");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], b"a"[..]);
        assert_eq!(parts[1], b"b"[..]);
        assert!(parts[2].is_empty());
    }

    #[test]
    fn test_index() {
        let v = view(b"xyz");
        assert_eq!(v[0], b'x');
        assert_eq!(v[2], b'z');
    }
}
