use bytes::Bytes;

use crate::byte_view::ByteView;
use crate::constants;

/// Locates boundary occurrences inside body chunks, including occurrences
/// whose bytes straddle the edge between the previous and current chunk.
///
/// The searched pattern is assembled per call as
/// `CRLF x pre_crlf + boundary (optional) + CRLF x post_crlf`, which covers
/// the opening boundary (`post_crlf = 1`), the sub-header terminator
/// (`pre_crlf = 2`, no boundary) and the data-end boundary (`pre_crlf = 1`).
#[derive(Debug)]
pub(crate) struct BoundaryScanner {
    boundary: Bytes,
}

impl BoundaryScanner {
    /// `boundary` is the full delimiter, i.e. `--` plus the token from the
    /// `Content-Type` header. Fixed for the lifetime of the parse.
    pub fn new(boundary: Bytes) -> BoundaryScanner {
        BoundaryScanner { boundary }
    }

    pub fn boundary_len(&self) -> usize {
        self.boundary.len()
    }

    /// Returns the offset just past the first occurrence of the pattern at or
    /// after `from` within `chunk`, or `None`.
    ///
    /// The straddling check is attempted only when scanning starts at offset
    /// zero and a lookback chunk exists; it assumes every chunk is at least
    /// as long as the pattern, so a boundary never spans three chunks.
    pub fn scan_end(
        &self,
        chunk: &ByteView,
        lookback: Option<&ByteView>,
        from: usize,
        with_boundary: bool,
        pre_crlf: usize,
        post_crlf: usize,
    ) -> Option<usize> {
        let pattern = self.pattern(with_boundary, pre_crlf, post_crlf);

        if from == 0 {
            if let Some(prev) = lookback {
                if let Some(end) = straddle_end(prev.as_ref(), chunk.as_ref(), &pattern) {
                    return Some(end);
                }
            }
        }

        chunk.find(&pattern, from).map(|at| at + pattern.len())
    }

    fn pattern(&self, with_boundary: bool, pre_crlf: usize, post_crlf: usize) -> Vec<u8> {
        let boundary_len = if with_boundary { self.boundary.len() } else { 0 };
        let mut pattern =
            Vec::with_capacity((pre_crlf + post_crlf) * constants::CRLF.len() + boundary_len);

        for _ in 0..pre_crlf {
            pattern.extend_from_slice(constants::CRLF);
        }
        if with_boundary {
            pattern.extend_from_slice(&self.boundary);
        }
        for _ in 0..post_crlf {
            pattern.extend_from_slice(constants::CRLF);
        }

        pattern
    }
}

/// Finds the longest prefix of `chunk` which is a suffix of `pattern` such
/// that `prev` followed by that prefix ends with the whole pattern. Returns
/// the offset just past the prefix.
fn straddle_end(prev: &[u8], chunk: &[u8], pattern: &[u8]) -> Option<usize> {
    let last = *pattern.last()?;
    let upper = chunk.len().min(pattern.len());

    for idx in (0..upper).rev() {
        if chunk[idx] != last {
            continue;
        }

        let head = &chunk[..=idx];
        if !pattern.ends_with(head) {
            continue;
        }

        if prev.ends_with(&pattern[..pattern.len() - head.len()]) {
            return Some(idx + 1);
        }
    }

    None
}
