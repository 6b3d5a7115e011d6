/// The phases a [`MultipartStream`](crate::MultipartStream) moves through
/// while consuming body chunks. Exactly one is active at a time; a single
/// feeding call may traverse several of them if the chunk carries enough
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParserState {
    /// Searching for the opening boundary of the next part.
    Ready,
    /// Accumulating sub-header bytes until the blank-line terminator.
    Header,
    /// Streaming part data until the closing boundary.
    Data,
    /// Reading the up-to-four bytes that follow a boundary.
    DataEnd,
    /// The terminal marker was seen; no further input is accepted.
    Finished,
}
