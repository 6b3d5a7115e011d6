use std::fmt::{self, Debug, Display, Formatter};
use std::io;

use derive_more::Display;

/// A set of errors that can occur while constructing the parser or while
/// flushing field data to the sink.
///
/// Malformed multipart input is not reported through this type; it is
/// signalled by the `false` return of
/// [`MultipartStream::add_chunk`](crate::MultipartStream::add_chunk).
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// The `Content-Type` header is missing or not `multipart/form-data`.
    #[display(fmt = "Content-Type is not multipart/form-data")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "Failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,

    /// Opening the sink for a matched field failed.
    #[display(fmt = "failed to open sink '{}': {}", file_name, source)]
    SinkOpen { file_name: String, source: io::Error },

    /// Writing field data to the open sink failed.
    #[display(fmt = "failed to write field data to sink: {}", _0)]
    SinkWrite(io::Error),

    /// Closing the sink failed.
    #[display(fmt = "failed to close sink: {}", _0)]
    SinkClose(io::Error),
}

impl Error {
    /// The underlying I/O error kind, if this is a sink failure.
    ///
    /// Lets callers map sink errors to distinct responses, e.g.
    /// [`PermissionDenied`](io::ErrorKind::PermissionDenied) to a forbidden
    /// response and [`NotFound`](io::ErrorKind::NotFound) for a missing
    /// destination directory.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::SinkOpen { source, .. } => Some(source.kind()),
            Error::SinkWrite(err) | Error::SinkClose(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
