//! A streaming `multipart/form-data` decoder that extracts one designated
//! form field and writes its raw content to a file sink, chunk by chunk.
//!
//! The body may arrive in arbitrarily sized pieces: boundary markers split
//! across two chunks are detected through a single-chunk lookback, so the
//! output is byte-exact regardless of how the transport chunked the input,
//! in one forward pass and with bounded memory.
//!
//! # Examples
//!
//! ```
//! use formsink::{FileSinkFactory, MultipartStream};
//! use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
//!
//! # fn run() -> formsink::Result<()> {
//! let mut headers = HeaderMap::new();
//! headers.insert(
//!     CONTENT_TYPE,
//!     HeaderValue::from_static("multipart/form-data; boundary=X-BOUNDARY"),
//! );
//!
//! let factory = FileSinkFactory::new(std::env::temp_dir());
//! let mut parser = MultipartStream::new(&headers, "data", factory)?;
//!
//! let body = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"data\"; filename=\"hello.txt\"\r\n\r\nhello\r\n--X-BOUNDARY--\r\n";
//! assert!(parser.add_chunk(body)?);
//! assert!(parser.is_finished());
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

pub use bytes;

pub use error::Error;
pub use multipart::MultipartStream;
pub use sink::{FileSink, FileSinkFactory, Sink, SinkFactory};

mod byte_view;
mod constants;
mod content_disposition;
mod error;
mod helpers;
mod multipart;
mod scanner;
mod sink;
mod state;

/// A Result type often returned from methods that can have `formsink` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses the `Content-Type` header to extract the boundary value.
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> crate::Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if !(m.type_() == mime::MULTIPART_FORM_DATA.type_() && m.subtype() == mime::MULTIPART_FORM_DATA.subtype()) {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundary() {
        let content_type = "multipart/form-data; boundary=ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("ABCDEFG".to_owned()));

        let content_type = "multipart/form-data; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("------ABCDEFG".to_owned()));

        let content_type = "multipart/form-data";
        assert_eq!(parse_boundary(content_type), Err(Error::NoBoundary));

        let content_type = "boundary=------ABCDEFG";
        assert!(parse_boundary(content_type).is_err());

        let content_type = "text/plain";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));

        let content_type = "text/plain; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));
    }
}
