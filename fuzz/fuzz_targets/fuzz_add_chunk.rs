#![no_main]

use formsink::bytes::Bytes;
use formsink::{MultipartStream, Sink, SinkFactory};
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use libfuzzer_sys::fuzz_target;

struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _data: &[u8]) -> formsink::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> formsink::Result<()> {
        Ok(())
    }
}

struct NullSinkFactory;

impl SinkFactory for NullSinkFactory {
    type Sink = NullSink;

    fn open(&mut self, _file_name: &str) -> formsink::Result<NullSink> {
        Ok(NullSink)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("multipart/form-data; boundary=X-BOUNDARY"),
    );

    let mut parser = MultipartStream::new(&headers, "data", NullSinkFactory).expect("valid boundary");

    let mid = data.len() / 2;
    for piece in [&data[..mid], &data[mid..]] {
        match parser.add_chunk(Bytes::copy_from_slice(piece)) {
            Ok(true) => continue,
            Ok(false) | Err(_) => break,
        }
    }
});
