use bytes::{Bytes, BytesMut};
use http::header;
use http::HeaderMap;

use crate::byte_view::ByteView;
use crate::constants;
use crate::content_disposition::ContentDisposition;
use crate::scanner::BoundaryScanner;
use crate::sink::{Sink, SinkFactory};
use crate::state::ParserState;

/// A push-driven `multipart/form-data` decoder that extracts one target
/// field and streams its raw content to a [`Sink`].
///
/// One instance serves one upload request: construct it from the request
/// headers and a target field name, then feed the body chunks in arrival
/// order with [`add_chunk`](MultipartStream::add_chunk). The machine opens a
/// sink only while the part being parsed matches the target field, and it
/// closes that sink on every exit path, including drop.
///
/// The body never needs to be buffered whole; memory use is bounded by the
/// largest single chunk plus the accumulated sub-headers of the current part.
pub struct MultipartStream<F: SinkFactory> {
    scanner: BoundaryScanner,
    state: ParserState,
    lookback: Option<ByteView>,
    pending_data: Option<ByteView>,
    header_buf: BytesMut,
    end_marker: Vec<u8>,
    target_field: Bytes,
    factory: F,
    sink: Option<F::Sink>,
}

impl<F: SinkFactory> std::fmt::Debug for MultipartStream<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartStream")
            .field("scanner", &self.scanner)
            .field("state", &self.state)
            .field("lookback", &self.lookback)
            .field("pending_data", &self.pending_data)
            .field("header_buf", &self.header_buf)
            .field("end_marker", &self.end_marker)
            .field("target_field", &self.target_field)
            .finish_non_exhaustive()
    }
}

impl<F: SinkFactory> MultipartStream<F> {
    /// Constructs a parser from the request headers and the name of the form
    /// field whose content should be persisted.
    ///
    /// Fails with a configuration error when the `Content-Type` header is
    /// missing, is not `multipart/form-data`, or lacks a `boundary`
    /// parameter.
    pub fn new(
        headers: &HeaderMap,
        target_field: impl Into<Bytes>,
        factory: F,
    ) -> crate::Result<MultipartStream<F>> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|val| val.to_str().ok())
            .ok_or(crate::Error::NoMultipart)?;

        let token = crate::parse_boundary(content_type)?;

        let mut boundary = BytesMut::with_capacity(constants::BOUNDARY_EXT.len() + token.len());
        boundary.extend_from_slice(constants::BOUNDARY_EXT);
        boundary.extend_from_slice(token.as_bytes());

        Ok(MultipartStream {
            scanner: BoundaryScanner::new(boundary.freeze()),
            state: ParserState::Ready,
            lookback: None,
            pending_data: None,
            header_buf: BytesMut::new(),
            end_marker: Vec::with_capacity(constants::END_MARKER_LEN),
            target_field: target_field.into(),
            factory,
            sink: None,
        })
    }

    /// Feeds the next body chunk.
    ///
    /// Returns `Ok(true)` to keep feeding (or after successful completion,
    /// see [`is_finished`](MultipartStream::is_finished)), `Ok(false)` when
    /// the stream is malformed or the machine already finished, and `Err`
    /// when the sink fails.
    ///
    /// Chunks must arrive in order, without re-delivery, and every non-empty
    /// chunk must be at least as long as the boundary: the straddling check
    /// keeps a single lookback chunk, so a boundary split across three or
    /// more chunks would go undetected. An empty chunk is a no-op.
    pub fn add_chunk(&mut self, chunk: impl Into<Bytes>) -> crate::Result<bool> {
        let chunk = chunk.into();

        if self.state == ParserState::Finished {
            return Ok(false);
        }
        if chunk.is_empty() {
            return Ok(true);
        }

        log::trace!("feeding chunk of {} bytes", chunk.len());

        let chunk = ByteView::new(chunk);
        let mut pos = 0;

        loop {
            match self.state {
                ParserState::Ready => {
                    match self
                        .scanner
                        .scan_end(&chunk, self.lookback.as_ref(), pos, true, 0, 1)
                    {
                        Some(end) => {
                            pos = end;
                            self.header_buf.clear();
                            self.set_state(ParserState::Header);
                        }
                        None => break,
                    }
                }
                ParserState::Header => {
                    let from = pos;
                    let terminator_len = constants::CRLF_CRLF.len();

                    match self
                        .scanner
                        .scan_end(&chunk, self.lookback.as_ref(), pos, false, 2, 0)
                    {
                        Some(end) => {
                            pos = end;

                            let upto = end.saturating_sub(terminator_len);
                            self.header_buf
                                .extend_from_slice(chunk.slice(from as isize, upto as isize).as_ref());

                            let mut header_block = ByteView::new(self.header_buf.split().freeze());
                            // a terminator matched near offset zero straddles
                            // the chunk edge, so part of it was already
                            // accumulated; trim it back off
                            if end < terminator_len {
                                header_block =
                                    header_block.slice(0, end as isize - terminator_len as isize);
                            }

                            let cd = ContentDisposition::parse(&header_block);
                            self.open_sink(cd)?;
                            self.pending_data = None;
                            self.set_state(ParserState::Data);
                        }
                        None => {
                            self.header_buf.extend_from_slice(
                                chunk.slice(from as isize, chunk.len() as isize).as_ref(),
                            );
                            break;
                        }
                    }
                }
                ParserState::Data => {
                    let from = pos;
                    let found = self
                        .scanner
                        .scan_end(&chunk, self.lookback.as_ref(), pos, true, 1, 0);

                    if self.sink.is_some() {
                        // CRLF plus boundary, the same pattern scan_end used
                        let tail_len = constants::CRLF.len() + self.scanner.boundary_len();

                        match found {
                            None => {
                                // the pending chunk is now proven free of a
                                // trailing partial boundary
                                if let Some(pending) = self.pending_data.take() {
                                    self.write_sink(pending.as_ref())?;
                                }
                                self.pending_data =
                                    Some(chunk.slice(from as isize, chunk.len() as isize));
                            }
                            Some(end) => {
                                if let Some(mut pending) = self.pending_data.take() {
                                    if end < tail_len {
                                        // the boundary started inside the
                                        // pending chunk; drop that suffix
                                        pending =
                                            pending.slice(0, end as isize - tail_len as isize);
                                    }
                                    self.write_sink(pending.as_ref())?;
                                }
                                if end > tail_len {
                                    self.write_sink(
                                        chunk
                                            .slice(from as isize, (end - tail_len) as isize)
                                            .as_ref(),
                                    )?;
                                }
                            }
                        }
                    }

                    match found {
                        Some(end) => {
                            pos = end;
                            self.close_sink()?;
                            self.end_marker.clear();
                            self.set_state(ParserState::DataEnd);
                        }
                        None => break,
                    }
                }
                ParserState::DataEnd => {
                    while pos < chunk.len() && self.state == ParserState::DataEnd {
                        self.end_marker.push(chunk[pos]);
                        pos += 1;

                        if self.end_marker.len() == constants::CRLF.len()
                            && self.end_marker == constants::CRLF
                        {
                            // more parts follow
                            self.header_buf.clear();
                            self.set_state(ParserState::Header);
                        } else if self.end_marker.len() == constants::END_MARKER_LEN {
                            self.set_state(ParserState::Finished);
                            if self.end_marker == constants::FINAL_MARKER {
                                return Ok(true);
                            }
                            log::debug!("malformed terminal marker: {:?}", self.end_marker);
                            return Ok(false);
                        }
                    }

                    if self.state == ParserState::DataEnd {
                        // marker incomplete, wait for the next chunk
                        break;
                    }
                }
                // unreachable: guarded at the top and returned from above
                ParserState::Finished => break,
            }
        }

        self.lookback = Some(chunk);
        Ok(true)
    }

    /// Whether the machine has gone terminal and accepts no further input.
    ///
    /// Success or failure of the parse as a whole is reported by the return
    /// value of the [`add_chunk`](MultipartStream::add_chunk) call that
    /// consumed the terminal marker.
    pub fn is_finished(&self) -> bool {
        self.state == ParserState::Finished
    }

    fn open_sink(&mut self, cd: ContentDisposition) -> crate::Result<()> {
        self.sink = None;

        if cd.field_name.as_deref() != Some(&self.target_field[..]) {
            return Ok(());
        }

        let file_name = cd.file_name.unwrap_or_default();
        let file_name = String::from_utf8_lossy(&file_name);
        log::debug!(
            "matched field '{}', opening sink '{}'",
            String::from_utf8_lossy(&self.target_field),
            file_name
        );
        self.sink = Some(self.factory.open(&file_name)?);

        Ok(())
    }

    fn write_sink(&mut self, data: &[u8]) -> crate::Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        match self.sink.as_mut() {
            Some(sink) => sink.write(data),
            None => Ok(()),
        }
    }

    fn close_sink(&mut self) -> crate::Result<()> {
        if let Some(mut sink) = self.sink.take() {
            sink.close()?;
        }

        Ok(())
    }

    fn set_state(&mut self, next: ParserState) {
        log::debug!("parser state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<F: SinkFactory> Drop for MultipartStream<F> {
    fn drop(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(err) = sink.close() {
                log::warn!("failed to close sink while dropping the parser: {}", err);
            }
        }
    }
}
