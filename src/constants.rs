pub(crate) const BOUNDARY_EXT: &[u8] = b"--";
pub(crate) const CRLF: &[u8] = b"\r\n";
pub(crate) const CRLF_CRLF: &[u8] = b"\r\n\r\n";

/// The four bytes following the closing boundary: `--` plus CRLF.
pub(crate) const FINAL_MARKER: &[u8] = b"--\r\n";
pub(crate) const END_MARKER_LEN: usize = 4;

pub(crate) const CONTENT_DISPOSITION: &[u8] = b"Content-Disposition";
pub(crate) const FORM_DATA: &[u8] = b"form-data";
