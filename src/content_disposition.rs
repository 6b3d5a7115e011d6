use bytes::Bytes;

use crate::byte_view::ByteView;
use crate::constants;
use crate::helpers;

/// The field and file name extracted from one part's accumulated sub-headers.
pub(crate) struct ContentDisposition {
    pub(crate) field_name: Option<Bytes>,
    pub(crate) file_name: Option<Bytes>,
}

impl ContentDisposition {
    /// Parses the completed sub-header block of one part.
    ///
    /// Scanning stops at the first line that yields a field name. When a
    /// field name is present but the file name is absent or blank, a
    /// timestamped `upload-<epoch>.dat` name is synthesized.
    pub fn parse(header_block: &ByteView) -> ContentDisposition {
        let mut field_name = None;
        let mut file_name = None;

        for line in header_block.split(constants::CRLF) {
            let header = line.split(b": ");
            if header.len() >= 2 && header[0] == constants::CONTENT_DISPOSITION {
                let params = header[1].split(b"; ");
                if params.len() >= 2 && params[0] == constants::FORM_DATA {
                    for param in &params[1..] {
                        let pair = param.split(b"=");
                        if pair.len() != 2 {
                            continue;
                        }
                        if pair[0] == b"name"[..] {
                            field_name = Some(unquote(&pair[1]));
                        } else if pair[0] == b"filename"[..] {
                            file_name = Some(unquote(&pair[1]));
                        }
                    }
                }
            }

            if field_name.is_some() {
                if !file_name.as_deref().map_or(false, has_visible_bytes) {
                    file_name = Some(helpers::generated_file_name());
                }
                break;
            }
        }

        ContentDisposition { field_name, file_name }
    }
}

// The parameter value is assumed to be a quoted string.
fn unquote(value: &ByteView) -> Bytes {
    value.slice(1, -1).into_bytes()
}

fn has_visible_bytes(name: &[u8]) -> bool {
    name.iter().any(|b| !b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(block: &'static [u8]) -> ContentDisposition {
        ContentDisposition::parse(&ByteView::new(Bytes::from_static(block)))
    }

    #[test]
    fn test_field_and_file_name() {
        let cd = parse(b"Content-Disposition: form-data; name=\"data\"; filename=\"a.txt\"");
        assert_eq!(cd.field_name.as_deref(), Some(&b"data"[..]));
        assert_eq!(cd.file_name.as_deref(), Some(&b"a.txt"[..]));
    }

    #[test]
    fn test_multi_line_header_block() {
        let cd = parse(
            b"Content-Type: text/plain\r\nContent-Disposition: form-data; name=\"f\"; filename=\"x y.bin\"",
        );
        assert_eq!(cd.field_name.as_deref(), Some(&b"f"[..]));
        assert_eq!(cd.file_name.as_deref(), Some(&b"x y.bin"[..]));
    }

    #[test]
    fn test_missing_file_name_is_generated() {
        let cd = parse(b"Content-Disposition: form-data; name=\"data\"");
        assert_eq!(cd.field_name.as_deref(), Some(&b"data"[..]));

        let file_name = cd.file_name.expect("generated file name");
        assert!(file_name.starts_with(b"upload-"));
        assert!(file_name.ends_with(b".dat"));
    }

    #[test]
    fn test_blank_file_name_is_generated() {
        let cd = parse(b"Content-Disposition: form-data; name=\"data\"; filename=\"\"");
        let file_name = cd.file_name.expect("generated file name");
        assert!(file_name.starts_with(b"upload-"));
    }

    #[test]
    fn test_no_content_disposition() {
        let cd = parse(b"Content-Type: text/plain");
        assert!(cd.field_name.is_none());
        assert!(cd.file_name.is_none());
    }

    #[test]
    fn test_non_form_data_disposition_is_ignored() {
        let cd = parse(b"Content-Disposition: attachment; name=\"data\"");
        assert!(cd.field_name.is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let cd = parse(
            b"Content-Disposition: form-data; name=\"first\"\r\nContent-Disposition: form-data; name=\"second\"",
        );
        assert_eq!(cd.field_name.as_deref(), Some(&b"first"[..]));
    }
}
