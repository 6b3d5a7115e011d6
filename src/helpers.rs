use bytes::Bytes;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fallback file name for a part that carries a `name` parameter but no
/// usable `filename`.
pub(crate) fn generated_file_name() -> Bytes {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);

    Bytes::from(format!("upload-{}.dat", epoch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_file_name_shape() {
        let name = generated_file_name();
        assert!(name.starts_with(b"upload-"));
        assert!(name.ends_with(b".dat"));
        assert!(name[7..name.len() - 4].iter().all(u8::is_ascii_digit));
    }
}
