use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// The write destination for one matched part's data.
///
/// At most one sink is open at a time; it is owned by the parser for the
/// duration of the matched field's data phase and closed on every exit path,
/// including abandonment and mid-parse errors.
pub trait Sink {
    /// Appends raw field bytes, in order.
    fn write(&mut self, data: &[u8]) -> crate::Result<()>;

    /// Releases the destination. Idempotent.
    fn close(&mut self) -> crate::Result<()>;
}

/// Opens a fresh [`Sink`] when a part matches the target field.
pub trait SinkFactory {
    type Sink: Sink;

    /// `file_name` is the client-supplied `filename` parameter, or the
    /// generated `upload-<epoch>.dat` fallback.
    fn open(&mut self, file_name: &str) -> crate::Result<Self::Sink>;
}

/// A [`SinkFactory`] creating regular files inside a destination directory.
pub struct FileSinkFactory {
    dest: PathBuf,
}

impl FileSinkFactory {
    pub fn new(dest: impl Into<PathBuf>) -> FileSinkFactory {
        FileSinkFactory { dest: dest.into() }
    }
}

impl SinkFactory for FileSinkFactory {
    type Sink = FileSink;

    fn open(&mut self, file_name: &str) -> crate::Result<FileSink> {
        let path = self.dest.join(file_name);
        let file = File::create(&path).map_err(|source| crate::Error::SinkOpen {
            file_name: file_name.to_owned(),
            source,
        })?;

        Ok(FileSink { file: Some(file) })
    }
}

/// A [`Sink`] backed by a regular file.
#[derive(Debug)]
pub struct FileSink {
    file: Option<File>,
}

impl Sink for FileSink {
    fn write(&mut self, data: &[u8]) -> crate::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(data).map_err(crate::Error::SinkWrite),
            None => Err(crate::Error::SinkWrite(io::Error::new(
                io::ErrorKind::Other,
                "sink is already closed",
            ))),
        }
    }

    fn close(&mut self) -> crate::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(crate::Error::SinkClose)?;
        }

        Ok(())
    }
}
