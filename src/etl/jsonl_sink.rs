use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::errors::{Error, Result};

/// Writes one JSON document per line, in the order they are handed in.
pub struct JsonlSink<W: Write> {
    writer: BufWriter<W>,
    lines_written: u64,
}

impl JsonlSink<File> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(Error::sink)?;
        }
        let file = File::create(path)
            .map_err(|err| Error::sink(format!("Could not create {}: {}", path.display(), err)))?;
        Ok(JsonlSink::new(file))
    }
}

impl<W: Write> JsonlSink<W> {
    pub fn new(output: W) -> Self {
        JsonlSink {
            writer: BufWriter::new(output),
            lines_written: 0,
        }
    }

    pub fn write_line<T: Serialize>(&mut self, line: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, line).map_err(Error::sink)?;
        self.writer.write_all(b"\n").map_err(Error::sink)?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flush buffered lines and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer.into_inner().map_err(|err| Error::sink(err.error()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::data::history::{HistoryEntry, HistoryLine};
    use crate::errors::ErrorKind;

    #[test]
    fn writes_one_line_per_history() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.write_line(&HistoryLine("N1".to_string(), vec![HistoryEntry(5, 1, 1, vec!["0:a".to_string()])]))
            .unwrap();
        sink.write_line(&HistoryLine("W2".to_string(), vec![HistoryEntry(6, 3, 0, Vec::new())]))
            .unwrap();
        assert_eq!(sink.lines_written(), 2);

        let bytes = sink.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "[\"N1\",[[5,1,1,[\"0:a\"]]]]\n[\"W2\",[[6,3,0,[]]]]\n"
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn write_failures_are_sink_errors() {
        let mut sink = JsonlSink::new(FailingWriter);
        // Small lines stay in the buffer until the flush.
        sink.write_line(&HistoryLine("N1".to_string(), Vec::new())).unwrap();
        let err = sink.finish().err().unwrap();
        assert!(matches!(err.kind, ErrorKind::Sink));
        assert!(err.message.contains("disk full"));
    }
}
