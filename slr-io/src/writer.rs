use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use log::{debug, error, info};

use slr_core::errors::{Result, SlrError};
use slr_core::models::EncodedDocument;

use crate::consts::{JSON_EXTENSION, TSV_EXTENSION};

/// Anything encoded documents can be written to.
pub trait DocumentSink {
    fn write(&mut self, doc: EncodedDocument) -> Result<()>;

    /// Flush everything still pending. Calling it more than once is a no-op.
    fn finish(&mut self) -> Result<SinkSummary>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkSummary {
    pub documents: usize,
    /// Output files in the order they were written.
    pub files: Vec<PathBuf>,
}

enum TsvSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

/// Appends `<id>\t<contents>` lines to one growing file.
///
/// A path ending in `.gz` is gzip-compressed; in append mode every run adds
/// its own gzip member.
pub struct TsvWriter {
    path: PathBuf,
    sink: Option<TsvSink>,
    documents: usize,
}

impl TsvWriter {
    pub fn create(path: &Path, append: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|e| SlrError::io_at(path, e))?;

        let writer = BufWriter::new(file);
        let sink = match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => TsvSink::Gzip(GzEncoder::new(writer, Compression::default())),
            _ => TsvSink::Plain(writer),
        };

        info!(
            "{} {}",
            if append { "Appending to" } else { "Writing" },
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            sink: Some(sink),
            documents: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for TsvWriter {
    fn write(&mut self, doc: EncodedDocument) -> Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Err(SlrError::invalid("writer", "write after finish"));
        };
        let result = match sink {
            TsvSink::Plain(w) => writeln!(w, "{}", doc.to_tsv_line()),
            TsvSink::Gzip(w) => writeln!(w, "{}", doc.to_tsv_line()),
        };
        result.map_err(|e| SlrError::io_at(&self.path, e))?;
        self.documents += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<SinkSummary> {
        if let Some(sink) = self.sink.take() {
            let result = match sink {
                TsvSink::Plain(mut w) => w.flush(),
                TsvSink::Gzip(w) => w.finish().and_then(|mut inner| inner.flush()),
            };
            result.map_err(|e| SlrError::io_at(&self.path, e))?;
        }
        Ok(SinkSummary {
            documents: self.documents,
            files: vec![self.path.clone()],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFormat {
    /// One JSON array of `{"id", "contents"}` objects per file.
    Json,
    /// One `<id>\t<contents>` line per document.
    Lines,
}

impl BatchFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            BatchFormat::Json => JSON_EXTENSION,
            BatchFormat::Lines => TSV_EXTENSION,
        }
    }
}

/// Path of the batch file ending after `cumulative` documents: `<base>_<cumulative>.<ext>`.
pub fn batch_path(base: &Path, cumulative: usize, format: BatchFormat) -> PathBuf {
    let mut name = base
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!("_{}.{}", cumulative, format.extension()));
    base.with_file_name(name)
}

/// Buffers documents and writes them out `docs_per_file` at a time.
///
/// Each full batch goes to `<base>_<cumulative_doc_count>.<ext>`; `finish`
/// writes any partial final batch to a trailing file. A failed write is
/// fatal: the writer refuses further documents and never retries.
pub struct BatchedWriter {
    base: PathBuf,
    docs_per_file: usize,
    format: BatchFormat,
    buffer: Vec<EncodedDocument>,
    written: usize,
    files: Vec<PathBuf>,
    failed: bool,
}

impl BatchedWriter {
    pub fn new(base: &Path, docs_per_file: usize, format: BatchFormat) -> Result<Self> {
        if docs_per_file == 0 {
            return Err(SlrError::invalid("docs_per_file", "must be greater than zero"));
        }
        if base.file_name().is_none() {
            return Err(SlrError::invalid(
                "output_path",
                format!("{:?} has no file name to use as a batch base", base),
            ));
        }
        Ok(Self {
            base: base.to_path_buf(),
            docs_per_file,
            format,
            buffer: Vec::with_capacity(docs_per_file),
            written: 0,
            files: Vec::new(),
            failed: false,
        })
    }

    /// Documents already written to disk.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn write_batch(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        match self.format {
            BatchFormat::Json => {
                serde_json::to_writer(&mut writer, &self.buffer)?;
                writeln!(writer)?;
            }
            BatchFormat::Lines => {
                for doc in &self.buffer {
                    writeln!(writer, "{}", doc.to_tsv_line())?;
                }
            }
        }
        writer.flush()
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let cumulative = self.written + self.buffer.len();
        let path = batch_path(&self.base, cumulative, self.format);

        if let Err(e) = self.write_batch(&path) {
            self.failed = true;
            return Err(SlrError::io_at(path, e));
        }

        debug!("Wrote {} documents to {}", self.buffer.len(), path.display());
        self.written = cumulative;
        self.buffer.clear();
        self.files.push(path);
        Ok(())
    }
}

impl DocumentSink for BatchedWriter {
    fn write(&mut self, doc: EncodedDocument) -> Result<()> {
        if self.failed {
            return Err(SlrError::invalid("writer", "an earlier batch failed to write"));
        }
        self.buffer.push(doc);
        if self.buffer.len() >= self.docs_per_file {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<SinkSummary> {
        if self.failed {
            return Err(SlrError::invalid("writer", "an earlier batch failed to write"));
        }
        self.flush_batch()?;
        info!(
            "Wrote {} documents across {} files",
            self.written,
            self.files.len()
        );
        Ok(SinkSummary {
            documents: self.written,
            files: self.files.clone(),
        })
    }
}

impl Drop for BatchedWriter {
    fn drop(&mut self) {
        if self.failed || self.buffer.is_empty() {
            return;
        }
        if let Err(e) = self.flush_batch() {
            error!("Dropping {} unwritten documents: {}", self.buffer.len(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn doc(i: usize) -> EncodedDocument {
        EncodedDocument::new(format!("doc_{}", i), format!("{} {}", i % 5, i % 5))
    }

    #[rstest]
    fn test_batch_path() {
        let p = batch_path(Path::new("out/dummy_slr"), 20, BatchFormat::Json);
        assert_eq!(p, PathBuf::from("out/dummy_slr_20.json"));
        let p = batch_path(Path::new("slr"), 5, BatchFormat::Lines);
        assert_eq!(p, PathBuf::from("slr_5.tsv"));
    }

    #[rstest]
    fn test_zero_batch_rejected() {
        assert!(matches!(
            BatchedWriter::new(Path::new("x"), 0, BatchFormat::Json),
            Err(SlrError::InvalidParameter { .. })
        ));
    }

    #[rstest]
    fn test_lines_batches() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("slr");
        let mut writer = BatchedWriter::new(&base, 2, BatchFormat::Lines).unwrap();
        for i in 0..3 {
            writer.write(doc(i)).unwrap();
        }
        assert_eq!(writer.written(), 2);
        let summary = writer.finish().unwrap();
        assert_eq!(summary.documents, 3);

        let first = std::fs::read_to_string(dir.path().join("slr_2.tsv")).unwrap();
        assert_eq!(first, "doc_0\t0 0\ndoc_1\t1 1\n");
        let last = std::fs::read_to_string(dir.path().join("slr_3.tsv")).unwrap();
        assert_eq!(last, "doc_2\t2 2\n");
    }

    #[rstest]
    fn test_finish_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BatchedWriter::new(&dir.path().join("b"), 10, BatchFormat::Json).unwrap();
        writer.write(doc(0)).unwrap();
        let a = writer.finish().unwrap();
        let b = writer.finish().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.files.len(), 1);
    }

    #[rstest]
    fn test_drop_flushes_partial_batch() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut writer = BatchedWriter::new(&dir.path().join("b"), 10, BatchFormat::Json).unwrap();
            writer.write(doc(0)).unwrap();
        }
        assert!(dir.path().join("b_1.json").exists());
    }

    #[rstest]
    fn test_failed_batch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("missing").join("b");
        let mut writer = BatchedWriter::new(&base, 1, BatchFormat::Json).unwrap();
        assert!(matches!(writer.write(doc(0)), Err(SlrError::IoFailure { .. })));
        assert!(writer.write(doc(1)).is_err());
        assert!(writer.finish().is_err());
    }

    #[rstest]
    fn test_tsv_writer_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slr.tsv");

        let mut writer = TsvWriter::create(&path, false).unwrap();
        writer.write(doc(0)).unwrap();
        writer.finish().unwrap();

        let mut writer = TsvWriter::create(&path, true).unwrap();
        writer.write(doc(1)).unwrap();
        let summary = writer.finish().unwrap();
        assert_eq!(summary.documents, 1);
        assert!(writer.write(doc(2)).is_err());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "doc_0\t0 0\ndoc_1\t1 1\n");
    }

    #[rstest]
    fn test_tsv_writer_gzip() {
        use std::io::Read;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slr.tsv.gz");
        for (i, append) in [(0, false), (1, true)] {
            let mut writer = TsvWriter::create(&path, append).unwrap();
            writer.write(doc(i)).unwrap();
            writer.finish().unwrap();
        }

        let mut content = String::new();
        crate::utils::get_dynamic_reader(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "doc_0\t0 0\ndoc_1\t1 1\n");
    }
}
