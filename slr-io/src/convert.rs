use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use slr_core::encoding::Encoding;
use slr_core::errors::{Result, SlrError};
use slr_core::generator::SparseVectorGenerator;
use slr_core::models::EncodedDocument;
use slr_core::random::RandomSource;

use crate::utils::{document_progress, get_dynamic_reader, refresh_due};
use crate::writer::DocumentSink;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub documents: usize,
    pub skipped: usize,
    pub files: Vec<PathBuf>,
}

/// Split `<id>\t<rest>` into its identifier and encoded vector.
pub fn split_tsv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let (id, rest) = line.split_once('\t')?;
    if id.is_empty() {
        return None;
    }
    Some((id, rest))
}

///
/// Re-emit a TSV vector file through `sink`, typically a JSON [`crate::BatchedWriter`].
///
/// Each `<id>\t<rest>` line becomes `{"id": id, "contents": rest}`. Lines
/// without a tab-separated identifier are skipped with a warning.
///
pub fn tsv_to_json<W: DocumentSink + ?Sized>(input: &Path, sink: &mut W) -> Result<ConversionReport> {
    let reader = get_dynamic_reader(input)?;
    let progress = document_progress(None);
    let mut report = ConversionReport::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| SlrError::io_at(input, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match split_tsv_line(&line) {
            Some((id, rest)) => {
                sink.write(EncodedDocument::new(id.to_string(), rest.to_string()))?;
                report.documents += 1;
                if refresh_due(report.documents) {
                    progress.set_message(format!("Converted {} documents", report.documents));
                }
            }
            None => {
                warn!("Skipping {}:{}: no tab-separated identifier", input.display(), n + 1);
                report.skipped += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    report.files = sink.finish()?.files;
    info!(
        "Converted {} documents from {} ({} skipped)",
        report.documents,
        input.display(),
        report.skipped
    );
    Ok(report)
}

/// One document of a JSON-lines collection; extra fields are ignored.
#[derive(Debug, Deserialize)]
struct CollectionRecord {
    id: String,
    contents: String,
}

fn annotate_file<S: RandomSource>(
    read_path: &Path,
    write_path: &Path,
    generator: &mut SparseVectorGenerator<S>,
    encoding: &Encoding,
    report: &mut ConversionReport,
) -> Result<()> {
    let reader = get_dynamic_reader(read_path)?;
    let file = File::create(write_path).map_err(|e| SlrError::io_at(write_path, e))?;
    let mut writer = BufWriter::new(file);

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| SlrError::io_at(read_path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: CollectionRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping {}:{}: {}", read_path.display(), n + 1, e);
                report.skipped += 1;
                continue;
            }
        };

        let contents = encoding.encode(&generator.generate())?;
        let doc = EncodedDocument::new(record.id, contents).with_raw(record.contents);
        serde_json::to_writer(&mut writer, &doc)?;
        writeln!(writer).map_err(|e| SlrError::io_at(write_path, e))?;
        report.documents += 1;
    }

    writer.flush().map_err(|e| SlrError::io_at(write_path, e))?;
    Ok(())
}

///
/// Attach a fresh sparse vector to every document of a JSON-lines collection.
///
/// Every file directly inside `input_dir` is read as one `{"id", "contents"}`
/// object per line and rewritten under the same name in `output_dir` as
/// `{"id", "contents": <encoded vector>, "raw": <original contents>}`.
///
pub fn annotate_collection<S: RandomSource>(
    input_dir: &Path,
    output_dir: &Path,
    generator: &mut SparseVectorGenerator<S>,
    encoding: &Encoding,
) -> Result<ConversionReport> {
    if !input_dir.is_dir() {
        return Err(SlrError::invalid(
            "input_path",
            format!("{:?} is not a directory", input_dir),
        ));
    }
    std::fs::create_dir_all(output_dir).map_err(|e| SlrError::io_at(output_dir, e))?;

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(|e| SlrError::io_at(input_dir, e))? {
        let path = entry.map_err(|e| SlrError::io_at(input_dir, e))?.path();
        if path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    info!("Found {} file(s) in {}", inputs.len(), input_dir.display());

    let progress = document_progress(Some(inputs.len() as u64));
    let mut report = ConversionReport::default();

    for read_path in inputs {
        let Some(name) = read_path.file_name() else {
            continue;
        };
        let write_path = output_dir.join(name);
        info!("Transforming {} to {}", read_path.display(), write_path.display());

        annotate_file(&read_path, &write_path, generator, encoding, &mut report)?;
        report.files.push(write_path);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}
