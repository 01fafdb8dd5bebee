use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};

use slr_core::errors::{Result, SlrError};

use crate::consts::PROGRESS_REFRESH;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|e| SlrError::io_at(path, e))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(flate2::read::MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Expand `pattern` into the sorted list of matching files.
///
/// A plain path matches itself; a directory expands to the files directly
/// inside it.
pub fn expand_input(pattern: &str) -> Result<Vec<PathBuf>> {
    let as_path = Path::new(pattern);
    if as_path.is_file() {
        return Ok(vec![as_path.to_path_buf()]);
    }
    if as_path.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(as_path).map_err(|e| SlrError::io_at(as_path, e))? {
            let path = entry.map_err(|e| SlrError::io_at(as_path, e))?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        return Ok(files);
    }

    let entries = glob(pattern)
        .map_err(|e| SlrError::invalid("input_path", format!("bad pattern `{}`: {}", pattern, e)))?;
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => return Err(SlrError::io_at(e.path().to_path_buf(), e.into_error())),
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(SlrError::invalid(
            "input_path",
            format!("no files match `{}`", pattern),
        ));
    }
    Ok(files)
}

/// Whether a spinner message is due after `count` written documents.
pub fn refresh_due(count: usize) -> bool {
    count > 0 && count as u64 % PROGRESS_REFRESH == 0
}

/// Progress bar for a known number of documents, or a spinner otherwise.
pub fn document_progress(total: Option<u64>) -> ProgressBar {
    match total {
        Some(total) => {
            let bar = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents")
            {
                bar.set_style(style);
            }
            bar
        }
        None => {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg} ({per_sec})") {
                spinner.set_style(style.tick_strings(&["-", "\\", "|", "/"]));
            }
            spinner
        }
    }
}
