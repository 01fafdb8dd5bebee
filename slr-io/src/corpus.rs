use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use slr_core::consts::{DOCNO_MARKER, DOCNO_TAG};
use slr_core::errors::{Result, SlrError};

use crate::utils::{expand_input, get_dynamic_reader};

/// Why a line carrying the identifier marker produced no identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The marker is present but nothing follows it.
    MissingIdentifier,
    /// The line is not valid UTF-8.
    InvalidUtf8,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingIdentifier => write!(f, "{} marker without an identifier", DOCNO_MARKER),
            SkipReason::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Identifier(String),
    /// Ordinary content line.
    NoMarker,
    Skipped(SkipReason),
}

///
/// Extract a document identifier from one corpus line.
///
/// Accepts `<DOCNO> FBIS3-1 </DOCNO>`, `<DOCNO>FBIS3-1</DOCNO>` and the
/// bare `DOCNO FBIS3-1` form. The bare marker must be a whole
/// whitespace-delimited token, so `DOCNOTES` or `<DOCNOX>` are content.
///
pub fn scan_line(line: &str) -> LineOutcome {
    if let Some(pos) = line.find(DOCNO_TAG) {
        let rest = &line[pos + DOCNO_TAG.len()..];
        let rest = match rest.find('<') {
            Some(end) => &rest[..end],
            None => rest,
        };
        return match rest.split_whitespace().next() {
            Some(id) => LineOutcome::Identifier(id.to_string()),
            None => LineOutcome::Skipped(SkipReason::MissingIdentifier),
        };
    }

    let mut tokens = line.split_whitespace();
    if !tokens.any(|token| token == DOCNO_MARKER) {
        return LineOutcome::NoMarker;
    }
    match tokens.next() {
        Some(id) => LineOutcome::Identifier(id.to_string()),
        None => LineOutcome::Skipped(SkipReason::MissingIdentifier),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub path: PathBuf,
    /// 1-based.
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Identifiers found in a corpus, plus every line that was skipped.
#[derive(Debug, Clone, Default)]
pub struct CorpusScan {
    pub ids: Vec<String>,
    pub skipped: Vec<SkippedLine>,
    pub files: usize,
    pub lines: usize,
}

impl CorpusScan {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Scan a single (optionally gzipped) file and append its results.
    pub fn scan_file(&mut self, path: &Path) -> Result<()> {
        let mut reader = get_dynamic_reader(path)?;
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| SlrError::io_at(path, e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let outcome = match std::str::from_utf8(&buf) {
                Ok(line) => scan_line(line),
                Err(_) => match scan_line(&String::from_utf8_lossy(&buf)) {
                    LineOutcome::NoMarker => LineOutcome::NoMarker,
                    _ => LineOutcome::Skipped(SkipReason::InvalidUtf8),
                },
            };

            match outcome {
                LineOutcome::Identifier(id) => self.ids.push(id),
                LineOutcome::NoMarker => {}
                LineOutcome::Skipped(reason) => {
                    warn!("Skipping {}:{}: {}", path.display(), line_number, reason);
                    self.skipped.push(SkippedLine {
                        path: path.to_path_buf(),
                        line_number,
                        reason,
                    });
                }
            }
        }

        self.files += 1;
        self.lines += line_number;
        debug!("Scanned {} lines from {}", line_number, path.display());
        Ok(())
    }
}

/// Collect identifiers from a file, a directory of files, or a glob pattern.
pub fn read_identifiers(input: &str) -> Result<CorpusScan> {
    let mut scan = CorpusScan::default();
    for path in expand_input(input)? {
        scan.scan_file(&path)?;
    }
    Ok(scan)
}
