use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use slr_core::consts::DEFAULT_DOCS_PER_FILE;
use slr_io::{BatchFormat, BatchedWriter, tsv_to_json};

/// Strip `.gz`, then the remaining extension.
fn default_base(input: &Path) -> PathBuf {
    let input = match input.extension().and_then(|e| e.to_str()) {
        Some("gz") => input.with_extension(""),
        _ => input.to_path_buf(),
    };
    input.with_extension("")
}

pub fn run_tsv2json(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to a TSV file is required.");
    let input = Path::new(input);

    let base = match matches.get_one::<String>("output") {
        Some(output) => PathBuf::from(output),
        None => default_base(input),
    };
    let docs_per_file = matches
        .get_one::<usize>("docs-per-file")
        .copied()
        .unwrap_or(DEFAULT_DOCS_PER_FILE);

    let mut writer = BatchedWriter::new(&base, docs_per_file, BatchFormat::Json)?;
    let report = tsv_to_json(input, &mut writer)?;

    info!(
        "Wrote {} documents to {} file(s) with base {}",
        report.documents,
        report.files.len(),
        base.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("data/dummy_slr_file.txt", "data/dummy_slr_file")]
    #[case("data/dummy_slr_file.tsv.gz", "data/dummy_slr_file")]
    #[case("slr", "slr")]
    fn test_default_base(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(default_base(Path::new(input)), PathBuf::from(expected));
    }
}
