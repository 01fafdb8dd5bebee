use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use slr_core::{Delimiter, EncodingKind, ModeKind, OutputFormat, SeededSource, SlrConfig, SparseVectorGenerator};
use slr_io::{
    BatchFormat, BatchedWriter, DocumentSink, TsvWriter, generate_documents, read_identifiers,
    synthesize_ids,
};

use super::cli::{DEFAULT_BATCH_BASE, DEFAULT_OUT};

/// Build the run config: config file first, then any flags on top.
///
/// The result is validated, so every parameter error surfaces before work starts.
pub fn config_from_matches(matches: &ArgMatches) -> Result<SlrConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => SlrConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path))?,
        None => SlrConfig::default(),
    };

    if let Some(&dim) = matches.get_one::<usize>("dim") {
        config.dim = dim;
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        config.mode = ModeKind::from_str(mode)?;
    }
    if let Some(&threshold) = matches.get_one::<f64>("threshold") {
        config.sparsity_threshold = threshold;
    }
    if let Some(&zipf_param) = matches.get_one::<f64>("zipf-param") {
        config.zipf_param = zipf_param;
    }
    if let Some(&precision) = matches.get_one::<u32>("precision") {
        config.precision = precision;
    }
    if let Some(encoding) = matches.get_one::<String>("encoding") {
        config.encoding = EncodingKind::from_str(encoding)?;
    }
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        config.delimiter = Delimiter::from_str(delimiter)?;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(seed);
    }
    if let Some(input) = matches.get_one::<String>("input") {
        config.input_path = Some(PathBuf::from(input));
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output_path = Some(PathBuf::from(output));
    }

    // generate-only flags
    if let Ok(Some(format)) = matches.try_get_one::<String>("format") {
        config.format = OutputFormat::from_str(format)?;
    }
    if let Ok(Some(&docs_per_file)) = matches.try_get_one::<usize>("docs-per-file") {
        config.docs_per_file = docs_per_file;
    }
    if let Ok(Some(&num_docs)) = matches.try_get_one::<usize>("num-docs") {
        config.num_docs = num_docs;
    }
    if let Ok(Some(&start)) = matches.try_get_one::<usize>("start") {
        config.start = start;
    }
    if let Ok(Some(prefix)) = matches.try_get_one::<String>("id-prefix") {
        config.id_prefix = prefix.clone();
    }

    config.validate()?;
    Ok(config)
}

/// A generator over the config's dimensionality and sparsity mode.
pub fn generator_from_config(config: &SlrConfig) -> Result<SparseVectorGenerator<SeededSource>> {
    let generator = SparseVectorGenerator::new(
        config.dim,
        config.sparsity_mode(),
        SeededSource::new(config.seed),
    )?;
    Ok(generator)
}

pub fn run_generate(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;
    let append = matches.get_flag("append");
    let encoding = config.encoding()?;
    let mut generator = generator_from_config(&config)?;

    let output = config.output_path.clone().unwrap_or_else(|| {
        PathBuf::from(match config.format {
            OutputFormat::Tsv => DEFAULT_OUT,
            OutputFormat::TsvBatches | OutputFormat::Json => DEFAULT_BATCH_BASE,
        })
    });

    // identifiers are resolved before any output is created
    let (ids, total): (Box<dyn Iterator<Item = String> + '_>, usize) = match &config.input_path {
        Some(input) => {
            let scan = read_identifiers(&input.to_string_lossy())
                .with_context(|| format!("Failed to read corpus {}", input.display()))?;
            if !scan.skipped.is_empty() {
                warn!(
                    "Skipped {} malformed identifier line(s) in {}",
                    scan.skipped.len(),
                    input.display()
                );
            }
            info!(
                "Found {} identifiers in {} file(s) ({} lines)",
                scan.len(),
                scan.files,
                scan.lines
            );
            let total = scan.len();
            (Box::new(scan.ids.into_iter()), total)
        }
        None => (
            Box::new(synthesize_ids(&config.id_prefix, config.start, config.num_docs)?),
            config.num_docs,
        ),
    };

    let mut sink: Box<dyn DocumentSink> = match config.format {
        OutputFormat::Tsv => Box::new(TsvWriter::create(&output, append)?),
        OutputFormat::TsvBatches => Box::new(BatchedWriter::new(
            &output,
            config.docs_per_file,
            BatchFormat::Lines,
        )?),
        OutputFormat::Json => Box::new(BatchedWriter::new(
            &output,
            config.docs_per_file,
            BatchFormat::Json,
        )?),
    };
    if append && config.format != OutputFormat::Tsv {
        warn!("--append only applies to tsv output; ignoring it");
    }

    info!(
        "Generating {} documents: dim {}, {}, {:?} encoding at precision {}",
        total,
        config.dim,
        config.sparsity_mode(),
        encoding.kind,
        encoding.precision
    );

    generate_documents(ids, &mut generator, &encoding, &mut *sink, Some(total as u64))?;
    let summary = sink.finish()?;

    for file in &summary.files {
        info!("  wrote {}", file.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::cli::create_generate_cli;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use slr_core::SparsityMode;

    fn matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["generate"];
        argv.extend_from_slice(args);
        create_generate_cli().try_get_matches_from(argv).unwrap()
    }

    #[rstest]
    fn test_flags_override_defaults() {
        let config = config_from_matches(&matches(&[
            "--dim", "5000", "--mode", "zipfian", "--zipf-param", "0.5", "--precision", "7",
            "--encoding", "pairs", "--format", "json", "--docs-per-file", "100", "--id-prefix", "q_",
        ]))
        .unwrap();

        assert_eq!(config.dim, 5000);
        assert_eq!(config.sparsity_mode(), SparsityMode::Zipfian { exponent: 0.5 });
        assert_eq!(config.precision, 7);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.docs_per_file, 100);
        assert_eq!(config.id_prefix, "q_");
    }

    #[rstest]
    #[case(&["--dim", "0"])]
    #[case(&["--threshold", "1.5"])]
    #[case(&["--mode", "zipfian", "--zipf-param", "1.0"])]
    #[case(&["--mode", "gaussian"])]
    #[case(&["--encoding", "base64"])]
    #[case(&["--docs-per-file", "0"])]
    #[case(&["--encoding", "repetition", "--precision", "10"])]
    #[case(&["--start", "18446744073709551615", "--num-docs", "2"])]
    fn test_invalid_flags_fail_fast(#[case] args: &[&str]) {
        assert!(config_from_matches(&matches(args)).is_err());
    }

    #[rstest]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "dim: 64\nprecision: 3\nseed: 5\n").unwrap();

        let config = config_from_matches(&matches(&[
            "--config",
            path.to_str().unwrap(),
            "--precision",
            "2",
        ]))
        .unwrap();
        assert_eq!(config.dim, 64);
        assert_eq!(config.precision, 2);
        assert_eq!(config.seed, Some(5));
    }

    #[rstest]
    fn test_run_generate_json_batches() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("fake_robust04_slr");
        let m = matches(&[
            "--dim", "50", "--num-docs", "25", "--docs-per-file", "10", "--format", "json",
            "--seed", "1", "--output", base.to_str().unwrap(),
        ]);
        run_generate(&m).unwrap();

        for n in [10, 20, 25] {
            assert!(dir.path().join(format!("fake_robust04_slr_{}.json", n)).exists());
        }
    }

    #[rstest]
    #[case(&["--threshold", "2.0"])]
    #[case(&["--precision", "12"])]
    fn test_run_generate_rejects_before_writing(#[case] args: &[&str]) {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.tsv");
        let mut argv = args.to_vec();
        argv.extend_from_slice(&["--output", out.to_str().unwrap()]);
        assert!(run_generate(&matches(&argv)).is_err());
        assert!(!out.exists());
    }
}
