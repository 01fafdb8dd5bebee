use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use slr_core::{Delimiter, Encoding, EncodingKind, PostingStats};
use slr_io::split_tsv_line;
use slr_io::utils::get_dynamic_reader;

use super::cli::DEFAULT_TOP;

/// Posting-list lengths over every vector in a TSV file.
pub fn collect_stats(input: &Path, encoding: &Encoding, dim: Option<usize>) -> Result<PostingStats> {
    let reader = get_dynamic_reader(input)?;
    let mut stats = PostingStats::new(dim.unwrap_or(0));
    let mut skipped = 0;

    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed reading {}", input.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((_, vector)) = split_tsv_line(&line) else {
            warn!("Skipping {}:{}: no tab-separated identifier", input.display(), n + 1);
            skipped += 1;
            continue;
        };

        let support = encoding
            .support(vector)
            .with_context(|| format!("Bad vector on {}:{}", input.display(), n + 1))?;
        if dim.is_none() {
            if let Some(&max) = support.last() {
                stats.ensure_dim(max as usize + 1);
            }
        }
        stats
            .observe(&support)
            .with_context(|| format!("Bad vector on {}:{}", input.display(), n + 1))?;
    }

    if skipped > 0 {
        warn!("Skipped {} line(s) without an identifier", skipped);
    }
    Ok(stats)
}

pub fn run_stats(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to a TSV file is required.");
    let kind = match matches.get_one::<String>("encoding") {
        Some(kind) => EncodingKind::from_str(kind)?,
        None => EncodingKind::default(),
    };
    // support extraction never looks at precision or delimiter
    let encoding = Encoding::new(kind, 0, Delimiter::default())?;
    let dim = matches.get_one::<usize>("dim").copied();
    let top = matches.get_one::<usize>("top").copied().unwrap_or(DEFAULT_TOP);

    let stats = collect_stats(Path::new(input), &encoding, dim)?;

    let sorted = stats.sorted_lengths();
    let shown = if top == 0 { sorted.len() } else { top.min(sorted.len()) };
    println!("rank\tdimension\tlength");
    for (rank, (dimension, length)) in sorted.iter().take(shown).enumerate() {
        println!("{}\t{}\t{}", rank + 1, dimension, length);
    }

    let decile = (stats.dim() / 10).max(1);
    info!(
        "{} documents over {} dimensions; {} dimensions never retained; mean posting length {:.2}",
        stats.documents(),
        stats.dim(),
        stats.zero_postings(),
        stats.mean_length()
    );
    info!(
        "Retention rate: first decile {:.4}, last decile {:.4}",
        stats.retention_rate(0..decile),
        stats.retention_rate(stats.dim().saturating_sub(decile)..stats.dim())
    );

    Ok(())
}
