use anyhow::{Result, bail};
use clap::ArgMatches;
use log::info;

use slr_io::annotate_collection;

use crate::generate::handlers::{config_from_matches, generator_from_config};

pub fn run_annotate(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;
    let Some(input_dir) = config.input_path.clone() else {
        bail!("annotate needs --input <dir> with the JSON collection");
    };
    let Some(output_dir) = config.output_path.clone() else {
        bail!("annotate needs --output <dir> for the annotated collection");
    };

    let encoding = config.encoding()?;
    let mut generator = generator_from_config(&config)?;

    let report = annotate_collection(&input_dir, &output_dir, &mut generator, &encoding)?;
    info!(
        "Annotated {} documents across {} file(s) ({} skipped)",
        report.documents,
        report.files.len(),
        report.skipped
    );

    Ok(())
}
