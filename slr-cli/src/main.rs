mod annotate;
mod config;
mod convert;
mod generate;
mod stats;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::filter::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "slr";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Generate and reformat synthetic sparse lexical representation (SLR) documents for retrieval experiments.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log debug messages")
                .action(ArgAction::SetTrue),
        )
        .subcommand(generate::cli::create_generate_cli())
        .subcommand(convert::cli::create_tsv2json_cli())
        .subcommand(annotate::cli::create_annotate_cli())
        .subcommand(stats::cli::create_stats_cli())
        .subcommand(config::cli::create_config_cli())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // GENERATE
        //
        Some((generate::cli::GENERATE_CMD, matches)) => {
            generate::handlers::run_generate(matches)?;
        }

        //
        // TSV TO JSON
        //
        Some((convert::cli::TSV2JSON_CMD, matches)) => {
            convert::handlers::run_tsv2json(matches)?;
        }

        //
        // ANNOTATE JSON COLLECTION
        //
        Some((annotate::cli::ANNOTATE_CMD, matches)) => {
            annotate::handlers::run_annotate(matches)?;
        }

        //
        // POSTING STATS
        //
        Some((stats::cli::STATS_CMD, matches)) => {
            stats::handlers::run_stats(matches)?;
        }

        //
        // EXAMPLE CONFIG
        //
        Some((config::cli::CONFIG_CMD, matches)) => {
            config::handlers::run_config(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_global_verbose_after_subcommand() {
        let matches = build_parser()
            .try_get_matches_from(["slr", "generate", "--dim", "10", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, generate::cli::GENERATE_CMD);
        assert_eq!(sub.get_one::<usize>("dim"), Some(&10));
    }

    #[rstest]
    fn test_subcommand_required() {
        assert!(build_parser().try_get_matches_from(["slr"]).is_err());
    }
}
