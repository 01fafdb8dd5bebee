use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const GENERATE_CMD: &str = "generate";
pub const DEFAULT_OUT: &str = "slr_docs.tsv";
pub const DEFAULT_BATCH_BASE: &str = "slr_docs";

/// Arguments shared by every command that draws vectors.
pub fn generation_args() -> Vec<Arg> {
    vec![
        arg!(--config <config> "TOML or YAML config file; flags override its values"),
        arg!(--dim <dim> "Sparse dimensionality").value_parser(value_parser!(usize)),
        arg!(--mode <mode> "Sparsity mode: uniform or zipfian"),
        arg!(--threshold <threshold> "Uniform mode: drop samples at or below this value")
            .value_parser(value_parser!(f64)),
        arg!(--"zipf-param" <zipf_param> "Zipfian mode: decay exponent in (0, 1)")
            .value_parser(value_parser!(f64)),
        arg!(--precision <precision> "Decimal digits retained by the encoding")
            .value_parser(value_parser!(u32)),
        arg!(--encoding <encoding> "Vector encoding: repetition, pairs or dense"),
        arg!(--delimiter <delimiter> "Separator for pairs/dense encodings: tab or space"),
        arg!(--seed <seed> "Seed for reproducible runs").value_parser(value_parser!(u64)),
        arg!(--input <input> "Input path"),
        arg!(--output <output> "Output path"),
    ]
}

pub fn create_generate_cli() -> Command {
    Command::new(GENERATE_CMD)
        .about("Generate synthetic sparse document vectors and write them as TSV or batched JSON.")
        .long_about(
            "Generate synthetic sparse document vectors.\n\n\
            Identifiers come from a tagged corpus given with --input (lines containing DOCNO), \
            or are synthesized as <id-prefix><n>.",
        )
        .args(generation_args())
        .arg(
            arg!(--format <format> "Output format: tsv, tsv-batches or json"),
        )
        .arg(
            arg!(--"docs-per-file" <docs_per_file> "Documents per file for batched formats")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--"num-docs" <num_docs> "Documents to synthesize when no corpus is given")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--start <start> "First running index for synthesized identifiers")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--"id-prefix" <id_prefix> "Prefix for synthesized identifiers"))
        .arg(
            Arg::new("append")
                .long("append")
                .help("Append to an existing TSV output instead of truncating it")
                .action(ArgAction::SetTrue),
        )
}
