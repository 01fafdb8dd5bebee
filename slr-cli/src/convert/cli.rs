use clap::{Arg, Command, arg, value_parser};

pub const TSV2JSON_CMD: &str = "tsv2json";

pub fn create_tsv2json_cli() -> Command {
    Command::new(TSV2JSON_CMD)
        .about("Convert a TSV vector file into batched JSON arrays of {\"id\", \"contents\"}.")
        .arg(Arg::new("input").required(true).help("TSV file of <id>\\t<vector> lines (may be gzipped)"))
        .arg(arg!(--output <output> "Base name of the JSON files (default: input path without extension)"))
        .arg(
            arg!(--"docs-per-file" <docs_per_file> "Documents per JSON file")
                .value_parser(value_parser!(usize)),
        )
}
