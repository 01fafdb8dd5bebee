use clap::{Arg, Command, arg, value_parser};

pub const STATS_CMD: &str = "stats";
pub const DEFAULT_TOP: usize = 20;

pub fn create_stats_cli() -> Command {
    Command::new(STATS_CMD)
        .about("Report posting-list lengths per dimension for a TSV vector file.")
        .arg(Arg::new("input").required(true).help("TSV file of <id>\\t<vector> lines (may be gzipped)"))
        .arg(arg!(--encoding <encoding> "How vectors are encoded: repetition, pairs or dense (default: repetition)"))
        .arg(
            arg!(--dim <dim> "Dimensionality; inferred from the data when omitted")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--top <top> "Number of longest posting lists to print, 0 for all")
                .value_parser(value_parser!(usize)),
        )
}
