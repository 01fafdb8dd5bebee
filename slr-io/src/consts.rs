pub const JSON_EXTENSION: &str = "json";
pub const TSV_EXTENSION: &str = "tsv";

/// How often long loops refresh their progress message.
pub const PROGRESS_REFRESH: u64 = 1_000;
