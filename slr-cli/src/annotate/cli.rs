use clap::Command;

use crate::generate::cli::generation_args;

pub const ANNOTATE_CMD: &str = "annotate";

pub fn create_annotate_cli() -> Command {
    Command::new(ANNOTATE_CMD)
        .about("Attach a synthetic sparse vector to every document of a JSON-lines collection.")
        .long_about(
            "Read every file in --input as one {\"id\", \"contents\"} JSON object per line and \
            write a same-named file to --output whose records are \
            {\"id\", \"contents\": <encoded vector>, \"raw\": <original contents>}.",
        )
        .args(generation_args())
}
