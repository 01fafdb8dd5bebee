use clap::{Arg, Command};

pub const CONFIG_CMD: &str = "config";
pub const DEFAULT_CONFIG_OUT: &str = "slr_config.toml";

pub fn create_config_cli() -> Command {
    Command::new(CONFIG_CMD)
        .about("Write an example generation config (TOML, or YAML for .yaml/.yml paths).")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output configuration file")
                .default_value(DEFAULT_CONFIG_OUT),
        )
}
