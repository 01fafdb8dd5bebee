use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use slr_core::SlrConfig;

pub fn example_config_text(path: &Path) -> Result<String> {
    let config = SlrConfig::default();
    let text = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => config.to_yaml_string()?,
        _ => config.to_toml_string()?,
    };
    Ok(text)
}

pub fn run_config(matches: &ArgMatches) -> Result<()> {
    let output = matches
        .get_one::<String>("output")
        .expect("output has a default value");
    let output = Path::new(output);

    let text = example_config_text(output)?;
    std::fs::write(output, text)
        .with_context(|| format!("Failed to write config to {}", output.display()))?;
    info!("Example configuration written to {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("slr_config.toml")]
    #[case("slr_config.yaml")]
    fn test_example_config_loads_back(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, example_config_text(&path).unwrap()).unwrap();
        assert_eq!(SlrConfig::from_file(&path).unwrap(), SlrConfig::default());
    }
}
