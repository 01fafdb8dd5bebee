use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::encoding::{Delimiter, Encoding, EncodingKind};
use crate::errors::{Result, SlrError};
use crate::generator::SparsityMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Uniform,
    Zipfian,
}

impl FromStr for ModeKind {
    type Err = SlrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(ModeKind::Uniform),
            "zipfian" | "zipf" => Ok(ModeKind::Zipfian),
            _ => Err(SlrError::invalid(
                "mode",
                format!("unknown mode `{}` (expected uniform or zipfian)", s),
            )),
        }
    }
}

/// Where encoded documents go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One growing `<id>\t<vector>` file.
    #[default]
    Tsv,
    /// `<id>\t<vector>` files rotated every `docs_per_file` documents.
    TsvBatches,
    /// JSON arrays of `{"id", "contents"}` rotated every `docs_per_file` documents.
    Json,
}

impl FromStr for OutputFormat {
    type Err = SlrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "tsv-batches" => Ok(OutputFormat::TsvBatches),
            "json" => Ok(OutputFormat::Json),
            _ => Err(SlrError::invalid(
                "format",
                format!("unknown output format `{}` (expected tsv, tsv-batches or json)", s),
            )),
        }
    }
}

fn default_dim() -> usize {
    DEFAULT_DIM
}
fn default_threshold() -> f64 {
    DEFAULT_SPARSITY_THRESHOLD
}
fn default_zipf_param() -> f64 {
    DEFAULT_ZIPF_PARAM
}
fn default_precision() -> u32 {
    DEFAULT_PRECISION
}
fn default_docs_per_file() -> usize {
    DEFAULT_DOCS_PER_FILE
}
fn default_num_docs() -> usize {
    DEFAULT_NUM_DOCS
}
fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

/// Every knob of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlrConfig {
    #[serde(default = "default_dim")]
    pub dim: usize,

    #[serde(default)]
    pub mode: ModeKind,

    /// Used in uniform mode.
    #[serde(default = "default_threshold")]
    pub sparsity_threshold: f64,

    /// Used in zipfian mode.
    #[serde(default = "default_zipf_param")]
    pub zipf_param: f64,

    /// Decimal digits retained by the encoding.
    #[serde(default = "default_precision")]
    pub precision: u32,

    #[serde(default)]
    pub encoding: EncodingKind,

    #[serde(default)]
    pub delimiter: Delimiter,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_docs_per_file")]
    pub docs_per_file: usize,

    /// Documents to synthesize when no input corpus is given.
    #[serde(default = "default_num_docs")]
    pub num_docs: usize,

    /// First running index for synthesized identifiers.
    #[serde(default)]
    pub start: usize,

    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SlrConfig {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            mode: ModeKind::default(),
            sparsity_threshold: DEFAULT_SPARSITY_THRESHOLD,
            zipf_param: DEFAULT_ZIPF_PARAM,
            precision: DEFAULT_PRECISION,
            encoding: EncodingKind::default(),
            delimiter: Delimiter::default(),
            format: OutputFormat::default(),
            docs_per_file: DEFAULT_DOCS_PER_FILE,
            num_docs: DEFAULT_NUM_DOCS,
            start: 0,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            input_path: None,
            output_path: None,
            seed: None,
        }
    }
}

impl SlrConfig {
    fn resolve_config_path(path: &Path, base_dir: &Path) -> PathBuf {
        if path.is_absolute() || path.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Load a config from a `.toml`, `.yaml` or `.yml` file.
    ///
    /// Relative `input_path`/`output_path` values resolve against the file's
    /// directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SlrError::io_at(path, e))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let mut config = match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            _ => {
                return Err(SlrError::ConfigParse(format!(
                    "unrecognized config extension for {:?} (expected .toml, .yaml or .yml)",
                    path
                )));
            }
        };

        if let Some(config_dir) = path.parent() {
            config.input_path = config
                .input_path
                .map(|p| Self::resolve_config_path(&p, config_dir));
            config.output_path = config
                .output_path
                .map(|p| Self::resolve_config_path(&p, config_dir));
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SlrError::ConfigParse(e.to_string()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SlrError::ConfigParse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SlrError::ConfigParse(e.to_string()))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| SlrError::ConfigParse(e.to_string()))
    }

    pub fn sparsity_mode(&self) -> SparsityMode {
        match self.mode {
            ModeKind::Uniform => SparsityMode::Uniform {
                threshold: self.sparsity_threshold,
            },
            ModeKind::Zipfian => SparsityMode::Zipfian {
                exponent: self.zipf_param,
            },
        }
    }

    pub fn encoding(&self) -> Result<Encoding> {
        Encoding::new(self.encoding, self.precision, self.delimiter)
    }

    /// Check every parameter before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(SlrError::invalid("dim", "dimensionality must be greater than zero"));
        }
        self.sparsity_mode().validate()?;
        self.encoding()?;
        if self.docs_per_file == 0 {
            return Err(SlrError::invalid("docs_per_file", "must be greater than zero"));
        }
        if self.input_path.is_none() {
            id_range_end(self.start, self.num_docs)?;
        }
        if self.encoding == EncodingKind::Dense && self.dim > 10_000 {
            warn!(
                "Dense encoding over {} dimensions writes every zero; it is meant for small debugging runs",
                self.dim
            );
        }
        Ok(())
    }
}

/// End of the synthesized identifier range `start..start + count`.
pub fn id_range_end(start: usize, count: usize) -> Result<usize> {
    start.checked_add(count).ok_or_else(|| {
        SlrError::invalid(
            "start",
            format!("{} + {} documents overflows the identifier range", start, count),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    #[rstest]
    fn test_defaults_validate() {
        let config = SlrConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.sparsity_mode(),
            SparsityMode::Uniform { threshold: 0.9 }
        );
    }

    #[rstest]
    fn test_toml_partial() {
        let config = SlrConfig::from_toml_str(
            r#"
            dim = 5000
            mode = "zipfian"
            zipf_param = 0.5
            precision = 7
            encoding = "pairs"
            delimiter = "space"
            format = "json"
            docs_per_file = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.dim, 5000);
        assert_eq!(config.sparsity_mode(), SparsityMode::Zipfian { exponent: 0.5 });
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.num_docs, DEFAULT_NUM_DOCS);
        assert_eq!(config.id_prefix, "doc_");
        let encoding = config.encoding().unwrap();
        assert_eq!(encoding.kind, EncodingKind::Pairs);
        assert_eq!(encoding.precision, 7);
    }

    #[rstest]
    fn test_yaml() {
        let config = SlrConfig::from_yaml_str("dim: 100\nmode: uniform\nsparsity_threshold: 0.5\nformat: tsv-batches\n").unwrap();
        assert_eq!(config.dim, 100);
        assert_eq!(config.format, OutputFormat::TsvBatches);
    }

    #[rstest]
    fn test_unknown_variant_fails() {
        assert!(matches!(
            SlrConfig::from_toml_str("mode = \"gaussian\""),
            Err(SlrError::ConfigParse(_))
        ));
    }

    #[rstest]
    #[case("dim = 0")]
    #[case("sparsity_threshold = 1.0")]
    #[case("mode = \"zipfian\"\nzipf_param = 1.5")]
    #[case("precision = 16")]
    #[case("precision = 10")]
    #[case("encoding = \"repetition\"\nprecision = 7")]
    #[case("encoding = \"pairs\"\nprecision = 16")]
    #[case("docs_per_file = 0")]
    fn test_validate_rejects(#[case] content: &str) {
        let config = SlrConfig::from_toml_str(content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(SlrError::InvalidParameter { .. })
        ));
    }

    #[rstest]
    #[case(EncodingKind::Pairs, 10)]
    #[case(EncodingKind::Dense, 15)]
    #[case(EncodingKind::Repetition, 6)]
    fn test_validate_accepts_precision(#[case] encoding: EncodingKind, #[case] precision: u32) {
        let config = SlrConfig {
            encoding,
            precision,
            ..SlrConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_validate_rejects_overflowing_start() {
        let config = SlrConfig {
            start: usize::MAX - 10,
            num_docs: 250,
            ..SlrConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SlrError::InvalidParameter { name: "start", .. })
        ));
    }

    #[rstest]
    fn test_from_file_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "input_path = \"corpus/FB396001\"").unwrap();
        writeln!(f, "output_path = \"/tmp/out.tsv\"").unwrap();
        drop(f);

        let config = SlrConfig::from_file(&path).unwrap();
        assert_eq!(config.input_path, Some(dir.path().join("corpus/FB396001")));
        assert_eq!(config.output_path, Some(PathBuf::from("/tmp/out.tsv")));
    }

    #[rstest]
    fn test_from_file_rejects_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.ini");
        std::fs::write(&path, "dim = 3").unwrap();
        assert!(matches!(
            SlrConfig::from_file(&path),
            Err(SlrError::ConfigParse(_))
        ));
    }

    #[rstest]
    fn test_toml_round_trip() {
        let config = SlrConfig {
            seed: Some(42),
            ..SlrConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SlrConfig::from_toml_str(&text).unwrap(), config);
    }
}
