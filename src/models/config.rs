use serde::{Deserialize, Serialize};
use spot_separation::{KnownColorTable, OutputFormat, QuantizerKind, SeparationConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigFileError;

/// Default configuration shipped with the binary (written by `spotsep init`)
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../config.yaml");

/// Config file looked up in the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE: &str = "spotsep.yaml";

/// Application configuration loaded from spotsep.yaml
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Separation parameters handed to the core pipeline
    #[serde(default)]
    pub separation: SeparationConfig,

    /// Where and under which names results are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Extra known colors (hex -> ink name), merged over the built-in table
    #[serde(default)]
    pub known_colors: BTreeMap<String, String>,
}

/// Output locations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Directory receiving channel files, report and error log
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Report file name inside `dir`
    #[serde(default = "default_report")]
    pub report: String,

    /// Error log file name inside `dir`
    #[serde(default = "default_error_log")]
    pub error_log: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("separations")
}

fn default_report() -> String {
    "report.json".to_string()
}

fn default_error_log() -> String {
    "error_log.txt".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            report: default_report(),
            error_log: default_error_log(),
        }
    }
}

impl OutputConfig {
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.dir.join(&self.error_log)
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub color_count: Option<u32>,
    pub dither_strength: Option<u32>,
    pub quantizer: Option<QuantizerKind>,
    pub output_format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, `spotsep.yaml` in
    /// the working directory is tried and defaults are used if it is missing
    /// or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigFileError> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => Ok(Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE))),
        }
    }

    /// Load a config file, failing on any read or parse error
    pub fn load_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            colors = config.separation.color_count,
            known_colors = config.known_colors.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load a config file, falling back to defaults with a warning
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::load_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Write the default configuration to `path`
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigFileError> {
        if path.exists() && !force {
            return Err(ConfigFileError::Exists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, DEFAULT_CONFIG_YAML)?;
        tracing::info!(path = %path.display(), "Wrote default configuration");
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(count) = overrides.color_count {
            self.separation.color_count = count;
        }
        if let Some(strength) = overrides.dither_strength {
            self.separation.dither_strength = strength;
        }
        if let Some(kind) = overrides.quantizer {
            self.separation.quantizer = kind;
        }
        if let Some(format) = overrides.output_format {
            self.separation.output_format = format;
        }
        if let Some(ref dir) = overrides.output_dir {
            self.output.dir = dir.clone();
        }
    }

    /// Built-in known colors extended with the configured ones
    pub fn known_color_table(&self) -> KnownColorTable {
        let mut table = KnownColorTable::default();
        table.extend(self.known_colors.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.separation, SeparationConfig::default());
        assert_eq!(config.output.dir, PathBuf::from("separations"));
        assert_eq!(config.output.report, "report.json");
        assert_eq!(config.output.error_log, "error_log.txt");
        assert!(config.known_colors.is_empty());
    }

    #[test]
    fn test_shipped_yaml_matches_defaults() {
        let config = AppConfig::from_yaml(DEFAULT_CONFIG_YAML).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r##"
separation:
  color_count: 9
output:
  dir: out
known_colors:
  "#0000ff": PANTONE Reflex Blue C
"##;
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.separation.color_count, 9);
        assert_eq!(config.separation.dither_strength, 20);
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.report, "report.json");
        assert_eq!(config.output.report_path(), PathBuf::from("out/report.json"));
    }

    #[test]
    fn test_known_color_table_merges_over_builtin() {
        let mut config = AppConfig::default();
        config
            .known_colors
            .insert("#0000ff".to_string(), "PANTONE Reflex Blue C".to_string());
        config
            .known_colors
            .insert("FF0000".to_string(), "House Red".to_string());

        let table = config.known_color_table();
        assert_eq!(table.get("0000FF"), Some("PANTONE Reflex Blue C"));
        assert_eq!(table.get("FF0000"), Some("House Red"));
        assert_eq!(table.get("00FF00"), Some("PANTONE 802 C"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig::default();
        config.apply(&Overrides {
            color_count: Some(4),
            quantizer: Some(QuantizerKind::Selective),
            output_dir: Some(PathBuf::from("elsewhere")),
            ..Default::default()
        });

        assert_eq!(config.separation.color_count, 4);
        assert_eq!(config.separation.dither_strength, 20);
        assert_eq!(config.separation.quantizer, QuantizerKind::Selective);
        assert_eq!(config.output.dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigFileError::Read { .. }));
    }

    #[test]
    fn test_explicit_broken_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "separation: [not, a, map").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse { .. }));
    }

    #[test]
    fn test_load_or_default_on_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "separation: 12").unwrap();
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_write_default_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("spotsep.yaml");

        AppConfig::write_default(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_YAML);

        let err = AppConfig::write_default(&path, false).unwrap_err();
        assert!(matches!(err, ConfigFileError::Exists(_)));

        fs::write(&path, "separation: {}").unwrap();
        AppConfig::write_default(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_YAML);
    }
}
