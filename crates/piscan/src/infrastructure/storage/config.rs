//! Scanner configuration: schema, file loading, and graceful fallback.
//!
//! A config is either supplied inline or read from a file.  Files ending in
//! `.toml` are parsed as TOML; anything else is parsed as JSON.  Example:
//!
//! ```json
//! {
//!   "name": "Warehouse door 3",
//!   "separators": ["enter"],
//!   "scanners": [{ "vendor_id": 11734, "product_id": 10849 }]
//! }
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "some_fn")]`, so `{}` is a valid
//! config and an older file missing newer fields still loads.
//!
//! # Failure policy
//!
//! Configuration never stops the scanner.  [`resolve_config`] logs a warning
//! for a missing file, an error for an unreadable or malformed one, and falls
//! back to [`ScanConfig::default`] in both cases.

use std::path::{Path, PathBuf};

use piscan_core::{DecoderConfig, ScannerId, DEFAULT_SCANNERS, DEFAULT_SEPARATORS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config found at {0}")]
    NotFound(PathBuf),

    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config at {path} is not a valid JSON file: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config at {path} is not a valid TOML file: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Runtime settings for one scanning station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Display label printed in the start-up banner.
    #[serde(default = "default_name")]
    pub name: String,
    /// Key names whose release ends a scan.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
    /// Whether backspace deletes the previous character.
    #[serde(default = "default_true")]
    pub backspace: bool,
    /// Accepted scanner models.
    #[serde(default = "default_scanners")]
    pub scanners: Vec<ScannerId>,
}

fn default_name() -> String {
    "Pi-Scan".to_string()
}
fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect()
}
fn default_true() -> bool {
    true
}
fn default_scanners() -> Vec<ScannerId> {
    DEFAULT_SCANNERS.to_vec()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            separators: default_separators(),
            backspace: default_true(),
            scanners: default_scanners(),
        }
    }
}

impl ScanConfig {
    /// Settings for the keystroke decoder.
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            separators: self.separators.iter().cloned().collect(),
            allow_backspace: self.backspace,
        }
    }

    /// Applies command-line overrides on top of the resolved config.
    ///
    /// An empty `separators` list leaves the configured separators alone.
    pub fn with_overrides(mut self, name: Option<String>, separators: Vec<String>) -> Self {
        if let Some(name) = name {
            self.name = name;
        }
        if !separators.is_empty() {
            self.separators = separators;
        }
        self
    }

    /// `(label, value)` pairs describing this config, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let scanners = self
            .scanners
            .iter()
            .map(|s| format!("{:x}:{:x}", s.vendor_id, s.product_id))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            ("Name", self.name.clone()),
            ("Separators", self.separators.join(", ")),
            ("Backspace", self.backspace.to_string()),
            ("Scanners", scanners),
        ]
    }
}

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Inline(ScanConfig),
    File(PathBuf),
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self::Inline(ScanConfig::default())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Reads and parses a config file.
///
/// # Errors
///
/// - [`ConfigError::NotFound`] if `path` does not exist.
/// - [`ConfigError::Io`] for any other read failure.
/// - [`ConfigError::Toml`] / [`ConfigError::Json`] if the content does not
///   parse.
pub fn load_config(path: &Path) -> Result<ScanConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if is_toml(path) {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Resolves `source` into a usable config.  Never fails.
pub fn resolve_config(source: &ConfigSource) -> ScanConfig {
    let config = match source {
        ConfigSource::Inline(config) => config.clone(),
        ConfigSource::File(path) => match load_config(path) {
            Ok(config) => {
                info!("Found a valid config file at {}", path.display());
                config
            }
            Err(e @ ConfigError::NotFound(_)) => {
                warn!("{e}.");
                ScanConfig::default()
            }
            Err(e) => {
                error!("{e}");
                ScanConfig::default()
            }
        },
    };

    if config.separators.is_empty() {
        warn!("no separator keys configured; scans will never complete");
    }
    config
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A scratch directory unique to one test.
    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("piscan_test_{}_{test}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = ScanConfig::default();

        // Assert
        assert_eq!(cfg.name, "Pi-Scan");
        assert_eq!(cfg.separators, vec!["enter".to_string(), "tab".to_string()]);
        assert!(cfg.backspace);
        assert_eq!(cfg.scanners, DEFAULT_SCANNERS.to_vec());
    }

    #[test]
    fn test_empty_json_object_uses_defaults() {
        let cfg: ScanConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn test_partial_json_overrides_only_given_fields() {
        let cfg: ScanConfig =
            serde_json::from_str(r#"{"name": "Dock 3", "separators": ["enter"]}"#)
                .expect("deserialize");
        assert_eq!(cfg.name, "Dock 3");
        assert_eq!(cfg.separators, vec!["enter".to_string()]);
        assert!(cfg.backspace);
    }

    #[test]
    fn test_decoder_config_carries_separators_and_backspace() {
        let cfg = ScanConfig {
            separators: vec!["f12".to_string()],
            backspace: false,
            ..ScanConfig::default()
        };

        let decoder = cfg.decoder_config();

        assert!(decoder.separators.contains("f12"));
        assert_eq!(decoder.separators.len(), 1);
        assert!(!decoder.allow_backspace);
    }

    #[test]
    fn test_overrides_replace_name_and_separators() {
        let cfg = ScanConfig::default().with_overrides(Some("Door".into()), vec!["tab".into()]);
        assert_eq!(cfg.name, "Door");
        assert_eq!(cfg.separators, vec!["tab".to_string()]);
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let cfg = ScanConfig::default().with_overrides(None, Vec::new());
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn test_entries_list_every_field_in_order() {
        let entries = ScanConfig::default().entries();
        let labels: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(labels, vec!["Name", "Separators", "Backspace", "Scanners"]);
        assert_eq!(entries[1].1, "enter, tab");
        assert_eq!(entries[3].1, "2dd6:2a61, 5e0:1200");
    }

    // ── load_config ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_json_file() {
        // Arrange
        let dir = scratch_dir("load_json");
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"name": "Json Station"}"#).expect("write");

        // Act
        let cfg = load_config(&path).expect("load");

        // Assert
        assert_eq!(cfg.name, "Json Station");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_toml_file_by_extension() {
        // Arrange
        let dir = scratch_dir("load_toml");
        let path = dir.join("piscan.toml");
        std::fs::write(
            &path,
            "name = \"Toml Station\"\nseparators = [\"tab\"]\n\n[[scanners]]\nvendor_id = 1\nproduct_id = 2\n",
        )
        .expect("write");

        // Act
        let cfg = load_config(&path).expect("load");

        // Assert
        assert_eq!(cfg.name, "Toml Station");
        assert_eq!(cfg.separators, vec!["tab".to_string()]);
        assert_eq!(cfg.scanners, vec![ScannerId::new(1, 2)]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.json");
        assert!(matches!(load_config(&path), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_json_is_json_error() {
        let dir = scratch_dir("bad_json");
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").expect("write");

        assert!(matches!(load_config(&path), Err(ConfigError::Json { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_malformed_toml_is_toml_error() {
        let dir = scratch_dir("bad_toml");
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").expect("write");

        assert!(matches!(load_config(&path), Err(ConfigError::Toml { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── resolve_config ────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_inline_returns_it_unchanged() {
        let inline = ScanConfig {
            name: "Inline".to_string(),
            ..ScanConfig::default()
        };
        let cfg = resolve_config(&ConfigSource::Inline(inline.clone()));
        assert_eq!(cfg, inline);
    }

    #[test]
    fn test_resolve_missing_file_falls_back_to_defaults() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/piscan.json"));
        assert_eq!(resolve_config(&source), ScanConfig::default());
    }

    #[test]
    fn test_resolve_invalid_file_falls_back_to_defaults() {
        let dir = scratch_dir("resolve_invalid");
        let path = dir.join("config.json");
        std::fs::write(&path, "[1, 2").expect("write");

        let cfg = resolve_config(&ConfigSource::File(path));

        assert_eq!(cfg, ScanConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }
}
