//! Persistent configuration, stored as TOML.
//!
//! Every field has a default, so a missing or partial config file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::PpiPaths;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings of the remote identifier registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// HGNC REST endpoint; the symbol is appended.
    #[serde(default = "default_hgnc_url")]
    pub hgnc_url: String,
    /// UniProt REST endpoint; `<accession>.fasta` is appended.
    #[serde(default = "default_uniprot_url")]
    pub uniprot_url: String,
    /// Fixed delay before every request, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Never touch the network; serve from the cache only.
    #[serde(default)]
    pub offline: bool,
}

fn default_hgnc_url() -> String {
    "http://rest.genenames.org/fetch/symbol/".into()
}
fn default_uniprot_url() -> String {
    "https://rest.uniprot.org/uniprotkb/".into()
}
fn default_request_delay_ms() -> u64 {
    100
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            hgnc_url: default_hgnc_url(),
            uniprot_url: default_uniprot_url(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            offline: false,
        }
    }
}

/// Top-level configuration.
///
/// ```toml
/// cache_dir = "/var/cache/ppi"
///
/// [registry]
/// request_delay_ms = 250
/// offline = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpiConfig {
    /// Overrides the XDG cache directory for registry responses.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Overrides the metadata database location.
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl PpiConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Cache root: the override, or the XDG cache directory.
    pub fn cache_root(&self, paths: &PpiPaths) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| paths.cache_dir.clone())
    }

    /// Metadata database: the override, or the XDG data directory.
    pub fn database_path(&self, paths: &PpiPaths) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PpiConfig::default();
        assert_eq!(cfg.registry.request_delay_ms, 100);
        assert!(cfg.registry.hgnc_url.ends_with("/fetch/symbol/"));
        assert!(!cfg.registry.offline);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[registry]\noffline = true\nrequest_delay_ms = 250\n").unwrap();
        let cfg = PpiConfig::load(&path).unwrap();
        assert!(cfg.registry.offline);
        assert_eq!(cfg.registry.request_delay_ms, 250);
        assert_eq!(cfg.registry.timeout_secs, 10);
    }

    #[test]
    fn config_roundtrip_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let cfg = PpiConfig {
            cache_dir: Some(PathBuf::from("/tmp/ppi-cache")),
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(PpiConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_is_default_and_bad_file_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("absent.toml");
        assert_eq!(PpiConfig::load_or_default(&missing).unwrap(), PpiConfig::default());

        let bad = tmp.path().join("bad.toml");
        std::fs::write(&bad, "[registry]\noffline = maybe").unwrap();
        assert!(matches!(PpiConfig::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn overrides_win_over_xdg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = PpiPaths::rooted(tmp.path());
        let cfg = PpiConfig {
            database: Some(PathBuf::from("/srv/ppi.redb")),
            ..Default::default()
        };
        assert_eq!(cfg.database_path(&paths), PathBuf::from("/srv/ppi.redb"));
        assert_eq!(cfg.cache_root(&paths), paths.cache_dir);
    }
}
