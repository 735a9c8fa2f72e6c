//! XDG-compliant path resolution for ppi-network.
//!
//! `PpiPaths` locates the config file, the metadata database and the
//! registry response cache following the XDG Base Directory Specification.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(ppi::paths::no_home),
        help("Set the HOME environment variable or pass --cache-dir explicitly.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(ppi::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

const APP: &str = "ppi-network";

/// Global XDG-compliant directories for ppi-network.
#[derive(Debug, Clone)]
pub struct PpiPaths {
    /// `$XDG_CONFIG_HOME/ppi-network/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/ppi-network/`
    pub data_dir: PathBuf,
    /// `$XDG_CACHE_HOME/ppi-network/`
    pub cache_dir: PathBuf,
}

impl PpiPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let xdg = |var: &str, fallback: &str| {
            std::env::var(var)
                .map(PathBuf::from)
                .unwrap_or_else(|_| home.join(fallback))
                .join(APP)
        };

        Ok(Self {
            config_dir: xdg("XDG_CONFIG_HOME", ".config"),
            data_dir: xdg("XDG_DATA_HOME", ".local/share"),
            cache_dir: xdg("XDG_CACHE_HOME", ".cache"),
        })
    }

    /// All directories under one root, for tests and portable installs.
    pub fn rooted(root: &std::path::Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            cache_dir: root.join("cache"),
        }
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [
            &self.config_dir,
            &self.data_dir,
            &self.hgnc_cache_dir(),
            &self.uniprot_cache_dir(),
        ] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the metadata database.
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join("metadata.redb")
    }

    /// `cache_dir/hgnc/`: one JSON document per symbol.
    pub fn hgnc_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("hgnc")
    }

    /// `cache_dir/uniprot/`: one FASTA entry per accession.
    pub fn uniprot_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("uniprot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_paths_use_app_name() {
        // Env vars are not mutated here; that is unsafe in edition 2024.
        let paths = PpiPaths::resolve().unwrap();
        assert!(paths.config_dir.ends_with(APP));
        assert!(paths.cache_dir.ends_with(APP));
        assert!(paths.database_file().starts_with(&paths.data_dir));
    }

    #[test]
    fn rooted_layout() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = PpiPaths::rooted(tmp.path());
        paths.ensure_dirs().unwrap();
        assert!(paths.hgnc_cache_dir().is_dir());
        assert!(paths.uniprot_cache_dir().is_dir());
        assert_eq!(paths.config_file(), tmp.path().join("config/config.toml"));
    }
}
