//! Scan configuration loaded from `.depscan/config.toml`.
//!
//! Every field has a default; a missing file yields the defaults and a
//! malformed one is reported and ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory holding depscan configuration inside a scanned repository.
pub const CONFIG_DIR: &str = ".depscan";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub scan: ScanSettings,
    pub http_clients: HttpClients,
    pub output: OutputSettings,
}

/// How files are analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Analyze files on the rayon pool. Output order is unaffected.
    pub parallel: bool,
    /// Reject files whose syntax tree contains errors.
    pub strict_syntax: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            strict_syntax: true,
        }
    }
}

/// Additional HTTP-client receivers, on top of the built-in ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClients {
    pub python: Vec<String>,
    pub java: Vec<String>,
}

/// Where the reports go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dsl: PathBuf,
    pub summary: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dsl: PathBuf::from("dependency_insights.dsl"),
            summary: None,
        }
    }
}

impl ScanConfig {
    /// Load from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Default config location for a repository root.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ScanConfig::load(Path::new("/definitely/not/here.toml"));
        assert_eq!(config, ScanConfig::default());
        assert!(config.scan.parallel);
        assert!(config.scan.strict_syntax);
        assert_eq!(config.output.dsl, PathBuf::from("dependency_insights.dsl"));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[scan]\nstrict_syntax = false\n\n[http_clients]\npython = [\"httpx\"]\n",
        )
        .unwrap();

        let config = ScanConfig::load(&path);
        assert!(config.scan.parallel);
        assert!(!config.scan.strict_syntax);
        assert_eq!(config.http_clients.python, vec!["httpx".to_string()]);
        assert!(config.http_clients.java.is_empty());
        assert_eq!(config.output.summary, None);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scan\nparallel = ").unwrap();
        assert_eq!(ScanConfig::load(&path), ScanConfig::default());
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            ScanConfig::default_path(Path::new("/repo")),
            PathBuf::from("/repo/.depscan/config.toml")
        );
    }
}
