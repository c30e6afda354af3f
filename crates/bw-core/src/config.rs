//! Application configuration types.
//!
//! [`Config`] is deserialized from JSON. Every section defaults sensibly so
//! an empty `{}` file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub wiki: WikiConfig,
    pub demo: DemoConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.port_file.as_os_str().is_empty() {
            warnings.push("server.port_file is empty; --addr cannot record the port".into());
        }

        if !self.wiki.pages_dir.exists() {
            warnings.push(format!(
                "wiki.pages_dir {} does not exist",
                self.wiki.pages_dir.display()
            ));
        }

        if !self.wiki.templates_dir.exists() {
            warnings.push(format!(
                "wiki.templates_dir {} does not exist",
                self.wiki.templates_dir.display()
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Where `--addr` writes the ephemeral address it bound.
    pub port_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db_path: PathBuf::from("/tmp/post_db.bin"),
            port_file: PathBuf::from("final-port.txt"),
        }
    }
}

/// Wiki page and template locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    pub pages_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("."),
            templates_dir: PathBuf::from("templates"),
        }
    }
}

/// Startup demo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Run the scripted insert/update/select/delete sequence before serving.
    pub enabled: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port_file, PathBuf::from("final-port.txt"));
        assert_eq!(config.wiki.templates_dir, PathBuf::from("templates"));
        assert!(config.demo.enabled);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_json(
            r#"{"server": {"port": 9090}, "wiki": {"pages_dir": "/srv/wiki"}}"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.db_path, PathBuf::from("/tmp/post_db.bin"));
        assert_eq!(config.wiki.pages_dir, PathBuf::from("/srv/wiki"));
        assert_eq!(config.wiki.templates_dir, PathBuf::from("templates"));
    }

    #[test]
    fn bad_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(&dir.path().join("nope.json")));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookwiki.json");
        std::fs::write(&path, r#"{"demo": {"enabled": false}}"#).unwrap();

        let config = Config::load_or_default(Some(&path));
        assert!(!config.demo.enabled);
    }

    #[test]
    fn validate_flags_port_zero_and_missing_dirs() {
        let mut config = Config::default();
        config.server.port = 0;
        config.wiki.templates_dir = PathBuf::from("/definitely/not/here");

        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("server.port is 0")));
        assert!(warnings.iter().any(|w| w.contains("templates_dir")));
    }
}
