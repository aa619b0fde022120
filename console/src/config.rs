//! Console configuration.
//!
//! Loaded from YAML to control the prompt, the default log filter, and which
//! commands the dispatcher will run.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! prompt: "catcher$ "
//! log_filter: info
//! allowlist: []
//! exclude:
//!   - kill
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level console configuration.
///
/// # Examples
///
/// ```
/// use termline_console::ConsoleConfig;
///
/// let config = ConsoleConfig::default();
/// assert_eq!(config.prompt, "$ ");
/// assert!(config.is_allowed("help"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Prompt written before each line in interactive mode.
    pub prompt: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    /// Commands that may run (empty = every registered command).
    pub allowlist: Vec<String>,
    /// Commands that are always refused.
    pub exclude: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            prompt: "$ ".to_string(),
            log_filter: None,
            allowlist: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from a YAML file. Missing keys take their default
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConsoleError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConsoleError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `command` is in the exclusion list.
    pub fn is_excluded(&self, command: &str) -> bool {
        self.exclude.iter().any(|c| c == command)
    }

    /// Returns `true` if `command` may be dispatched.
    ///
    /// Exclusions always win. An empty allowlist allows everything else.
    ///
    /// # Examples
    ///
    /// ```
    /// # let yaml = r#"
    /// # allowlist: [ls, help]
    /// # exclude: [help]
    /// # "#;
    /// # let config: termline_console::ConsoleConfig = serde_yaml::from_str(yaml).unwrap();
    /// assert!(config.is_allowed("ls"));
    /// assert!(!config.is_allowed("help"));
    /// assert!(!config.is_allowed("kill"));
    /// ```
    pub fn is_allowed(&self, command: &str) -> bool {
        if self.is_excluded(command) {
            return false;
        }
        if self.allowlist.is_empty() {
            return true;
        }
        self.allowlist.iter().any(|c| c == command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config: ConsoleConfig = serde_yaml::from_str("prompt: \"> \"\n").unwrap();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.version, "1.0");
        assert!(config.log_filter.is_none());
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_exclusion_beats_empty_allowlist() {
        let config = ConsoleConfig {
            exclude: vec!["kill".into()],
            ..Default::default()
        };
        assert!(config.is_excluded("kill"));
        assert!(!config.is_allowed("kill"));
        assert!(config.is_allowed("ls"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.yaml");

        let config = ConsoleConfig {
            prompt: "catcher$ ".into(),
            log_filter: Some("debug".into()),
            allowlist: vec!["help".into(), "ls".into()],
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = ConsoleConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConsoleConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, crate::ConsoleError::IoError(_)));
    }
}
