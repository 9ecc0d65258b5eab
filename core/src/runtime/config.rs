// ============================================================================
// RUNTIME CONFIGURATION
// ============================================================================
//
// Startup options for the embedded interpreter, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`RuntimeConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Interpreter startup options
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Recorded as `sys.argv[0]` when `argv` is empty
    pub program_name: Option<String>,

    /// Initial `sys.argv`
    pub argv: Vec<String>,

    /// Prepend the directory of `argv[0]` (or `""`) to `sys.path`
    pub update_path: bool,

    /// Category checks on view narrowing
    pub verify_types: bool,

    /// Let the interpreter install its own signal handlers (SIGINT →
    /// KeyboardInterrupt)
    pub install_signal_handlers: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program_name: None,
            argv: Vec::new(),
            update_path: true,
            verify_types: true,
            install_signal_handlers: false,
        }
    }
}

impl RuntimeConfig {
    /// Defaults with a program name.
    pub fn named(program_name: impl Into<String>) -> Self {
        Self {
            program_name: Some(program_name.into()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The `sys.argv` to install, if any.
    pub(crate) fn effective_argv(&self) -> Option<Vec<String>> {
        if !self.argv.is_empty() {
            return Some(self.argv.clone());
        }
        self.program_name.as_ref().map(|name| vec![name.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = RuntimeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(config.update_path);
        assert!(config.verify_types);
        assert!(!config.install_signal_handlers);
    }

    #[test]
    fn test_partial_override() {
        let config = RuntimeConfig::from_json_str(r#"{"argv": ["prog.py", "-v"], "verify_types": false}"#).unwrap();
        assert_eq!(config.argv, vec!["prog.py", "-v"]);
        assert!(!config.verify_types);
        assert!(config.update_path);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = RuntimeConfig::from_json_str("{argv: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RuntimeConfig::from_json_file("/nonexistent/py11-config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_effective_argv() {
        assert_eq!(RuntimeConfig::default().effective_argv(), None);
        assert_eq!(RuntimeConfig::named("tool").effective_argv(), Some(vec!["tool".to_string()]));

        let config = RuntimeConfig {
            program_name: Some("ignored".into()),
            argv: vec!["script.py".into()],
            ..RuntimeConfig::default()
        };
        assert_eq!(config.effective_argv(), Some(vec!["script.py".to_string()]));
    }

    #[test]
    fn test_serializes_back() {
        let config = RuntimeConfig::named("tool");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RuntimeConfig::from_json_str(&json).unwrap(), config);
    }
}
