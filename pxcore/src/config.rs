use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    magic::{DEFAULT_ENTRIES_PER_NODE, ENV_CONFIG_PATH},
    utils::error::ConfigError,
};

/// Tunables of the compiler. Every field has a default, so a partial TOML
/// file is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Upper bound on entries a single node may write. Used to presize the
    /// scratch buffer and checked after every node.
    pub entries_per_node: usize,

    /// Reject fixed-arity records whose declared child count differs from the
    /// number of operands their instruction consumes, records following a
    /// complete root and input ending with open operators.
    pub strict_arity: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            entries_per_node: DEFAULT_ENTRIES_PER_NODE,
            strict_arity: true,
        }
    }
}

impl CompilerConfig {
    /// Get the default path to the compiler configuration file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push("pxexp");
        path.push("compiler.toml");
        path
    }

    /// Load the configuration from the default path, falling back to the
    /// defaults when no file exists there.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from_toml(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let toml_str = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&toml_str).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                source,
                file: path.display().to_string(),
            },
            other => other,
        })
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            source: e,
            file: "<inline>".to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_toml(&self, path: &Path) -> Result<(), ConfigError> {
        let toml_str = toml::to_string(self).map_err(ConfigError::Serialize)?;

        // Attempt to create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }

        std::fs::write(path, toml_str).map_err(ConfigError::Io)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.entries_per_node == 0 {
            return Err(ConfigError::Invalid(
                "`entries_per_node` must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CompilerConfig::from_toml_str("strict_arity = false\n").unwrap();
        assert_eq!(config.entries_per_node, DEFAULT_ENTRIES_PER_NODE);
        assert!(!config.strict_arity);
    }

    #[test]
    fn test_zero_bound_rejected() {
        let err = CompilerConfig::from_toml_str("entries_per_node = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_file() {
        let err = CompilerConfig::from_toml_str("entries_per_node = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
