//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a configuration file without validating it.
///
/// Callers that apply overrides (e.g. CLI flags) validate afterwards.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp(
            "geo-vault-valid",
            r#"
            [blockchain]
            rpc_url = "http://localhost:8545"
            chain_id = 31337

            [contract]
            address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.blockchain.chain_id, 31337);
        fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let path = write_temp(
            "geo-vault-invalid",
            r#"
            [tracker]
            poll_interval_ms = 0
            "#,
        );

        let err = load_config(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("contract.address"));
        assert!(message.contains("tracker.poll_interval_ms"));
        fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_parse_error() {
        let path = write_temp("geo-vault-garbled", "[blockchain\nrpc_url = ");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
        fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
