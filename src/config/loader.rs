//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::CallLogConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<CallLogConfig, ConfigError> {
    let config: CallLogConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CallLogConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CallLogConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [logging]
            filter = "warn"
            json = true

            [thresholds]
            default = "warn"

            [[thresholds.overrides]]
            target = "app::db"
            level = "TRACE"

            [interceptor]
            placeholder = "?"
            "#,
        )
        .unwrap();

        assert!(config.logging.json);
        assert_eq!(config.thresholds.default, Level::Warn);
        assert_eq!(config.thresholds.overrides[0].target, "app::db");
        assert_eq!(config.thresholds.overrides[0].level, Level::Trace);
        assert_eq!(config.interceptor.placeholder, "?");
    }

    #[test]
    fn test_unknown_level_is_parse_error() {
        let err = parse_config("[thresholds]\ndefault = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_validation_errors_are_reported() {
        let err = parse_config("[interceptor]\nplaceholder = \"\"\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::EmptyPlaceholder]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
