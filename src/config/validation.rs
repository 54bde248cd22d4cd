//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the subscriber filter parses
//! - Detect empty or duplicate threshold targets
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CallLogConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::CallLogConfig;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logging.filter `{filter}` is invalid: {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("thresholds.overrides[{index}] has an empty target")]
    EmptyTarget { index: usize },
    #[error("thresholds.overrides target `{0}` appears more than once")]
    DuplicateTarget(String),
    #[error("interceptor.placeholder must not be empty")]
    EmptyPlaceholder,
}

pub fn validate_config(config: &CallLogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = EnvFilter::try_new(&config.logging.filter) {
        errors.push(ValidationError::InvalidFilter {
            filter: config.logging.filter.clone(),
            reason: e.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (index, o) in config.thresholds.overrides.iter().enumerate() {
        let target = o.target.trim();
        if target.is_empty() {
            errors.push(ValidationError::EmptyTarget { index });
        } else if !seen.insert(target) {
            errors.push(ValidationError::DuplicateTarget(target.to_string()));
        }
    }

    if config.interceptor.placeholder.is_empty() {
        errors.push(ValidationError::EmptyPlaceholder);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ThresholdOverride;
    use crate::level::Level;

    fn with_overrides(targets: &[&str]) -> CallLogConfig {
        let mut config = CallLogConfig::default();
        config.thresholds.overrides = targets
            .iter()
            .map(|t| ThresholdOverride {
                target: t.to_string(),
                level: Level::Debug,
            })
            .collect();
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CallLogConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = with_overrides(&["app", "", "app"]);
        config.logging.filter = "app=notalevel".into();
        config.interceptor.placeholder.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::InvalidFilter { .. }));
        assert_eq!(errors[1], ValidationError::EmptyTarget { index: 1 });
        assert_eq!(errors[2], ValidationError::DuplicateTarget("app".into()));
        assert_eq!(errors[3], ValidationError::EmptyPlaceholder);
    }

    #[test]
    fn test_distinct_targets_are_valid() {
        assert!(validate_config(&with_overrides(&["app", "app::db"])).is_ok());
    }
}
