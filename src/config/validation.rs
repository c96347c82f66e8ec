//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and path shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ContainerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the container handler is built

use std::fmt;

use crate::config::schema::ContainerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ContainerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(base) = config.base_path.as_deref() {
        if !base.starts_with('/') {
            errors.push(ValidationError::new("base_path", "must start with '/'"));
        }
        if base.len() > 1 && base.ends_with('/') {
            errors.push(ValidationError::new("base_path", "must not end with '/'"));
        }
    }

    for media_type in &config.binary_media_types {
        if !media_type.contains('/') {
            errors.push(ValidationError::new(
                "binary_media_types",
                format!("{media_type:?} is not a media type"),
            ));
        }
    }

    if config.max_body_size == 0 {
        errors.push(ValidationError::new("max_body_size", "must be greater than zero"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
