//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the container.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Service base path removed from every incoming path (e.g. "/api").
    pub base_path: Option<String>,

    /// Whether `base_path` is stripped.
    pub strip_base_path: bool,

    /// Strip a leading `/{stage}` segment taken from the request context.
    pub use_stage_as_base_path: bool,

    /// Response content types that are always base64 encoded.
    /// Entries may end in `/*` to match a whole type.
    pub binary_media_types: Vec<String>,

    /// Maximum decoded request body size in bytes.
    pub max_body_size: usize,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            strip_base_path: true,
            use_stage_as_base_path: false,
            binary_media_types: vec![
                "application/octet-stream".to_string(),
                "image/*".to_string(),
            ],
            max_body_size: 6 * 1024 * 1024, // 6MB
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ContainerConfig {
    /// Returns true if a response with this `Content-Type` must be base64 encoded.
    pub fn is_binary_media_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        self.binary_media_types.iter().any(|pattern| {
            let pattern = pattern.to_ascii_lowercase();
            match pattern.strip_suffix("/*") {
                Some(top) => essence
                    .split_once('/')
                    .map(|(t, _)| t == top)
                    .unwrap_or(false),
                None => essence == pattern,
            }
        })
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Record invocation metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_media_types_match_exact_and_wildcard() {
        let config = ContainerConfig::default();
        assert!(config.is_binary_media_type("application/octet-stream"));
        assert!(config.is_binary_media_type("image/png"));
        assert!(config.is_binary_media_type("IMAGE/JPEG; quality=high"));
        assert!(!config.is_binary_media_type("text/plain; charset=utf-8"));
        assert!(!config.is_binary_media_type("application/json"));
    }

    #[test]
    fn defaults_strip_base_path() {
        let config = ContainerConfig::default();
        assert!(config.strip_base_path);
        assert!(config.base_path.is_none());
        assert_eq!(config.observability.log_level, "info");
    }
}
