//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ContainerConfig (validated, immutable)
//!     → owned by the ContainerHandler for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the handler is initialized; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ContainerConfig, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
