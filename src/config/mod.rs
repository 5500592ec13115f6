//! Application configuration
//!
//! Defaults, then an optional TOML file, then `NL2SPARQL__` environment
//! variables, then command-line overrides.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, EndpointConfig, LogRotation, LoggingConfig, OntologyConfig, SessionConfig};
