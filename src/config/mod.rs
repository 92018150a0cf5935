//! Configuration for the compile-class transform
//!
//! Provides the settings schema and parsing from TOML text.

pub mod loader;
pub mod schema;

pub use loader::{parse_config, ConfigError, CONFIG_TABLE};
pub use schema::{CompileClassConfig, ConfigValidationError};
