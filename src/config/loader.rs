//! Configuration parsing for the compile-class transform
//!
//! Settings are read from an in-memory TOML document, either at the top level
//! or under a `[compile-class]` table so they can live inside a larger host
//! configuration file.

use thiserror::Error;

use super::schema::CompileClassConfig;

/// Name of the table holding transform settings in a host document.
pub const CONFIG_TABLE: &str = "compile-class";

/// Configuration parsing error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// TOML parsing error
    #[error("Failed to parse compile-class config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Matcher construction error
    #[error("Failed to build trigger: {0}")]
    Trigger(#[from] crate::trigger::TriggerError),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Parse and validate a configuration document.
///
/// If the document has a `[compile-class]` table, settings are read from it;
/// otherwise the whole document is the configuration.
///
/// # Example
///
/// ```
/// use compile_class::config::parse_config;
///
/// let config = parse_config("[compile-class]\nclass-prefix = \"cc-\"\n").unwrap();
/// assert_eq!(config.class_prefix, "cc-");
/// assert_eq!(config.trigger, ":uno:");
/// ```
pub fn parse_config(source: &str) -> Result<CompileClassConfig, ConfigError> {
    let mut document: toml::Table = toml::from_str(source)?;
    let table = match document.remove(CONFIG_TABLE) {
        Some(toml::Value::Table(table)) => table,
        _ => document,
    };
    let config: CompileClassConfig = toml::Value::Table(table).try_into()?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}
