//! Configuration schema for the compile-class transform
//!
//! Every field has a default, so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::naming::DEFAULT_CLASS_PREFIX;
use crate::trigger::{PatternMatcher, DEFAULT_MARKER};

/// Transform settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileClassConfig {
    /// Directive marker opening a region (e.g. `:uno:`)
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Accept explicit names embedded in the marker (`:uno-name:`)
    #[serde(default = "default_true")]
    pub named: bool,
    /// Regular expression replacing the marker-based matcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Prefix of every compiled class name
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,
    /// Layer the generator should emit compiled shortcuts into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Keep tokens the generator does not know out of compiled classes
    #[serde(default = "default_true")]
    pub keep_unknown: bool,
}

impl Default for CompileClassConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            named: true,
            pattern: None,
            class_prefix: default_class_prefix(),
            layer: None,
            keep_unknown: true,
        }
    }
}

fn default_trigger() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_class_prefix() -> String {
    DEFAULT_CLASS_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the invalid field (e.g., "class-prefix")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compile-class: '{}' {}", self.field, self.message)
    }
}

impl CompileClassConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        match &self.pattern {
            Some(pattern) => {
                if let Err(e) = PatternMatcher::new(pattern) {
                    errors.push(ConfigValidationError {
                        field: "pattern".to_string(),
                        message: e.to_string(),
                    });
                }
            }
            None => {
                if self.trigger.trim().is_empty() {
                    errors.push(ConfigValidationError {
                        field: "trigger".to_string(),
                        message: "must be a non-empty string".to_string(),
                    });
                } else if self.trigger.chars().any(char::is_whitespace) {
                    errors.push(ConfigValidationError {
                        field: "trigger".to_string(),
                        message: "must not contain whitespace".to_string(),
                    });
                }
            }
        }

        if self.class_prefix.chars().any(char::is_whitespace) {
            errors.push(ConfigValidationError {
                field: "class-prefix".to_string(),
                message: "must not contain whitespace".to_string(),
            });
        }

        if let Some(layer) = &self.layer {
            if layer.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: "layer".to_string(),
                    message: "must be a non-empty string when set".to_string(),
                });
            }
        }

        errors
    }
}
