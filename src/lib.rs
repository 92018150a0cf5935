//! compile-class - Compile utility class lists into single shortcut classes
//!
//! This library rewrites directive-marked regions of markup such as
//! `class=":uno: flex p-1 font-bold"` into one compiled class name
//! (`class="uno-t44hzz"`) and records the name-to-tokens mapping as a shortcut
//! for a downstream style generator. It provides:
//! - Region matching with a marker (`:uno:`, `:uno-name:`) or a custom pattern
//! - Order-independent token normalization with variant group expansion
//! - Deterministic short names (fixed FNV-1a digest) or explicit names
//! - Session-wide conflict detection for reused names
//! - All-or-nothing rewriting over original-text offsets
//!
//! # Example
//!
//! ```
//! use compile_class::{CompileClassTransformer, Session, ShortcutTable};
//!
//! let transformer = CompileClassTransformer::new().unwrap();
//! let mut session = Session::new();
//! let mut generator = ShortcutTable::new();
//!
//! let out = transformer
//!     .transform_str(r#"<div class=":uno-title: text-xl bg-red-500">"#, &mut session, &mut generator)
//!     .unwrap();
//! assert_eq!(out, r#"<div class="uno-title">"#);
//! assert_eq!(generator.get("uno-title").unwrap().body, "bg-red-500 text-xl");
//! ```

pub mod batch;
pub mod config;
pub mod generator;
pub mod hash;
pub mod naming;
pub mod registry;
pub mod rewrite;
pub mod session;
pub mod tokens;
pub mod transform;
pub mod trigger;
pub mod variant_group;

pub use config::{CompileClassConfig, ConfigError};
pub use generator::{Shortcut, ShortcutTable, StyleGenerator};
pub use registry::{ClassRegistry, CompiledClass, NameOrigin, RegistryError};
pub use rewrite::{EditBuffer, EditError, TextBuffer};
pub use session::Session;
pub use tokens::TokenSet;
pub use transform::{CompileClassTransformer, PassReport, TransformError};
pub use trigger::{DirectiveMatcher, Matcher, PatternMatcher, TriggerMatch};
