//! The compile-class transform pass
//!
//! A pass runs in two phases:
//!
//! 1. **Plan** ([`CompileClassTransformer::plan`]): find directive regions,
//!    normalize their tokens and resolve class names. Pure; it only asks the
//!    generator which tokens it knows.
//! 2. **Commit** ([`CompileClassTransformer::commit`]): check every name
//!    against the session registry, rewrite the buffer, record the new classes
//!    and hand them to the generator.
//!
//! A pass is all-or-nothing. If any region's name conflicts with an existing
//! class, the buffer, the session and the generator are left untouched.
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
//!     .transform_str(r#"<div class=":uno: w-1 h-1"/>"#, &mut session, &mut generator)
//!     .unwrap();
//! assert_eq!(out, r#"<div class="uno-prhvrm"/>"#);
//! assert_eq!(generator.get("uno-prhvrm").unwrap().body, "h-1 w-1");
//! ```

use std::fmt;
use std::ops::Range;

use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{CompileClassConfig, ConfigError};
use crate::generator::{Shortcut, StyleGenerator};
use crate::naming::{HashFn, NameResolver};
use crate::registry::{ClassRegistry, NameOrigin, RegistryError};
use crate::rewrite::{Edit, EditBuffer, EditError, TextBuffer};
use crate::session::Session;
use crate::tokens::TokenSet;
use crate::trigger::{DirectiveMatcher, Matcher, PatternMatcher, TriggerMatch};
use crate::variant_group::expand_variant_groups;

/// Error that aborts a transform pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// A compiled class name is already taken by a different token set
    #[error(transparent)]
    Conflict(#[from] RegistryError),
    /// A replacement could not be applied to the buffer
    #[error(transparent)]
    Edit(#[from] EditError),
}

impl TransformError {
    /// The conflicting class name, for [`TransformError::Conflict`].
    pub fn conflicting_name(&self) -> Option<&str> {
        match self {
            TransformError::Conflict(e) => Some(e.name()),
            _ => None,
        }
    }
}

/// A class a region compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedClass {
    /// Resolved class name, prefix included
    pub name: String,
    /// Known tokens the class stands for
    pub tokens: TokenSet,
    /// Whether the name was given or derived from the tokens
    pub origin: NameOrigin,
}

/// The rewrite planned for one directive region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPlan {
    /// Byte range of the source to overwrite
    pub range: Range<usize>,
    /// Compiled class, absent when no known token remains
    pub class: Option<PlannedClass>,
    /// Tokens kept verbatim after the class name
    pub unknown: Vec<String>,
}

impl RegionPlan {
    /// Text written over [`RegionPlan::range`].
    pub fn replacement(&self) -> String {
        self.class
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.unknown.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Every region of one source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassPlan {
    pub regions: Vec<RegionPlan>,
}

impl PassPlan {
    /// Check if the source had no directive regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Summary of a committed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Number of directive regions rewritten
    pub regions: usize,
    /// Class names used by this pass, in first-use order
    pub classes: Vec<String>,
    /// Class names that were new to the session
    pub registered: Vec<String>,
}

impl PassReport {
    /// Check if the pass left the source unchanged.
    pub fn is_noop(&self) -> bool {
        self.regions == 0
    }
}

/// Compiles directive regions into single shortcut classes.
pub struct CompileClassTransformer {
    matcher: Box<dyn Matcher>,
    resolver: NameResolver,
    layer: Option<String>,
    keep_unknown: bool,
}

impl fmt::Debug for CompileClassTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileClassTransformer")
            .field("resolver", &self.resolver)
            .field("layer", &self.layer)
            .field("keep_unknown", &self.keep_unknown)
            .finish_non_exhaustive()
    }
}

impl CompileClassTransformer {
    /// Create a transformer with the default configuration (`:uno:` marker,
    /// `uno-` prefix).
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(&CompileClassConfig::default())
    }

    /// Create a transformer from a validated configuration.
    pub fn from_config(config: &CompileClassConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
        }

        let matcher: Box<dyn Matcher> = match &config.pattern {
            Some(pattern) => Box::new(PatternMatcher::new(pattern)?),
            None => Box::new(DirectiveMatcher::new(&config.trigger, config.named)?),
        };

        Ok(Self {
            matcher,
            resolver: NameResolver::new(config.class_prefix.clone()),
            layer: config.layer.clone(),
            keep_unknown: config.keep_unknown,
        })
    }

    /// Replace the region matcher.
    pub fn with_matcher(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Replace the digest used for derived names.
    pub fn with_hasher(mut self, hasher: HashFn) -> Self {
        self.resolver = self.resolver.with_hasher(hasher);
        self
    }

    /// Set the layer compiled shortcuts are registered into.
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Choose whether tokens unknown to the generator stay out of classes.
    pub fn with_keep_unknown(mut self, keep_unknown: bool) -> Self {
        self.keep_unknown = keep_unknown;
        self
    }

    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    /// Find and resolve every directive region of `source`.
    pub fn plan<G: StyleGenerator + ?Sized>(&self, source: &str, generator: &G) -> PassPlan {
        let regions = self
            .matcher
            .find_all(source)
            .into_iter()
            .map(|m| self.plan_region(m, generator))
            .collect();
        PassPlan { regions }
    }

    fn plan_region<G: StyleGenerator + ?Sized>(&self, m: TriggerMatch, generator: &G) -> RegionPlan {
        let expanded = expand_variant_groups(m.body.trim());

        let mut known = TokenSet::new();
        let mut unknown = Vec::new();
        for token in expanded.split_whitespace() {
            if !self.keep_unknown || generator.is_known(token) {
                known.insert(token);
            } else {
                unknown.push(token.to_string());
            }
        }

        let class = (!known.is_empty()).then(|| {
            let (name, origin) = self.resolver.resolve(m.name.as_deref(), &known);
            PlannedClass { name, tokens: known, origin }
        });

        trace!(
            start = m.range.start,
            end = m.range.end,
            class = class.as_ref().map(|c| c.name.as_str()),
            unknown = unknown.len(),
            "directive region"
        );

        RegionPlan { range: m.content_range(), class, unknown }
    }

    /// Apply a plan to `buffer`, registering its classes in `session`.
    ///
    /// Nothing is written or registered unless every region succeeds.
    pub fn commit<B, G>(
        &self,
        plan: PassPlan,
        buffer: &mut B,
        session: &mut Session,
        generator: &mut G,
    ) -> Result<PassReport, TransformError>
    where
        B: TextBuffer + ?Sized,
        G: StyleGenerator + ?Sized,
    {
        if plan.is_empty() {
            return Ok(PassReport::default());
        }

        let mut staged = ClassRegistry::new();
        let mut classes = Vec::new();
        for class in plan.regions.iter().filter_map(|r| r.class.as_ref()) {
            let checked = session
                .registry()
                .lookup(&class.name, &class.tokens)
                .map(|_| ())
                .and_then(|()| {
                    staged.resolve(&class.name, class.tokens.clone(), class.origin).map(|_| ())
                });
            if let Err(e) = checked {
                debug!(name = %class.name, "compile class name conflict");
                return Err(e.into());
            }
            if !classes.contains(&class.name) {
                classes.push(class.name.clone());
            }
        }

        let edits: Vec<Edit> =
            plan.regions.iter().map(|r| Edit::new(r.range.clone(), r.replacement())).collect();
        buffer.check(&edits)?;
        for edit in &edits {
            buffer.overwrite(edit.range.clone(), &edit.content)?;
        }

        let registered = session.commit(staged)?;
        for name in &registered {
            if let Some(class) = session.registry().get(name) {
                generator.add_shortcut(Shortcut::from_class(class, self.layer.as_deref()));
            }
        }

        debug!(
            regions = plan.regions.len(),
            classes = classes.len(),
            registered = registered.len(),
            "compile-class pass committed"
        );

        Ok(PassReport { regions: plan.regions.len(), classes, registered })
    }

    /// Run a full pass over `buffer`.
    pub fn transform<B, G>(
        &self,
        buffer: &mut B,
        session: &mut Session,
        generator: &mut G,
    ) -> Result<PassReport, TransformError>
    where
        B: TextBuffer + ?Sized,
        G: StyleGenerator + ?Sized,
    {
        let plan = self.plan(buffer.original(), &*generator);
        self.commit(plan, buffer, session, generator)
    }

    /// Run a full pass over `source` and return the rewritten text.
    pub fn transform_str<G: StyleGenerator + ?Sized>(
        &self,
        source: &str,
        session: &mut Session,
        generator: &mut G,
    ) -> Result<String, TransformError> {
        let mut buffer = EditBuffer::new(source);
        self.transform(&mut buffer, session, generator)?;
        Ok(buffer.render())
    }
}
