//! Multi-file transform driver.
//!
//! Planning is pure, so every file is planned in parallel on the rayon thread
//! pool. Commits then run one at a time in input order against the shared
//! session, which keeps the registry free of races and makes the result
//! (including which file reports a conflict) independent of thread timing.
//!
//! # Example
//!
//! ```
//! use compile_class::batch::{transform_batch, SourceFile};
//! use compile_class::{CompileClassTransformer, Session, ShortcutTable};
//!
//! let transformer = CompileClassTransformer::new().unwrap();
//! let mut session = Session::new();
//! let mut generator = ShortcutTable::new();
//!
//! let files = vec![
//!     SourceFile::new("a.html", r#"<a class=":uno: w-1 h-1">"#),
//!     SourceFile::new("b.html", r#"<b class=":uno: h-1 w-1">"#),
//! ];
//! let outcomes = transform_batch(&transformer, &files, &mut session, &mut generator);
//! assert!(outcomes.iter().all(|o| o.result.is_ok()));
//! assert_eq!(session.registry().len(), 1);
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::generator::StyleGenerator;
use crate::rewrite::{EditBuffer, TextBuffer};
use crate::session::Session;
use crate::transform::{CompileClassTransformer, PassPlan, PassReport, TransformError};

/// One input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Identifier reported back with the outcome (usually a path)
    pub id: String,
    pub code: String,
}

impl SourceFile {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self { id: id.into(), code: code.into() }
    }
}

/// Rewritten text and pass summary for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedFile {
    pub code: String,
    pub report: PassReport,
}

/// Result of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub id: String,
    pub result: Result<TransformedFile, TransformError>,
}

/// Transform `files` against one shared session.
///
/// A conflict fails only the file that caused it; classes committed by
/// earlier files stay registered and later files still run.
pub fn transform_batch<G>(
    transformer: &CompileClassTransformer,
    files: &[SourceFile],
    session: &mut Session,
    generator: &mut G,
) -> Vec<FileOutcome>
where
    G: StyleGenerator + Sync,
{
    let plans: Vec<PassPlan> = {
        let shared: &G = generator;
        files.par_iter().map(|file| transformer.plan(&file.code, shared)).collect()
    };

    let outcomes: Vec<FileOutcome> = files
        .iter()
        .zip(plans)
        .map(|(file, plan)| {
            let mut buffer = EditBuffer::new(file.code.as_str());
            let result = transformer
                .commit(plan, &mut buffer, session, generator)
                .map(|report| TransformedFile { code: buffer.render(), report });
            FileOutcome { id: file.id.clone(), result }
        })
        .collect();

    debug!(
        files = files.len(),
        failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
        "compile-class batch finished"
    );

    outcomes
}
