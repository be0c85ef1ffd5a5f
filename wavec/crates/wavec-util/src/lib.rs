//! wavec-util - Core Utilities and Foundation Types
//!
//! Shared infrastructure for the wavec front end: source locations, the
//! virtual file system (`span::SourceMap`), diagnostics, typed-index
//! vectors, and error types. Every other crate in the workspace depends
//! on this one and nothing in here depends on them.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level, SourceSnippet};
pub use error::{CliError, CliResult};
pub use index_vec::{define_idx, Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
