//! # lintel — File Header Compliance Engine
//!
//! Validates the leading comment block of a source file against an
//! organization-mandated header template and, when it does not match,
//! synthesizes a minimal whitespace-preserving edit that inserts or
//! replaces the header.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     HeaderChecker                         │
//! │  ┌────────────┐              ┌─────────────┐              │
//! │  │ Template   │              │ Header      │              │
//! │  │ Compiler   │              │ Locator     │              │
//! │  └─────┬──────┘              └──────┬──────┘              │
//! │        │ CompiledHeader             │ ExtractedHeader     │
//! │        └──────────┬─────────────────┘                     │
//! │            ┌──────▼───────┐      ┌─────────────────┐      │
//! │            │ Violation    │─────▶│ Fix Synthesizer │      │
//! │            │ Classifier   │      │ (on demand)     │      │
//! │            └──────────────┘      └─────────────────┘      │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Capabilities
//!
//! - **Template Expansion**: `{name}` placeholders, built-in `fileName`,
//!   user-defined variables, single-pass substitution
//! - **Comment-Style Agnostic**: line-comment runs and block comments,
//!   C-family by default, hash and dash families supported
//! - **Exemption Sentinel**: an auto-generated marker as the entire header
//!   content suppresses all checks for that file
//! - **Violation Taxonomy**: `Missing` / `Empty` / `Mismatched`, each with
//!   a stable diagnostic code and a source span
//! - **Fix Synthesis**: canonical line-comment decoration plus exactly one
//!   blank separator line; re-checking the fixed text always yields clean
//! - **Batch Checking**: files are independent, so `check_many` fans out
//!   over a rayon worker pool
//!
//! File reading and writing belong to the host: this crate only ever sees
//! `(file_text, logical_file_name)` pairs and returns violations and
//! corrected text.

pub mod template;
pub mod locator;
pub mod classify;
pub mod fix;
pub mod engine;

// Re-exports for convenience
pub use template::{CompiledHeader, HeaderTemplate, VariableMap};
pub use locator::{CommentStyle, CommentSyntax, ExtractedHeader, Span};
pub use classify::{Severity, Violation, ViolationKind};
pub use fix::FixResult;
pub use engine::{check, CheckOutcome, CheckReport, HeaderChecker, HeaderConfig};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LintelError {
    /// The template references a placeholder with no bound variable.
    /// A configuration defect, not a content violation: no expected
    /// header can be produced and no fix is attempted.
    #[error("unresolved template variable: {{{0}}}")]
    UnresolvedVariable(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type LintelResult<T> = Result<T, LintelError>;
