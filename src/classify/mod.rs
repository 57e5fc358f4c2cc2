//! Violation classifier — compares locator output against the compiled
//! header and assigns a violation kind.
//!
//! Comparison is exact string equality per line after marker stripping.
//! No whitespace normalization happens: the header is a legal artifact,
//! and a partial match must never be silently accepted.

use crate::locator::{ExtractedHeader, Span};
use crate::template::CompiledHeader;
use serde::{Deserialize, Serialize};

// ─── Violation Taxonomy ─────────────────────────────────────────────

/// Every header violation the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// No leading comment exists at all.
    Missing,
    /// A leading comment exists but every content line is blank.
    Empty,
    /// A leading comment exists with non-blank content that differs
    /// from the expected header lines.
    Mismatched,
}

impl ViolationKind {
    /// Stable diagnostic identifier, suitable for host-side filtering
    /// and suppression.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "header-missing",
            Self::Empty => "header-empty",
            Self::Mismatched => "header-mismatched",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            // A wrong header misstates the legal notice; absence is the
            // common, mechanically-introduced case.
            Self::Mismatched => Severity::High,
            Self::Missing | Self::Empty => Severity::Medium,
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ─── Severity ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

// ─── Violation ──────────────────────────────────────────────────────

/// A single header violation with the span to attach a diagnostic to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub span: Span,
    pub description: String,
}

impl Violation {
    fn new(kind: ViolationKind, span: Span, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            span,
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.description)
    }
}

// ─── Classifier ─────────────────────────────────────────────────────

/// Pure classification: exempt → clean; no header → `Missing` at offset
/// zero; all-blank content → `Empty`; any line-by-line difference →
/// `Mismatched`; otherwise clean.
pub fn classify(extracted: Option<&ExtractedHeader>, expected: &CompiledHeader) -> Option<Violation> {
    let header = match extracted {
        None => {
            return Some(Violation::new(
                ViolationKind::Missing,
                Span::new(0, 0),
                "file does not start with the required header",
            ))
        }
        Some(h) => h,
    };

    if header.exempt {
        return None;
    }

    if header.content.iter().all(|line| line.trim().is_empty()) {
        return Some(Violation::new(
            ViolationKind::Empty,
            header.span,
            "leading comment contains no header text",
        ));
    }

    if header.content != expected.lines {
        return Some(Violation::new(
            ViolationKind::Mismatched,
            header.span,
            "leading comment does not match the required header",
        ));
    }

    None
}

// ─── Tests ──────────────────────────────────────────────────────────
