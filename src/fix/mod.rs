//! Fix synthesizer — produces the corrected full-file text for a
//! header violation.
//!
//! The canonical decoration is a line-comment sequence followed by
//! exactly one blank separator line, regardless of which decoration
//! the file previously used. Nothing outside the recorded span is
//! touched, so code after the header survives byte-for-byte, and
//! re-running the locator and classifier on the output always comes
//! back clean.

use crate::classify::{Violation, ViolationKind};
use crate::locator::CommentSyntax;
use crate::template::CompiledHeader;
use serde::{Deserialize, Serialize};

/// Full replacement text for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResult {
    pub text: String,
}

/// Wrap the expected header lines in line-comment decoration. A blank
/// content line becomes a bare marker so the run is not broken.
pub fn decorate(expected: &CompiledHeader, syntax: &CommentSyntax) -> String {
    let decorated: Vec<String> = expected
        .lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                syntax.line.clone()
            } else {
                format!("{} {}", syntax.line, line)
            }
        })
        .collect();
    decorated.join("\n")
}

/// Synthesize the corrected text. `Missing` inserts the decorated
/// header plus one blank line at offset zero; `Empty` and `Mismatched`
/// replace the recorded span (the decorated block plus its trailing
/// separator lines) the same way.
pub fn synthesize(
    original: &str,
    violation: &Violation,
    expected: &CompiledHeader,
    syntax: &CommentSyntax,
) -> FixResult {
    let decorated = decorate(expected, syntax);
    let text = match violation.kind {
        ViolationKind::Missing => {
            // A shebang has to stay the first line of the file, so the
            // header goes directly below it.
            let insert = shebang_end(original);
            let mut out = String::with_capacity(decorated.len() + original.len() + 3);
            out.push_str(&original[..insert]);
            if insert > 0 && !original[..insert].ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&decorated);
            out.push_str("\n\n");
            out.push_str(&original[insert..]);
            out
        }
        ViolationKind::Empty | ViolationKind::Mismatched => {
            let before = &original[..violation.span.start];
            let after = &original[violation.span.end..];
            format!("{}{}\n\n{}", before, decorated, after)
        }
    };
    FixResult { text }
}

fn shebang_end(text: &str) -> usize {
    if text.starts_with("#!") {
        text.find('\n').map(|i| i + 1).unwrap_or(text.len())
    } else {
        0
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
