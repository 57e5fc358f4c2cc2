//! Header locator — finds the leading comment block of a source file.
//!
//! Scans raw text for the first comment preceding any real content,
//! decodes its lines (comment markers stripped), and records the
//! decorated span including trailing blank separator lines so a
//! replacement can substitute the whole block cleanly. The two comment
//! shapes are a tagged variant, not a hierarchy: a run of consecutive
//! line comments, or a single block comment.
//!
//! A file whose entire leading comment equals the auto-generated
//! sentinel is marked exempt and bypasses all further checks.

use serde::{Deserialize, Serialize};

// ─── Span ───────────────────────────────────────────────────────────

/// Byte offsets into the original text, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ─── Comment Syntax ─────────────────────────────────────────────────

/// Comment markers for one language family. C-family is the default;
/// hash and dash families cover script and SQL/Haskell-style sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSyntax {
    /// Line-comment marker, e.g. `//`.
    pub line: String,
    /// Block-comment open/close markers, e.g. `/*` and `*/`. Families
    /// without block comments leave this unset.
    pub block: Option<(String, String)>,
}

impl CommentSyntax {
    /// `//` line comments, `/* */` blocks (C, C#, Java, Rust, JS, Go).
    pub fn c_family() -> Self {
        Self {
            line: "//".to_string(),
            block: Some(("/*".to_string(), "*/".to_string())),
        }
    }

    /// `#` line comments (Python, Ruby, shell, YAML, TOML).
    pub fn hash() -> Self {
        Self {
            line: "#".to_string(),
            block: None,
        }
    }

    /// `--` line comments (SQL, Haskell, Lua).
    pub fn dash() -> Self {
        Self {
            line: "--".to_string(),
            block: None,
        }
    }
}

impl Default for CommentSyntax {
    fn default() -> Self {
        Self::c_family()
    }
}

// ─── Extracted Header ───────────────────────────────────────────────

/// Which comment shape carried the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStyle {
    /// One or more consecutive line comments, each on its own line.
    LineSequence,
    /// A single delimited block comment, possibly spanning lines.
    Block,
}

/// The leading comment block of a file: shape, decoded content lines
/// (markers stripped), the decorated span (including trailing blank
/// separator lines), and whether the sentinel exempts the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedHeader {
    pub style: CommentStyle,
    pub content: Vec<String>,
    pub span: Span,
    pub exempt: bool,
}

// ─── Line scanning ──────────────────────────────────────────────────

/// One physical line with its byte offsets. `text` has the trailing
/// newline (and any `\r`) stripped; `next` is where the following line
/// starts.
struct RawLine<'a> {
    start: usize,
    text: &'a str,
    next: usize,
}

fn split_lines(text: &str) -> Vec<RawLine<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let rest = &text[start..];
        let (line_end, next) = match rest.find('\n') {
            Some(i) => (start + i, start + i + 1),
            None => (text.len(), text.len()),
        };
        let mut content = &text[start..line_end];
        if let Some(stripped) = content.strip_suffix('\r') {
            content = stripped;
        }
        lines.push(RawLine {
            start,
            text: content,
            next,
        });
        start = next;
    }
    lines
}

// ─── Locator ────────────────────────────────────────────────────────

/// Extract the leading comment block, or `None` when no comment
/// precedes the first real content. Purely-whitespace lines at the very
/// start never count as the header nor break detection.
pub fn locate(text: &str, syntax: &CommentSyntax, sentinel: &str) -> Option<ExtractedHeader> {
    let lines = split_lines(text);

    // A shebang is pinned to the first line of the file; it is never
    // part of the header and never breaks detection of a header below.
    let mut idx = 0;
    if lines.first().is_some_and(|l| l.text.starts_with("#!")) {
        idx = 1;
    }

    // Skip leading blank lines.
    while idx < lines.len() && lines[idx].text.trim().is_empty() {
        idx += 1;
    }
    if idx == lines.len() {
        return None;
    }

    let first = lines[idx].text.trim_start();
    if first.starts_with(syntax.line.as_str()) {
        Some(locate_line_sequence(text, &lines, idx, syntax, sentinel))
    } else if let Some((open, _)) = &syntax.block {
        if first.starts_with(open.as_str()) {
            Some(locate_block(text, &lines, idx, syntax, sentinel))
        } else {
            None
        }
    } else {
        None
    }
}

fn locate_line_sequence(
    text: &str,
    lines: &[RawLine<'_>],
    idx: usize,
    syntax: &CommentSyntax,
    sentinel: &str,
) -> ExtractedHeader {
    let mut content = Vec::new();
    let mut end_idx = idx;
    for (j, line) in lines.iter().enumerate().skip(idx) {
        let trimmed = line.text.trim_start();
        match trimmed.strip_prefix(syntax.line.as_str()) {
            // Leading inline whitespace before the marker is fine; a
            // blank or non-comment line terminates the run.
            Some(rest) => {
                content.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
                end_idx = j;
            }
            None => break,
        }
    }

    let span = decorated_span(text, lines, idx, end_idx);
    let exempt = is_sentinel(&content, sentinel);
    ExtractedHeader {
        style: CommentStyle::LineSequence,
        content,
        span,
        exempt,
    }
}

fn locate_block(
    text: &str,
    lines: &[RawLine<'_>],
    idx: usize,
    syntax: &CommentSyntax,
    sentinel: &str,
) -> ExtractedHeader {
    let (open, close) = syntax.block.as_ref().expect("block syntax");
    let line = &lines[idx];
    let marker_offset = line.text.len() - line.text.trim_start().len();
    let interior_start = line.start + marker_offset + open.len();

    // A missing close marker is invalid source, but diagnosing that is
    // someone else's job: the header simply runs to end of file.
    let interior_end = text[interior_start..]
        .find(close.as_str())
        .map(|i| interior_start + i);
    let (interior, decorated_end) = match interior_end {
        Some(p) => (&text[interior_start..p], p + close.len()),
        None => (&text[interior_start..], text.len()),
    };

    let content = decode_block_interior(interior);

    // The decorated block ends with the line holding the close marker.
    let mut end_idx = idx;
    for (j, l) in lines.iter().enumerate().skip(idx) {
        if decorated_end <= l.next {
            end_idx = j;
            break;
        }
        end_idx = j;
    }

    // Code after the close marker on the same line stays outside the
    // span; the span only swallows the rest of the line and trailing
    // separator lines when that rest is blank.
    let close_line = &lines[end_idx];
    let content_end = close_line.start + close_line.text.len();
    let remainder = &text[decorated_end.min(content_end)..content_end];
    let span = if remainder.trim().is_empty() {
        decorated_span(text, lines, idx, end_idx)
    } else {
        let alignment = remainder.len() - remainder.trim_start().len();
        Span::new(lines[idx].start, decorated_end + alignment)
    };
    let exempt = is_sentinel(&content, sentinel);
    ExtractedHeader {
        style: CommentStyle::Block,
        content,
        span,
        exempt,
    }
}

/// Decode block-comment interior text into content lines. Both accepted
/// sub-styles are handled: a `*` alignment marker repeated per line, or
/// bare continuation lines when the marker appears only at open/close.
fn decode_block_interior(interior: &str) -> Vec<String> {
    let raw: Vec<&str> = interior.split('\n').collect();
    let last = raw.len() - 1;
    let mut content = Vec::with_capacity(raw.len());
    for (i, &line) in raw.iter().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut decoded = if i == 0 {
            // Text right after the open marker: at most one alignment
            // space is decoration.
            line.strip_prefix(' ').unwrap_or(line).to_string()
        } else {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).to_string(),
                None => trimmed.to_string(),
            }
        };
        if i == last {
            if let Some(stripped) = decoded.strip_suffix(' ') {
                decoded = stripped.to_string();
            }
        }
        content.push(decoded);
    }

    // Open/close markers sitting on their own lines contribute blank
    // first/last entries; those are decoration, not content.
    if content.len() > 1 && content[0].trim().is_empty() {
        content.remove(0);
    }
    if content.len() > 1 && content[content.len() - 1].trim().is_empty() {
        content.pop();
    }
    content
}

/// Span from the start of the line opening the comment through any
/// trailing blank lines, up to (not including) the next non-blank
/// content.
fn decorated_span(text: &str, lines: &[RawLine<'_>], start_idx: usize, end_idx: usize) -> Span {
    let mut k = end_idx + 1;
    while k < lines.len() && lines[k].text.trim().is_empty() {
        k += 1;
    }
    let end = if k < lines.len() {
        lines[k].start
    } else {
        text.len()
    };
    Span::new(lines[start_idx].start, end)
}

fn is_sentinel(content: &[String], sentinel: &str) -> bool {
    !sentinel.is_empty() && content.join("\n").trim() == sentinel.trim()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: &str = "<auto-generated/>";

    fn locate_c(text: &str) -> Option<ExtractedHeader> {
        locate(text, &CommentSyntax::c_family(), SENTINEL)
    }

    #[test]
    fn test_line_sequence_extraction() {
        let text = "// Copyright FooCorp.\n// All rights reserved.\n\nfn main() {}\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.style, CommentStyle::LineSequence);
        assert_eq!(header.content, vec!["Copyright FooCorp.", "All rights reserved."]);
        assert!(!header.exempt);
    }

    #[test]
    fn test_span_covers_trailing_blank_lines() {
        let text = "// hdr\n\n\nnamespace Foo {}\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.span, Span::new(0, text.find("namespace").unwrap()));
    }

    #[test]
    fn test_leading_blank_lines_are_skipped() {
        let text = "\n  \n// hdr\ncode\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["hdr"]);
        assert_eq!(header.span.start, text.find("//").unwrap());
    }

    #[test]
    fn test_inline_whitespace_before_marker_still_detects() {
        let text = "   // hdr\ncode\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["hdr"]);
        // Span starts at the line, not the marker.
        assert_eq!(header.span.start, 0);
    }

    #[test]
    fn test_blank_line_terminates_line_run() {
        let text = "// one\n\n// two\ncode\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["one"]);
    }

    #[test]
    fn test_no_comment_yields_none() {
        assert!(locate_c("using System;\n\nnamespace Foo {}\n").is_none());
    }

    #[test]
    fn test_blank_file_yields_none() {
        assert!(locate_c("").is_none());
        assert!(locate_c("\n\n   \n").is_none());
    }

    #[test]
    fn test_marker_with_no_text_decodes_blank() {
        let header = locate_c("//\ncode\n").unwrap();
        assert_eq!(header.content, vec![""]);
    }

    #[test]
    fn test_block_single_line() {
        let header = locate_c("/* Copyright FooCorp. */\ncode\n").unwrap();
        assert_eq!(header.style, CommentStyle::Block);
        assert_eq!(header.content, vec!["Copyright FooCorp."]);
    }

    #[test]
    fn test_block_star_per_line() {
        let text = "/*\n * Copyright FooCorp.\n * Licensed.\n */\ncode\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["Copyright FooCorp.", "Licensed."]);
    }

    #[test]
    fn test_block_marker_only_at_open() {
        let text = "/* Copyright FooCorp.\n   Licensed. */\ncode\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["Copyright FooCorp.", "Licensed."]);
    }

    #[test]
    fn test_code_after_block_close_stays_outside_span() {
        let text = "/* old */ using System;\nnamespace Foo {}\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["old"]);
        assert_eq!(header.span, Span::new(0, text.find("using").unwrap()));
    }

    #[test]
    fn test_blank_rest_of_close_line_stays_inside_span() {
        let text = "/* old */   \n\ncode\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.span, Span::new(0, text.find("code").unwrap()));
    }

    #[test]
    fn test_shebang_is_not_part_of_header() {
        let text = "#!/usr/bin/env bash\n# Copyright FooCorp.\n\necho hi\n";
        let header = locate(text, &CommentSyntax::hash(), SENTINEL).unwrap();
        assert_eq!(header.content, vec!["Copyright FooCorp."]);
        assert_eq!(header.span.start, text.find("# Copyright").unwrap());
    }

    #[test]
    fn test_shebang_with_no_comment_below_yields_none() {
        let text = "#!/usr/bin/env bash\necho hi\n";
        assert!(locate(text, &CommentSyntax::hash(), SENTINEL).is_none());
    }

    #[test]
    fn test_unterminated_block_runs_to_eof() {
        let text = "/* Copyright FooCorp.\nnever closed\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.style, CommentStyle::Block);
        assert_eq!(header.content, vec!["Copyright FooCorp.", "never closed"]);
        assert_eq!(header.span, Span::new(0, text.len()));
    }

    #[test]
    fn test_sentinel_marks_exempt() {
        let header = locate_c("// <auto-generated/>\n\nnamespace Bar {}\n").unwrap();
        assert!(header.exempt);
    }

    #[test]
    fn test_sentinel_must_be_entire_content() {
        let text = "// <auto-generated/>\n// plus more\ncode\n";
        let header = locate_c(text).unwrap();
        assert!(!header.exempt);
    }

    #[test]
    fn test_hash_syntax() {
        let text = "# Copyright FooCorp.\n# Licensed.\n\nimport os\n";
        let header = locate(text, &CommentSyntax::hash(), SENTINEL).unwrap();
        assert_eq!(header.content, vec!["Copyright FooCorp.", "Licensed."]);
    }

    #[test]
    fn test_crlf_lines_decode_cleanly() {
        let text = "// hdr\r\n\r\ncode\r\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.content, vec!["hdr"]);
        assert_eq!(header.span.end, text.find("code").unwrap());
    }

    #[test]
    fn test_header_with_no_following_content() {
        let text = "// hdr\n";
        let header = locate_c(text).unwrap();
        assert_eq!(header.span, Span::new(0, text.len()));
    }
}
