//! Template compiler — expands the copyright-text template into the
//! exact expected header lines for one file.
//!
//! A template is a plain string with `{name}` placeholders and embedded
//! `\n` line breaks. Expansion is single-pass: substituted values are
//! never rescanned, so a variable whose value contains `{other}` cannot
//! trigger a second substitution round.

use crate::{LintelError, LintelResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the built-in variable bound to the file's logical name.
pub const FILE_NAME_VAR: &str = "fileName";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}\n]+)\}").expect("placeholder regex"));

// ─── Variable Mapping ───────────────────────────────────────────────

/// Immutable variable bindings for one file: built-ins plus user-defined
/// entries from configuration. Constructed fresh per file — there is no
/// global substitution state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMap {
    bindings: BTreeMap<String, String>,
}

impl VariableMap {
    /// Build the binding set for one file. The built-in `fileName` comes
    /// from the logical file name; user-defined entries are layered on
    /// top afterwards, so a configuration that defines `fileName` itself
    /// replaces the built-in.
    pub fn for_file(logical_file_name: &str, user: &BTreeMap<String, String>) -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert(FILE_NAME_VAR.to_string(), logical_file_name.to_string());
        for (name, value) in user {
            bindings.insert(name.clone(), value.clone());
        }
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ─── Template ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A copyright-text template, parsed once into literal and placeholder
/// segments so that expansion per file is a straight walk with no
/// rescanning. Any non-empty `{name}` token is a substitution — an
/// unbound name is a configuration error, never silently literal.
/// Only an unclosed `{` stays literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl HeaderTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(raw) {
            let m = caps.get(0).expect("match group 0");
            if m.start() > last {
                segments.push(Segment::Literal(raw[last..m.start()].to_string()));
            }
            segments.push(Segment::Placeholder(caps[1].to_string()));
            last = m.end();
        }
        if last < raw.len() {
            segments.push(Segment::Literal(raw[last..].to_string()));
        }
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Expand against a variable mapping. Fails with the first unresolved
    /// placeholder in left-to-right order. Embedded `\n` in literals or
    /// substituted values produce separate output lines.
    pub fn expand(&self, vars: &VariableMap) -> LintelResult<Vec<String>> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(LintelError::UnresolvedVariable(name.clone())),
                },
            }
        }
        Ok(out.split('\n').map(str::to_string).collect())
    }
}

// ─── Compiled Header ────────────────────────────────────────────────

/// The fully expanded expected header: an ordered sequence of content
/// lines, independent of any comment-syntax decoration. Two shapes
/// exist — plain (the template lines as-is) and structured (the lines
/// wrapped in `<copyright file="...">` documentation tags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledHeader {
    pub lines: Vec<String>,
}

impl CompiledHeader {
    pub fn plain(template: &HeaderTemplate, vars: &VariableMap) -> LintelResult<Self> {
        Ok(Self {
            lines: template.expand(vars)?,
        })
    }

    /// Structured shape: the expanded lines inside copyright tag lines.
    /// The tag's file attribute resolves through the variable mapping so
    /// a user-defined `fileName` wins there too.
    pub fn structured(template: &HeaderTemplate, vars: &VariableMap) -> LintelResult<Self> {
        let file_name = vars
            .get(FILE_NAME_VAR)
            .ok_or_else(|| LintelError::UnresolvedVariable(FILE_NAME_VAR.to_string()))?
            .to_string();
        let mut lines = vec![format!("<copyright file=\"{}\">", file_name)];
        lines.extend(template.expand(vars)?);
        lines.push("</copyright>".to_string());
        Ok(Self { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
