//! Engine — configuration, the per-file check pipeline, and batch
//! checking.
//!
//! The per-file pipeline is purely sequential: compile the expected
//! header, locate the leading comment, classify, and (on request)
//! synthesize the fix. Files share no state, so the batch entry point
//! fans out over a rayon worker pool. Template segments are parsed
//! once per configuration; only the `fileName` binding is re-resolved
//! per file.

use crate::classify::{classify, Violation, ViolationKind};
use crate::fix::{synthesize, FixResult};
use crate::locator::{locate, CommentSyntax};
use crate::template::{CompiledHeader, HeaderTemplate, VariableMap};
use crate::LintelResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header content that exempts a file from all checks.
pub const DEFAULT_SENTINEL: &str = "<auto-generated/>";

// ─── Configuration ──────────────────────────────────────────────────

/// Resolved header-check settings for one configuration scope. Loading
/// and merging settings files is the host's job; this is the already-
/// resolved object it hands over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Copyright-text template with `{name}` placeholders.
    pub copyright_template: String,

    /// User-defined variables. An entry named `fileName` overrides the
    /// built-in binding derived from the logical file name.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Compare against the documentation-tag header shape instead of
    /// the plain template lines.
    #[serde(default)]
    pub structured_header: bool,

    /// Sentinel that exempts a file when it is the entire header
    /// content.
    #[serde(default = "default_sentinel")]
    pub auto_generated_sentinel: String,

    /// Comment markers of the language being checked.
    #[serde(default)]
    pub comment_syntax: CommentSyntax,
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

impl HeaderConfig {
    pub fn new(copyright_template: impl Into<String>) -> Self {
        Self {
            copyright_template: copyright_template.into(),
            variables: BTreeMap::new(),
            structured_header: false,
            auto_generated_sentinel: default_sentinel(),
            comment_syntax: CommentSyntax::default(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

// ─── Checker ────────────────────────────────────────────────────────

/// Header checker for one configuration. Reusable across any number of
/// files; holds the template parsed into segments so per-file work is a
/// substitution walk plus one text scan.
pub struct HeaderChecker {
    config: HeaderConfig,
    template: HeaderTemplate,
}

impl HeaderChecker {
    pub fn new(config: HeaderConfig) -> Self {
        if config.copyright_template.trim().is_empty() {
            tracing::warn!("copyright template is empty; every non-exempt header will mismatch");
        }
        let template = HeaderTemplate::parse(&config.copyright_template);
        Self { config, template }
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    /// The exact header content expected for one file, in the shape the
    /// configuration selects.
    pub fn expected_header(&self, logical_file_name: &str) -> LintelResult<CompiledHeader> {
        let vars = VariableMap::for_file(logical_file_name, &self.config.variables);
        if self.config.structured_header {
            CompiledHeader::structured(&self.template, &vars)
        } else {
            CompiledHeader::plain(&self.template, &vars)
        }
    }

    /// Check one file. `Ok(None)` means the header is valid or the file
    /// is exempt; an `Err` is a configuration defect, not a content
    /// violation.
    pub fn check(&self, file_text: &str, logical_file_name: &str) -> LintelResult<Option<Violation>> {
        self.evaluate(file_text, logical_file_name)
            .map(|(violation, _)| violation)
    }

    /// Produce the corrected full-file text, or `None` when the file
    /// already passes. No fix is attempted on a configuration error.
    pub fn fix(&self, file_text: &str, logical_file_name: &str) -> LintelResult<Option<FixResult>> {
        let extracted = locate(
            file_text,
            &self.config.comment_syntax,
            &self.config.auto_generated_sentinel,
        );
        if extracted.as_ref().is_some_and(|h| h.exempt) {
            return Ok(None);
        }
        let expected = self.expected_header(logical_file_name)?;
        Ok(classify(extracted.as_ref(), &expected)
            .map(|violation| synthesize(file_text, &violation, &expected, &self.config.comment_syntax)))
    }

    /// Check many files on a rayon worker pool. Files are independent,
    /// so no ordering or locking applies; outcomes come back in input
    /// order.
    pub fn check_many(&self, files: &[(String, String)]) -> CheckReport {
        let outcomes: Vec<CheckOutcome> = files
            .par_iter()
            .map(|(name, text)| match self.evaluate(text, name) {
                Ok((violation, exempt)) => CheckOutcome {
                    file: name.clone(),
                    violation,
                    exempt,
                    config_error: None,
                },
                Err(e) => CheckOutcome {
                    file: name.clone(),
                    violation: None,
                    exempt: false,
                    config_error: Some(e.to_string()),
                },
            })
            .collect();

        let mut report = CheckReport::default();
        for outcome in outcomes {
            report.add_outcome(outcome);
        }
        tracing::debug!(
            "checked {} files: {} clean, {} exempt, {} violations",
            report.files_checked,
            report.clean,
            report.exempt,
            report.violation_count()
        );
        report
    }

    fn evaluate(
        &self,
        file_text: &str,
        logical_file_name: &str,
    ) -> LintelResult<(Option<Violation>, bool)> {
        let extracted = locate(
            file_text,
            &self.config.comment_syntax,
            &self.config.auto_generated_sentinel,
        );
        // Exemption bypasses everything, including template compilation:
        // a generated file stays clean even under a broken template.
        if extracted.as_ref().is_some_and(|h| h.exempt) {
            return Ok((None, true));
        }
        let expected = self.expected_header(logical_file_name)?;
        Ok((classify(extracted.as_ref(), &expected), false))
    }
}

/// One-shot boundary any host can call directly: no callback or
/// registration model, just a pure function over the file and the
/// resolved configuration.
pub fn check(
    file_text: &str,
    logical_file_name: &str,
    config: &HeaderConfig,
) -> LintelResult<Option<Violation>> {
    HeaderChecker::new(config.clone()).check(file_text, logical_file_name)
}

// ─── Batch Report ───────────────────────────────────────────────────

/// Per-file outcome within a batch. A configuration error is reported
/// separately from content violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub file: String,
    pub violation: Option<Violation>,
    pub exempt: bool,
    pub config_error: Option<String>,
}

/// Aggregated batch result with violation counters by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub outcomes: Vec<CheckOutcome>,
    pub files_checked: usize,
    pub clean: usize,
    pub exempt: usize,
    pub missing_count: usize,
    pub empty_count: usize,
    pub mismatched_count: usize,
    pub config_errors: usize,
}

impl CheckReport {
    pub fn add_outcome(&mut self, outcome: CheckOutcome) {
        self.files_checked += 1;
        if outcome.config_error.is_some() {
            self.config_errors += 1;
        } else if outcome.exempt {
            self.exempt += 1;
        } else {
            match outcome.violation.as_ref().map(|v| v.kind) {
                None => self.clean += 1,
                Some(ViolationKind::Missing) => self.missing_count += 1,
                Some(ViolationKind::Empty) => self.empty_count += 1,
                Some(ViolationKind::Mismatched) => self.mismatched_count += 1,
            }
        }
        self.outcomes.push(outcome);
    }

    pub fn violation_count(&self) -> usize {
        self.missing_count + self.empty_count + self.mismatched_count
    }

    pub fn is_clean(&self) -> bool {
        self.violation_count() == 0 && self.config_errors == 0
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LintelError;

    fn foo_corp_config() -> HeaderConfig {
        HeaderConfig::new("Copyright (c) {companyName}. All rights reserved.")
            .with_variable("companyName", "FooCorp")
    }

    #[test]
    fn test_checker_clean_file() {
        let checker = HeaderChecker::new(foo_corp_config());
        let text = "// Copyright (c) FooCorp. All rights reserved.\n\nfn main() {}\n";
        assert!(checker.check(text, "main.rs").unwrap().is_none());
    }

    #[test]
    fn test_checker_reports_missing() {
        let checker = HeaderChecker::new(foo_corp_config());
        let violation = checker.check("fn main() {}\n", "main.rs").unwrap().unwrap();
        assert_eq!(violation.kind, ViolationKind::Missing);
    }

    #[test]
    fn test_unresolved_variable_is_config_error_not_violation() {
        let checker = HeaderChecker::new(HeaderConfig::new("Copyright {nobody}"));
        let err = checker.check("fn main() {}\n", "main.rs").unwrap_err();
        assert_eq!(err, LintelError::UnresolvedVariable("nobody".into()));
        // And no fix is produced either.
        assert!(checker.fix("fn main() {}\n", "main.rs").is_err());
    }

    #[test]
    fn test_fix_returns_none_for_valid_file() {
        let checker = HeaderChecker::new(foo_corp_config());
        let text = "// Copyright (c) FooCorp. All rights reserved.\n\nfn main() {}\n";
        assert!(checker.fix(text, "main.rs").unwrap().is_none());
    }

    #[test]
    fn test_structured_header_shape_selected_by_flag() {
        let mut config = foo_corp_config();
        config.structured_header = true;
        let checker = HeaderChecker::new(config);
        let expected = checker.expected_header("Widget.cs").unwrap();
        assert_eq!(expected.lines[0], "<copyright file=\"Widget.cs\">");
        assert_eq!(*expected.lines.last().unwrap(), "</copyright>");
    }

    #[test]
    fn test_expected_header_resolves_file_name_per_file() {
        let checker = HeaderChecker::new(HeaderConfig::new("File: {fileName}"));
        assert_eq!(checker.expected_header("a.rs").unwrap().lines, vec!["File: a.rs"]);
        assert_eq!(checker.expected_header("b.rs").unwrap().lines, vec!["File: b.rs"]);
    }

    #[test]
    fn test_check_many_counts() {
        let checker = HeaderChecker::new(foo_corp_config());
        let files = vec![
            (
                "clean.rs".to_string(),
                "// Copyright (c) FooCorp. All rights reserved.\n\nfn a() {}\n".to_string(),
            ),
            ("missing.rs".to_string(), "fn b() {}\n".to_string()),
            ("empty.rs".to_string(), "//\nfn c() {}\n".to_string()),
            ("wrong.rs".to_string(), "// nope\nfn d() {}\n".to_string()),
            (
                "generated.rs".to_string(),
                "// <auto-generated/>\n\nfn e() {}\n".to_string(),
            ),
        ];
        let report = checker.check_many(&files);
        assert_eq!(report.files_checked, 5);
        assert_eq!(report.clean, 1);
        assert_eq!(report.exempt, 1);
        assert_eq!(report.missing_count, 1);
        assert_eq!(report.empty_count, 1);
        assert_eq!(report.mismatched_count, 1);
        assert_eq!(report.violation_count(), 3);
        assert!(!report.is_clean());
        // Outcomes preserve input order.
        assert_eq!(report.outcomes[1].file, "missing.rs");
    }

    #[test]
    fn test_check_many_reports_config_errors() {
        let checker = HeaderChecker::new(HeaderConfig::new("{missingVar}"));
        let report = checker.check_many(&[("a.rs".to_string(), "fn a() {}\n".to_string())]);
        assert_eq!(report.config_errors, 1);
        assert!(report.outcomes[0].config_error.is_some());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_free_function_boundary() {
        let violation = check("fn main() {}\n", "main.rs", &foo_corp_config())
            .unwrap()
            .unwrap();
        assert_eq!(violation.kind, ViolationKind::Missing);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: HeaderConfig =
            serde_json::from_str(r#"{"copyright_template": "hdr"}"#).unwrap();
        assert_eq!(config.auto_generated_sentinel, DEFAULT_SENTINEL);
        assert!(!config.structured_header);
        assert_eq!(config.comment_syntax, CommentSyntax::c_family());
    }
}
