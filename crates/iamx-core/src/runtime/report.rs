// crates/iamx-core/src/runtime/report.rs
// ============================================================================
// Module: iamx Result Serializer
// Description: Stable JSON and human-oriented markdown report rendering.
// Purpose: Render analysis results for CLI, CI, and report consumers.
// Dependencies: serde_json, serde_jcs, thiserror, crate::core
// ============================================================================

//! ## Overview
//! JSON is the canonical, stable wire format: field names are fixed and the
//! canonical (JCS) form is byte-identical for identical input, which backs
//! the engine's determinism guarantee. Markdown rendering is lossy and
//! human-oriented; it is not required to round-trip. Serialization never
//! mutates a result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

use thiserror::Error;

use crate::core::finding::Finding;
use crate::core::result::AnalysisResult;
use crate::core::result::DocumentError;
use crate::core::result::DocumentVerdict;
use crate::core::severity::Severity;

// ============================================================================
// SECTION: Report Errors
// ============================================================================

/// Serialization-surface errors.
///
/// # Invariants
/// - [`ReportError::UnsupportedFormat`] is a caller-configuration mistake
///   and fatal to the whole invocation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested output format is not recognized.
    #[error("unsupported report format: {requested}")]
    UnsupportedFormat {
        /// The format string the caller supplied.
        requested: String,
    },
    /// JSON serialization failed.
    #[error("report serialization failed: {message}")]
    Serialize {
        /// Underlying serializer error.
        message: String,
    },
}

// ============================================================================
// SECTION: Report Formats
// ============================================================================

/// Recognized report formats.
///
/// # Invariants
/// - Variants are stable; anything else is an [`ReportError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Canonical machine-checkable JSON.
    Json,
    /// Lossy human-oriented markdown.
    Markdown,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if value.eq_ignore_ascii_case("markdown") {
            Ok(Self::Markdown)
        } else {
            Err(ReportError::UnsupportedFormat { requested: value.to_owned() })
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders one analysis result in the requested format.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] when JSON serialization fails.
pub fn render(result: &AnalysisResult, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|err| ReportError::Serialize { message: err.to_string() }),
        ReportFormat::Markdown => Ok(render_result_markdown(result)),
    }
}

/// Renders one verdict in the requested format.
///
/// An analyzed verdict renders as the bare result object; a rejected one
/// renders as the bare tagged verdict object carrying its error.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] when JSON serialization fails.
pub fn render_verdict(
    verdict: &DocumentVerdict,
    format: ReportFormat,
) -> Result<String, ReportError> {
    match verdict {
        DocumentVerdict::Analyzed { result } => render(result, format),
        DocumentVerdict::Rejected { error } => match format {
            ReportFormat::Json => serde_json::to_string_pretty(verdict)
                .map_err(|err| ReportError::Serialize { message: err.to_string() }),
            ReportFormat::Markdown => Ok(render_error_markdown(error)),
        },
    }
}

/// Renders a batch of verdicts in the requested format.
///
/// JSON renders the tagged verdict array; markdown concatenates one section
/// per document.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] when JSON serialization fails.
pub fn render_batch(
    verdicts: &[DocumentVerdict],
    format: ReportFormat,
) -> Result<String, ReportError> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(verdicts)
            .map_err(|err| ReportError::Serialize { message: err.to_string() }),
        ReportFormat::Markdown => {
            let sections: Vec<String> = verdicts
                .iter()
                .map(|verdict| match verdict {
                    DocumentVerdict::Analyzed { result } => render_result_markdown(result),
                    DocumentVerdict::Rejected { error } => render_error_markdown(error),
                })
                .collect();
            Ok(sections.join("\n---\n\n"))
        }
    }
}

/// Serializes a result in the canonical (JCS) byte-stable form.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] when canonicalization fails.
pub fn canonical_json(result: &AnalysisResult) -> Result<String, ReportError> {
    serde_jcs::to_string(result)
        .map_err(|err| ReportError::Serialize { message: err.to_string() })
}

// ============================================================================
// SECTION: Markdown Rendering
// ============================================================================

/// Renders one analysis result as a markdown section.
fn render_result_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let status = if result.passed { "PASSED" } else { "FAILED" };
    let _ = writeln!(out, "# IAM Policy Analysis: {}", result.source_document_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "- Status: **{status}**");
    let _ = writeln!(out, "- Risk score: {:.1} / 10", result.risk_score);
    let _ = writeln!(
        out,
        "- Findings: {} (Critical: {}, High: {}, Medium: {}, Low: {})",
        result.summary.total(),
        result.summary.critical,
        result.summary.high,
        result.summary.medium,
        result.summary.low,
    );

    if result.findings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No risky permission patterns detected.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Findings");
    for finding in &result.findings {
        render_finding_markdown(&mut out, finding);
    }
    out
}

/// Renders one finding as a markdown subsection.
fn render_finding_markdown(out: &mut String, finding: &Finding) {
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "### [{}] {} (`{}`)",
        finding.severity, finding.title, finding.rule_id,
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "- Statement: `{}`", finding.statement_ref);
    let _ = writeln!(out, "- {}", finding.explanation);
    let _ = writeln!(out, "- Recommendation: {}", finding.recommendation);
    render_evidence_line(out, "Actions", &finding.evidence.actions);
    render_evidence_line(out, "Resources", &finding.evidence.resources);
    render_evidence_line(out, "Principals", &finding.evidence.principals);
    render_evidence_line(out, "Condition keys", &finding.evidence.condition_keys);
}

/// Renders one non-empty evidence list as a markdown bullet.
fn render_evidence_line(out: &mut String, label: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    let rendered: Vec<String> = values.iter().map(|value| format!("`{value}`")).collect();
    let _ = writeln!(out, "- {label}: {}", rendered.join(", "));
}

/// Renders a rejected document as a markdown section.
fn render_error_markdown(error: &DocumentError) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# IAM Policy Analysis: {}", error.source_document_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "- Status: **REJECTED** (`{}`)", error.code);
    let _ = writeln!(out, "- {}", error.message);
    out
}

// ============================================================================
// SECTION: Severity Helpers
// ============================================================================

/// Orders severities for display tables (highest first).
#[must_use]
pub const fn display_order() -> [Severity; 4] {
    [Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
}
