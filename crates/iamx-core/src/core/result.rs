// crates/iamx-core/src/core/result.rs
// ============================================================================
// Module: iamx Analysis Results
// Description: Per-document analysis results and batch verdict entries.
// Purpose: Carry immutable analysis output in the canonical wire shape.
// Dependencies: serde, crate::core::{finding, severity}
// ============================================================================

//! ## Overview
//! An [`AnalysisResult`] is created fresh per analysis invocation and never
//! mutated afterwards; downstream consumers (CLI, report generators, CI)
//! only read it. A [`DocumentVerdict`] tags each batch slot as analyzed or
//! rejected so one malformed document never disturbs its siblings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::finding::Finding;
use crate::core::severity::SeveritySummary;

// ============================================================================
// SECTION: Analysis Result
// ============================================================================

/// Immutable result of analyzing one policy document.
///
/// # Invariants
/// - `findings` is sorted severity-descending, then ruleId ascending.
/// - `summary` and `passed` are consistent with `findings` and the
///   configured fail threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Identifier of the source document (file path or caller-supplied ID).
    pub source_document_id: String,
    /// Ordered finding sequence.
    pub findings: Vec<Finding>,
    /// Per-severity finding counts.
    pub summary: SeveritySummary,
    /// Whether the result passes the configured fail threshold.
    pub passed: bool,
    /// Deterministic 0-10 aggregate risk score.
    pub risk_score: f64,
}

// ============================================================================
// SECTION: Document Errors
// ============================================================================

/// Typed rejection record for a document that could not be analyzed.
///
/// # Invariants
/// - `code` is a stable identifier from the parse-error taxonomy (or an
///   I/O code supplied by the host layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentError {
    /// Identifier of the rejected source document.
    pub source_document_id: String,
    /// Stable error code, e.g. `MALFORMED_JSON`.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl DocumentError {
    /// Creates a rejection record.
    #[must_use]
    pub fn new(
        source_document_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_document_id: source_document_id.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Document Verdict
// ============================================================================

/// Tagged per-document outcome within a batch.
///
/// # Invariants
/// - Exactly one verdict exists per input document, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentVerdict {
    /// Analysis completed for this document.
    Analyzed {
        /// The analysis result.
        result: AnalysisResult,
    },
    /// The document was rejected before analysis.
    Rejected {
        /// The typed rejection record.
        error: DocumentError,
    },
}

impl DocumentVerdict {
    /// Returns the source document identifier for this verdict.
    #[must_use]
    pub fn source_document_id(&self) -> &str {
        match self {
            Self::Analyzed { result } => &result.source_document_id,
            Self::Rejected { error } => &error.source_document_id,
        }
    }

    /// Reports whether this verdict counts as passed for exit-code gating.
    ///
    /// Rejected documents never pass.
    #[must_use]
    pub const fn passed(&self) -> bool {
        match self {
            Self::Analyzed { result } => result.passed,
            Self::Rejected { .. } => false,
        }
    }

    /// Returns the analysis result when the document was analyzed.
    #[must_use]
    pub const fn as_result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Analyzed { result } => Some(result),
            Self::Rejected { .. } => None,
        }
    }
}
