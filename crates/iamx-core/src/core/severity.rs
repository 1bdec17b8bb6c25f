// crates/iamx-core/src/core/severity.rs
// ============================================================================
// Module: iamx Severity Scale
// Description: Severity ordering, fail thresholds, and summary aggregation.
// Purpose: Provide the total-ordered severity vocabulary and pass/fail logic.
// Dependencies: serde, crate::core::finding
// ============================================================================

//! ## Overview
//! Severity is a fixed, total-ordered vocabulary: `Critical > High > Medium
//! > Low`. Every finding carries exactly one severity assigned by its
//! originating rule; no "unknown" severity exists. Threshold evaluation is
//! pure and monotonic: failing a looser threshold always fails a stricter
//! one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::finding::Finding;

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Ordinal severity assigned to a finding.
///
/// # Invariants
/// - Variants are declared in ascending order so the derived ordering is
///   `Low < Medium < High < Critical`.
/// - Wire names are capitalized (`"Critical"`, `"High"`, `"Medium"`, `"Low"`)
///   and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Low-risk finding; advisory.
    Low,
    /// Medium-risk finding; should be reviewed.
    Medium,
    /// High-risk finding; likely violates least privilege.
    High,
    /// Critical finding; effectively unrestricted access.
    Critical,
}

impl Severity {
    /// Returns the stable wire name for this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Fail Threshold
// ============================================================================

/// Minimum severity that causes an analysis to be reported as failed.
///
/// # Invariants
/// - `None` means "no threshold"; every result passes.
/// - Mirrors the CLI `--fail-on` control; wire names are lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    /// No threshold; analysis always passes.
    #[default]
    None,
    /// Fail on any finding at `Low` or above.
    Low,
    /// Fail on any finding at `Medium` or above.
    Medium,
    /// Fail on any finding at `High` or above.
    High,
    /// Fail only on `Critical` findings.
    Critical,
}

impl FailOn {
    /// Returns the severity threshold, or `None` when no threshold applies.
    #[must_use]
    pub const fn threshold(self) -> Option<Severity> {
        match self {
            Self::None => None,
            Self::Low => Some(Severity::Low),
            Self::Medium => Some(Severity::Medium),
            Self::High => Some(Severity::High),
            Self::Critical => Some(Severity::Critical),
        }
    }

    /// Reports whether a finding at `severity` breaches this threshold.
    #[must_use]
    pub fn breached_by(self, severity: Severity) -> bool {
        self.threshold().is_some_and(|threshold| severity >= threshold)
    }
}

impl fmt::Display for FailOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SECTION: Severity Summary
// ============================================================================

/// Per-severity finding counts for one analysis result.
///
/// # Invariants
/// - Wire keys match the severity wire names exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    /// Number of `Critical` findings.
    #[serde(rename = "Critical")]
    pub critical: u64,
    /// Number of `High` findings.
    #[serde(rename = "High")]
    pub high: u64,
    /// Number of `Medium` findings.
    #[serde(rename = "Medium")]
    pub medium: u64,
    /// Number of `Low` findings.
    #[serde(rename = "Low")]
    pub low: u64,
}

impl SeveritySummary {
    /// Records one finding at the given severity.
    pub const fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    /// Returns the count recorded for one severity.
    #[must_use]
    pub const fn count(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    /// Returns the total number of findings across all severities.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.critical + self.high + self.medium + self.low
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Risk-score weight for a `Critical` finding.
const CRITICAL_WEIGHT: f64 = 4.0;
/// Risk-score weight for a `High` finding.
const HIGH_WEIGHT: f64 = 2.5;
/// Risk-score weight for a `Medium` finding.
const MEDIUM_WEIGHT: f64 = 1.0;
/// Risk-score weight for a `Low` finding.
const LOW_WEIGHT: f64 = 0.5;
/// Ceiling for the aggregate risk score.
const MAX_RISK_SCORE: f64 = 10.0;

/// Aggregates per-severity counts over a finding sequence.
#[must_use]
pub fn summarize(findings: &[Finding]) -> SeveritySummary {
    let mut summary = SeveritySummary::default();
    for finding in findings {
        summary.record(finding.severity);
    }
    summary
}

/// Reports whether a finding sequence passes the given threshold.
///
/// Returns `false` iff any finding's severity is at or above the threshold.
/// With [`FailOn::None`] every sequence passes.
#[must_use]
pub fn passes(findings: &[Finding], fail_on: FailOn) -> bool {
    !findings.iter().any(|finding| fail_on.breached_by(finding.severity))
}

/// Computes the deterministic 0-10 aggregate risk score for a summary.
///
/// The score is a fixed weighted sum of finding counts, capped at 10.
#[must_use]
#[allow(clippy::cast_precision_loss, reason = "Finding counts are far below 2^52.")]
pub fn risk_score(summary: &SeveritySummary) -> f64 {
    let raw = summary.critical as f64 * CRITICAL_WEIGHT
        + summary.high as f64 * HIGH_WEIGHT
        + summary.medium as f64 * MEDIUM_WEIGHT
        + summary.low as f64 * LOW_WEIGHT;
    raw.min(MAX_RISK_SCORE)
}
