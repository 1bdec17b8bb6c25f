// crates/iamx-core/src/core/finding.rs
// ============================================================================
// Module: iamx Findings
// Description: Rule identifiers, statement references, evidence, and findings.
// Purpose: Represent one detected risk pattern with stable wire forms.
// Dependencies: serde, crate::core::severity
// ============================================================================

//! ## Overview
//! A finding traces to exactly one rule and one statement scope. Evidence
//! lists are sorted and deduplicated at construction so that identical
//! matches always compare equal, which makes engine-level deduplication and
//! the canonical wire form deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::severity::Severity;

// ============================================================================
// SECTION: Rule Identifiers
// ============================================================================

/// Stable identifier of a detector rule.
///
/// # Invariants
/// - Variants are declared in ascending order of their wire names so the
///   derived ordering matches lexicographic ruleId ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    /// Administrative action pattern detected.
    #[serde(rename = "ADMIN_ACTION_DETECTED")]
    AdminActionDetected,
    /// Cross-account or wildcard principal detected.
    #[serde(rename = "CROSS_ACCOUNT_PRINCIPAL")]
    CrossAccountPrincipal,
    /// Administrative action allowed without an MFA condition.
    #[serde(rename = "MISSING_MFA_CONDITION")]
    MissingMfaCondition,
    /// Data-access action combined with wildcard resources.
    #[serde(rename = "SENSITIVE_DATA_ACTION")]
    SensitiveDataAction,
    /// Wildcard action grant.
    #[serde(rename = "WILDCARD_ACTION")]
    WildcardAction,
    /// Wildcard resource grant.
    #[serde(rename = "WILDCARD_RESOURCE")]
    WildcardResource,
}

impl RuleId {
    /// Returns the stable wire name for this rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminActionDetected => "ADMIN_ACTION_DETECTED",
            Self::CrossAccountPrincipal => "CROSS_ACCOUNT_PRINCIPAL",
            Self::MissingMfaCondition => "MISSING_MFA_CONDITION",
            Self::SensitiveDataAction => "SENSITIVE_DATA_ACTION",
            Self::WildcardAction => "WILDCARD_ACTION",
            Self::WildcardResource => "WILDCARD_RESOURCE",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Statement References
// ============================================================================

/// Reference to the statement a finding was raised against.
///
/// # Invariants
/// - `Sid` is used when the statement declares one; `Index` is the zero-based
///   position otherwise. Serializes untagged as a string or number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatementRef {
    /// Statement identifier (`Sid`).
    Sid(String),
    /// Zero-based statement index.
    Index(usize),
}

impl fmt::Display for StatementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sid(sid) => f.write_str(sid),
            Self::Index(index) => index.fmt(f),
        }
    }
}

// ============================================================================
// SECTION: Evidence
// ============================================================================

/// The specific values that triggered a rule match.
///
/// # Invariants
/// - All lists are sorted and deduplicated; two findings over the same
///   values always carry equal evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Matched action patterns (original casing).
    pub actions: Vec<String>,
    /// Matched resource patterns.
    pub resources: Vec<String>,
    /// Matched principal entries.
    pub principals: Vec<String>,
    /// Condition keys relevant to the match (present or missing).
    pub condition_keys: Vec<String>,
}

impl Evidence {
    /// Sorts and deduplicates every evidence list.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.actions,
            &mut self.resources,
            &mut self.principals,
            &mut self.condition_keys,
        ] {
            list.sort();
            list.dedup();
        }
        self
    }
}

// ============================================================================
// SECTION: Finding
// ============================================================================

/// One detected risk pattern with severity and remediation text.
///
/// # Invariants
/// - Traces to exactly one rule and one statement scope.
/// - `evidence` is normalized at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Originating rule identifier.
    pub rule_id: RuleId,
    /// Offending statement reference.
    pub statement_ref: StatementRef,
    /// Severity assigned by the originating rule.
    pub severity: Severity,
    /// Short finding title.
    pub title: String,
    /// Plain-English explanation of the risk.
    pub explanation: String,
    /// Least-privilege remediation suggestion.
    pub recommendation: String,
    /// Values that triggered the match.
    pub evidence: Evidence,
}

impl Finding {
    /// Creates a finding with normalized evidence.
    #[must_use]
    pub fn new(
        rule_id: RuleId,
        statement_ref: StatementRef,
        severity: Severity,
        title: impl Into<String>,
        explanation: impl Into<String>,
        recommendation: impl Into<String>,
        evidence: Evidence,
    ) -> Self {
        Self {
            rule_id,
            statement_ref,
            severity,
            title: title.into(),
            explanation: explanation.into(),
            recommendation: recommendation.into(),
            evidence: evidence.normalized(),
        }
    }
}
