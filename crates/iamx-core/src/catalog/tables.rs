// crates/iamx-core/src/catalog/tables.rs
// ============================================================================
// Module: iamx Risk Tables
// Description: Versioned static configuration data driving the rule catalog.
// Purpose: Keep pattern tables out of rule bodies so the catalog extends
//          without touching evaluation logic.
// Dependencies: crate::core::model
// ============================================================================

//! ## Overview
//! Risk tables are immutable, process-wide configuration loaded once at
//! startup. Matching is syntactic: table patterns support the IAM `*` and
//! `?` wildcards and compare case-insensitively, so a bare `*` action does
//! not intersect `iam:*`-style admin patterns (semantic expansion is the
//! wildcard rules' job, not the tables').

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::model::ActionPattern;

// ============================================================================
// SECTION: Risk Tables
// ============================================================================

/// Version identifier for the built-in risk tables.
pub const RISK_TABLES_VERSION: &str = "2025.1";

/// Static pattern tables consumed by the rule catalog.
///
/// # Invariants
/// - Tables are read-only for the lifetime of the process.
/// - `sensitive_services` entries are lower-case service prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskTables {
    /// Table version, bumped whenever an entry changes.
    pub version: &'static str,
    /// Services whose whole-service wildcard grant is critical.
    pub sensitive_services: &'static [&'static str],
    /// Administrative or destructive action patterns.
    pub admin_action_patterns: &'static [&'static str],
    /// Data-access actions that are risky against wildcard resources.
    pub data_access_actions: &'static [&'static str],
}

/// Built-in risk tables shipped with this catalog version.
pub const DEFAULT_RISK_TABLES: RiskTables = RiskTables {
    version: RISK_TABLES_VERSION,
    sensitive_services: &[
        "cloudtrail",
        "ec2",
        "iam",
        "kms",
        "organizations",
        "s3",
        "secretsmanager",
        "sts",
    ],
    admin_action_patterns: &[
        "iam:*",
        "iam:PassRole",
        "kms:ScheduleKeyDeletion",
        "organizations:*",
        "*:Delete*",
        "*:Put*Policy",
        "*:Terminate*",
    ],
    data_access_actions: &[
        "dynamodb:BatchGetItem",
        "dynamodb:GetItem",
        "dynamodb:Query",
        "dynamodb:Scan",
        "kms:Decrypt",
        "s3:GetObject",
        "s3:GetObjectVersion",
        "secretsmanager:GetSecretValue",
        "sqs:ReceiveMessage",
        "ssm:GetParameter",
        "ssm:GetParameters",
    ],
};

impl RiskTables {
    /// Reports whether a lower-cased service prefix is sensitive.
    #[must_use]
    pub fn is_sensitive_service(&self, service: &str) -> bool {
        self.sensitive_services.contains(&service)
    }

    /// Returns the admin patterns that syntactically match an action.
    #[must_use]
    pub fn admin_matches(&self, action: &ActionPattern) -> Vec<&'static str> {
        self.admin_action_patterns
            .iter()
            .copied()
            .filter(|pattern| wildcard_match(pattern, action.raw()))
            .collect()
    }

    /// Returns the data-access actions covered by an action pattern.
    ///
    /// The statement's action is treated as the pattern here, so `s3:Get*`
    /// covers the `s3:GetObject` table entry.
    #[must_use]
    pub fn data_access_matches(&self, action: &ActionPattern) -> Vec<&'static str> {
        self.data_access_actions
            .iter()
            .copied()
            .filter(|entry| wildcard_match(action.raw(), entry))
            .collect()
    }
}

// ============================================================================
// SECTION: Wildcard Matching
// ============================================================================

/// Matches an IAM-style pattern against a value.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character, and comparison is ASCII case-insensitive. Wildcards in the
/// value are ordinary characters.
#[must_use]
pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.to_ascii_lowercase().chars().collect();
    let value: Vec<char> = value.to_ascii_lowercase().chars().collect();

    let mut p = 0_usize;
    let mut v = 0_usize;
    // Backtracking point for the most recent `*` in the pattern.
    let mut star: Option<usize> = None;
    let mut star_value = 0_usize;

    while v < value.len() {
        // `*` is checked first: a literal `*` in the value must not consume
        // the pattern's `*` as a one-character match.
        if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_value = v;
            p += 1;
        } else if p < pattern.len() && (pattern[p] == value[v] || pattern[p] == '?') {
            p += 1;
            v += 1;
        } else if let Some(star_index) = star {
            p = star_index + 1;
            star_value += 1;
            v = star_value;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
