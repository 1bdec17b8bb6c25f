// crates/iamx-core/src/core/config.rs
// ============================================================================
// Module: iamx Analyzer Configuration
// Description: Caller-supplied configuration for one analysis invocation.
// Purpose: Bundle thresholds, size ceilings, and rule-interaction settings.
// Dependencies: serde, crate::core::severity
// ============================================================================

//! ## Overview
//! Configuration is validated by construction: defaults are safe, size
//! ceilings bound rule-evaluation cost, and the MFA/admin rule interaction
//! is an explicit setting rather than a hardcoded suppression.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::severity::FailOn;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default ceiling for raw document size in bytes.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;
/// Default ceiling for the statement count of one document.
pub const DEFAULT_MAX_STATEMENTS: usize = 1024;

// ============================================================================
// SECTION: Rule Interaction
// ============================================================================

/// Interaction between `MISSING_MFA_CONDITION` and `ADMIN_ACTION_DETECTED`.
///
/// # Invariants
/// - Variants are stable for serialization and configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfaInteraction {
    /// Both findings are reported independently.
    #[default]
    Independent,
    /// The MFA finding is dropped for statements that already carry an
    /// admin-action finding.
    SuppressWithAdmin,
}

// ============================================================================
// SECTION: Analyzer Configuration
// ============================================================================

/// Configuration bundle for one analysis invocation.
///
/// # Invariants
/// - Size ceilings are non-zero.
/// - `home_account`, when set, is the 12-digit account ID that
///   `CROSS_ACCOUNT_PRINCIPAL` treats as trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Fail threshold mirroring the CLI `--fail-on` control.
    pub fail_on: FailOn,
    /// Trusted account ID for cross-account principal checks.
    pub home_account: Option<String>,
    /// Ceiling for raw document size in bytes.
    pub max_document_bytes: usize,
    /// Ceiling for the statement count of one document.
    pub max_statements: usize,
    /// MFA/admin rule interaction mode.
    pub mfa_interaction: MfaInteraction,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fail_on: FailOn::None,
            home_account: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_statements: DEFAULT_MAX_STATEMENTS,
            mfa_interaction: MfaInteraction::Independent,
        }
    }
}
