// crates/iamx-core/src/catalog/mod.rs
// ============================================================================
// Module: iamx Rule Catalog
// Description: Detector rule trait, evaluation context, and registry.
// Purpose: Provide the fixed, versioned set of pattern-detection rules.
// Dependencies: crate::core, crate::catalog::{rules, tables}
// ============================================================================

//! ## Overview
//! The rule catalog is process-wide, read-only, and loaded once. Every rule
//! is a pure deterministic function from a statement (plus document context)
//! to zero or more findings: no timestamps, no randomness, no external
//! lookups. Rules are independent and order-insensitive; the engine, not
//! rule order, determines output ordering.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod rules;
pub mod tables;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::catalog::rules::AdminActionRule;
use crate::catalog::rules::CrossAccountPrincipalRule;
use crate::catalog::rules::MissingMfaConditionRule;
use crate::catalog::rules::SensitiveDataActionRule;
use crate::catalog::rules::WildcardActionRule;
use crate::catalog::rules::WildcardResourceRule;
use crate::catalog::tables::RiskTables;
use crate::core::config::AnalyzerConfig;
use crate::core::finding::Finding;
use crate::core::finding::RuleId;
use crate::core::finding::StatementRef;
use crate::core::model::PolicyDocument;
use crate::core::model::Statement;

// ============================================================================
// SECTION: Rule Context
// ============================================================================

/// Read-only context handed to a rule for one statement evaluation.
///
/// # Invariants
/// - `statement_ref` refers to `statement` within `document`.
/// - Values are snapshots; rules must not mutate them.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Statement under evaluation.
    pub statement: &'a Statement,
    /// Reference to the statement (sid or index).
    pub statement_ref: &'a StatementRef,
    /// Whole-document context for cross-statement rules.
    pub document: &'a PolicyDocument,
    /// Caller-supplied analyzer configuration.
    pub config: &'a AnalyzerConfig,
    /// Static risk tables for pattern matching.
    pub tables: &'a RiskTables,
}

// ============================================================================
// SECTION: Rule Trait
// ============================================================================

/// One detector rule in the catalog.
///
/// Implementations must be pure and total: identical input always yields
/// identical findings, and a rule that cannot determine applicability emits
/// no finding rather than failing.
pub trait Rule: Send + Sync {
    /// Returns the stable identifier of this rule.
    fn id(&self) -> RuleId;

    /// Evaluates the rule against one statement in document context.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding>;
}

// ============================================================================
// SECTION: Rule Catalog
// ============================================================================

/// Fixed registry of detector rules.
///
/// # Invariants
/// - Read-only after construction; safely shared across concurrent analyses.
pub struct RuleCatalog {
    /// Registered rules in registration order.
    rules: Vec<Box<dyn Rule>>,
}

impl RuleCatalog {
    /// Builds the catalog with every built-in rule registered.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                Box::new(WildcardActionRule),
                Box::new(WildcardResourceRule),
                Box::new(CrossAccountPrincipalRule),
                Box::new(AdminActionRule),
                Box::new(SensitiveDataActionRule),
                Box::new(MissingMfaConditionRule),
            ],
        }
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Reports whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&'static str> = self.rules.iter().map(|rule| rule.id().as_str()).collect();
        f.debug_struct("RuleCatalog").field("rules", &ids).finish()
    }
}
