// crates/iamx-core/src/lib.rs
// ============================================================================
// Module: iamx Core
// Description: Deterministic static-analysis engine for AWS IAM policies.
// Purpose: Parse policy documents, evaluate the rule catalog, and report findings.
// Dependencies: serde, serde_json, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! iamx-core analyzes AWS IAM policy documents for risky permission grants.
//! The pipeline is a pure, linear transformation: raw JSON text is parsed
//! into a normalized [`PolicyDocument`], every rule in the [`RuleCatalog`]
//! is evaluated against every statement, and findings are classified,
//! deduplicated, and sorted into an immutable [`AnalysisResult`].
//!
//! Analysis performs no I/O and no network calls; identical input always
//! produces byte-identical canonical output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::catalog::Rule;
pub use crate::catalog::RuleCatalog;
pub use crate::catalog::RuleContext;
pub use crate::catalog::tables::DEFAULT_RISK_TABLES;
pub use crate::catalog::tables::RiskTables;
pub use crate::core::config::AnalyzerConfig;
pub use crate::core::config::MfaInteraction;
pub use crate::core::finding::Evidence;
pub use crate::core::finding::Finding;
pub use crate::core::finding::RuleId;
pub use crate::core::finding::StatementRef;
pub use crate::core::model::ActionPattern;
pub use crate::core::model::Effect;
pub use crate::core::model::PolicyDocument;
pub use crate::core::model::Principal;
pub use crate::core::model::Statement;
pub use crate::core::result::AnalysisResult;
pub use crate::core::result::DocumentError;
pub use crate::core::result::DocumentVerdict;
pub use crate::core::severity::FailOn;
pub use crate::core::severity::Severity;
pub use crate::core::severity::SeveritySummary;
pub use crate::runtime::engine::Analyzer;
pub use crate::runtime::engine::DocumentSource;
pub use crate::runtime::engine::EngineError;
pub use crate::runtime::parser::ParseError;
pub use crate::runtime::parser::parse_document;
pub use crate::runtime::report::ReportError;
pub use crate::runtime::report::ReportFormat;
