// crates/iamx-core/src/runtime/engine.rs
// ============================================================================
// Module: iamx Analysis Engine
// Description: Orchestration of rule evaluation over parsed documents.
// Purpose: Collect, deduplicate, classify, and order findings per document.
// Dependencies: thiserror, crate::catalog, crate::core, crate::runtime::parser
// ============================================================================

//! ## Overview
//! The engine drives the rule catalog over every statement of a document,
//! deduplicates exact (ruleId, statementRef, evidence) repeats, sorts
//! findings severity-descending then ruleId ascending, and computes the
//! summary, risk score, and pass/fail verdict. Batch analysis is isolated
//! per document: a malformed document yields a rejected entry in its slot
//! while siblings still produce results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::RuleCatalog;
use crate::catalog::RuleContext;
use crate::catalog::tables::DEFAULT_RISK_TABLES;
use crate::catalog::tables::RiskTables;
use crate::core::config::AnalyzerConfig;
use crate::core::config::MfaInteraction;
use crate::core::finding::Evidence;
use crate::core::finding::Finding;
use crate::core::finding::RuleId;
use crate::core::finding::StatementRef;
use crate::core::model::PolicyDocument;
use crate::core::result::AnalysisResult;
use crate::core::result::DocumentError;
use crate::core::result::DocumentVerdict;
use crate::core::severity;
use crate::runtime::parser::parse_document;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Invocation-level engine errors.
///
/// # Invariants
/// - Variants are caller-configuration mistakes and fatal to the whole
///   invocation; per-document failures are [`DocumentVerdict::Rejected`]
///   entries instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Zero documents were supplied for analysis.
    #[error("no policy documents supplied for analysis")]
    EmptyInput,
}

// ============================================================================
// SECTION: Document Sources
// ============================================================================

/// One raw policy document with its caller-supplied identifier.
///
/// # Invariants
/// - `id` is opaque to the engine (typically a file path) and flows into
///   the result's `sourceDocumentId` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    /// Caller-supplied document identifier.
    pub id: String,
    /// Raw policy JSON text.
    pub text: String,
}

impl DocumentSource {
    /// Creates a document source.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

// ============================================================================
// SECTION: Analyzer
// ============================================================================

/// Deterministic policy analyzer over a fixed rule catalog.
///
/// # Invariants
/// - The catalog and risk tables are read-only after construction and may
///   be shared across concurrent analyses without locking.
#[derive(Debug)]
pub struct Analyzer {
    /// Registered detector rules.
    catalog: RuleCatalog,
    /// Caller-supplied configuration.
    config: AnalyzerConfig,
    /// Static risk tables handed to every rule evaluation.
    tables: RiskTables,
}

impl Analyzer {
    /// Creates an analyzer with the built-in catalog and tables.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { catalog: RuleCatalog::builtin(), config, tables: DEFAULT_RISK_TABLES }
    }

    /// Creates an analyzer with an explicit catalog.
    #[must_use]
    pub fn with_catalog(catalog: RuleCatalog, config: AnalyzerConfig) -> Self {
        Self { catalog, config, tables: DEFAULT_RISK_TABLES }
    }

    /// Returns the analyzer configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one parsed document into an immutable result.
    #[must_use]
    pub fn analyze_document(
        &self,
        source_id: &str,
        document: &PolicyDocument,
    ) -> AnalysisResult {
        let mut findings = Vec::new();
        for (index, statement) in document.statements.iter().enumerate() {
            let statement_ref = statement
                .sid
                .clone()
                .map_or(StatementRef::Index(index), StatementRef::Sid);
            let ctx = RuleContext {
                statement,
                statement_ref: &statement_ref,
                document,
                config: &self.config,
                tables: &self.tables,
            };
            for rule in self.catalog.rules() {
                findings.extend(rule.evaluate(&ctx));
            }
        }

        apply_mfa_interaction(&mut findings, self.config.mfa_interaction);
        dedup_findings(&mut findings);
        sort_findings(&mut findings);

        let summary = severity::summarize(&findings);
        let passed = severity::passes(&findings, self.config.fail_on);
        let risk_score = severity::risk_score(&summary);
        AnalysisResult {
            source_document_id: source_id.to_owned(),
            findings,
            summary,
            passed,
            risk_score,
        }
    }

    /// Parses and analyzes one raw source into a tagged verdict.
    #[must_use]
    pub fn analyze_source(&self, source: &DocumentSource) -> DocumentVerdict {
        match parse_document(&source.text, &self.config) {
            Ok(document) => DocumentVerdict::Analyzed {
                result: self.analyze_document(&source.id, &document),
            },
            Err(err) => DocumentVerdict::Rejected {
                error: DocumentError::new(&source.id, err.code(), err.to_string()),
            },
        }
    }

    /// Analyzes a batch of raw sources, one verdict per source in order.
    ///
    /// Documents are independent; each is parsed and evaluated in isolation
    /// so a single malformed document never aborts its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] when `sources` is empty.
    pub fn analyze_batch(
        &self,
        sources: &[DocumentSource],
    ) -> Result<Vec<DocumentVerdict>, EngineError> {
        if sources.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        Ok(sources.iter().map(|source| self.analyze_source(source)).collect())
    }
}

// ============================================================================
// SECTION: Finding Post-Processing
// ============================================================================

/// Applies the configured MFA/admin interaction to collected findings.
fn apply_mfa_interaction(findings: &mut Vec<Finding>, interaction: MfaInteraction) {
    if interaction != MfaInteraction::SuppressWithAdmin {
        return;
    }
    let admin_refs: HashSet<StatementRef> = findings
        .iter()
        .filter(|finding| finding.rule_id == RuleId::AdminActionDetected)
        .map(|finding| finding.statement_ref.clone())
        .collect();
    findings.retain(|finding| {
        finding.rule_id != RuleId::MissingMfaCondition
            || !admin_refs.contains(&finding.statement_ref)
    });
}

/// Removes exact (ruleId, statementRef, evidence) repeats, keeping the
/// first occurrence.
fn dedup_findings(findings: &mut Vec<Finding>) {
    let mut seen: HashSet<(RuleId, StatementRef, Evidence)> = HashSet::new();
    findings.retain(|finding| {
        seen.insert((
            finding.rule_id,
            finding.statement_ref.clone(),
            finding.evidence.clone(),
        ))
    });
}

/// Sorts findings severity-descending, then ruleId ascending.
///
/// The sort is stable so same-rule findings keep statement order.
fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|left, right| {
        right
            .severity
            .cmp(&left.severity)
            .then_with(|| left.rule_id.cmp(&right.rule_id))
    });
}
