// crates/iamx-core/src/catalog/rules.rs
// ============================================================================
// Module: iamx Built-in Rules
// Description: The six built-in detector rules of the catalog.
// Purpose: Detect risky permission patterns in normalized statements.
// Dependencies: crate::catalog, crate::core
// ============================================================================

//! ## Overview
//! Each rule inspects one statement (with document context) and emits at
//! most one finding per statement, carrying the specific matched values as
//! evidence. Rules only consider `Allow` statements; a `Deny` statement is
//! never a risk grant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::catalog::Rule;
use crate::catalog::RuleContext;
use crate::core::finding::Evidence;
use crate::core::finding::Finding;
use crate::core::finding::RuleId;
use crate::core::severity::Severity;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Condition key required by the MFA rule.
const MFA_CONDITION_KEY: &str = "aws:MultiFactorAuthPresent";

// ============================================================================
// SECTION: Wildcard Action
// ============================================================================

/// Detects `*` and `service:*` action grants on `Allow` statements.
#[derive(Debug, Clone, Copy)]
pub struct WildcardActionRule;

impl Rule for WildcardActionRule {
    fn id(&self) -> RuleId {
        RuleId::WildcardAction
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let statement = ctx.statement;
        if !statement.is_allow() {
            return Vec::new();
        }

        let mut matched = Vec::new();
        let mut critical = false;
        for action in &statement.actions {
            if action.is_any_action() {
                matched.push(action.raw().to_owned());
                critical = true;
            } else if action.is_service_wildcard() {
                matched.push(action.raw().to_owned());
                if ctx.tables.is_sensitive_service(action.service()) {
                    critical = true;
                }
            }
        }
        if matched.is_empty() {
            return Vec::new();
        }

        let severity = if critical { Severity::Critical } else { Severity::High };
        let explanation = format!(
            "The statement allows wildcard actions ({}), granting every \
             matching permission the service ever adds rather than the set \
             the workload actually needs.",
            matched.join(", ")
        );
        vec![Finding::new(
            self.id(),
            ctx.statement_ref.clone(),
            severity,
            "Wildcard action grant",
            explanation,
            "Replace wildcard actions with the specific actions the workload requires.",
            Evidence { actions: matched, ..Evidence::default() },
        )]
    }
}

// ============================================================================
// SECTION: Wildcard Resource
// ============================================================================

/// Detects bare `*` resource grants without narrowing conditions.
#[derive(Debug, Clone, Copy)]
pub struct WildcardResourceRule;

impl Rule for WildcardResourceRule {
    fn id(&self) -> RuleId {
        RuleId::WildcardResource
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let statement = ctx.statement;
        if !statement.is_allow()
            || !statement.has_wildcard_resource()
            || statement.has_conditions()
        {
            return Vec::new();
        }

        vec![Finding::new(
            self.id(),
            ctx.statement_ref.clone(),
            Severity::High,
            "Wildcard resource grant",
            "The statement applies to every resource (`*`) with no narrowing \
             condition, so the granted actions reach resources the workload \
             was never meant to touch.",
            "Scope the statement to explicit resource ARNs, or add conditions \
             that narrow the reachable resources.",
            Evidence { resources: vec!["*".to_owned()], ..Evidence::default() },
        )]
    }
}

// ============================================================================
// SECTION: Cross-Account Principal
// ============================================================================

/// Detects wildcard or foreign-account principals on resource-based
/// statements.
#[derive(Debug, Clone, Copy)]
pub struct CrossAccountPrincipalRule;

impl Rule for CrossAccountPrincipalRule {
    fn id(&self) -> RuleId {
        RuleId::CrossAccountPrincipal
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let statement = ctx.statement;
        if !statement.is_allow() {
            return Vec::new();
        }
        let Some(principal) = &statement.principal else {
            return Vec::new();
        };

        let mut matched = Vec::new();
        if principal.is_wildcard() && !statement.has_conditions() {
            matched.push("*".to_owned());
        }
        if let Some(home_account) = &ctx.config.home_account {
            for entry in principal.aws_entries() {
                if let Some(account) = principal_account(entry)
                    && account != home_account
                {
                    matched.push(entry.clone());
                }
            }
        }
        if matched.is_empty() {
            return Vec::new();
        }

        vec![Finding::new(
            self.id(),
            ctx.statement_ref.clone(),
            Severity::Critical,
            "Cross-account principal",
            "The statement trusts principals outside the policy's home \
             account (or any AWS caller at all), allowing external \
             identities to use the granted permissions.",
            "Restrict the principal to known identities in the home account, \
             and add conditions (such as aws:SourceAccount) for any required \
             external access.",
            Evidence { principals: matched, ..Evidence::default() },
        )]
    }
}

/// Extracts the 12-digit account ID from an AWS principal entry.
///
/// Accepts a bare account ID or an `arn:aws:iam::<account>:...` ARN; any
/// other shape yields `None` and is ignored by the rule.
fn principal_account(entry: &str) -> Option<&str> {
    if entry.len() == 12 && entry.bytes().all(|byte| byte.is_ascii_digit()) {
        return Some(entry);
    }
    if entry.starts_with("arn:") {
        let account = entry.split(':').nth(4)?;
        if account.len() == 12 && account.bytes().all(|byte| byte.is_ascii_digit()) {
            return Some(account);
        }
    }
    None
}

// ============================================================================
// SECTION: Admin Action
// ============================================================================

/// Detects actions intersecting the administrative action table.
#[derive(Debug, Clone, Copy)]
pub struct AdminActionRule;

impl Rule for AdminActionRule {
    fn id(&self) -> RuleId {
        RuleId::AdminActionDetected
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let statement = ctx.statement;
        if !statement.is_allow() {
            return Vec::new();
        }

        let matched: Vec<String> = statement
            .actions
            .iter()
            .filter(|action| !ctx.tables.admin_matches(action).is_empty())
            .map(|action| action.raw().to_owned())
            .collect();
        if matched.is_empty() {
            return Vec::new();
        }

        let explanation = format!(
            "The statement allows administrative or destructive actions \
             ({}), which can change identities, policies, or destroy \
             resources.",
            matched.join(", ")
        );
        vec![Finding::new(
            self.id(),
            ctx.statement_ref.clone(),
            Severity::High,
            "Administrative action allowed",
            explanation,
            "Split administrative permissions into a dedicated, tightly \
             scoped role instead of granting them alongside workload access.",
            Evidence { actions: matched, ..Evidence::default() },
        )]
    }
}

// ============================================================================
// SECTION: Sensitive Data Action
// ============================================================================

/// Detects data-access actions combined with wildcard resources.
#[derive(Debug, Clone, Copy)]
pub struct SensitiveDataActionRule;

impl Rule for SensitiveDataActionRule {
    fn id(&self) -> RuleId {
        RuleId::SensitiveDataAction
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let statement = ctx.statement;
        if !statement.is_allow() || !statement.has_wildcard_resource() {
            return Vec::new();
        }

        // A bare `*` action is the wildcard-action rule's finding, not a
        // data-access one.
        let matched: Vec<String> = statement
            .actions
            .iter()
            .filter(|action| {
                !action.is_any_action() && !ctx.tables.data_access_matches(action).is_empty()
            })
            .map(|action| action.raw().to_owned())
            .collect();
        if matched.is_empty() {
            return Vec::new();
        }

        let explanation = format!(
            "The statement allows data-access actions ({}) against every \
             resource (`*`), exposing data far beyond the stores the \
             workload actually reads.",
            matched.join(", ")
        );
        vec![Finding::new(
            self.id(),
            ctx.statement_ref.clone(),
            Severity::Medium,
            "Data access with wildcard resources",
            explanation,
            "Scope data-access actions to the specific bucket, table, or \
             secret ARNs the workload reads.",
            Evidence {
                actions: matched,
                resources: vec!["*".to_owned()],
                ..Evidence::default()
            },
        )]
    }
}

// ============================================================================
// SECTION: Missing MFA Condition
// ============================================================================

/// Detects administrative actions allowed without an MFA condition.
#[derive(Debug, Clone, Copy)]
pub struct MissingMfaConditionRule;

impl Rule for MissingMfaConditionRule {
    fn id(&self) -> RuleId {
        RuleId::MissingMfaCondition
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let statement = ctx.statement;
        if !statement.is_allow() || statement.has_condition_key(MFA_CONDITION_KEY) {
            return Vec::new();
        }

        let matched: Vec<String> = statement
            .actions
            .iter()
            .filter(|action| !ctx.tables.admin_matches(action).is_empty())
            .map(|action| action.raw().to_owned())
            .collect();
        if matched.is_empty() {
            return Vec::new();
        }

        vec![Finding::new(
            self.id(),
            ctx.statement_ref.clone(),
            Severity::Low,
            "Administrative action without MFA",
            "The statement allows administrative or destructive actions \
             without requiring multi-factor authentication, so a single \
             leaked credential is enough to use them.",
            format!("Add a condition on {MFA_CONDITION_KEY} to require MFA for these actions."),
            Evidence {
                actions: matched,
                condition_keys: vec![MFA_CONDITION_KEY.to_owned()],
                ..Evidence::default()
            },
        )]
    }
}
