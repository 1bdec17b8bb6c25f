// crates/iamx-core/src/core/model.rs
// ============================================================================
// Module: iamx Policy Model
// Description: Normalized in-memory representation of an IAM policy document.
// Purpose: Carry structurally validated statements for rule evaluation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The policy model is the parser's output and the rule catalog's input. It
//! holds no evaluation logic. Action patterns keep their original casing for
//! display while exposing a lower-cased service segment for matching;
//! condition lookups are case-insensitive to match AWS semantics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// SECTION: Policy Document
// ============================================================================

/// Condition block: operator, then condition key, then value set.
pub type ConditionMap = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// One parsed IAM policy document.
///
/// # Invariants
/// - `statements` is non-empty; a zero-statement document is a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    /// Policy language version, e.g. `2012-10-17`.
    pub version: String,
    /// Optional policy identifier (`Id`).
    pub id: Option<String>,
    /// Ordered statement sequence.
    pub statements: Vec<Statement>,
}

// ============================================================================
// SECTION: Effect
// ============================================================================

/// Statement effect, validated verbatim against the AWS grammar.
///
/// # Invariants
/// - Only the exact strings `Allow` and `Deny` parse; nothing is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// The statement grants the listed permissions.
    Allow,
    /// The statement denies the listed permissions.
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Deny => f.write_str("Deny"),
        }
    }
}

// ============================================================================
// SECTION: Action Patterns
// ============================================================================

/// One `service:Action` pattern from a statement's action list.
///
/// # Invariants
/// - `raw` preserves the original casing for display and evidence.
/// - `service` is the lower-cased prefix before the first `:`; the bare
///   wildcard `*` normalizes to service `*`, action `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionPattern {
    /// Original pattern text as written in the document.
    raw: String,
    /// Lower-cased service prefix used for matching.
    service: String,
    /// Action segment after the first `:` (original casing).
    action: String,
}

impl ActionPattern {
    /// Normalizes a raw action string into a pattern.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "*" {
            return Self {
                raw: raw.to_owned(),
                service: "*".to_owned(),
                action: "*".to_owned(),
            };
        }
        match raw.split_once(':') {
            Some((service, action)) => Self {
                raw: raw.to_owned(),
                service: service.to_ascii_lowercase(),
                action: action.to_owned(),
            },
            None => Self {
                raw: raw.to_owned(),
                service: raw.to_ascii_lowercase(),
                action: String::new(),
            },
        }
    }

    /// Returns the pattern exactly as written in the document.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the lower-cased service prefix.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the action segment after the service prefix.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Reports whether this is the bare `*` pattern covering every action.
    #[must_use]
    pub fn is_any_action(&self) -> bool {
        self.raw == "*"
    }

    /// Reports whether this is a whole-service wildcard such as `iam:*`.
    #[must_use]
    pub fn is_service_wildcard(&self) -> bool {
        !self.is_any_action() && self.action == "*"
    }
}

impl fmt::Display for ActionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// SECTION: Principal
// ============================================================================

/// Statement principal for resource-based policies.
///
/// # Invariants
/// - `Any` models the bare `"*"` form; the map form keeps each entry class
///   separately with original casing preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// The bare `"*"` principal covering every caller.
    Any,
    /// The map form with per-class principal entries.
    Entries {
        /// `AWS` entries: account IDs, ARNs, or `*`.
        aws: Vec<String>,
        /// `Service` entries, e.g. `lambda.amazonaws.com`.
        services: Vec<String>,
        /// `Federated` identity provider entries.
        federated: Vec<String>,
        /// `CanonicalUser` entries.
        canonical_users: Vec<String>,
    },
}

impl Principal {
    /// Reports whether this principal grants access to any AWS caller.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        match self {
            Self::Any => true,
            Self::Entries { aws, .. } => aws.iter().any(|entry| entry == "*"),
        }
    }

    /// Returns every principal entry as display text.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Any => vec!["*".to_owned()],
            Self::Entries { aws, services, federated, canonical_users } => aws
                .iter()
                .chain(services)
                .chain(federated)
                .chain(canonical_users)
                .cloned()
                .collect(),
        }
    }

    /// Returns the `AWS` entries of the map form (empty for other forms).
    #[must_use]
    pub fn aws_entries(&self) -> &[String] {
        match self {
            Self::Any => &[],
            Self::Entries { aws, .. } => aws,
        }
    }
}

// ============================================================================
// SECTION: Statement
// ============================================================================

/// One permission statement within a policy document.
///
/// # Invariants
/// - `actions` and `not_actions` are mutually exclusive (parser-enforced);
///   likewise `resources` and `not_resources`.
/// - Action patterns are normalized; condition keys keep original casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Optional statement identifier (`Sid`).
    pub sid: Option<String>,
    /// Statement effect.
    pub effect: Effect,
    /// Action patterns from `Action`.
    pub actions: Vec<ActionPattern>,
    /// Action patterns from `NotAction`.
    pub not_actions: Vec<ActionPattern>,
    /// Resource ARN patterns from `Resource`.
    pub resources: Vec<String>,
    /// Resource ARN patterns from `NotResource`.
    pub not_resources: Vec<String>,
    /// Optional principal (resource-based policies).
    pub principal: Option<Principal>,
    /// Condition block keyed by operator, then condition key.
    pub conditions: ConditionMap,
}

impl Statement {
    /// Reports whether the statement's effect is `Allow`.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.effect == Effect::Allow
    }

    /// Reports whether `resources` contains the bare `*` pattern.
    #[must_use]
    pub fn has_wildcard_resource(&self) -> bool {
        self.resources.iter().any(|resource| resource == "*")
    }

    /// Reports whether any condition block is present.
    #[must_use]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Looks up a condition key case-insensitively across all operators.
    #[must_use]
    pub fn has_condition_key(&self, key: &str) -> bool {
        self.conditions.values().any(|keys| {
            keys.keys().any(|candidate| candidate.eq_ignore_ascii_case(key))
        })
    }
}
