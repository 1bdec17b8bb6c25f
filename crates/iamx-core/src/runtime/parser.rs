// crates/iamx-core/src/runtime/parser.rs
// ============================================================================
// Module: iamx Policy Parser
// Description: Conversion of raw JSON text into the normalized policy model.
// Purpose: Validate structure, normalize scalar-or-array fields, and enforce
//          size ceilings before rule evaluation.
// Dependencies: serde_json, thiserror, crate::core
// ============================================================================

//! ## Overview
//! Parsing is a pure transformation with no side effects. IAM's grammar
//! allows a single string wherever a list is valid; the parser normalizes
//! every such field into a sequence. `Effect` values are validated verbatim
//! against `Allow`/`Deny`, and a statement carrying both `Action`/`NotAction`
//! or both `Resource`/`NotResource` is a structural error, never coerced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::config::AnalyzerConfig;
use crate::core::model::ActionPattern;
use crate::core::model::ConditionMap;
use crate::core::model::Effect;
use crate::core::model::PolicyDocument;
use crate::core::model::Principal;
use crate::core::model::Statement;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Policy language version assumed when `Version` is absent (AWS default).
const LEGACY_POLICY_VERSION: &str = "2008-10-17";

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Parse-level errors for one policy document.
///
/// # Invariants
/// - Variants are stable for programmatic handling; `code` values are part
///   of the wire contract for rejected batch entries.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not syntactically valid JSON.
    #[error("malformed policy JSON: {message}")]
    MalformedJson {
        /// Underlying JSON syntax error.
        message: String,
    },
    /// The document is valid JSON but violates the policy grammar.
    #[error("invalid policy structure: {message}")]
    InvalidStructure {
        /// Description of the structural violation.
        message: String,
    },
    /// The document exceeds a configured size ceiling.
    #[error("policy too large: {actual} {dimension} exceeds limit of {limit}")]
    TooLarge {
        /// Limit dimension that was exceeded (`bytes` or `statements`).
        dimension: &'static str,
        /// Observed magnitude.
        actual: usize,
        /// Configured ceiling.
        limit: usize,
    },
}

impl ParseError {
    /// Returns the stable error code for rejected batch entries.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "MALFORMED_JSON",
            Self::InvalidStructure { .. } => "INVALID_POLICY_STRUCTURE",
            Self::TooLarge { .. } => "POLICY_TOO_LARGE",
        }
    }
}

/// Builds an [`ParseError::InvalidStructure`] from a message.
fn invalid(message: impl Into<String>) -> ParseError {
    ParseError::InvalidStructure { message: message.into() }
}

// ============================================================================
// SECTION: Document Parsing
// ============================================================================

/// Parses raw policy text into a normalized [`PolicyDocument`].
///
/// # Errors
///
/// Returns [`ParseError::MalformedJson`] on invalid JSON syntax,
/// [`ParseError::InvalidStructure`] on grammar violations (including a
/// zero-statement document), and [`ParseError::TooLarge`] when the document
/// exceeds the configured byte or statement ceilings.
pub fn parse_document(text: &str, config: &AnalyzerConfig) -> Result<PolicyDocument, ParseError> {
    if text.len() > config.max_document_bytes {
        return Err(ParseError::TooLarge {
            dimension: "bytes",
            actual: text.len(),
            limit: config.max_document_bytes,
        });
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|err| ParseError::MalformedJson { message: err.to_string() })?;
    let Value::Object(root) = value else {
        return Err(invalid("policy document must be a JSON object"));
    };

    let version = match root.get("Version") {
        None => LEGACY_POLICY_VERSION.to_owned(),
        Some(Value::String(version)) => version.clone(),
        Some(_) => return Err(invalid("Version must be a string")),
    };
    let id = match root.get("Id") {
        None => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => return Err(invalid("Id must be a string")),
    };

    let raw_statements = statement_values(&root)?;
    if raw_statements.len() > config.max_statements {
        return Err(ParseError::TooLarge {
            dimension: "statements",
            actual: raw_statements.len(),
            limit: config.max_statements,
        });
    }

    let mut statements = Vec::with_capacity(raw_statements.len());
    for statement in raw_statements {
        statements.push(parse_statement(statement)?);
    }
    Ok(PolicyDocument { version, id, statements })
}

/// Extracts the non-empty statement object sequence from the document root.
fn statement_values(root: &Map<String, Value>) -> Result<Vec<&Map<String, Value>>, ParseError> {
    let Some(statement) = root.get("Statement") else {
        return Err(invalid("policy document is missing the Statement field"));
    };
    let entries: Vec<&Value> = match statement {
        Value::Object(_) => vec![statement],
        Value::Array(entries) => entries.iter().collect(),
        _ => return Err(invalid("Statement must be an object or an array of objects")),
    };
    if entries.is_empty() {
        return Err(invalid("Statement must contain at least one statement"));
    }
    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(map) => Ok(map),
            _ => Err(invalid("each statement must be a JSON object")),
        })
        .collect()
}

// ============================================================================
// SECTION: Statement Parsing
// ============================================================================

/// Parses one statement object into the normalized model.
fn parse_statement(map: &Map<String, Value>) -> Result<Statement, ParseError> {
    let sid = match map.get("Sid") {
        None => None,
        Some(Value::String(sid)) => Some(sid.clone()),
        Some(_) => return Err(invalid("Sid must be a string")),
    };
    let effect = parse_effect(map)?;

    let action = map.get("Action");
    let not_action = map.get("NotAction");
    if action.is_some() && not_action.is_some() {
        return Err(invalid("statement must not contain both Action and NotAction"));
    }
    if action.is_none() && not_action.is_none() {
        return Err(invalid("statement requires Action or NotAction"));
    }
    let actions = action_patterns(action, "Action")?;
    let not_actions = action_patterns(not_action, "NotAction")?;

    let resource = map.get("Resource");
    let not_resource = map.get("NotResource");
    if resource.is_some() && not_resource.is_some() {
        return Err(invalid("statement must not contain both Resource and NotResource"));
    }
    let resources = optional_sequence(resource, "Resource")?;
    let not_resources = optional_sequence(not_resource, "NotResource")?;

    let principal = match map.get("Principal") {
        None => None,
        Some(value) => Some(parse_principal(value)?),
    };
    let conditions = match map.get("Condition") {
        None => ConditionMap::new(),
        Some(value) => parse_conditions(value)?,
    };

    Ok(Statement {
        sid,
        effect,
        actions,
        not_actions,
        resources,
        not_resources,
        principal,
        conditions,
    })
}

/// Validates the `Effect` field verbatim against the AWS grammar.
fn parse_effect(map: &Map<String, Value>) -> Result<Effect, ParseError> {
    let Some(effect) = map.get("Effect") else {
        return Err(invalid("statement is missing the Effect field"));
    };
    let Value::String(effect) = effect else {
        return Err(invalid("Effect must be a string"));
    };
    match effect.as_str() {
        "Allow" => Ok(Effect::Allow),
        "Deny" => Ok(Effect::Deny),
        other => Err(invalid(format!("Effect must be Allow or Deny, found '{other}'"))),
    }
}

/// Normalizes an optional scalar-or-array action field into patterns.
fn action_patterns(
    value: Option<&Value>,
    field: &str,
) -> Result<Vec<ActionPattern>, ParseError> {
    let raw = optional_sequence(value, field)?;
    Ok(raw.iter().map(|entry| ActionPattern::parse(entry)).collect())
}

/// Normalizes an optional scalar-or-array string field into a sequence.
fn optional_sequence(value: Option<&Value>, field: &str) -> Result<Vec<String>, ParseError> {
    value.map_or_else(|| Ok(Vec::new()), |value| string_sequence(value, field))
}

/// Normalizes a scalar-or-array string field into a sequence.
fn string_sequence(value: &Value, field: &str) -> Result<Vec<String>, ParseError> {
    match value {
        Value::String(entry) => Ok(vec![entry.clone()]),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| match entry {
                Value::String(entry) => Ok(entry.clone()),
                _ => Err(invalid(format!("{field} entries must be strings"))),
            })
            .collect(),
        _ => Err(invalid(format!("{field} must be a string or an array of strings"))),
    }
}

// ============================================================================
// SECTION: Principal Parsing
// ============================================================================

/// Parses the `Principal` field (`"*"` or the per-class map form).
fn parse_principal(value: &Value) -> Result<Principal, ParseError> {
    match value {
        Value::String(entry) if entry == "*" => Ok(Principal::Any),
        Value::String(_) => Err(invalid("Principal string form must be \"*\"")),
        Value::Object(map) => {
            let mut aws = Vec::new();
            let mut services = Vec::new();
            let mut federated = Vec::new();
            let mut canonical_users = Vec::new();
            for (key, entries) in map {
                let parsed = string_sequence(entries, "Principal")?;
                match key.as_str() {
                    "AWS" => aws = parsed,
                    "Service" => services = parsed,
                    "Federated" => federated = parsed,
                    "CanonicalUser" => canonical_users = parsed,
                    other => {
                        return Err(invalid(format!("unknown Principal class '{other}'")));
                    }
                }
            }
            Ok(Principal::Entries { aws, services, federated, canonical_users })
        }
        _ => Err(invalid("Principal must be \"*\" or an object")),
    }
}

// ============================================================================
// SECTION: Condition Parsing
// ============================================================================

/// Parses the `Condition` block into operator -> key -> value sets.
fn parse_conditions(value: &Value) -> Result<ConditionMap, ParseError> {
    let Value::Object(operators) = value else {
        return Err(invalid("Condition must be an object"));
    };
    let mut conditions = ConditionMap::new();
    for (operator, keys) in operators {
        let Value::Object(keys) = keys else {
            return Err(invalid(format!("Condition operator '{operator}' must map to an object")));
        };
        let mut parsed_keys = std::collections::BTreeMap::new();
        for (key, values) in keys {
            parsed_keys.insert(key.clone(), condition_values(values)?);
        }
        conditions.insert(operator.clone(), parsed_keys);
    }
    Ok(conditions)
}

/// Normalizes a condition value (scalar or array of scalars) into strings.
fn condition_values(value: &Value) -> Result<Vec<String>, ParseError> {
    match value {
        Value::Array(entries) => entries.iter().map(condition_scalar).collect(),
        _ => Ok(vec![condition_scalar(value)?]),
    }
}

/// Renders one condition scalar (string, bool, or number) as a string.
fn condition_scalar(value: &Value) -> Result<String, ParseError> {
    match value {
        Value::String(entry) => Ok(entry.clone()),
        Value::Bool(entry) => Ok(entry.to_string()),
        Value::Number(entry) => Ok(entry.to_string()),
        _ => Err(invalid("Condition values must be strings, booleans, or numbers")),
    }
}
