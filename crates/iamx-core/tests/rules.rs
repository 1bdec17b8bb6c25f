// crates/iamx-core/tests/rules.rs
// ============================================================================
// Module: Rule Catalog Tests
// Description: Behavioral tests for each built-in detector rule.
// Purpose: Verify rule applicability, severity, and evidence content.
// ============================================================================

//! Integration tests for the built-in rule catalog.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use iamx_core::AnalysisResult;
use iamx_core::Analyzer;
use iamx_core::AnalyzerConfig;
use iamx_core::Finding;
use iamx_core::MfaInteraction;
use iamx_core::RuleId;
use iamx_core::Severity;
use iamx_core::StatementRef;
use iamx_core::catalog::tables::wildcard_match;
use iamx_core::parse_document;

/// Analyzes one inline policy with the given configuration.
fn analyze_with(text: &str, config: AnalyzerConfig) -> AnalysisResult {
    let document = parse_document(text, &config).unwrap();
    Analyzer::new(config).analyze_document("inline", &document)
}

/// Analyzes one inline policy with the default configuration.
fn analyze(text: &str) -> AnalysisResult {
    analyze_with(text, AnalyzerConfig::default())
}

/// Returns the findings raised by one rule.
fn findings_for(result: &AnalysisResult, rule_id: RuleId) -> Vec<&Finding> {
    result.findings.iter().filter(|finding| finding.rule_id == rule_id).collect()
}

#[test]
fn bare_wildcard_action_is_critical() {
    let result = analyze(r#"{"Statement": [{"Effect": "Allow", "Action": "*", "Resource": "*"}]}"#);
    let findings = findings_for(&result, RuleId::WildcardAction);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].evidence.actions, vec!["*"]);
}

#[test]
fn sensitive_service_wildcard_is_critical() {
    let result = analyze(
        r#"{"Statement": [{"Effect": "Allow", "Action": "iam:*", "Resource": "arn:aws:iam::111122223333:role/app"}]}"#,
    );
    let findings = findings_for(&result, RuleId::WildcardAction);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
}

#[test]
fn non_sensitive_service_wildcard_is_high() {
    let result = analyze(
        r#"{"Statement": [{"Effect": "Allow", "Action": "sqs:*", "Resource": "arn:aws:sqs:us-east-1:111122223333:queue"}]}"#,
    );
    let findings = findings_for(&result, RuleId::WildcardAction);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);
}

#[test]
fn deny_statements_never_raise_wildcard_findings() {
    let result =
        analyze(r#"{"Statement": [{"Effect": "Deny", "Action": "*", "Resource": "*"}]}"#);
    assert!(result.findings.is_empty());
}

#[test]
fn wildcard_resource_without_conditions_is_high() {
    let result = analyze(
        r#"{"Statement": [{"Effect": "Allow", "Action": "sns:Publish", "Resource": "*"}]}"#,
    );
    let findings = findings_for(&result, RuleId::WildcardResource);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(findings[0].evidence.resources, vec!["*"]);
}

#[test]
fn narrowing_conditions_suppress_wildcard_resource() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "sns:Publish",
            "Resource": "*",
            "Condition": {"StringEquals": {"aws:SourceAccount": "111122223333"}}
        }]}"#,
    );
    assert!(findings_for(&result, RuleId::WildcardResource).is_empty());
}

#[test]
fn deny_statements_never_raise_principal_findings() {
    let result = analyze(
        r#"{"Statement": [{"Effect": "Deny", "Action": "s3:GetObject", "Principal": "*"}]}"#,
    );
    assert!(result.findings.is_empty());
}

#[test]
fn unconditioned_wildcard_principal_is_critical() {
    for principal in [r#""*""#, r#"{"AWS": "*"}"#] {
        let text = format!(
            r#"{{"Statement": [{{"Effect": "Allow", "Action": "s3:GetObject", "Principal": {principal}}}]}}"#
        );
        let result = analyze(&text);
        let findings = findings_for(&result, RuleId::CrossAccountPrincipal);
        assert_eq!(findings.len(), 1, "principal form {principal}");
        assert_eq!(findings[0].severity, Severity::Critical);
    }
}

#[test]
fn conditioned_wildcard_principal_is_not_reported() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Principal": "*",
            "Condition": {"StringEquals": {"aws:SourceAccount": "111122223333"}}
        }]}"#,
    );
    assert!(findings_for(&result, RuleId::CrossAccountPrincipal).is_empty());
}

#[test]
fn foreign_account_principal_is_critical_with_home_account() {
    let config = AnalyzerConfig {
        home_account: Some("111122223333".to_owned()),
        ..AnalyzerConfig::default()
    };
    let result = analyze_with(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Principal": {"AWS": "arn:aws:iam::999988887777:root"}
        }]}"#,
        config,
    );
    let findings = findings_for(&result, RuleId::CrossAccountPrincipal);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].evidence.principals, vec!["arn:aws:iam::999988887777:root"]);
}

#[test]
fn home_account_principal_is_not_reported() {
    let config = AnalyzerConfig {
        home_account: Some("111122223333".to_owned()),
        ..AnalyzerConfig::default()
    };
    let result = analyze_with(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Principal": {"AWS": "arn:aws:iam::111122223333:role/reader"}
        }]}"#,
        config,
    );
    assert!(findings_for(&result, RuleId::CrossAccountPrincipal).is_empty());
}

#[test]
fn foreign_accounts_are_ignored_without_home_account() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Principal": {"AWS": "arn:aws:iam::999988887777:root"}
        }]}"#,
    );
    assert!(findings_for(&result, RuleId::CrossAccountPrincipal).is_empty());
}

#[test]
fn admin_patterns_match_syntactically() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": ["iam:PassRole", "s3:DeleteBucket", "s3:PutBucketPolicy"],
            "Resource": "arn:aws:s3:::my-bucket"
        }]}"#,
    );
    let findings = findings_for(&result, RuleId::AdminActionDetected);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(
        findings[0].evidence.actions,
        vec!["iam:PassRole", "s3:DeleteBucket", "s3:PutBucketPolicy"],
    );
}

#[test]
fn admin_patterns_cover_actions_that_embed_wildcards() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "iam:*AccessKey*",
            "Resource": "arn:aws:iam::111122223333:user/app"
        }]}"#,
    );
    let admin = findings_for(&result, RuleId::AdminActionDetected);
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].evidence.actions, vec!["iam:*AccessKey*"]);
    assert_eq!(findings_for(&result, RuleId::MissingMfaCondition).len(), 1);
}

#[test]
fn pattern_wildcards_match_literal_wildcards_in_the_value() {
    assert!(wildcard_match("*", "**"));
    assert!(wildcard_match("iam:*", "iam:*AccessKey*"));
    assert!(wildcard_match("*:Delete*", "s3:Delete*"));
    assert!(!wildcard_match("iam:PassRole", "iam:*"));
}

#[test]
fn bare_wildcard_action_does_not_intersect_admin_patterns() {
    let result =
        analyze(r#"{"Statement": [{"Effect": "Allow", "Action": "*", "Resource": "*"}]}"#);
    assert!(findings_for(&result, RuleId::AdminActionDetected).is_empty());
    assert!(findings_for(&result, RuleId::MissingMfaCondition).is_empty());
    assert!(findings_for(&result, RuleId::SensitiveDataAction).is_empty());
}

#[test]
fn service_wildcard_covers_data_access_entries() {
    let result =
        analyze(r#"{"Statement": [{"Effect": "Allow", "Action": "s3:Get*", "Resource": "*"}]}"#);
    let findings = findings_for(&result, RuleId::SensitiveDataAction);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].evidence.actions, vec!["s3:Get*"]);
}

#[test]
fn data_access_with_wildcard_resource_is_medium() {
    let result = analyze(
        r#"{"Statement": [{"Effect": "Allow", "Action": "s3:GetObject", "Resource": "*"}]}"#,
    );
    let findings = findings_for(&result, RuleId::SensitiveDataAction);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Medium);
    assert_eq!(findings[0].evidence.actions, vec!["s3:GetObject"]);
}

#[test]
fn data_access_with_scoped_resource_is_not_reported() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": "arn:aws:s3:::my-bucket/*"
        }]}"#,
    );
    assert!(findings_for(&result, RuleId::SensitiveDataAction).is_empty());
}

#[test]
fn missing_mfa_on_admin_action_is_low() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "iam:DeleteRole",
            "Resource": "arn:aws:iam::111122223333:role/app"
        }]}"#,
    );
    let findings = findings_for(&result, RuleId::MissingMfaCondition);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Low);
    assert_eq!(findings[0].evidence.condition_keys, vec!["aws:MultiFactorAuthPresent"]);
}

#[test]
fn mfa_condition_satisfies_the_mfa_rule() {
    let result = analyze(
        r#"{"Statement": [{
            "Effect": "Allow",
            "Action": "iam:DeleteRole",
            "Resource": "arn:aws:iam::111122223333:role/app",
            "Condition": {"Bool": {"aws:MultiFactorAuthPresent": "true"}}
        }]}"#,
    );
    assert!(findings_for(&result, RuleId::MissingMfaCondition).is_empty());
}

#[test]
fn suppress_with_admin_drops_the_mfa_finding() {
    let text = r#"{"Statement": [{
        "Effect": "Allow",
        "Action": "iam:DeleteRole",
        "Resource": "arn:aws:iam::111122223333:role/app"
    }]}"#;

    let independent = analyze(text);
    assert_eq!(findings_for(&independent, RuleId::MissingMfaCondition).len(), 1);
    assert_eq!(findings_for(&independent, RuleId::AdminActionDetected).len(), 1);

    let config = AnalyzerConfig {
        mfa_interaction: MfaInteraction::SuppressWithAdmin,
        ..AnalyzerConfig::default()
    };
    let suppressed = analyze_with(text, config);
    assert!(findings_for(&suppressed, RuleId::MissingMfaCondition).is_empty());
    assert_eq!(findings_for(&suppressed, RuleId::AdminActionDetected).len(), 1);
}

#[test]
fn findings_reference_sid_when_present() {
    let result = analyze(
        r#"{"Statement": [{
            "Sid": "AllowEverything",
            "Effect": "Allow",
            "Action": "*",
            "Resource": "*"
        }]}"#,
    );
    let findings = findings_for(&result, RuleId::WildcardAction);
    assert_eq!(findings[0].statement_ref, StatementRef::Sid("AllowEverything".to_owned()));
}
