// crates/iamx-cli/src/main_tests.rs
// ============================================================================
// Module: iamx CLI Unit Tests
// Description: Tests for argument mapping, verdict collection, and rendering.
// Purpose: Verify the CLI shell behavior without spawning a process.
// ============================================================================

//! Unit tests for the CLI command helpers.

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

use std::fs;
use std::path::PathBuf;

use iamx_core::DocumentVerdict;
use iamx_core::FailOn;

use crate::AnalyzeCommand;
use crate::FailOnArg;
use crate::IO_ERROR_CODE;
use crate::OutputFormatArg;
use crate::collect_verdicts;
use crate::render_output;
use crate::render_text;

/// A policy with one wildcard action/resource statement.
const RISKY_POLICY: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [{"Effect": "Allow", "Action": "*", "Resource": "*"}]
}"#;

/// A tightly scoped policy with no findings.
const SCOPED_POLICY: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [{
        "Effect": "Allow",
        "Action": "s3:GetObject",
        "Resource": "arn:aws:s3:::my-bucket/*"
    }]
}"#;

/// Builds an analyze command over the given paths.
fn analyze_command(paths: Vec<PathBuf>, fail_on: FailOnArg) -> AnalyzeCommand {
    AnalyzeCommand {
        paths,
        format: OutputFormatArg::Json,
        fail_on,
        output: None,
        home_account: None,
    }
}

#[test]
fn fail_on_arg_maps_onto_engine_threshold() {
    assert_eq!(FailOnArg::None.to_fail_on(), FailOn::None);
    assert_eq!(FailOnArg::Low.to_fail_on(), FailOn::Low);
    assert_eq!(FailOnArg::Medium.to_fail_on(), FailOn::Medium);
    assert_eq!(FailOnArg::High.to_fail_on(), FailOn::High);
    assert_eq!(FailOnArg::Critical.to_fail_on(), FailOn::Critical);
}

#[test]
fn collect_verdicts_isolates_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    fs::write(&good, SCOPED_POLICY).unwrap();
    let missing = dir.path().join("missing.json");

    let command = analyze_command(vec![good, missing.clone()], FailOnArg::None);
    let verdicts = collect_verdicts(&command);
    assert_eq!(verdicts.len(), 2);
    assert!(matches!(&verdicts[0], DocumentVerdict::Analyzed { .. }));
    let DocumentVerdict::Rejected { error } = &verdicts[1] else {
        panic!("missing file must be rejected");
    };
    assert_eq!(error.code, IO_ERROR_CODE);
    assert_eq!(error.source_document_id, missing.display().to_string());
}

#[test]
fn collect_verdicts_applies_fail_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let risky = dir.path().join("risky.json");
    fs::write(&risky, RISKY_POLICY).unwrap();

    let lenient = collect_verdicts(&analyze_command(vec![risky.clone()], FailOnArg::None));
    assert!(lenient[0].passed());

    let strict = collect_verdicts(&analyze_command(vec![risky], FailOnArg::High));
    assert!(!strict[0].passed());
}

#[test]
fn single_analyzed_document_renders_bare_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    fs::write(&path, SCOPED_POLICY).unwrap();

    let verdicts = collect_verdicts(&analyze_command(vec![path], FailOnArg::None));
    let rendered = render_output(&verdicts, OutputFormatArg::Json).unwrap();
    assert!(rendered.starts_with('{'));
    assert!(rendered.contains("\"sourceDocumentId\""));
}

#[test]
fn single_rejected_document_renders_bare_tagged_object() {
    let command =
        analyze_command(vec![PathBuf::from("/nonexistent/policy.json")], FailOnArg::None);
    let verdicts = collect_verdicts(&command);
    let rendered = render_output(&verdicts, OutputFormatArg::Json).unwrap();
    assert!(rendered.starts_with('{'));
    assert!(rendered.contains("\"status\": \"rejected\""));
    assert!(rendered.contains(IO_ERROR_CODE));
}

#[test]
fn batch_renders_tagged_verdict_array() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    fs::write(&first, SCOPED_POLICY).unwrap();
    fs::write(&second, RISKY_POLICY).unwrap();

    let verdicts = collect_verdicts(&analyze_command(vec![first, second], FailOnArg::None));
    let rendered = render_output(&verdicts, OutputFormatArg::Json).unwrap();
    assert!(rendered.starts_with('['));
    assert!(rendered.contains("\"status\": \"analyzed\""));
}

#[test]
fn text_format_summarizes_each_document() {
    let dir = tempfile::tempdir().unwrap();
    let risky = dir.path().join("risky.json");
    fs::write(&risky, RISKY_POLICY).unwrap();

    let verdicts =
        collect_verdicts(&analyze_command(vec![risky.clone()], FailOnArg::High));
    let rendered = render_text(&verdicts);
    assert!(rendered.contains("FAILED"));
    assert!(rendered.contains("WILDCARD_ACTION"));
    assert!(rendered.contains(&risky.display().to_string()));
}

#[test]
fn text_format_reports_rejections() {
    let command =
        analyze_command(vec![PathBuf::from("/nonexistent/policy.json")], FailOnArg::None);
    let verdicts = collect_verdicts(&command);
    let rendered = render_text(&verdicts);
    assert!(rendered.contains("REJECTED"));
    assert!(rendered.contains(IO_ERROR_CODE));
}
