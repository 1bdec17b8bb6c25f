// crates/iamx-cli/src/main.rs
// ============================================================================
// Module: iamx CLI Entry Point
// Description: Command dispatcher for IAM policy analysis.
// Purpose: Read policy files, drive the analysis engine, and gate exit codes.
// Dependencies: clap, iamx-core, thiserror
// ============================================================================

//! ## Overview
//! The iamx CLI is a thin shell over `iamx-core`: it reads policy files,
//! runs the analyzer, renders the result in the requested format, and maps
//! the aggregate verdict onto the process exit code (0 iff every document
//! parsed and passed). An unreadable file becomes a rejected entry for that
//! document only; sibling documents are still analyzed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use iamx_core::AnalysisResult;
use iamx_core::Analyzer;
use iamx_core::AnalyzerConfig;
use iamx_core::DocumentError;
use iamx_core::DocumentSource;
use iamx_core::DocumentVerdict;
use iamx_core::FailOn;
use iamx_core::ReportFormat;
use iamx_core::runtime::report;
use iamx_core::runtime::report::display_order;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code attached to documents that could not be read from disk.
const IO_ERROR_CODE: &str = "IO_ERROR";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "iamx", version, about = "Static analyzer for AWS IAM policies")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one or more IAM policy documents.
    Analyze(AnalyzeCommand),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
struct AnalyzeCommand {
    /// Policy file paths to analyze.
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Json)]
    format: OutputFormatArg,
    /// Minimum severity that fails the analysis.
    #[arg(long = "fail-on", value_enum, default_value_t = FailOnArg::None)]
    fail_on: FailOnArg,
    /// Write the report to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Trusted 12-digit account ID for cross-account principal checks.
    #[arg(long = "home-account", value_name = "ACCOUNT_ID")]
    home_account: Option<String>,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormatArg {
    /// Canonical machine-checkable JSON.
    Json,
    /// Human-oriented markdown report.
    Markdown,
    /// Compact per-document text summary.
    Text,
}

impl std::fmt::Display for OutputFormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Markdown => f.write_str("markdown"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// Fail-threshold argument mirroring [`FailOn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FailOnArg {
    /// No threshold; always pass.
    None,
    /// Fail on any finding at low or above.
    Low,
    /// Fail on any finding at medium or above.
    Medium,
    /// Fail on any finding at high or above.
    High,
    /// Fail only on critical findings.
    Critical,
}

impl FailOnArg {
    /// Maps the CLI argument onto the engine threshold.
    const fn to_fail_on(self) -> FailOn {
        match self {
            Self::None => FailOn::None,
            Self::Low => FailOn::Low,
            Self::Medium => FailOn::Medium,
            Self::High => FailOn::High,
            Self::Critical => FailOn::Critical,
        }
    }
}

impl std::fmt::Display for FailOnArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
            Self::Critical => f.write_str("critical"),
        }
    }
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// Fatal CLI error carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// User-facing error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(command) => command_analyze(&command),
    }
}

// ============================================================================
// SECTION: Analyze Command
// ============================================================================

/// Runs analysis over the supplied paths and emits the report.
fn command_analyze(command: &AnalyzeCommand) -> CliResult<ExitCode> {
    let verdicts = collect_verdicts(command);
    let rendered = render_output(&verdicts, command.format)?;
    emit_rendered(&rendered, command.output.as_deref())?;
    let all_passed = verdicts.iter().all(DocumentVerdict::passed);
    Ok(if all_passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Reads and analyzes each path, producing one verdict per path in order.
fn collect_verdicts(command: &AnalyzeCommand) -> Vec<DocumentVerdict> {
    let config = AnalyzerConfig {
        fail_on: command.fail_on.to_fail_on(),
        home_account: command.home_account.clone(),
        ..AnalyzerConfig::default()
    };
    let analyzer = Analyzer::new(config);

    command
        .paths
        .iter()
        .map(|path| {
            let id = path.display().to_string();
            match fs::read_to_string(path) {
                Ok(text) => analyzer.analyze_source(&DocumentSource::new(id.as_str(), text)),
                Err(err) => DocumentVerdict::Rejected {
                    error: DocumentError::new(id.as_str(), IO_ERROR_CODE, err.to_string()),
                },
            }
        })
        .collect()
}

// ============================================================================
// SECTION: Output Rendering
// ============================================================================

/// Renders the verdict sequence in the requested format.
fn render_output(verdicts: &[DocumentVerdict], format: OutputFormatArg) -> CliResult<String> {
    match format {
        OutputFormatArg::Json => render_structured(verdicts, ReportFormat::Json),
        OutputFormatArg::Markdown => render_structured(verdicts, ReportFormat::Markdown),
        OutputFormatArg::Text => Ok(render_text(verdicts)),
    }
}

/// Renders via the core serializer: a bare object for a single document,
/// the tagged verdict sequence otherwise.
fn render_structured(verdicts: &[DocumentVerdict], format: ReportFormat) -> CliResult<String> {
    let rendered = match verdicts {
        [verdict] => report::render_verdict(verdict, format),
        _ => report::render_batch(verdicts, format),
    };
    rendered.map_err(|err| CliError::new(err.to_string()))
}

/// Renders a compact per-document text summary.
fn render_text(verdicts: &[DocumentVerdict]) -> String {
    let mut lines = Vec::new();
    for verdict in verdicts {
        match verdict {
            DocumentVerdict::Analyzed { result } => render_text_result(&mut lines, result),
            DocumentVerdict::Rejected { error } => {
                lines.push(format!(
                    "{}: REJECTED ({}) {}",
                    error.source_document_id, error.code, error.message,
                ));
            }
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Appends the text summary lines for one analyzed document.
fn render_text_result(lines: &mut Vec<String>, result: &AnalysisResult) {
    let status = if result.passed { "PASSED" } else { "FAILED" };
    if result.findings.is_empty() {
        lines.push(format!(
            "{}: {status} (risk {:.1}; no findings)",
            result.source_document_id, result.risk_score,
        ));
        return;
    }

    let counts: Vec<String> = display_order()
        .iter()
        .filter(|severity| result.summary.count(**severity) > 0)
        .map(|severity| format!("{severity} {}", result.summary.count(*severity)))
        .collect();
    lines.push(format!(
        "{}: {status} (risk {:.1}; {} findings: {})",
        result.source_document_id,
        result.risk_score,
        result.summary.total(),
        counts.join(", "),
    ));
    for finding in &result.findings {
        lines.push(format!(
            "  [{}] {}: {} (statement {})",
            finding.severity, finding.rule_id, finding.title, finding.statement_ref,
        ));
    }
}

// ============================================================================
// SECTION: Output Emission
// ============================================================================

/// Writes the rendered report to the output path or stdout.
fn emit_rendered(rendered: &str, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => fs::write(path, rendered).map_err(|err| {
            CliError::new(format!("failed to write {}: {err}", path.display()))
        }),
        None => write_stdout(rendered)
            .map_err(|err| CliError::new(format!("failed to write stdout: {err}"))),
    }
}

/// Writes text to stdout.
fn write_stdout(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())
}

/// Writes a fatal error to stderr and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "iamx: {message}");
    ExitCode::FAILURE
}
