// crates/iamx-core/src/core/mod.rs
// ============================================================================
// Module: iamx Core Types
// Description: Policy model, findings, severity scale, and analysis results.
// Purpose: Define the data types shared by the parser, catalog, and engine.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types carry no evaluation logic. The policy model is a normalized,
//! structurally validated snapshot of one IAM policy document; findings and
//! results are immutable values assembled by the runtime engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod finding;
pub mod model;
pub mod result;
pub mod severity;
