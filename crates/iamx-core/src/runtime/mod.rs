// crates/iamx-core/src/runtime/mod.rs
// ============================================================================
// Module: iamx Runtime
// Description: Parser, analysis engine, and report serialization.
// Purpose: Drive the parse -> evaluate -> classify -> serialize pipeline.
// Dependencies: crate::catalog, crate::core
// ============================================================================

//! ## Overview
//! The runtime is a linear, synchronous pipeline with no suspension points
//! and no shared mutable state inside one call. Documents in a batch are
//! independent; one document's failure never aborts its siblings.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod parser;
pub mod report;
