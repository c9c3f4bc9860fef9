// src/checker/mod.rs
// =============================================================================
// This module contains the link accessibility checker.
//
// Submodules:
// - http: classifies links as internal/external and probes them with HEAD
//   requests under a concurrency limit and a shared deadline
//
// The links themselves are discovered by page::extract; this module only
// decides what they point at and whether they answer.
// =============================================================================

mod http;

pub use http::{is_internal, LinkChecker, LinkOutcome, LinkTally};
