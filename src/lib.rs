//! Derive an RBAC role model from a directory-style identity export.
#![warn(missing_docs)]

/// Fatal pipeline errors: missing inputs, unreadable tables, bad configuration.
pub mod error;
/// Output-directory writing and markdown report generation.
pub mod output;
/// Role assignment building, hierarchy closure, and user-role resolution.
pub mod resolver;
/// Table model, CSV ingestion, field population, and eligibility configuration.
pub mod tables;
/// Declarative per-table schema validation and relationship/cycle checks.
pub mod validator;
