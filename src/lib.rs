//! Layered lint-rule configuration resolution.
//!
//! Layers (`base`, `typescript`, `react`, or any user-defined set) each carry
//! a rule table, an optional parent, and glob-scoped overrides. The resolver
//! composes them into one effective rule table per file path; an external
//! lint engine consumes the result.

pub mod batch;
pub mod cli;
pub mod config;
pub mod matcher;
pub mod presets;
pub mod registry;
pub mod resolve;
