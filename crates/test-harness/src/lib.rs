//! Test harness for scripted sketch-to-solid workflows.
//!
//! Provides programmatic tools for building models step by step through
//! the real dispatch path and checking the resulting meshes.
//!
//! # Key Components
//!
//! - [`ModelBuilder`]: fluent API that names entities and bodies
//! - [`oracle`]: mesh checks returning pass/fail verdicts
//! - [`helpers`]: error type and mesh math
//! - [`assertions`]: assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use workflow::ModelBuilder;
