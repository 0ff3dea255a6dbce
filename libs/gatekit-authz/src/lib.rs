#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Core modules
pub mod config;
pub mod errors;
pub mod outcome;
pub mod table;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

// Core exports
pub use config::{GateConfig, PolicySpec, RouteRule, ScopeRule, build_policy_table};
pub use errors::AuthzError;
pub use outcome::{PipelineOutcome, check};
pub use table::{PolicySource, PolicyTable, PolicyTableBuilder, RegistrationError};
