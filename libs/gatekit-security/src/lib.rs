#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod claim;
pub mod decision;
pub mod policy;
pub mod principal;
pub mod subject;

pub use claim::{Claim, ClaimSet};
pub use decision::{Decision, evaluate};
pub use policy::{AccessPolicy, ClaimsPredicate, PolicyError};
pub use principal::{Principal, PrincipalBuilder};
pub use subject::Subject;
