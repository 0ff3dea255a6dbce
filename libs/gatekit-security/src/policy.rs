use std::sync::Arc;

use crate::claim::{Claim, ClaimSet};

/// A stored claim-validation function for [`AccessPolicy::Validated`].
///
/// Shared via `Arc` so a policy stays cheaply cloneable and can be read
/// concurrently by any number of in-flight requests.
pub type ClaimsPredicate = Arc<dyn Fn(&ClaimSet) -> bool + Send + Sync>;

/// The declarative authorization requirement attached to a route.
///
/// A route has at most one policy, fixed at registration time and
/// immutable thereafter. A route with no declared policy behaves as
/// [`AccessPolicy::None`].
#[derive(Clone, Default)]
pub enum AccessPolicy {
    /// No restriction; anonymous requests pass.
    #[default]
    None,
    /// The principal must be authenticated; claims are not inspected.
    Authenticated,
    /// The principal must be authenticated and hold every listed claim.
    /// An empty set allows every authenticated principal.
    AllClaims(ClaimSet),
    /// The principal must be authenticated and hold at least one listed
    /// claim. An empty set denies every authenticated principal; the
    /// declaration surface warns when one is registered.
    AnyClaim(ClaimSet),
    /// The principal must be authenticated and the predicate must accept
    /// its claim set.
    Validated(ClaimsPredicate),
}

impl AccessPolicy {
    /// Policy requiring every claim in `claims`.
    #[must_use]
    pub fn require_all<I>(claims: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Claim>,
    {
        Self::AllClaims(claims.into_iter().collect())
    }

    /// Policy requiring at least one claim in `claims`.
    #[must_use]
    pub fn require_any<I>(claims: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Claim>,
    {
        Self::AnyClaim(claims.into_iter().collect())
    }

    /// Policy delegating the claim check to `predicate`.
    ///
    /// The evaluator never overrides the predicate's answer for an
    /// authenticated principal. A panic inside the predicate propagates
    /// to the host pipeline; it is never interpreted as an allow.
    #[must_use]
    pub fn validated<F>(predicate: F) -> Self
    where
        F: Fn(&ClaimSet) -> bool + Send + Sync + 'static,
    {
        Self::Validated(Arc::new(predicate))
    }

    /// Check the policy for registration-time defects.
    ///
    /// Runs when a policy is attached to a route so malformed
    /// declarations fail at startup, before any request is served.
    ///
    /// # Errors
    /// Returns [`PolicyError::EmptyClaim`] if a required claim token is
    /// empty or whitespace-only.
    pub fn validate(&self) -> Result<(), PolicyError> {
        match self {
            Self::None | Self::Authenticated | Self::Validated(_) => Ok(()),
            Self::AllClaims(claims) | Self::AnyClaim(claims) => {
                if claims.iter().any(|c| c.as_str().trim().is_empty()) {
                    Err(PolicyError::EmptyClaim)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl std::fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Authenticated => f.write_str("Authenticated"),
            Self::AllClaims(claims) => f.debug_tuple("AllClaims").field(claims).finish(),
            Self::AnyClaim(claims) => f.debug_tuple("AnyClaim").field(claims).finish(),
            Self::Validated(_) => f.write_str("Validated(<predicate>)"),
        }
    }
}

impl std::fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("no restriction"),
            Self::Authenticated => f.write_str("requires authentication"),
            Self::AllClaims(claims) => write!(f, "requires all of [{}]", join(claims)),
            Self::AnyClaim(claims) => write!(f, "requires any of [{}]", join(claims)),
            Self::Validated(_) => f.write_str("requires validated claims"),
        }
    }
}

fn join(claims: &ClaimSet) -> String {
    claims
        .iter()
        .map(Claim::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Registration-time policy defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("claim tokens must be non-empty")]
    EmptyClaim,
}
