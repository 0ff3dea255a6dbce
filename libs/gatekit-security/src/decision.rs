use crate::policy::AccessPolicy;
use crate::principal::Principal;

/// The outcome of evaluating a principal against a policy.
///
/// Evaluation is total: every `(principal, policy)` pair yields exactly
/// one decision. `Unauthenticated` and `Forbidden` are normal results,
/// not faults; the enforcement layer maps them to terminal HTTP
/// responses (401 and 403 respectively).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The request may proceed to the route handler.
    Allow,
    /// No authenticated identity; the policy demands one.
    Unauthenticated,
    /// Identity present but its claims do not satisfy the policy.
    Forbidden,
}

impl Decision {
    #[must_use]
    pub fn is_allow(self) -> bool {
        self == Self::Allow
    }
}

/// Decide whether `principal` satisfies `policy`.
///
/// Pure and deterministic: no side effects, no I/O, and the same inputs
/// always produce the same decision. Cost is bounded by the size of the
/// claim sets involved.
///
/// Checks run in a fixed, observable order:
///
/// 1. [`AccessPolicy::None`] allows, even for anonymous principals.
/// 2. An unauthenticated principal is refused before any claim is
///    inspected, so anonymous requests always yield
///    [`Decision::Unauthenticated`], never [`Decision::Forbidden`],
///    regardless of which claims the policy lists.
/// 3. Only then is the claim requirement applied:
///    all-of is a subset test (vacuously true for an empty set), any-of
///    is an intersection test (false for an empty set), and a validation
///    predicate's answer is taken as-is.
#[must_use]
pub fn evaluate(principal: &Principal, policy: &AccessPolicy) -> Decision {
    if matches!(policy, AccessPolicy::None) {
        return Decision::Allow;
    }

    if !principal.is_authenticated() {
        return Decision::Unauthenticated;
    }

    let satisfied = match policy {
        AccessPolicy::None | AccessPolicy::Authenticated => true,
        AccessPolicy::AllClaims(required) => principal.claims().contains_all(required),
        AccessPolicy::AnyClaim(required) => principal.claims().contains_any(required),
        AccessPolicy::Validated(predicate) => predicate(principal.claims()),
    };

    if satisfied {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

impl AccessPolicy {
    /// Method form of [`evaluate`].
    #[must_use]
    pub fn evaluate(&self, principal: &Principal) -> Decision {
        evaluate(principal, self)
    }
}
