use gatekit_security::{AccessPolicy, Decision, Principal, evaluate};
use http::StatusCode;

/// What the pipeline should do with an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Hand the request to the inner handler untouched.
    Continue,
    /// Stop processing and answer with the given status.
    ShortCircuit(StatusCode),
}

impl PipelineOutcome {
    #[must_use]
    pub fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Short-circuit status, if any.
    #[must_use]
    pub fn status(self) -> Option<StatusCode> {
        match self {
            Self::Continue => None,
            Self::ShortCircuit(status) => Some(status),
        }
    }
}

/// Gate an intercepted request against the policy declared for its route.
///
/// `policy` is the table lookup result; a route with no declared policy
/// is open. An unauthenticated principal short-circuits with `401`, an
/// authenticated one that fails the policy with `403`.
#[must_use]
pub fn check(policy: Option<&AccessPolicy>, principal: &Principal) -> PipelineOutcome {
    let Some(policy) = policy else {
        return PipelineOutcome::Continue;
    };

    match evaluate(principal, policy) {
        Decision::Allow => PipelineOutcome::Continue,
        Decision::Unauthenticated => PipelineOutcome::ShortCircuit(StatusCode::UNAUTHORIZED),
        Decision::Forbidden => PipelineOutcome::ShortCircuit(StatusCode::FORBIDDEN),
    }
}
