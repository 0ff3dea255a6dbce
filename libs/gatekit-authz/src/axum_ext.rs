//! Axum extractors and middleware for the route gate

use crate::{
    errors::AuthzError,
    outcome::{PipelineOutcome, check},
    table::PolicySource,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gatekit_security::Principal;
use std::sync::Arc;

/// Extractor for the gated `Principal` - validates that the route gate has run
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthzError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AuthzError::Internal(
                "Principal not found - route gate not configured".to_owned(),
            ))
    }
}

/// Shared state for the route gate middleware.
#[derive(Clone)]
pub struct GateState {
    source: Arc<dyn PolicySource>,
}

impl GateState {
    #[must_use]
    pub fn new(source: Arc<dyn PolicySource>) -> Self {
        Self { source }
    }
}

/// Route gate middleware
///
/// This middleware:
/// 1. Resolves the policy declared for the request's method and path
/// 2. Reads the `Principal` attached upstream, defaulting to anonymous
/// 3. On allow: forwards the request with the evaluated `Principal` attached
/// 4. On denial: short-circuits with 401 (unauthenticated) or 403 (forbidden)
///
/// Returns Response directly (Axum 0.8 style) with denials rendered via `IntoResponse`.
pub async fn route_gate(
    State(GateState { source }): State<GateState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let policy = source.resolve(&method, &path).await;

    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_else(Principal::anonymous);

    match check(policy.as_deref(), &principal) {
        PipelineOutcome::Continue => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        PipelineOutcome::ShortCircuit(status) => {
            tracing::debug!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                "Route policy short-circuited request"
            );
            denial(status).into_response()
        }
    }
}

fn denial(status: StatusCode) -> AuthzError {
    if status == StatusCode::UNAUTHORIZED {
        AuthzError::Unauthenticated
    } else {
        AuthzError::Forbidden
    }
}

// Note: the gate is covered end-to-end in tests/route_gate.rs; unit testing it
// directly would need the full Axum middleware stack.
