//! Shared-secret bearer token check applied to the relay routes.

use crate::Error;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Compares the caller's bearer token to one expected value.
///
/// Plain string equality: no constant-time comparison, no per-caller identity.
#[derive(Debug, Clone)]
pub struct BearerGate {
    expected: Arc<str>,
}

impl BearerGate {
    pub fn new(expected: impl Into<Arc<str>>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), Error> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .unwrap_or_default();

        if token == &*self.expected {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }
}

/// Middleware: rejects with 401 before the wrapped handler runs.
pub async fn require_bearer(
    State(gate): State<BearerGate>,
    request: Request,
    next: Next,
) -> Response {
    match gate.check(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request without valid bearer token");
            e.into_response()
        }
    }
}
