use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use super::service::{InquiryService, InquiryServiceError};
use super::store::InquiryStore;

pub const INQUIRIES_PATH: &str = "/api/inquiries";

/// Who may read back stored inquiries. Submission is always open.
#[derive(Clone, PartialEq, Eq)]
pub enum AdminAccess {
    /// No credential required; only allowed outside production.
    Open,
    /// `Authorization: Bearer <token>` must match.
    Bearer(String),
}

impl AdminAccess {
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) => Self::Bearer(token),
            None => Self::Open,
        }
    }

    pub(crate) fn permits(&self, headers: &HeaderMap) -> bool {
        let AdminAccess::Bearer(expected) = self else {
            return true;
        };
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|presented| tokens_match(presented.trim(), expected))
    }
}

impl std::fmt::Debug for AdminAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminAccess::Open => f.write_str("Open"),
            AdminAccess::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Compares fixed-size digests so the check takes the same time whatever the presented
/// token's length or content.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented.ct_eq(&expected).into()
}

/// Shared handler state: the service plus the listing access policy.
pub struct InquiryState<S> {
    pub service: Arc<InquiryService<S>>,
    pub access: Arc<AdminAccess>,
}

impl<S> Clone for InquiryState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            access: Arc::clone(&self.access),
        }
    }
}

/// Router builder exposing the inquiry intake and listing endpoints.
pub fn inquiry_router<S>(service: Arc<InquiryService<S>>, access: AdminAccess) -> Router
where
    S: InquiryStore + 'static,
{
    Router::new()
        .route(
            INQUIRIES_PATH,
            get(list_handler::<S>).post(submit_handler::<S>),
        )
        .with_state(InquiryState {
            service,
            access: Arc::new(access),
        })
}

pub(crate) async fn submit_handler<S>(
    State(state): State<InquiryState<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: InquiryStore + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let body = json!({
                "message": "Validation failed",
                "errors": [{ "field": "body", "message": rejection.body_text() }],
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let service = Arc::clone(&state.service);
    let outcome = tokio::task::spawn_blocking(move || service.submit(&payload)).await;

    match outcome {
        Ok(Ok(inquiry)) => {
            let body = json!({
                "message": "Inquiry submitted successfully",
                "inquiry": inquiry,
            });
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Ok(Err(InquiryServiceError::Validation(errors))) => {
            let body = json!({
                "message": "Validation failed",
                "errors": errors,
            });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        Ok(Err(InquiryServiceError::Store(_))) => failure("Failed to process your inquiry"),
        Err(join) => {
            error!(error = %join, "inquiry submission task did not complete");
            failure("Failed to process your inquiry")
        }
    }
}

pub(crate) async fn list_handler<S>(
    State(state): State<InquiryState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: InquiryStore + 'static,
{
    if !state.access.permits(&headers) {
        warn!("rejected unauthenticated inquiry listing");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response();
    }

    let service = Arc::clone(&state.service);
    match tokio::task::spawn_blocking(move || service.list()).await {
        Ok(Ok(inquiries)) => (StatusCode::OK, Json(inquiries)).into_response(),
        Ok(Err(_)) => failure("Failed to retrieve inquiries"),
        Err(join) => {
            error!(error = %join, "inquiry listing task did not complete");
            failure("Failed to retrieve inquiries")
        }
    }
}

/// Generic 500; the cause has already been logged.
fn failure(message: &'static str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": message })),
    )
        .into_response()
}
