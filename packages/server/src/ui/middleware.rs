//! Request middleware.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::infrastructure::auth::AccessError;
use crate::infrastructure::dto::http::ErrorResponse;
use crate::ui::state::AppState;

/// Authorization middleware.
///
/// Every request passes the caller's Authorization header and the request
/// path to the AccessChecker before reaching a handler.
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let method = request.uri().path().to_string();

    match state.access_checker.check(token, &method).await {
        Ok(()) => next.run(request).await,
        Err(err @ AccessError::Denied(_)) => {
            tracing::warn!(method, "access denied");
            (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        Err(err @ AccessError::Unavailable(_)) => {
            tracing::error!(method, error = %err, "auth service unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
