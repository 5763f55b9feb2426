mod stages;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use salescopy_pipeline::{Pipeline, StageError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" | "unsupported_provider" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a failed stage to the wire error, keeping the underlying message.
pub(super) fn map_stage_error(request_id: String, error: &StageError) -> ApiError {
    let code = if error.is_validation() {
        "validation_error"
    } else if error.is_unsupported_provider() {
        "unsupported_provider"
    } else if error.is_timeout() {
        "upstream_timeout"
    } else {
        "stage_failed"
    };
    if code == "stage_failed" || code == "upstream_timeout" {
        tracing::error!(request_id = %request_id, error = %error, "stage failed");
    }
    ApiError::new(request_id, code, error.to_string())
}

/// Unwraps a JSON body, reporting unreadable bodies as `validation_error`.
pub(super) fn json_body<T>(
    request_id: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::new(request_id, "validation_error", rejection.body_text()))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn stage_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/analyze", post(stages::analyze))
        .route("/api/v1/angles", post(stages::angles))
        .route("/api/v1/copy", post(stages::copy))
        .route("/api/v1/adapt", post(stages::adapt))
        .route("/api/v1/advice", post(stages::advice))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(stage_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests;
