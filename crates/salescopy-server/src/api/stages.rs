use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use salescopy_core::{AdaptedCopy, Copy, ProductInfo, SalesAngle};
use salescopy_pipeline::{AdaptRequest, AdviceRequest, AnalyzeRequest, AnglesRequest, CopyRequest};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{json_body, map_stage_error, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeResponse {
    product_info: ProductInfo,
}

#[derive(Debug, Serialize)]
pub(super) struct AnglesResponse {
    angles: Vec<SalesAngle>,
}

#[derive(Debug, Serialize)]
pub(super) struct CopyResponse {
    copy: Copy,
}

#[derive(Debug, Serialize)]
pub(super) struct AdaptResponse {
    adapted: AdaptedCopy,
}

#[derive(Debug, Serialize)]
pub(super) struct AdviceResponse {
    advice: String,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let req = json_body(&req_id.0, payload)?;
    let product_info = state
        .pipeline
        .analyze(&req)
        .await
        .map_err(|e| map_stage_error(req_id.0, &e))?;
    Ok(Json(AnalyzeResponse { product_info }))
}

pub(super) async fn angles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnglesRequest>, JsonRejection>,
) -> Result<Json<AnglesResponse>, ApiError> {
    let req = json_body(&req_id.0, payload)?;
    let angles = state
        .pipeline
        .angles(&req)
        .await
        .map_err(|e| map_stage_error(req_id.0, &e))?;
    Ok(Json(AnglesResponse { angles }))
}

pub(super) async fn copy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<CopyRequest>, JsonRejection>,
) -> Result<Json<CopyResponse>, ApiError> {
    let req = json_body(&req_id.0, payload)?;
    let copy = state
        .pipeline
        .copy(&req)
        .await
        .map_err(|e| map_stage_error(req_id.0, &e))?;
    Ok(Json(CopyResponse { copy }))
}

pub(super) async fn adapt(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AdaptRequest>, JsonRejection>,
) -> Result<Json<AdaptResponse>, ApiError> {
    let req = json_body(&req_id.0, payload)?;
    let adapted = state
        .pipeline
        .adapt(&req)
        .await
        .map_err(|e| map_stage_error(req_id.0, &e))?;
    Ok(Json(AdaptResponse { adapted }))
}

pub(super) async fn advice(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<AdviceResponse>, ApiError> {
    let req = json_body(&req_id.0, payload)?;
    let advice = state
        .pipeline
        .advice(&req)
        .await
        .map_err(|e| map_stage_error(req_id.0, &e))?;
    Ok(Json(AdviceResponse { advice }))
}
