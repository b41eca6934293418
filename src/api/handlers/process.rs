use crate::AppState;
use crate::api::error::{AppError, ErrorResponse};
use crate::models::VerifiedPair;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Base name shared by the CSV and PDF uploads
    pub filename: Option<String>,
}

#[utoipa::path(
    post,
    path = "/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Both files of the pair exist", body = VerifiedPair),
        (status = 400, description = "No filename provided", body = ErrorResponse),
        (status = 404, description = "CSV or PDF missing", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse)
    ),
    tag = "pairing"
)]
pub async fn process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<VerifiedPair>, AppError> {
    let Json(req) = payload?;

    let pair = state
        .verifier
        .verify(req.filename.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(pair))
}
