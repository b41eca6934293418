use crate::AppState;
use crate::api::error::AppError;
use crate::api::views;
use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;

/// Flash message carried across the redirect after a rejected upload
#[derive(Deserialize, Default)]
pub struct FlashQuery {
    pub error: Option<String>,
}

pub async fn home() -> Html<String> {
    views::render_home()
}

pub async fn upload_csv_form(Query(flash): Query<FlashQuery>) -> Html<String> {
    views::render_upload_csv(flash.error.as_deref())
}

pub async fn upload_pdf_form(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(flash): Query<FlashQuery>,
) -> Result<Html<String>, AppError> {
    let base = state.pairing.resume(&filename)?;
    Ok(views::render_upload_pdf(base.as_str(), flash.error.as_deref()))
}

pub async fn uploaded(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Html<String>, AppError> {
    let base = state.pairing.resume(&filename)?;
    Ok(views::render_uploaded(base.as_str()))
}
