// src/handlers/analysis.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::analysis::{PoolPictureAnalysis, TestStripAnalysis},
};

// ---
// Payloads (a imagem vem como data URI base64, igual ao upload do app)
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTestStripPayload {
    #[validate(length(min = 1, message = "A imagem da fita de teste é obrigatória."))]
    pub test_strip_data_uri: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePoolPicturePayload {
    #[validate(length(min = 1, message = "A foto da piscina é obrigatória."))]
    pub pool_picture_data_uri: String,
}

// ---
// Handlers
// ---

// Leitura de fita de teste: níveis químicos + sugestões de ajuste
#[utoipa::path(
    post,
    path = "/api/analysis/test-strip",
    tag = "Analysis",
    security(("api_jwt" = [])),
    request_body = AnalyzeTestStripPayload,
    responses(
        (status = 200, body = TestStripAnalysis),
        (status = 502, description = "Falha na análise")
    )
)]
pub async fn analyze_test_strip(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<AnalyzeTestStripPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let analysis = app_state
        .analysis_service
        .analyze_test_strip(&payload.test_strip_data_uri)
        .await?;

    Ok((StatusCode::OK, Json(analysis)))
}

// Avaliação da foto: clareza da água, condição da superfície, ações
#[utoipa::path(
    post,
    path = "/api/analysis/pool-picture",
    tag = "Analysis",
    security(("api_jwt" = [])),
    request_body = AnalyzePoolPicturePayload,
    responses(
        (status = 200, body = PoolPictureAnalysis),
        (status = 502, description = "Falha na análise")
    )
)]
pub async fn analyze_pool_picture(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<AnalyzePoolPicturePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let analysis = app_state
        .analysis_service
        .analyze_pool_picture(&payload.pool_picture_data_uri)
        .await?;

    Ok((StatusCode::OK, Json(analysis)))
}
