// src/handlers/records.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::record::{CreateRecordPayload, PoolRecord},
};

// A visão global: tudo que o resolver deixa este usuário ver
#[utoipa::path(
    get,
    path = "/api/records",
    tag = "Records",
    security(("api_jwt" = [])),
    responses((status = 200, body = [PoolRecord]))
)]
pub async fn list_all_records(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.record_service.list_all(&user).await;
    Ok((StatusCode::OK, Json(records)))
}

#[utoipa::path(
    get,
    path = "/api/pools/{id}/records",
    tag = "Records",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 200, body = [PoolRecord]))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.record_service.list_for_pool(&user, id).await?;
    Ok((StatusCode::OK, Json(records)))
}

#[utoipa::path(
    post,
    path = "/api/pools/{id}/records",
    tag = "Records",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    request_body = CreateRecordPayload,
    responses((status = 201, body = PoolRecord))
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let record = app_state
        .record_service
        .create_record(&user, id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}
