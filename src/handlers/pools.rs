// src/handlers/pools.rs

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
    models::{
        auth::User,
        pool::{GrantAccessPayload, Pool, PoolPayload},
    },
};

// Sempre a visão filtrada pelo resolver: não existe listagem "crua"
#[utoipa::path(
    get,
    path = "/api/pools",
    tag = "Pools",
    security(("api_jwt" = [])),
    responses((status = 200, body = [Pool]))
)]
pub async fn list_pools(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let pools = app_state.pool_service.list(&user).await;
    Ok((StatusCode::OK, Json(pools)))
}

#[utoipa::path(
    get,
    path = "/api/pools/{id}",
    tag = "Pools",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Pool))
)]
pub async fn get_pool(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pool = app_state.pool_service.get(&user, id).await?;
    Ok((StatusCode::OK, Json(pool)))
}

#[utoipa::path(
    post,
    path = "/api/pools",
    tag = "Pools",
    security(("api_jwt" = [])),
    request_body = PoolPayload,
    responses((status = 201, body = Pool))
)]
pub async fn create_pool(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PoolPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let pool = app_state.pool_service.create_pool(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(pool)))
}

#[utoipa::path(
    put,
    path = "/api/pools/{id}",
    tag = "Pools",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    request_body = PoolPayload,
    responses((status = 200, body = Pool))
)]
pub async fn update_pool(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PoolPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let pool = app_state
        .pool_service
        .update_pool(&user, id, payload)
        .await?;
    Ok((StatusCode::OK, Json(pool)))
}

#[utoipa::path(
    delete,
    path = "/api/pools/{id}",
    tag = "Pools",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 204))
)]
pub async fn delete_pool(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pool_service.delete_pool(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Concede acesso à piscina para um Technician/Client da mesma empresa
#[utoipa::path(
    post,
    path = "/api/pools/{id}/access",
    tag = "Pools",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    request_body = GrantAccessPayload,
    responses((status = 200, body = User))
)]
pub async fn grant_access(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GrantAccessPayload>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state
        .pool_service
        .grant_access(&user, id, payload.user_id)
        .await?;
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/pools/{id}/access/{user_id}",
    tag = "Pools",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path), ("user_id" = Uuid, Path)),
    responses((status = 200, body = User))
)]
pub async fn revoke_access(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state
        .pool_service
        .revoke_access(&user, id, user_id)
        .await?;
    Ok((StatusCode::OK, Json(updated)))
}
