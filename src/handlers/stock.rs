// src/handlers/stock.rs

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
    models::stock::{RecordUsagePayload, StockItem, StockItemPayload, StockUsageRecord},
};

#[utoipa::path(
    get,
    path = "/api/stock/items",
    tag = "Stock",
    security(("api_jwt" = [])),
    responses((status = 200, body = [StockItem]))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.stock_service.list_items(&user).await;
    Ok((StatusCode::OK, Json(items)))
}

// Itens na linha de reposição (quantidade <= limiar)
#[utoipa::path(
    get,
    path = "/api/stock/items/low",
    tag = "Stock",
    security(("api_jwt" = [])),
    responses((status = 200, body = [StockItem]))
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.stock_service.list_low_stock(&user).await;
    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/stock/items",
    tag = "Stock",
    security(("api_jwt" = [])),
    request_body = StockItemPayload,
    responses((status = 201, body = StockItem))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<StockItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state.stock_service.create_item(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/stock/items/{id}",
    tag = "Stock",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    request_body = StockItemPayload,
    responses((status = 200, body = StockItem))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .stock_service
        .update_item(&user, id, payload)
        .await?;
    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/stock/items/{id}",
    tag = "Stock",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 204))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.stock_service.delete_item(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/stock/usage",
    tag = "Stock",
    security(("api_jwt" = [])),
    responses((status = 200, body = [StockUsageRecord]))
)]
pub async fn list_usage(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let usage = app_state.stock_service.list_usage(&user).await;
    Ok((StatusCode::OK, Json(usage)))
}

// Dá baixa no saldo e grava o histórico em uma operação só
#[utoipa::path(
    post,
    path = "/api/stock/usage",
    tag = "Stock",
    security(("api_jwt" = [])),
    request_body = RecordUsagePayload,
    responses(
        (status = 201, body = StockUsageRecord),
        (status = 400, description = "Estoque insuficiente")
    )
)]
pub async fn record_usage(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<RecordUsagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usage = app_state.stock_service.record_usage(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(usage)))
}
