// src/handlers/companies.rs

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
    models::company::{Company, CompanyWithAdmin, CreateCompanyPayload, UpdateCompanyPayload},
};

#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    security(("api_jwt" = [])),
    responses((status = 200, body = [Company]))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.company_service.list(&user).await;
    Ok((StatusCode::OK, Json(companies)))
}

// Superadmin cria a empresa já com o Admin dono (uma operação só)
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    security(("api_jwt" = [])),
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, body = CompanyWithAdmin),
        (status = 403, description = "Apenas Superadmin")
    )
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let created = app_state
        .company_service
        .create_company(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    request_body = UpdateCompanyPayload,
    responses((status = 200, body = Company))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let company = app_state
        .company_service
        .update_company(&user, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(company)))
}

#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 204))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.company_service.delete_company(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
