// src/handlers/tasks.rs

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
    models::task::{CreateTaskPayload, Task, UpdateTaskPayload},
};

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    security(("api_jwt" = [])),
    responses((status = 200, body = [Task]))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tasks = app_state.task_service.list(&user).await;
    Ok((StatusCode::OK, Json(tasks)))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    security(("api_jwt" = [])),
    request_body = CreateTaskPayload,
    responses((status = 201, body = Task))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let task = app_state.task_service.create_task(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    request_body = UpdateTaskPayload,
    responses((status = 200, body = Task))
)]
pub async fn update_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let task = app_state
        .task_service
        .update_task(&user, id, payload)
        .await?;
    Ok((StatusCode::OK, Json(task)))
}

// A única transição de estado da tarefa: Aberta <-> Concluída
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/toggle",
    tag = "Tasks",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Task))
)]
pub async fn toggle_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_service.toggle_complete(&user, id).await?;
    Ok((StatusCode::OK, Json(task)))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path)),
    responses((status = 204))
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.task_service.delete_task(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
