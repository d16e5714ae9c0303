use axum::Json;
use axum::extract::{Query, State, rejection::QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use letsplay_core::pagination::TOTAL_COUNT_HEADER;
use letsplay_core::{AppError, ErrorEnvelope, PaginationParams};
use letsplay_models::{UpdateUserDto, User};

use super::service::UserService;
use crate::middleware::auth::Caller;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

/// List users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<User>,
            headers(("X-Total-Count" = i64, description = "Total number of users"))),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Administrator privileges required", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_users(
    State(state): State<AppState>,
    Caller(principal): Caller,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(pagination) = pagination.map_err(|e| {
        AppError::validation_failed(format!("Invalid query parameters: {}", e.body_text()))
    })?;

    let page = UserService::list(
        state.store.as_ref(),
        &principal,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(page.items),
    ))
}

/// Get the caller's own account
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own account", body = User),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_me(
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<User>, AppError> {
    let user = UserService::me(state.store.as_ref(), &principal).await?;
    Ok(Json(user))
}

/// Get a user (self or admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Not your account", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, principal))]
pub async fn get_user(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<Json<User>, AppError> {
    let user = UserService::get(state.store.as_ref(), &principal, id).await?;
    Ok(Json(user))
}

/// Update a user (self or admin; only admins may change `role`)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Not your account, or role change by a non-admin", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
        (status = 409, description = "Email or username already exists", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, principal, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update(state.store.as_ref(), &principal, id, dto).await?;
    Ok(Json(user))
}

/// Delete a user and all of their products (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User and owned products deleted"),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Administrator privileges required", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, principal))]
pub async fn delete_user(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    UserService::delete(state.store.as_ref(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
