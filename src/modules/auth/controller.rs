use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use letsplay_core::{AppError, ErrorEnvelope};
use letsplay_models::{LoginRequest, LoginResponse, RegisterRequest, User};

use super::service::AuthService;
use crate::middleware::auth::Caller;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = User),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 409, description = "Email or username already exists", body = ErrorEnvelope)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    Caller(principal): Caller,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register(state.store.as_ref(), &principal, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    Caller(principal): Caller,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response =
        AuthService::login(state.store.as_ref(), &state.tokens, &principal, dto).await?;
    Ok(Json(response))
}
