use axum::Json;
use axum::extract::{Query, State, rejection::QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use letsplay_core::pagination::TOTAL_COUNT_HEADER;
use letsplay_core::{AppError, ErrorEnvelope};
use letsplay_models::{CreateProductDto, PatchProductDto, Product, ProductFilterParams};

use super::service::ProductService;
use crate::middleware::auth::Caller;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

/// List products
///
/// Public. The total number of matches is returned in `X-Total-Count`.
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category" = Option<String>, Query, description = "Filter by exact category"),
        ("owner_id" = Option<Uuid>, Query, description = "Filter by owner"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100, default 20)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1; overrides offset")
    ),
    responses(
        (status = 200, description = "Page of products", body = Vec<Product>,
            headers(("X-Total-Count" = i64, description = "Total matching products"))),
        (status = 400, description = "Invalid query parameters", body = ErrorEnvelope),
        (status = 401, description = "Invalid bearer token", body = ErrorEnvelope)
    ),
    tag = "Products"
)]
#[instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    Caller(principal): Caller,
    params: Result<Query<ProductFilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| {
        AppError::validation_failed(format!("Invalid query parameters: {}", e.body_text()))
    })?;

    let page = ProductService::list(state.store.as_ref(), &principal, params.into()).await?;
    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(page.items),
    ))
}

/// Get a product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Product not found", body = ErrorEnvelope)
    ),
    tag = "Products"
)]
#[instrument(skip(state, principal))]
pub async fn get_product(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::get(state.store.as_ref(), &principal, id).await?;
    Ok(Json(product))
}

/// Create a product owned by the caller
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 401, description = "Authentication required", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    Caller(principal): Caller,
    ValidatedJson(dto): ValidatedJson<CreateProductDto>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = ProductService::create(state.store.as_ref(), &principal, dto).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = CreateProductDto,
    responses(
        (status = 200, description = "Product replaced", body = Product),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Not the owner", body = ErrorEnvelope),
        (status = 404, description = "Product not found", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, principal, dto))]
pub async fn replace_product(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<CreateProductDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::replace(state.store.as_ref(), &principal, id, dto).await?;
    Ok(Json(product))
}

/// Partially update a product
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = PatchProductDto,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Not the owner", body = ErrorEnvelope),
        (status = 404, description = "Product not found", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, principal, dto))]
pub async fn patch_product(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<PatchProductDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::patch(state.store.as_ref(), &principal, id, dto).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Authentication required", body = ErrorEnvelope),
        (status = 403, description = "Not the owner", body = ErrorEnvelope),
        (status = 404, description = "Product not found", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, principal))]
pub async fn delete_product(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    ProductService::delete(state.store.as_ref(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
