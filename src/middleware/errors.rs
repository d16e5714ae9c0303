//! Error envelope finishing and fallback handlers.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use letsplay_core::{AppError, ErrorEnvelope};

/// Stamps the request path into error envelopes, and wraps bare error
/// responses produced outside the handlers (such as axum's own 405) in
/// one.
pub async fn error_envelope(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let mut response = next.run(req).await;

    let status = response.status();
    let envelope = match response.extensions_mut().remove::<ErrorEnvelope>() {
        Some(envelope) => envelope,
        None if status == StatusCode::METHOD_NOT_ALLOWED => {
            AppError::method_not_allowed(format!("Method {method} is not supported for this route"))
                .envelope()
        }
        None if status.is_client_error() || status.is_server_error() => {
            AppError::new(
                status,
                anyhow::anyhow!(status.canonical_reason().unwrap_or("Request failed")),
            )
            .envelope()
        }
        None => return response,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    let body = Json(envelope.with_path(path)).into_response().into_body();
    Response::from_parts(parts, body)
}

pub async fn not_found() -> AppError {
    AppError::not_found("No route matches this path")
}
