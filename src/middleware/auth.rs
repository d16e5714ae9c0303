//! The authentication gate.
//!
//! [`authenticate`] runs in front of every `/api` route and resolves the
//! caller into a [`Principal`]:
//!
//! - no `Authorization: Bearer` header (absent, or another scheme): the
//!   request continues as [`Principal::Anonymous`]
//! - a bearer token that verifies: [`Principal::Authenticated`]
//! - a bearer token that does not verify: the request stops here with 401
//!
//! The principal is stored in the request extensions and read by handlers
//! through the [`Caller`] extractor.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};

use letsplay_auth::Principal;
use letsplay_core::AppError;

use crate::state::AppState;

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match req.headers().typed_get::<Authorization<Bearer>>() {
        None => Principal::Anonymous,
        Some(Authorization(bearer)) => match state.tokens.verify(bearer.token()) {
            Ok(identity) => {
                debug!(user.id = %identity.subject_id, user.role = %identity.role, "Authenticated request");
                Principal::Authenticated(identity)
            }
            Err(err) => {
                warn!(error = %err, path = %req.uri().path(), "Rejected bearer token");
                return Err(AppError::unauthenticated("Invalid or expired token"));
            }
        },
    };

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// The caller resolved by [`authenticate`]. Anonymous when the gate did not
/// run for this route.
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(
            parts
                .extensions
                .get::<Principal>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
