//! Token issuing and verification.
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. Verification runs with
//! zero leeway: a token is expired as soon as the clock passes `exp`.
//!
//! # Example
//!
//! ```ignore
//! use letsplay_auth::{Role, TokenService};
//! use letsplay_config::JwtConfig;
//!
//! let tokens = TokenService::new(&JwtConfig::from_env());
//! let token = tokens.issue(user_id, "player@example.com", Role::User)?;
//! let identity = tokens.verify(&token)?;
//! assert_eq!(identity.subject_id, user_id);
//! ```

use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use letsplay_config::JwtConfig;

use crate::claims::{Claims, Identity};
use crate::roles::Role;

/// Why a token was refused. All variants surface to clients as a plain 401;
/// the distinction only matters for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token could not be parsed")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.expiry,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn issue(&self, subject_id: Uuid, email: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject_id, email, role, Utc::now().timestamp())
    }

    /// Issues a token as if the clock read `issued_at`. Identical inputs
    /// always produce the identical token.
    pub fn issue_at(
        &self,
        subject_id: Uuid,
        email: &str,
        role: Role,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            role,
            iat: issued_at,
            exp: issued_at + self.ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Identity::try_from(data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
