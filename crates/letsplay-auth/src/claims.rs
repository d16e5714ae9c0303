//! JWT claims and the verified caller [`Identity`] derived from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::jwt::TokenError;
use crate::roles::Role;

/// Claims embedded in every access token.
///
/// The role travels inside the token, so a role change only takes effect
/// once the caller logs in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    pub role: Role,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

/// The authenticated caller, rebuilt from a verified token on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: Uuid,
    pub email: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<Claims> for Identity {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let subject_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Malformed)?;

        Ok(Identity {
            subject_id,
            email: claims.email,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "player@example.com".to_string(),
            role: Role::Admin,
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&claims("abc")).unwrap();
        assert!(serialized.contains(r#""sub":"abc""#));
        assert!(serialized.contains(r#""role":"ADMIN""#));
    }

    #[test]
    fn test_identity_from_claims() {
        let id = Uuid::new_v4();
        let identity = Identity::try_from(claims(&id.to_string())).unwrap();
        assert_eq!(identity.subject_id, id);
        assert_eq!(identity.email, "player@example.com");
        assert!(identity.is_admin());
        assert_eq!(identity.issued_at, 1_700_000_000);
        assert_eq!(identity.expires_at, 1_700_003_600);
    }

    #[test]
    fn test_identity_rejects_non_uuid_subject() {
        let err = Identity::try_from(claims("not-a-uuid")).unwrap_err();
        assert_eq!(err, TokenError::Malformed);
    }
}
