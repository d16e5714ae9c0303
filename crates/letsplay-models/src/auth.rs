//! Registration and login payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{User, validate_username};

/// Body of `POST /api/auth/register`. New accounts always get the `USER`
/// role; a `role` key in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "player_one")]
    pub username: String,
    #[validate(email)]
    #[schema(example = "player@example.com")]
    pub email: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "player@example.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("player", "player@example.com", "password123").validate().is_ok());
        assert!(register("pl", "player@example.com", "password123").validate().is_err());
        assert!(register(&"x".repeat(51), "player@example.com", "password123").validate().is_err());
        assert!(register("    ", "player@example.com", "password123").validate().is_err());
        assert!(register("  ab  ", "player@example.com", "password123").validate().is_err());
        assert!(register("player", "nope", "password123").validate().is_err());
        assert!(register("player", "player@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_register_ignores_role_field() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"player","email":"p@example.com","password":"password123","role":"ADMIN"}"#,
        )
        .unwrap();
        assert_eq!(req.username, "player");
    }

    #[test]
    fn test_login_requires_password() {
        let req = LoginRequest {
            email: "player@example.com".to_string(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
