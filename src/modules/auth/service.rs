use tracing::{info, instrument, warn};

use letsplay_auth::{Action, Principal, Role, TokenService, authorize};
use letsplay_core::{AppError, hash_password, verify_password};
use letsplay_db::Store;
use letsplay_models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, User};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AuthService;

impl AuthService {
    /// Creates a `USER` account. Roles other than `USER` can only be granted
    /// afterwards by an admin.
    #[instrument(skip_all, fields(user.email = %dto.email))]
    pub async fn register(
        store: &dyn Store,
        principal: &Principal,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        authorize(principal, Action::Register, None)?;

        let user = store
            .insert_user(NewUser {
                username: dto.username.trim().to_string(),
                email: normalize_email(&dto.email),
                password_hash: hash_password(&dto.password)?,
                role: Role::User,
            })
            .await?;

        info!(user.id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(skip_all, fields(user.email = %dto.email))]
    pub async fn login(
        store: &dyn Store,
        tokens: &TokenService,
        principal: &Principal,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        authorize(principal, Action::Login, None)?;

        let Some(credentials) = store
            .find_credentials_by_email(&normalize_email(&dto.email))
            .await?
        else {
            warn!("Login attempt for unknown email");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            warn!(user.id = %credentials.user.id, "Login attempt with wrong password");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let user = credentials.user;
        let token = tokens
            .issue(user.id, &user.email, user.role)
            .map_err(AppError::internal)?;

        info!(user.id = %user.id, user.role = %user.role, "User logged in");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.ttl(),
            user,
        })
    }
}
