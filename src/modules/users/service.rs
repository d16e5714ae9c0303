use tracing::{info, instrument};
use uuid::Uuid;

use letsplay_auth::{Action, Principal, authorize};
use letsplay_core::{AppError, Page, hash_password};
use letsplay_db::Store;
use letsplay_models::{UpdateUserDto, User, UserUpdate};

use crate::modules::auth::service::normalize_email;

pub struct UserService;

impl UserService {
    #[instrument(skip(store, principal))]
    pub async fn list(
        store: &dyn Store,
        principal: &Principal,
        limit: i64,
        offset: i64,
    ) -> Result<Page<User>, AppError> {
        authorize(principal, Action::ListUsers, None)?;
        store.list_users(limit, offset).await
    }

    /// The caller's own account.
    #[instrument(skip_all)]
    pub async fn me(store: &dyn Store, principal: &Principal) -> Result<User, AppError> {
        let id = principal.require_identity()?.subject_id;
        Self::get(store, principal, id).await
    }

    #[instrument(skip(store, principal), fields(user.id = %id))]
    pub async fn get(store: &dyn Store, principal: &Principal, id: Uuid) -> Result<User, AppError> {
        authorize(principal, Action::ReadUser, Some(id))?;
        store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Applies the present fields. Changing `role` additionally requires the
    /// admin-only role assignment permission.
    #[instrument(skip(store, principal, dto), fields(user.id = %id))]
    pub async fn update(
        store: &dyn Store,
        principal: &Principal,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        authorize(principal, Action::UpdateUser, Some(id))?;
        if dto.role.is_some() {
            authorize(principal, Action::AssignRole, Some(id))?;
        }

        let update = UserUpdate {
            username: dto.username.map(|u| u.trim().to_string()),
            email: dto.email.as_deref().map(normalize_email),
            password_hash: dto.password.as_deref().map(hash_password).transpose()?,
            role: dto.role,
        };

        if update.is_empty() {
            return store
                .find_user(id)
                .await?
                .ok_or_else(|| AppError::not_found("User not found"));
        }

        let role_changed = update.role;
        let user = store
            .update_user(id, update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        match role_changed {
            Some(role) => info!(user.id = %id, user.role = %role, "User role changed"),
            None => info!(user.id = %id, "User updated"),
        }
        Ok(user)
    }

    /// Deletes the account and all of its products. Returns how many
    /// products were removed.
    #[instrument(skip(store, principal), fields(user.id = %id))]
    pub async fn delete(store: &dyn Store, principal: &Principal, id: Uuid) -> Result<u64, AppError> {
        authorize(principal, Action::DeleteUser, Some(id))?;

        let removed = store
            .delete_user_cascade(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user.id = %id, products.deleted = removed, "User deleted");
        Ok(removed)
    }
}
