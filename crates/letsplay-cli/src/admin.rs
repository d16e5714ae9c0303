use anyhow::{Context, anyhow};
use validator::Validate;

use letsplay_core::hash_password;
use letsplay_db::Store;
use letsplay_models::{NewUser, RegisterRequest, Role, User};

/// Creates an `ADMIN` account after applying the same field rules as
/// registration.
pub async fn create_admin(
    store: &dyn Store,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<User> {
    let request = RegisterRequest {
        username: username.trim().to_string(),
        email: email.trim().to_lowercase(),
        password: password.to_string(),
    };
    request
        .validate()
        .map_err(|errors| anyhow!("Invalid admin details: {errors}"))?;

    let password_hash = hash_password(&request.password).map_err(|e| anyhow!("{e}"))?;

    store
        .insert_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role: Role::Admin,
        })
        .await
        .map_err(|e| anyhow!("{}", e.message()))
        .context("Failed to create admin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use letsplay_db::MemoryStore;

    #[tokio::test]
    async fn test_create_admin() {
        let store = MemoryStore::new();
        let admin = create_admin(&store, "root", " Root@Example.com ", "password123")
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.email, "root@example.com");
    }

    #[tokio::test]
    async fn test_create_admin_validates_input() {
        let store = MemoryStore::new();
        assert!(create_admin(&store, "root", "root@example.com", "short").await.is_err());
        assert!(create_admin(&store, "r", "root@example.com", "password123").await.is_err());
    }

    #[tokio::test]
    async fn test_create_admin_duplicate_email() {
        let store = MemoryStore::new();
        create_admin(&store, "root", "root@example.com", "password123")
            .await
            .unwrap();
        let err = create_admin(&store, "root2", "root@example.com", "password123")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("Email already exists"));
    }
}
