use anyhow::anyhow;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;

use letsplay_core::{AppError, hash_password};
use letsplay_models::{NewUser, Role};

const MAX_USERNAME_BASE: usize = 30;

/// Builds `count` fake `USER` accounts sharing `password`. Each account
/// gets its own salted hash; the bcrypt work runs in parallel.
pub fn generate_users(count: usize, tag: &str, password: &str) -> anyhow::Result<Vec<NewUser>> {
    (0..count)
        .into_par_iter()
        .map(|index| -> Result<NewUser, AppError> {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let base: String = format!("{first}_{last}")
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .take(MAX_USERNAME_BASE)
                .collect();

            Ok(NewUser {
                username: format!("{base}_{tag}{index}"),
                email: format!("{base}.{tag}{index}@example.com"),
                password_hash: hash_password(password)?,
                role: Role::User,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()
        .map_err(|e| anyhow!("Failed to hash seed password: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use letsplay_core::verify_password;
    use std::collections::HashSet;

    #[test]
    fn test_generate_users() {
        let users = generate_users(4, "abc123", "password123").unwrap();
        assert_eq!(users.len(), 4);

        for user in &users {
            assert_eq!(user.role, Role::User);
            assert!(user.username.len() <= 50);
            assert!(user.username.len() >= 3);
            assert!(user.email.ends_with("@example.com"));
            assert!(verify_password("password123", &user.password_hash).unwrap());
        }

        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
        let usernames: HashSet<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(emails.len(), 4);
        assert_eq!(usernames.len(), 4);
    }

    #[test]
    fn test_generate_zero_users() {
        assert!(generate_users(0, "abc123", "password123").unwrap().is_empty());
    }
}
