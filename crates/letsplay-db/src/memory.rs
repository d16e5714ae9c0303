//! In-memory implementation of [`Store`].
//!
//! All state sits behind one `RwLock`. Uniqueness checks and cascading
//! deletes run under a single write guard, so no other request can observe
//! or interleave with a half-finished write.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use letsplay_core::{AppError, Page};
use letsplay_models::{
    NewProduct, NewUser, Product, ProductFilter, User, UserCredentials, UserUpdate,
};

use crate::{DUPLICATE_EMAIL, DUPLICATE_USERNAME, MISSING_OWNER, Store};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserCredentials>,
    products: HashMap<Uuid, Product>,
}

impl Inner {
    /// Rejects a username or email already held by another user.
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<Uuid>,
    ) -> Result<(), AppError> {
        for existing in self.users.values() {
            if Some(existing.user.id) == except {
                continue;
            }
            if email.is_some_and(|e| e == existing.user.email) {
                return Err(AppError::conflict(DUPLICATE_EMAIL));
            }
            if username.is_some_and(|u| u == existing.user.username) {
                return Err(AppError::conflict(DUPLICATE_USERNAME));
            }
        }
        Ok(())
    }
}

/// Newest first, ties broken by id so paging is stable.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| {
        let (a_created, a_id) = key(a);
        let (b_created, b_id) = key(b);
        b_created.cmp(&a_created).then(a_id.cmp(&b_id))
    });
}

fn paginate<T>(items: Vec<T>, limit: i64, offset: i64) -> Page<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect();
    Page::new(items, total)
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        inner.check_unique(Some(&user.username), Some(&user.email), None)?;

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(
            created.id,
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).map(|c| c.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Page<User>, AppError> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().map(|c| c.user.clone()).collect();
        newest_first(&mut users, |u| (u.created_at, u.id));
        Ok(paginate(users, limit, offset))
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Ok(None);
        }
        inner.check_unique(update.username.as_deref(), update.email.as_deref(), Some(id))?;

        let Some(stored) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = update.username {
            stored.user.username = username;
        }
        if let Some(email) = update.email {
            stored.user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            stored.password_hash = password_hash;
        }
        if let Some(role) = update.role {
            stored.user.role = role;
        }
        stored.user.updated_at = Utc::now();
        Ok(Some(stored.user.clone()))
    }

    async fn delete_user_cascade(&self, id: Uuid) -> Result<Option<u64>, AppError> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Ok(None);
        }
        let before = inner.products.len();
        inner.products.retain(|_, p| p.owner_id != id);
        Ok(Some((before - inner.products.len()) as u64))
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&product.owner_id) {
            return Err(AppError::not_found(MISSING_OWNER));
        }

        let now = Utc::now();
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            stock: product.stock,
            owner_id: product.owner_id,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.products.get(&id).cloned())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|c| p.category.as_ref() == Some(c))
            })
            .filter(|p| filter.owner_id.is_none_or(|owner| p.owner_id == owner))
            .cloned()
            .collect();
        newest_first(&mut products, |p| (p.created_at, p.id));
        Ok(paginate(products, filter.limit, filter.offset))
    }

    async fn update_product(&self, product: &Product) -> Result<Option<Product>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.products.get_mut(&product.id) else {
            return Ok(None);
        };
        stored.name = product.name.clone();
        stored.description = product.description.clone();
        stored.price = product.price;
        stored.category = product.category.clone();
        stored.stock = product.stock;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.products.remove(&id).is_some())
    }

    async fn count_products_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| p.owner_id == owner_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letsplay_models::Role;

    fn assert_status(err: AppError, expected: u16) {
        assert_eq!(err.status.as_u16(), expected, "{err}");
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$hash".to_string(),
            role: Role::User,
        }
    }

    fn new_product(owner_id: Uuid, name: &str, category: Option<&str>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price: 10.0,
            category: category.map(str::to_string),
            stock: 1,
            owner_id,
        }
    }

    fn filter(category: Option<&str>, owner_id: Option<Uuid>) -> ProductFilter {
        ProductFilter {
            category: category.map(str::to_string),
            owner_id,
            limit: 20,
            offset: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("alice", "alice@example.com")).await.unwrap();

        let found = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(found, user);

        let creds = store
            .find_credentials_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.user.id, user.id);
        assert_eq!(creds.password_hash, "$2b$10$hash");
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username_conflict() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .insert_user(new_user("alice2", "alice@example.com"))
            .await
            .unwrap_err();
        assert_status(err, 409);

        let err = store
            .insert_user(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert_status(err, 409);
    }

    #[tokio::test]
    async fn test_update_user_checks_uniqueness_against_others_only() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@example.com")).await.unwrap();
        store.insert_user(new_user("bob", "bob@example.com")).await.unwrap();

        // Re-submitting your own email is not a conflict.
        let update = UserUpdate {
            email: Some("alice@example.com".to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        };
        let updated = store.update_user(alice.id, update).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Admin);

        let update = UserUpdate {
            username: Some("bob".to_string()),
            ..Default::default()
        };
        assert_status(store.update_user(alice.id, update).await.unwrap_err(), 409);

        let missing = store
            .update_user(Uuid::new_v4(), UserUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_products() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@example.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "bob@example.com")).await.unwrap();

        for i in 0..3 {
            store
                .insert_product(new_product(alice.id, &format!("p{i}"), None))
                .await
                .unwrap();
        }
        store.insert_product(new_product(bob.id, "keep", None)).await.unwrap();

        assert_eq!(store.delete_user_cascade(alice.id).await.unwrap(), Some(3));
        assert_eq!(store.count_products_by_owner(alice.id).await.unwrap(), 0);
        assert_eq!(store.count_products_by_owner(bob.id).await.unwrap(), 1);
        assert!(store.find_user(alice.id).await.unwrap().is_none());

        assert_eq!(store.delete_user_cascade(alice.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_product_requires_existing_owner() {
        let store = MemoryStore::new();
        let err = store
            .insert_product(new_product(Uuid::new_v4(), "orphan", None))
            .await
            .unwrap_err();
        assert_status(err, 404);
    }

    #[tokio::test]
    async fn test_list_products_filters_and_paginates() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@example.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "bob@example.com")).await.unwrap();

        for i in 0..5 {
            store
                .insert_product(new_product(alice.id, &format!("game{i}"), Some("games")))
                .await
                .unwrap();
        }
        store
            .insert_product(new_product(bob.id, "pad", Some("controllers")))
            .await
            .unwrap();

        let all = store.list_products(&filter(None, None)).await.unwrap();
        assert_eq!(all.total, 6);
        assert_eq!(all.items.len(), 6);

        let games = store.list_products(&filter(Some("games"), None)).await.unwrap();
        assert_eq!(games.total, 5);

        let bobs = store.list_products(&filter(None, Some(bob.id))).await.unwrap();
        assert_eq!(bobs.total, 1);
        assert_eq!(bobs.items[0].name, "pad");

        let page = store
            .list_products(&ProductFilter {
                limit: 2,
                offset: 4,
                ..filter(None, None)
            })
            .await
            .unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@example.com")).await.unwrap();
        let mut product = store
            .insert_product(new_product(alice.id, "pad", None))
            .await
            .unwrap();

        product.price = 42.0;
        let updated = store.update_product(&product).await.unwrap().unwrap();
        assert_eq!(updated.price, 42.0);
        assert_eq!(updated.owner_id, alice.id);
        assert!(updated.updated_at >= updated.created_at);

        assert!(store.delete_product(product.id).await.unwrap());
        assert!(!store.delete_product(product.id).await.unwrap());
        assert!(store.update_product(&product).await.unwrap().is_none());
    }
}
