//! # Let's Play DB
//!
//! The persistence layer. Services talk to a [`Store`] trait object; two
//! implementations exist:
//!
//! - [`PgStore`]: PostgreSQL through a sqlx pool, schema managed by the
//!   embedded migrations in `migrations/`
//! - [`MemoryStore`]: a process-local store for tests and local runs
//!
//! Both enforce unique usernames and emails (reported as 409 Conflict) and
//! delete a user's products together with the user.
//!
//! # Example
//!
//! ```ignore
//! use letsplay_config::StoreConfig;
//! use letsplay_db::{init_store, SharedStore};
//!
//! let store: SharedStore = init_store(&StoreConfig::from_env()).await?;
//! let page = store.list_users(20, 0).await?;
//! ```

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use letsplay_config::{StoreBackend, StoreConfig};
use letsplay_core::{AppError, Page};
use letsplay_models::{
    NewProduct, NewUser, Product, ProductFilter, User, UserCredentials, UserUpdate,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlx::PgPool;

pub const DUPLICATE_EMAIL: &str = "Email already exists";
pub const DUPLICATE_USERNAME: &str = "Username already exists";
pub const MISSING_OWNER: &str = "Owner account no longer exists";

/// Persistence operations used by the services.
///
/// `Send + Sync` so the store can live in axum state as `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    // --- Users ---
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError>;
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Page<User>, AppError>;
    /// Applies the present fields. `None` when the user does not exist.
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, AppError>;
    /// Deletes the user and every product it owns as one operation.
    /// Returns the number of products removed, or `None` when the user does
    /// not exist.
    async fn delete_user_cascade(&self, id: Uuid) -> Result<Option<u64>, AppError>;

    // --- Products ---
    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError>;
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn list_products(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError>;
    /// Persists the mutable fields of `product` and bumps `updated_at`.
    async fn update_product(&self, product: &Product) -> Result<Option<Product>, AppError>;
    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError>;
    async fn count_products_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError>;
}

pub type SharedStore = Arc<dyn Store>;

/// Opens a PostgreSQL pool.
pub async fn init_db_pool(config: &StoreConfig) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the postgres store")?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Builds the store selected by `STORE_BACKEND`.
pub async fn init_store(config: &StoreConfig) -> anyhow::Result<SharedStore> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = init_db_pool(config).await?;
            if config.run_migrations {
                run_migrations(&pool).await?;
                tracing::info!("Database migrations applied");
            }
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// Commands that write durable data refuse to run against the memory store.
pub fn require_postgres(config: &StoreConfig) -> anyhow::Result<()> {
    if config.backend != StoreBackend::Postgres {
        bail!("this command needs STORE_BACKEND=postgres");
    }
    Ok(())
}
