//! PostgreSQL implementation of [`Store`].

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use letsplay_core::{AppError, Page};
use letsplay_models::{
    NewProduct, NewUser, Product, ProductFilter, User, UserCredentials, UserUpdate,
};

use crate::{DUPLICATE_EMAIL, DUPLICATE_USERNAME, MISSING_OWNER, Store};

const USER_COLUMNS: &str = "id, username, email, role, created_at, updated_at";
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, stock, owner_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translates constraint violations into client errors; everything else is
/// an internal error.
fn map_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => AppError::conflict(DUPLICATE_USERNAME),
                _ => AppError::conflict(DUPLICATE_EMAIL),
            };
        }
        if db_err.is_foreign_key_violation() {
            return AppError::not_found(MISSING_OWNER);
        }
    }
    AppError::internal(err)
}

fn push_product_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(category) = &filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category.clone());
    }
    if let Some(owner_id) = filter.owner_id {
        builder.push(" AND owner_id = ");
        builder.push_bind(owner_id);
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip_all, fields(db.operation = "insert_user", user.email = %user.email))]
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(db.operation = "find_user"))]
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip_all, fields(db.operation = "find_credentials_by_email"))]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
        sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(db.operation = "list_users"))]
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Page<User>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(users, total))
    }

    #[instrument(skip(self, update), fields(db.operation = "update_user"))]
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(username) = update.username {
            builder.push(", username = ");
            builder.push_bind(username);
        }
        if let Some(email) = update.email {
            builder.push(", email = ");
            builder.push_bind(email);
        }
        if let Some(password_hash) = update.password_hash {
            builder.push(", password_hash = ");
            builder.push_bind(password_hash);
        }
        if let Some(role) = update.role {
            builder.push(", role = ");
            builder.push_bind(role.as_str());
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(USER_COLUMNS);

        builder
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(db.operation = "delete_user_cascade"))]
    async fn delete_user_cascade(&self, id: Uuid) -> Result<Option<u64>, AppError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let products = sqlx::query("DELETE FROM products WHERE owner_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let users = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        if users == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(None);
        }

        tx.commit().await.map_err(map_db_error)?;
        tracing::debug!(user.id = %id, products.deleted = products, "User deleted");
        Ok(Some(products))
    }

    #[instrument(skip_all, fields(db.operation = "insert_product", product.owner_id = %product.owner_id))]
    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO products \
             (id, name, description, price, category, stock, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.stock)
            .bind(product.owner_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(db.operation = "find_product"))]
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(db.operation = "list_products"))]
    async fn list_products(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError> {
        let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_product_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut select: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        select.push(PRODUCT_COLUMNS);
        select.push(" FROM products");
        push_product_filters(&mut select, filter);
        select.push(" ORDER BY created_at DESC, id LIMIT ");
        select.push_bind(filter.limit);
        select.push(" OFFSET ");
        select.push_bind(filter.offset);

        let products = select
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(products, total))
    }

    #[instrument(skip_all, fields(db.operation = "update_product", product.id = %product.id))]
    async fn update_product(&self, product: &Product) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, price = $4, category = $5, \
             stock = $6, updated_at = $7 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.stock)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(db.operation = "delete_product"))]
    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(db.operation = "count_products_by_owner"))]
    async fn count_products_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
