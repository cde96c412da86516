mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::Product;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("a product with id {0} already exists")]
    DuplicateId(String),
}

/// The product collection. Every method is a single store operation.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in insertion order.
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn find(&self, id: &str) -> StoreResult<Option<Product>>;

    async fn insert(&self, product: &Product) -> StoreResult<()>;

    async fn insert_many(&self, products: &[Product]) -> StoreResult<()>;

    /// Removes at most one product; returns whether one was removed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;

    /// Distinct category values, sorted ascending.
    async fn categories(&self) -> StoreResult<Vec<String>>;
}

// ── PostgreSQL ────────────────────────────────────────────────────────────────

/// Products live in a single `products` table. The `seq` column records
/// insertion order and is never selected into a [`Product`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image, description, category, created_at
             FROM products ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Product>> {
        // TEXT cannot hold NUL, so no stored product can match.
        if id.contains('\0') {
            return Ok(None);
        }

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image, description, category, created_at
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn insert(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, image, description, category, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_many(&self, products: &[Product]) -> StoreResult<()> {
        if products.is_empty() {
            return Ok(());
        }

        let mut ids: Vec<String> = Vec::with_capacity(products.len());
        let mut names: Vec<String> = Vec::with_capacity(products.len());
        let mut prices: Vec<f64> = Vec::with_capacity(products.len());
        let mut images: Vec<String> = Vec::with_capacity(products.len());
        let mut descriptions: Vec<String> = Vec::with_capacity(products.len());
        let mut categories: Vec<String> = Vec::with_capacity(products.len());
        let mut created: Vec<DateTime<Utc>> = Vec::with_capacity(products.len());

        for p in products {
            ids.push(p.id.clone());
            names.push(p.name.clone());
            prices.push(p.price);
            images.push(p.image.clone());
            descriptions.push(p.description.clone());
            categories.push(p.category.clone());
            created.push(p.created_at);
        }

        // Single statement; WITH ORDINALITY keeps `seq` in slice order.
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, image, description, category, created_at)
            SELECT id, name, price, image, description, category, created_at
            FROM UNNEST($1::text[], $2::text[], $3::float8[], $4::text[], $5::text[], $6::text[], $7::timestamptz[])
                 WITH ORDINALITY AS t(id, name, price, image, description, category, created_at, ord)
            ORDER BY ord
            "#,
        )
        .bind(&ids)
        .bind(&names)
        .bind(&prices)
        .bind(&images)
        .bind(&descriptions)
        .bind(&categories)
        .bind(&created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        if id.contains('\0') {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category COLLATE \"C\" AS category FROM products ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}
