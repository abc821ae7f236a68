//! # Product Repository
//!
//! Catalog rows. The `sizes` column holds encoded text; it is parsed into a
//! [`SizeSet`] here so nothing above this layer sees the raw encoding.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use shoebox_core::{Product, SizeSet};

/// Raw `products` row before size parsing.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    sizes: String,
    price_cents: i64,
    cost_cents: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let sizes = SizeSet::parse(&row.sizes).map_err(|e| {
            warn!(product_id = %row.id, error = %e, "Stored size list does not parse");
            DbError::invalid_data("product sizes", format!("{}: {}", row.id, e))
        })?;

        Ok(Product {
            id: row.id,
            name: row.name,
            sizes,
            price_cents: row.price_cents,
            cost_cents: row.cost_cents,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for catalog products.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product; sizes are stored in their canonical JSON form.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sizes, price_cents, cost_cents,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.sizes.encode())
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    /// * `Err(InvalidData)` - Stored size list is corrupt
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, sizes, price_cents, cost_cents,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Number of catalog rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Stores size text exactly as given, bypassing canonical encoding.
    ///
    /// Catalog imports arrive with comma separated or numeric lists; this
    /// keeps them verbatim and leaves parsing to the read path.
    pub async fn set_raw_sizes(&self, id: &str, encoded: &str) -> DbResult<bool> {
        let result = sqlx::query("UPDATE products SET sizes = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(encoded)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
