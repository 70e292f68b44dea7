use crate::DbError;
use async_trait::async_trait;
use core_types::{Product, ProductId};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// The data-access capability the service layer is built on.
///
/// Implementations must keep insertion order for the list operations and treat
/// every call as an individual, auto-committed unit of work.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every stored product, in insertion order.
    async fn try_get_all_products(&self) -> Result<Vec<Product>, DbError>;

    /// Products whose `store` equals `store` exactly.
    async fn try_get_all_products_by_store(&self, store: &str) -> Result<Vec<Product>, DbError>;

    /// Inserts a new row. The store assigns the id; `product.id` is ignored.
    async fn add_product(&self, product: Product) -> Result<(), DbError>;

    async fn get_product_by_id(&self, product_id: ProductId) -> Result<Product, DbError>;

    /// Removes the row, failing with [`DbError::NotFound`] when it does not exist.
    ///
    /// The existence check and the delete are separate statements, so two concurrent
    /// deletes of the same id can both pass the check.
    async fn delete_product_by_id(&self, product_id: ProductId) -> Result<(), DbError>;

    /// Sets the price of `product_id`. An unknown id affects no rows and still succeeds.
    async fn update_product_price(
        &self,
        product_id: ProductId,
        new_price: Decimal,
    ) -> Result<(), DbError>;

    /// Like [`try_get_all_products`](Self::try_get_all_products), but a failed read is
    /// logged and reported as an empty list.
    async fn get_all_products(&self) -> Vec<Product> {
        self.try_get_all_products().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error while getting products.");
            Vec::new()
        })
    }

    /// Store-filtered read with the same log-and-default policy. An empty `store`
    /// applies no filter.
    async fn get_all_products_by_store(&self, store: &str) -> Vec<Product> {
        if store.is_empty() {
            return self.get_all_products().await;
        }
        self.try_get_all_products_by_store(store)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, store, "Failed to get products by store name.");
                Vec::new()
            })
    }
}

/// The PostgreSQL-backed [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Creates a new repository over a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a `SELECT *` row positionally onto `(id, name, price, discount, store)`.
fn product_from_row(row: &PgRow) -> Result<Product, DbError> {
    Ok(Product {
        id: row.try_get(0).map_err(DbError::RowMapping)?,
        name: row.try_get(1).map_err(DbError::RowMapping)?,
        price: row.try_get(2).map_err(DbError::RowMapping)?,
        discount: row.try_get(3).map_err(DbError::RowMapping)?,
        store: row.try_get(4).map_err(DbError::RowMapping)?,
    })
}

fn products_from_rows(rows: &[PgRow]) -> Result<Vec<Product>, DbError> {
    rows.iter().map(product_from_row).collect()
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn try_get_all_products(&self) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query("SELECT * FROM product")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbError::query("Error while getting products", e))?;
        products_from_rows(&rows)
    }

    async fn try_get_all_products_by_store(&self, store: &str) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query("SELECT * FROM product WHERE store = $1")
            .bind(store)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DbError::query(format!("Error while getting products of store {store}"), e)
            })?;
        products_from_rows(&rows)
    }

    async fn add_product(&self, product: Product) -> Result<(), DbError> {
        let result = sqlx::query(
            "INSERT INTO product (name, price, discount, store) VALUES ($1, $2, $3, $4)",
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.discount)
        .bind(&product.store)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, name = %product.name, "Failed to add new product.");
            DbError::query(format!("Failed to add new product: {e}"), e)
        })?;

        tracing::info!(
            rows_affected = result.rows_affected(),
            name = %product.name,
            "Product added to database."
        );
        Ok(())
    }

    async fn get_product_by_id(&self, product_id: ProductId) -> Result<Product, DbError> {
        let row = sqlx::query("SELECT * FROM product WHERE id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => DbError::NotFound(product_id),
                e => DbError::query(format!("Error while getting product with id {product_id}"), e),
            })?;
        product_from_row(&row)
    }

    async fn delete_product_by_id(&self, product_id: ProductId) -> Result<(), DbError> {
        self.get_product_by_id(product_id).await?;

        sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbError::query(format!("Error while deleting product with id {product_id}"), e)
            })?;

        tracing::info!(product_id, "Product deleted.");
        Ok(())
    }

    async fn update_product_price(
        &self,
        product_id: ProductId,
        new_price: Decimal,
    ) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE product SET price = $1 WHERE id = $2")
            .bind(new_price)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbError::query(format!("Error while updating product with id {product_id}"), e)
            })?;

        tracing::info!(
            product_id,
            %new_price,
            rows_affected = result.rows_affected(),
            "Product price updated."
        );
        Ok(())
    }
}
