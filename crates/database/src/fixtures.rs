//! Sample rows for local development and the integration tests.

use crate::{DbError, ProductRepository};
use core_types::Product;
use rust_decimal_macros::dec;
use sqlx::PgPool;

/// Table definition matching what [`crate::PgProductRepository`] expects.
pub const CREATE_PRODUCT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS product (
        id       BIGSERIAL PRIMARY KEY,
        name     TEXT      NOT NULL,
        price    NUMERIC   NOT NULL,
        discount NUMERIC   NOT NULL,
        store    TEXT      NOT NULL
    )
"#;

const INSERT_SEED_PRODUCTS: &str = r#"
    INSERT INTO product (name, price, discount, store)
    VALUES ('AirFryer', 3000.0, 22.0, 'ABC TECH'),
           ('Ütü', 1500.0, 10.0, 'ABC TECH'),
           ('Çamaşır Makinesi', 10000.0, 15.0, 'ABC TECH'),
           ('Lambader', 2000.0, 0.0, 'Dekorasyon Sarayı')
"#;

/// The four seed products, ids unset, in insertion order.
pub fn seed_products() -> Vec<Product> {
    let product = |name: &str, price, discount, store: &str| Product {
        id: 0,
        name: name.to_string(),
        price,
        discount,
        store: store.to_string(),
    };
    vec![
        product("AirFryer", dec!(3000), dec!(22), "ABC TECH"),
        product("Ütü", dec!(1500), dec!(10), "ABC TECH"),
        product("Çamaşır Makinesi", dec!(10000), dec!(15), "ABC TECH"),
        product("Lambader", dec!(2000), dec!(0), "Dekorasyon Sarayı"),
    ]
}

pub async fn create_table(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(CREATE_PRODUCT_TABLE)
        .execute(pool)
        .await
        .map_err(|e| DbError::query("Failed to create product table", e))?;
    Ok(())
}

/// Inserts the seed products in one statement.
pub async fn seed(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query(INSERT_SEED_PRODUCTS)
        .execute(pool)
        .await
        .map_err(|e| DbError::query("Failed to insert seed products", e))?;
    tracing::info!(rows_affected = result.rows_affected(), "Seed products created.");
    Ok(result.rows_affected())
}

/// Empties the table and resets the id sequence.
pub async fn clear(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("TRUNCATE product RESTART IDENTITY")
        .execute(pool)
        .await
        .map_err(|e| DbError::query("Failed to truncate product table", e))?;
    tracing::info!("Product table truncated.");
    Ok(())
}

/// Seeds any repository through its public API.
pub async fn seed_repository(repository: &dyn ProductRepository) -> Result<(), DbError> {
    for product in seed_products() {
        repository.add_product(product).await?;
    }
    Ok(())
}
