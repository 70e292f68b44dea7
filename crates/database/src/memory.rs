use crate::{DbError, ProductRepository};
use async_trait::async_trait;
use core_types::{Product, ProductId};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// A process-local [`ProductRepository`] with the same observable semantics as the
/// PostgreSQL one: ids start at 1 and are never reused, lists keep insertion order.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    state: RwLock<State>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[derive(Debug)]
struct State {
    products: Vec<Product>,
    next_id: ProductId,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    /// Starts from existing rows, kept as given. New ids continue after the largest one.
    pub fn with_products(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            state: RwLock::new(State { products, next_id }),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every list read fail until switched off again.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every insert, delete and price update fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_reads(&self) -> Result<(), DbError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("reads are disabled".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), DbError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn try_get_all_products(&self) -> Result<Vec<Product>, DbError> {
        self.check_reads()?;
        Ok(self.state.read().await.products.clone())
    }

    async fn try_get_all_products_by_store(&self, store: &str) -> Result<Vec<Product>, DbError> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|p| p.store == store)
            .cloned()
            .collect())
    }

    async fn add_product(&self, product: Product) -> Result<(), DbError> {
        self.check_writes()?;
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;
        state.products.push(Product { id, ..product });
        tracing::info!(product_id = id, "Product added to memory store.");
        Ok(())
    }

    async fn get_product_by_id(&self, product_id: ProductId) -> Result<Product, DbError> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or(DbError::NotFound(product_id))
    }

    async fn delete_product_by_id(&self, product_id: ProductId) -> Result<(), DbError> {
        self.check_writes()?;
        let mut state = self.state.write().await;
        let index = state
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or(DbError::NotFound(product_id))?;
        state.products.remove(index);
        Ok(())
    }

    async fn update_product_price(
        &self,
        product_id: ProductId,
        new_price: Decimal,
    ) -> Result<(), DbError> {
        self.check_writes()?;
        let mut state = self.state.write().await;
        if let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) {
            product.price = new_price;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::seed_products;
    use rust_decimal_macros::dec;

    async fn seeded() -> InMemoryProductRepository {
        let repo = InMemoryProductRepository::new();
        for product in seed_products() {
            repo.add_product(product).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn add_assigns_sequential_ids_in_insertion_order() {
        let repo = seeded().await;
        let all = repo.get_all_products().await;
        let ids: Vec<_> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(all[0].name, "AirFryer");
        assert_eq!(all[3].name, "Lambader");
    }

    #[tokio::test]
    async fn store_filter_matches_exactly() {
        let repo = seeded().await;
        let abc = repo.get_all_products_by_store("ABC TECH").await;
        assert_eq!(abc.len(), 3);
        assert!(abc.iter().all(|p| p.store == "ABC TECH"));
        assert!(repo.get_all_products_by_store("abc tech").await.is_empty());
    }

    #[tokio::test]
    async fn empty_store_means_no_filter() {
        let repo = seeded().await;
        assert_eq!(
            repo.get_all_products_by_store("").await,
            repo.get_all_products().await
        );
    }

    #[tokio::test]
    async fn failed_reads_degrade_to_empty() {
        let repo = seeded().await;
        repo.set_fail_reads(true);
        assert!(repo.get_all_products().await.is_empty());
        assert!(repo.get_all_products_by_store("ABC TECH").await.is_empty());
        assert!(matches!(
            repo.try_get_all_products().await,
            Err(DbError::Unavailable(_))
        ));
        repo.set_fail_reads(false);
        assert_eq!(repo.get_all_products().await.len(), 4);
    }

    #[tokio::test]
    async fn failed_writes_leave_the_store_untouched() {
        let repo = seeded().await;
        repo.set_fail_writes(true);

        let err = repo.add_product(seed_products().remove(0)).await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable(_)));
        assert!(repo.delete_product_by_id(1).await.is_err());
        assert!(repo.update_product_price(1, dec!(1)).await.is_err());
        assert_eq!(repo.len().await, 4);
        assert_eq!(repo.get_product_by_id(1).await.unwrap().price, dec!(3000));

        repo.set_fail_writes(false);
        repo.add_product(seed_products().remove(0)).await.unwrap();
        assert_eq!(repo.get_product_by_id(5).await.unwrap().name, "AirFryer");
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let repo = seeded().await;
        repo.delete_product_by_id(2).await.unwrap();
        let ids: Vec<_> = repo.get_all_products().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(repo.delete_product_by_id(2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = seeded().await;
        repo.delete_product_by_id(4).await.unwrap();
        repo.add_product(seed_products().remove(0)).await.unwrap();
        assert_eq!(repo.get_product_by_id(5).await.unwrap().name, "AirFryer");
    }

    #[tokio::test]
    async fn price_update_changes_only_price_and_ignores_unknown_ids() {
        let repo = seeded().await;
        let before = repo.get_product_by_id(1).await.unwrap();

        repo.update_product_price(1, dec!(2500)).await.unwrap();
        repo.update_product_price(1, dec!(2500)).await.unwrap();
        let after = repo.get_product_by_id(1).await.unwrap();
        assert_eq!(after, Product { price: dec!(2500), ..before });

        repo.update_product_price(99, dec!(1)).await.unwrap();
        assert_eq!(repo.len().await, 4);
    }
}
