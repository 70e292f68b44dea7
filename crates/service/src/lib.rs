//! Business rules for products, layered over a [`ProductRepository`].
//!
//! Only creation carries a rule (the discount ceiling). Everything else is passed
//! straight to the repository, errors included.

pub mod error;

pub use error::ServiceError;

use core_types::{Product, ProductCreate, ProductId};
use database::ProductRepository;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    strict_price_update: bool,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            repository,
            strict_price_update: false,
        }
    }

    /// When enabled, a price update first resolves the id and fails with not-found
    /// for unknown products.
    pub fn with_strict_price_update(mut self, strict: bool) -> Self {
        self.strict_price_update = strict;
        self
    }

    pub fn strict_price_update(&self) -> bool {
        self.strict_price_update
    }

    /// Validates and stores a new product. Nothing is written when validation fails.
    pub async fn add(&self, product_create: ProductCreate) -> Result<(), ServiceError> {
        if let Err(e) = product_create.validate() {
            tracing::warn!(
                name = %product_create.name,
                discount = %product_create.discount,
                "Rejected product: {e}"
            );
            return Err(e.into());
        }
        self.repository
            .add_product(product_create.into_product())
            .await?;
        Ok(())
    }

    pub async fn all_products(&self) -> Vec<Product> {
        self.repository.get_all_products().await
    }

    pub async fn products_by_store(&self, store: &str) -> Vec<Product> {
        self.repository.get_all_products_by_store(store).await
    }

    pub async fn product_by_id(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        Ok(self.repository.get_product_by_id(product_id).await?)
    }

    pub async fn delete_by_id(&self, product_id: ProductId) -> Result<(), ServiceError> {
        Ok(self.repository.delete_product_by_id(product_id).await?)
    }

    pub async fn update_product_price(
        &self,
        product_id: ProductId,
        new_price: Decimal,
    ) -> Result<(), ServiceError> {
        if self.strict_price_update {
            self.repository.get_product_by_id(product_id).await?;
        }
        Ok(self
            .repository
            .update_product_price(product_id, new_price)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::InMemoryProductRepository;
    use rust_decimal_macros::dec;

    fn initial_products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "AirFryer".to_string(),
                price: dec!(1000),
                discount: dec!(0),
                store: "ABC TECH".to_string(),
            },
            Product {
                id: 2,
                name: "Ütü".to_string(),
                price: dec!(4000),
                discount: dec!(0),
                store: "ABC TECH".to_string(),
            },
        ]
    }

    fn service() -> (Arc<InMemoryProductRepository>, ProductService) {
        let repo = Arc::new(InMemoryProductRepository::with_products(initial_products()));
        let service = ProductService::new(repo.clone());
        (repo, service)
    }

    fn ironing_board(discount: Decimal) -> ProductCreate {
        ProductCreate {
            name: "Ütü".to_string(),
            price: dec!(2000),
            discount,
            store: "ABC TECH".to_string(),
        }
    }

    #[tokio::test]
    async fn should_get_all_products() {
        let (_, service) = service();
        assert_eq!(service.all_products().await.len(), 2);
    }

    #[tokio::test]
    async fn when_no_validation_error_occurred_should_add_product() {
        let (_, service) = service();
        service.add(ironing_board(dec!(50))).await.unwrap();

        let products = service.all_products().await;
        assert_eq!(products.len(), 3);
        assert_eq!(
            products.last(),
            Some(&Product {
                id: 3,
                name: "Ütü".to_string(),
                price: dec!(2000),
                discount: dec!(50),
                store: "ABC TECH".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn when_discount_is_higher_than_70_should_not_add_product() {
        let (repo, service) = service();
        let err = service.add(ironing_board(dec!(75))).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(err.to_string(), "discount exceeds 70");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn discount_of_exactly_70_is_accepted() {
        let (repo, service) = service();
        service.add(ironing_board(dec!(70))).await.unwrap();
        assert_eq!(repo.len().await, 3);
    }

    #[tokio::test]
    async fn not_found_passes_through_unchanged() {
        let (_, service) = service();
        let err = service.product_by_id(42).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Product not found with id 42");

        assert!(service.delete_by_id(42).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn products_by_store_delegates() {
        let (_, service) = service();
        assert_eq!(service.products_by_store("ABC TECH").await.len(), 2);
        assert!(service.products_by_store("Dekorasyon Sarayı").await.is_empty());
        assert_eq!(service.products_by_store("").await.len(), 2);
    }

    #[tokio::test]
    async fn lenient_price_update_accepts_unknown_id() {
        let (_, service) = service();
        service.update_product_price(42, dec!(10)).await.unwrap();
        service.update_product_price(1, dec!(10)).await.unwrap();
        assert_eq!(service.product_by_id(1).await.unwrap().price, dec!(10));
    }

    #[tokio::test]
    async fn strict_price_update_rejects_unknown_id() {
        let (_, service) = service();
        let service = service.with_strict_price_update(true);

        assert!(service
            .update_product_price(42, dec!(10))
            .await
            .unwrap_err()
            .is_not_found());
        service.update_product_price(2, dec!(3500)).await.unwrap();
        assert_eq!(service.product_by_id(2).await.unwrap().price, dec!(3500));
    }
}
