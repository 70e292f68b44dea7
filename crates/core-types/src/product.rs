use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Server-assigned product identifier.
pub type ProductId = i64;

/// The highest discount percentage a product may be created with.
pub const MAX_DISCOUNT: Decimal = dec!(70);

/// A product as it is stored in the `product` table.
///
/// `id` is `0` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    /// Percentage in `0..=70`, checked on creation only.
    pub discount: Decimal,
    pub store: String,
}

/// The input needed to create a new product. Carries no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub store: String,
}

impl ProductCreate {
    /// Checks the business rules that apply when a product is created.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.discount > MAX_DISCOUNT {
            return Err(CoreError::Validation("discount exceeds 70".to_string()));
        }
        Ok(())
    }

    /// Builds the entity to persist. The id is left unset for the store to assign.
    pub fn into_product(self) -> Product {
        Product {
            id: 0,
            name: self.name,
            price: self.price,
            discount: self.discount,
            store: self.store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(discount: Decimal) -> ProductCreate {
        ProductCreate {
            name: "Ütü".to_string(),
            price: dec!(2000),
            discount,
            store: "ABC TECH".to_string(),
        }
    }

    #[test]
    fn discount_at_ceiling_is_accepted() {
        assert!(create(dec!(70)).validate().is_ok());
        assert!(create(dec!(0)).validate().is_ok());
    }

    #[test]
    fn discount_above_ceiling_is_rejected() {
        let err = create(dec!(70.01)).validate().unwrap_err();
        assert_eq!(err, CoreError::Validation("discount exceeds 70".to_string()));
    }

    #[test]
    fn into_product_leaves_id_unset() {
        let product = create(dec!(50)).into_product();
        assert_eq!(product.id, 0);
        assert_eq!(product.name, "Ütü");
        assert_eq!(product.discount, dec!(50));
    }

    #[test]
    fn prices_serialize_as_json_numbers() {
        let json = serde_json::to_value(create(dec!(10)).into_product()).unwrap();
        assert!(json["price"].is_number());
        assert!(json["discount"].is_number());

        let parsed: ProductCreate =
            serde_json::from_str(r#"{"name":"Lambader","price":2000,"discount":0,"store":"Dekorasyon Sarayı"}"#)
                .unwrap();
        assert_eq!(parsed.price, dec!(2000));
    }
}
