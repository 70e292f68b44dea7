use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::{Product, ProductCreate, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Body of `POST /api/v1/products/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub store: String,
}

impl AddProductRequest {
    pub fn to_model(&self) -> ProductCreate {
        ProductCreate {
            name: self.name.clone(),
            price: self.price,
            discount: self.discount,
            store: self.store.clone(),
        }
    }
}

/// A product as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub store: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            discount: product.discount,
            store: product.store,
        }
    }
}

fn to_response_list(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

/// Raw query pairs in request order. Repeated keys are allowed; the first one wins.
pub type QueryPairs = Vec<(String, String)>;

fn first_param<'a>(pairs: &'a QueryPairs, key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// Parses a plain or scientific decimal. Digit separators are not accepted.
fn parse_price(raw: &str) -> Result<Decimal, AppError> {
    let invalid = || AppError::Bind("newPrice format is invalid".to_string());
    if raw.contains('_') {
        return Err(invalid());
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| invalid())
}

fn parse_product_id(raw: &str) -> Result<ProductId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Bind(format!("Invalid product id: {raw}")))
}

/// # GET /api/v1/products/:id/
pub async fn product_by_id(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductResponse>, AppError> {
    let product_id = parse_product_id(&id)?;
    let product = state.product_service.product_by_id(product_id).await?;
    Ok(Json(product.into()))
}

/// # GET /api/v1/products/?store=
/// A missing or empty `store` lists every product.
pub async fn all_products(
    Query(query): Query<QueryPairs>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ProductResponse>> {
    let products = match first_param(&query, "store") {
        None | Some("") => state.product_service.all_products().await,
        Some(store) => state.product_service.products_by_store(store).await,
    };
    Json(to_response_list(products))
}

/// # POST /api/v1/products/
/// Answers with the request payload, so the response carries no id.
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Bind(rejection.body_text()))?;

    state.product_service.add(request.to_model()).await?;
    Ok((StatusCode::CREATED, Json(request.to_model())).into_response())
}

/// # PUT /api/v1/products/:id/?newPrice=
pub async fn update_product_price(
    Path(id): Path<String>,
    Query(query): Query<QueryPairs>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    let product_id = parse_product_id(&id)?;

    let raw_price = match first_param(&query, "newPrice") {
        None | Some("") => {
            return Err(AppError::Bind("Parameter newPrice is required!".to_string()));
        }
        Some(raw) => raw,
    };
    let new_price = parse_price(raw_price)?;

    let service = &state.product_service;
    if let Err(e) = service.update_product_price(product_id, new_price).await {
        if service.strict_price_update() {
            return Err(e.into());
        }
        tracing::warn!(error = %e, product_id, "Price update failed; not reported to caller.");
    }
    Ok(StatusCode::OK)
}

/// # DELETE /api/v1/products/:id/
pub async fn delete_by_id(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    let product_id = parse_product_id(&id)?;
    state.product_service.delete_by_id(product_id).await?;
    Ok(StatusCode::OK)
}
