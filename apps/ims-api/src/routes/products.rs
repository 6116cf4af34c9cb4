//! # Product Routes
//!
//! Product catalog: create with variations, list, fetch, edit, soft delete,
//! restock and per-product stock totals.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use ims_core::validation::{
    validate_new_product, validate_product_update, validate_quantity, validate_stock_quantity,
    validate_uuid,
};
use ims_core::{
    CoreError, NewProduct, NewVariation, Product, ProductStockTotal, ProductUpdate,
    ProductVariation,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::ActingUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /api/products`.
///
/// ```json
/// {
///   "name": "Linen Shirt",
///   "costPriceCents": 1200,
///   "sellingPriceCents": 3900,
///   "imageUrls": "[/img/linen.png]",
///   "variations": [{ "colorId": "…", "sizeId": "…", "quantity": 10 }]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(flatten)]
    pub product: NewProduct,
    #[serde(default)]
    pub variations: Vec<NewVariation>,
}

/// A product with its variations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub primary_image_url: Option<String>,
    pub variations: Vec<ProductVariation>,
}

impl ProductDetail {
    fn new(product: Product, variations: Vec<ProductVariation>) -> Self {
        ProductDetail {
            primary_image_url: product.primary_image_url(),
            product,
            variations,
        }
    }
}

/// Body of `POST /api/variations/:id/restock`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestockRequest {
    pub quantity: i64,
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list_for_owner(user.id().as_str()).await?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDetail>), ApiError> {
    validate_new_product(&body.product)?;
    for variation in &body.variations {
        validate_uuid("colorId", &variation.color_id)?;
        validate_uuid("sizeId", &variation.size_id)?;
        validate_stock_quantity(variation.quantity)?;
    }

    let (product, variations) = state
        .db
        .products()
        .create_with_variations(user.id().as_str(), &body.product, &body.variations)
        .await?;

    info!(
        product_id = %product.id,
        user = %user.id(),
        variations = variations.len(),
        "Product created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ProductDetail::new(product, variations)),
    ))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, ApiError> {
    let owner = user.id().as_str();

    let product = state
        .db
        .products()
        .get_for_owner(&id, owner)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;
    let variations = state.db.variations().list_for_product(&id, owner).await?;

    Ok(Json(ProductDetail::new(product, variations)))
}

/// Partial edit: only the fields present in the body change.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
    Json(changes): Json<ProductUpdate>,
) -> Result<Json<ProductDetail>, ApiError> {
    validate_product_update(&changes)?;
    let owner = user.id().as_str();

    let product = state.db.products().update(&id, owner, &changes).await?;
    let variations = state.db.variations().list_for_product(&id, owner).await?;

    info!(
        product_id = %id,
        user = %user.id(),
        selling_price = product.selling_price_cents,
        cost_price = product.cost_price_cents,
        "Product updated"
    );
    Ok(Json(ProductDetail::new(product, variations)))
}

/// Soft delete. Sales history keeps pointing at the product.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .db
        .products()
        .soft_delete(&id, user.id().as_str())
        .await?;

    info!(product_id = %id, user = %user.id(), "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stock_totals(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
) -> Result<Json<Vec<ProductStockTotal>>, ApiError> {
    let totals = state
        .db
        .variations()
        .stock_totals_by_product(user.id().as_str())
        .await?;
    Ok(Json(totals))
}

pub async fn restock(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
    Json(body): Json<RestockRequest>,
) -> Result<Json<ProductVariation>, ApiError> {
    validate_quantity(body.quantity)?;

    let variation = state
        .db
        .variations()
        .restock(&id, body.quantity, user.id().as_str())
        .await?;

    info!(
        variation_id = %id,
        amount = body.quantity,
        stock = variation.quantity,
        "Variation restocked"
    );
    Ok(Json(variation))
}
