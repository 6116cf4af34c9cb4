//! # Sales Routes
//!
//! Thin HTTP wrappers over [`ims_db::Ledger`].
//!
//! ## Sell / Refund Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/sell-product-variation                                       │
//! │  { "productVariationId": "…", "quantity": 3 }                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger.record_sale(variation, 3, acting user)                          │
//! │       │                                                                 │
//! │       ├── Ok  ──► 201 + SaleRecord                                      │
//! │       └── Err ──► 400 / 403 / 409 / 500 (see error.rs)                  │
//! │                                                                         │
//! │  POST /api/refund-product-variation (same body)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger.record_refund(...) ──► 201 + RefundOutcome  |  422 too many     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use ims_core::validation::validate_uuid;
use ims_core::SaleRecord;
use ims_db::{RefundOutcome, SalesReport};
use serde::Deserialize;

use crate::auth::ActingUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of the sell and refund endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub product_variation_id: String,
    pub quantity: i64,
}

pub async fn sell(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Json(body): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<SaleRecord>), ApiError> {
    validate_uuid("productVariationId", &body.product_variation_id)?;

    let record = state
        .ledger
        .record_sale(&body.product_variation_id, body.quantity, user.id())
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn refund(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Json(body): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<RefundOutcome>), ApiError> {
    validate_uuid("productVariationId", &body.product_variation_id)?;

    let outcome = state
        .ledger
        .record_refund(&body.product_variation_id, body.quantity, user.id())
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn report(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
) -> Result<Json<SalesReport>, ApiError> {
    Ok(Json(state.ledger.sales_report(user.id()).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
) -> Result<Json<Vec<SaleRecord>>, ApiError> {
    Ok(Json(state.ledger.list_sales_for_user(user.id()).await?))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<Json<SaleRecord>, ApiError> {
    Ok(Json(state.ledger.get_sale(&id, user.id()).await?))
}

/// Administrative delete. Stock is left as is.
pub async fn delete_sale(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.ledger.delete_sale(&id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
