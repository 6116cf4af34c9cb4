//! Route table.
//!
//! ```text
//! GET    /health                              public
//! ─────────────────────────────────────────── bearer token required below
//! POST   /api/sell-product-variation
//! POST   /api/refund-product-variation
//! GET    /api/sales-report
//! GET    /api/sales
//! GET    /api/sales/:id          DELETE /api/sales/:id
//! GET    /api/products           POST   /api/products
//! GET    /api/products/stock-totals
//! GET    /api/products/:id       PUT /api/products/:id    DELETE /api/products/:id
//! POST   /api/variations/:id/restock
//! GET    /api/colors             POST   /api/colors
//! GET    /api/colors/:id         PUT /api/colors/:id      DELETE /api/colors/:id
//! GET    /api/sizes              POST   /api/sizes
//! GET    /api/sizes/:id          PUT /api/sizes/:id       DELETE /api/sizes/:id
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod catalog;
pub mod products;
pub mod sales;
pub mod system;

/// Router for all authenticated (user-scoped) endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sell-product-variation", post(sales::sell))
        .route("/refund-product-variation", post(sales::refund))
        .route("/sales-report", get(sales::report))
        .route("/sales", get(sales::list))
        .route("/sales/:id", get(sales::get_sale).delete(sales::delete_sale))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/stock-totals", get(products::stock_totals))
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/variations/:id/restock", post(products::restock))
        .route(
            "/colors",
            get(catalog::list_colors).post(catalog::create_color),
        )
        .route(
            "/colors/:id",
            get(catalog::get_color)
                .put(catalog::update_color)
                .delete(catalog::delete_color),
        )
        .route("/sizes", get(catalog::list_sizes).post(catalog::create_size))
        .route(
            "/sizes/:id",
            get(catalog::get_size)
                .put(catalog::update_size)
                .delete(catalog::delete_size),
        )
}
