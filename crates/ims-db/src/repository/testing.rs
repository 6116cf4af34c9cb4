//! Shared fixtures for repository and ledger tests.

use crate::pool::{Database, DbConfig};
use ims_core::{NewProduct, NewVariation};

/// Ids of a one-product, one-variation catalog.
pub(crate) struct SeededCatalog {
    pub product_id: String,
    pub variation_id: String,
    pub color_id: String,
    pub size_id: String,
}

pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Creates "Linen Shirt" (sell 20.00, cost 10.00) in White / M with `stock` units.
pub(crate) async fn seed_catalog(db: &Database, owner: &str, stock: i64) -> SeededCatalog {
    seed_product(db, owner, "Linen Shirt", 2000, 1000, stock).await
}

pub(crate) async fn seed_product(
    db: &Database,
    owner: &str,
    name: &str,
    selling_price_cents: i64,
    cost_price_cents: i64,
    stock: i64,
) -> SeededCatalog {
    let color = db
        .catalog()
        .create_color(owner, &format!("White {}", ims_core::new_id()))
        .await
        .unwrap();
    let size = db
        .catalog()
        .create_size(owner, &format!("M {}", ims_core::new_id()))
        .await
        .unwrap();

    let input = NewProduct {
        name: name.to_string(),
        description: None,
        cost_price_cents,
        selling_price_cents,
        image_urls: Some("[/img/linen-white.png, /img/linen-back.png]".to_string()),
    };
    let variations = vec![NewVariation {
        color_id: color.id.clone(),
        size_id: size.id.clone(),
        quantity: stock,
    }];

    let (product, created) = db
        .products()
        .create_with_variations(owner, &input, &variations)
        .await
        .unwrap();

    SeededCatalog {
        product_id: product.id,
        variation_id: created[0].id.clone(),
        color_id: color.id,
        size_id: size.id,
    }
}
