//! Shared application state handed to every handler.

use std::sync::Arc;

use ims_core::StockPolicy;
use ims_db::{Database, Ledger};

use crate::auth::JwtVerifier;

/// Cheap to clone: every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ledger: Ledger,
    pub jwt: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(db: Database, policy: StockPolicy, jwt_secret: &str) -> Self {
        let ledger = db.ledger(policy);
        AppState {
            db,
            ledger,
            jwt: Arc::new(JwtVerifier::new(jwt_secret)),
        }
    }
}
