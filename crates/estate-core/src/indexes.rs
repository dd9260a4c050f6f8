//! Index bootstrap
//!
//! Index creation runs when a repository is constructed and is best-effort:
//! a failure is logged and swallowed so the repository stays usable.

use tracing::{info, warn};

use crate::store::{DocumentStore, IndexSpec};

pub const PROPERTY_TEXT_INDEX: &str = "property_text";
pub const PROPERTY_PRICE_INDEX: &str = "property_price";

/// Text index over name and address plus an ascending price index
pub fn property_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::text(PROPERTY_TEXT_INDEX, &["name", "address"]),
        IndexSpec::ascending(PROPERTY_PRICE_INDEX, &["price"]),
    ]
}

/// Create `indexes` on `collection`, returning whether it succeeded
pub async fn ensure_indexes(
    store: &dyn DocumentStore,
    collection: &str,
    indexes: &[IndexSpec],
) -> bool {
    match store.create_indexes(collection, indexes).await {
        Ok(()) => {
            info!(collection, count = indexes.len(), "indexes ready");
            true
        }
        Err(e) => {
            warn!(collection, error = %e, "failed to create indexes, continuing without them");
            false
        }
    }
}
