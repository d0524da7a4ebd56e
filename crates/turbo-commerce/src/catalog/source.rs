//! Remote product source.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use async_trait::async_trait;

/// Supplies fresh product records.
///
/// Fetch, retry, and backoff policy belong to the implementation. The catalog
/// store only awaits one call per refresh.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch the current record for `id`.
    async fn fetch_product(&self, id: &ProductId) -> Result<Product, CommerceError>;
}
