//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::ResultBatch;
use crate::error::TrademarkResult;
use platform::client::ClientIdentifier;

/// Result batch repository trait
#[trait_variant::make(ResultRepository: Send)]
pub trait LocalResultRepository {
    /// Append a batch; earlier batches are never overwritten
    async fn save(&self, batch: &ResultBatch) -> TrademarkResult<()>;

    /// Most recent batch for a client, or across all clients when `None`
    async fn latest(&self, client_id: Option<&ClientIdentifier>)
    -> TrademarkResult<Option<ResultBatch>>;
}
