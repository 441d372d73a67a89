//! Domain Entities

use kernel::id::ResultBatchId;
use platform::client::ClientIdentifier;
use serde::{Deserialize, Serialize};

/// One coined brand name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedName {
    pub name: String,
    /// At most 100 characters
    pub description: String,
    pub industry: String,
}

/// Names produced by one successful generation call
///
/// Batches are append-only; "latest" is resolved at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBatch {
    pub id: ResultBatchId,
    pub client_id: ClientIdentifier,
    /// Generation order, stable
    pub names: Vec<GeneratedName>,
    pub created_at_ms: i64,
}

impl ResultBatch {
    pub fn new(client_id: ClientIdentifier, names: Vec<GeneratedName>, created_at_ms: i64) -> Self {
        Self {
            id: ResultBatchId::new(),
            client_id,
            names,
            created_at_ms,
        }
    }
}
