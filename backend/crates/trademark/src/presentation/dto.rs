//! API DTOs (Data Transfer Objects)

use crate::domain::entities::{GeneratedName, ResultBatch};
use platform::client::ClientIdentifier;
use platform::rate_limit::TierStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/trademarks/generate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Client identifier; the field name is historical
    #[serde(default, alias = "clientId")]
    pub ip_address: Option<String>,
}

/// Query for GET /api/trademarks/latest and /api/trademarks/quota
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Stored batch as returned by GET /api/trademarks/latest
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub names: Vec<GeneratedName>,
    /// Epoch millis
    pub created_at: i64,
    pub ip_address: ClientIdentifier,
}

impl From<ResultBatch> for BatchResponse {
    fn from(batch: ResultBatch) -> Self {
        Self {
            batch_id: batch.id.into_uuid(),
            names: batch.names,
            created_at: batch.created_at_ms,
            ip_address: batch.client_id,
        }
    }
}

/// Response for GET /api/trademarks/quota
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaResponse {
    pub client_id: ClientIdentifier,
    pub tiers: Vec<TierStatus>,
}

/// Response for GET /api/trademarks/identity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub client_id: ClientIdentifier,
    /// Whether this response set a new identity cookie
    pub issued: bool,
}
