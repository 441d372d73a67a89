//! Quota Status Use Case

use crate::application::config::TrademarkConfig;
use crate::error::TrademarkResult;
use platform::client::ClientIdentifier;
use platform::clock::Clock;
use platform::rate_limit::{QuotaStore, RateLimitGate, TierStatus};
use std::sync::Arc;

/// Output DTO for quota status
#[derive(Debug, Clone)]
pub struct QuotaStatusOutput {
    pub client_id: ClientIdentifier,
    pub tiers: Vec<TierStatus>,
}

/// Reports per-tier availability without consuming any quota
pub struct QuotaStatusUseCase<Q>
where
    Q: QuotaStore,
{
    gate: RateLimitGate<Q>,
}

impl<Q> QuotaStatusUseCase<Q>
where
    Q: QuotaStore + Sync,
{
    pub fn new(quota_store: Arc<Q>, clock: Arc<dyn Clock>, config: Arc<TrademarkConfig>) -> Self {
        Self {
            gate: RateLimitGate::new(quota_store, Arc::new(config.rate_limit.clone()), clock),
        }
    }

    pub async fn execute(&self, raw_client_id: &str) -> TrademarkResult<QuotaStatusOutput> {
        let client_id = ClientIdentifier::parse(raw_client_id)?;
        let tiers = self.gate.status(client_id.as_str()).await?;
        Ok(QuotaStatusOutput { client_id, tiers })
    }
}
