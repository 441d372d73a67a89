//! In-Memory Repository
//!
//! Process-local result history and quota state backing the crate's tests.

use crate::domain::entities::ResultBatch;
use crate::domain::repository::ResultRepository;
use crate::error::TrademarkResult;
use platform::client::ClientIdentifier;
use platform::rate_limit::{
    Admission, InMemoryQuotaStore, QuotaConfig, QuotaRecord, QuotaStore, QuotaStoreError,
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct InMemoryTrademarkRepository {
    batches: Arc<Mutex<Vec<ResultBatch>>>,
    quotas: InMemoryQuotaStore,
}

impl InMemoryTrademarkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored batches, oldest first
    pub async fn batches(&self) -> Vec<ResultBatch> {
        self.batches.lock().await.clone()
    }
}

impl ResultRepository for InMemoryTrademarkRepository {
    async fn save(&self, batch: &ResultBatch) -> TrademarkResult<()> {
        self.batches.lock().await.push(batch.clone());
        Ok(())
    }

    async fn latest(
        &self,
        client_id: Option<&ClientIdentifier>,
    ) -> TrademarkResult<Option<ResultBatch>> {
        let batches = self.batches.lock().await;
        // max_by_key keeps the last of equal keys, i.e. the newest insert
        let latest = batches
            .iter()
            .filter(|b| client_id.is_none_or(|id| &b.client_id == id))
            .max_by_key(|b| b.created_at_ms)
            .cloned();
        Ok(latest)
    }
}

impl QuotaStore for InMemoryTrademarkRepository {
    async fn consume(
        &self,
        config: &QuotaConfig,
        key: &str,
        now_ms: i64,
    ) -> Result<Admission, QuotaStoreError> {
        self.quotas.consume(config, key, now_ms).await
    }

    async fn load(&self, quota: &str, key: &str) -> Result<Option<QuotaRecord>, QuotaStoreError> {
        self.quotas.load(quota, key).await
    }
}
