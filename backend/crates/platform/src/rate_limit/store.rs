//! Quota storage backends

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Admission, QuotaConfig, QuotaRecord, evaluate};

/// Error raised by a quota storage backend
#[derive(Debug, thiserror::Error)]
pub enum QuotaStoreError {
    #[error("Quota backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl QuotaStoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        QuotaStoreError::Backend(Box::new(err))
    }
}

/// Trait for quota storage backends
///
/// `consume` must be atomic per `(quota, key)`: two concurrent callers never
/// both observe capacity for the same marginal unit.
#[trait_variant::make(QuotaStore: Send)]
pub trait LocalQuotaStore {
    /// Evaluate one unit against `config` for `key` at `now_ms`, persisting on admission
    async fn consume(
        &self,
        config: &QuotaConfig,
        key: &str,
        now_ms: i64,
    ) -> Result<Admission, QuotaStoreError>;

    /// Read the stored record without modifying it
    async fn load(&self, quota: &str, key: &str) -> Result<Option<QuotaRecord>, QuotaStoreError>;
}

/// Process-local quota store used as the test double for durable backends
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuotaStore {
    records: Arc<Mutex<HashMap<(String, String), QuotaRecord>>>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuotaStore for InMemoryQuotaStore {
    async fn consume(
        &self,
        config: &QuotaConfig,
        key: &str,
        now_ms: i64,
    ) -> Result<Admission, QuotaStoreError> {
        // Lock held across read, evaluate and write
        let mut records = self.records.lock().await;
        let map_key = (config.name.clone(), key.to_string());

        let eval = evaluate(config, records.get(&map_key), now_ms);
        if let Some(next) = eval.next {
            records.insert(map_key, next);
        }
        Ok(eval.admission)
    }

    async fn load(&self, quota: &str, key: &str) -> Result<Option<QuotaRecord>, QuotaStoreError> {
        let records = self.records.lock().await;
        Ok(records.get(&(quota.to_string(), key.to_string())).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::{Arc, InMemoryQuotaStore, QuotaConfig, QuotaRecord, QuotaStore};
    use std::time::Duration;

    const T0: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_first_use_is_fresh() {
        let store = InMemoryQuotaStore::new();
        let config = QuotaConfig::fixed_window("minute", 3, Duration::from_secs(60));

        assert_eq!(store.load("minute", "fp-a").await.unwrap(), None);
        assert!(store.consume(&config, "fp-a", T0).await.unwrap().is_ok());
        assert_eq!(
            store.load("minute", "fp-a").await.unwrap(),
            Some(QuotaRecord::FixedWindow {
                window_start_ms: T0,
                count_in_window: 1
            })
        );
    }

    #[tokio::test]
    async fn test_keys_and_quotas_are_isolated() {
        let store = InMemoryQuotaStore::new();
        let minute = QuotaConfig::fixed_window("minute", 1, Duration::from_secs(60));
        let other = QuotaConfig::fixed_window("other", 1, Duration::from_secs(60));

        assert!(store.consume(&minute, "fp-a", T0).await.unwrap().is_ok());
        assert!(!store.consume(&minute, "fp-a", T0).await.unwrap().is_ok());
        assert!(store.consume(&minute, "fp-b", T0).await.unwrap().is_ok());
        assert!(store.consume(&other, "fp-a", T0).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_consumers_do_not_double_spend() {
        let store = InMemoryQuotaStore::new();
        let config = Arc::new(QuotaConfig::token_bucket(
            "minute",
            3,
            Duration::from_secs(60),
            3,
        ));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            let config = config.clone();
            handles.push(tokio::spawn(async move {
                store.consume(&config, "fp-race", T0).await.unwrap().is_ok()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 3);
    }
}
