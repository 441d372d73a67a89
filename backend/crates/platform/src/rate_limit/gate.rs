//! Multi-tier admission gate

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::store::{QuotaStore, QuotaStoreError};
use super::{QuotaConfig, evaluate};
use crate::clock::Clock;

/// Ordered list of quotas evaluated by a [`RateLimitGate`]
///
/// Order is evaluation order. The standard policy is tightest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    quotas: Vec<QuotaConfig>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl RateLimitPolicy {
    pub fn new(quotas: Vec<QuotaConfig>) -> Self {
        Self { quotas }
    }

    /// minute (3 / 60s window), hour (20 / 3600s bucket, burst 10), day (50 / 86400s window)
    pub fn standard() -> Self {
        Self::new(vec![
            QuotaConfig::fixed_window("minute", 3, Duration::from_secs(60)),
            QuotaConfig::token_bucket("hour", 20, Duration::from_secs(3600), 10),
            QuotaConfig::fixed_window("day", 50, Duration::from_secs(86_400)),
        ])
    }

    /// Minute tier only
    pub fn single_tier() -> Self {
        Self::new(vec![QuotaConfig::fixed_window(
            "minute",
            3,
            Duration::from_secs(60),
        )])
    }

    pub fn quotas(&self) -> &[QuotaConfig] {
        &self.quotas
    }

    /// Longest period across all tiers, used to age out stale records
    pub fn longest_period(&self) -> Duration {
        self.quotas
            .iter()
            .map(|q| q.period)
            .max()
            .unwrap_or_default()
    }
}

/// Gate outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Every tier admitted and consumed one unit
    Admitted,
    /// First rejecting tier; later tiers were not consulted
    Rejected {
        quota: String,
        /// Epoch millis at which the tier admits again
        retry_after_ms: i64,
        /// Whole seconds from the decision until `retry_after_ms`, rounded up
        retry_after_secs: u64,
    },
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admitted)
    }
}

/// Per-tier view returned by [`RateLimitGate::status`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStatus {
    pub quota: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<i64>,
}

/// Composes the quotas of a [`RateLimitPolicy`] into one admission decision
pub struct RateLimitGate<S>
where
    S: QuotaStore,
{
    store: Arc<S>,
    policy: Arc<RateLimitPolicy>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for RateLimitGate<S>
where
    S: QuotaStore,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: self.policy.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<S> RateLimitGate<S>
where
    S: QuotaStore + Sync,
{
    pub fn new(store: Arc<S>, policy: Arc<RateLimitPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Consume one unit from each tier in order, stopping at the first rejection
    ///
    /// Units consumed by earlier tiers are not refunded when a later tier rejects.
    pub async fn admit(&self, key: &str) -> Result<GateDecision, QuotaStoreError> {
        let now_ms = self.clock.now_ms();

        for quota in self.policy.quotas() {
            let admission = self.store.consume(quota, key, now_ms).await?;
            if let Some(retry_after_ms) = admission.retry_after_ms() {
                tracing::warn!(
                    client_id = %key,
                    quota = %quota.name,
                    retry_after_ms,
                    "Rate limit exceeded"
                );
                return Ok(GateDecision::Rejected {
                    quota: quota.name.clone(),
                    retry_after_ms,
                    retry_after_secs: seconds_until(retry_after_ms, now_ms),
                });
            }
        }

        tracing::debug!(client_id = %key, "Admitted");
        Ok(GateDecision::Admitted)
    }

    /// Evaluate every tier without consuming
    pub async fn status(&self, key: &str) -> Result<Vec<TierStatus>, QuotaStoreError> {
        let now_ms = self.clock.now_ms();
        let mut tiers = Vec::with_capacity(self.policy.quotas().len());

        for quota in self.policy.quotas() {
            let record = self.store.load(&quota.name, key).await?;
            let admission = evaluate(quota, record.as_ref(), now_ms).admission;
            tiers.push(TierStatus {
                quota: quota.name.clone(),
                ok: admission.is_ok(),
                retry_after: admission.retry_after_ms(),
            });
        }

        Ok(tiers)
    }
}

fn seconds_until(at_ms: i64, now_ms: i64) -> u64 {
    (at_ms.saturating_sub(now_ms).max(0) as u64).div_ceil(1000)
}
