//! Rate Limiting Infrastructure
//!
//! Quota algorithms and the building blocks around them:
//! - [`QuotaConfig`]: static description of one named quota (kind, rate, period, capacity).
//! - [`QuotaRecord`]: the minimal persisted state for one `(quota, key)` pair.
//! - [`evaluate`]: the pure decision function, shared by every store.
//! - [`store::QuotaStore`]: atomic read-modify-write of a record.
//! - [`gate::RateLimitGate`]: ordered, short-circuiting composition of quotas.
//!
//! Token-bucket refill is computed lazily from elapsed wall-clock time at check
//! time. There is no background refill task.

use std::time::Duration;

pub mod gate;
pub mod store;

pub use gate::{GateDecision, RateLimitGate, RateLimitPolicy, TierStatus};
pub use store::{InMemoryQuotaStore, QuotaStore, QuotaStoreError};

/// Quota algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    /// Continuous refill of `rate` units per `period`, capped at `capacity`
    TokenBucket,
    /// At most `rate` units per window of length `period`, reset at the boundary
    FixedWindow,
}

impl QuotaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaKind::TokenBucket => "token_bucket",
            QuotaKind::FixedWindow => "fixed_window",
        }
    }
}

/// Static configuration of one named quota
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaConfig {
    /// Tier name reported on rejection (e.g. "minute")
    pub name: String,
    pub kind: QuotaKind,
    /// Units granted per period
    pub rate: u32,
    pub period: Duration,
    /// Bucket size; ignored by fixed windows
    pub capacity: u32,
}

impl QuotaConfig {
    pub fn token_bucket(name: impl Into<String>, rate: u32, period: Duration, capacity: u32) -> Self {
        Self {
            name: name.into(),
            kind: QuotaKind::TokenBucket,
            rate,
            period,
            capacity,
        }
    }

    pub fn fixed_window(name: impl Into<String>, rate: u32, period: Duration) -> Self {
        Self {
            name: name.into(),
            kind: QuotaKind::FixedWindow,
            rate,
            period,
            capacity: rate,
        }
    }

    pub fn period_ms(&self) -> i64 {
        self.period.as_millis() as i64
    }
}

/// Persisted state for one `(quota, key)` pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotaRecord {
    TokenBucket {
        /// Always within `[0, capacity]`
        tokens_remaining: f64,
        last_refill_at_ms: i64,
    },
    FixedWindow {
        window_start_ms: i64,
        count_in_window: u32,
    },
}

impl QuotaRecord {
    /// State of a key that has never been seen: full bucket or empty window
    pub fn fresh(config: &QuotaConfig, now_ms: i64) -> Self {
        match config.kind {
            QuotaKind::TokenBucket => QuotaRecord::TokenBucket {
                tokens_remaining: f64::from(config.capacity),
                last_refill_at_ms: now_ms,
            },
            QuotaKind::FixedWindow => QuotaRecord::FixedWindow {
                window_start_ms: now_ms,
                count_in_window: 0,
            },
        }
    }

    pub fn kind(&self) -> QuotaKind {
        match self {
            QuotaRecord::TokenBucket { .. } => QuotaKind::TokenBucket,
            QuotaRecord::FixedWindow { .. } => QuotaKind::FixedWindow,
        }
    }

    /// Time of the last state change, used for housekeeping
    pub fn touched_at_ms(&self) -> i64 {
        match self {
            QuotaRecord::TokenBucket {
                last_refill_at_ms, ..
            } => *last_refill_at_ms,
            QuotaRecord::FixedWindow {
                window_start_ms, ..
            } => *window_start_ms,
        }
    }
}

/// Outcome of one quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Earliest instant (epoch ms) at which the same quota could admit
    Denied { retry_after_ms: i64 },
}

impl Admission {
    pub fn is_ok(&self) -> bool {
        matches!(self, Admission::Allowed)
    }

    pub fn retry_after_ms(&self) -> Option<i64> {
        match self {
            Admission::Allowed => None,
            Admission::Denied { retry_after_ms } => Some(*retry_after_ms),
        }
    }
}

/// Decision plus the record to persist
///
/// `next` is `None` on rejection: a denied request never mutates state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub admission: Admission,
    pub next: Option<QuotaRecord>,
}

/// Decide whether one unit can be consumed at `now_ms`
///
/// A missing record, or one of the wrong kind, is treated as fresh.
pub fn evaluate(config: &QuotaConfig, record: Option<&QuotaRecord>, now_ms: i64) -> Evaluation {
    let record = match record {
        Some(r) if r.kind() == config.kind => *r,
        _ => QuotaRecord::fresh(config, now_ms),
    };

    match record {
        QuotaRecord::TokenBucket {
            tokens_remaining,
            last_refill_at_ms,
        } => evaluate_token_bucket(config, tokens_remaining, last_refill_at_ms, now_ms),
        QuotaRecord::FixedWindow {
            window_start_ms,
            count_in_window,
        } => evaluate_fixed_window(config, window_start_ms, count_in_window, now_ms),
    }
}

fn evaluate_token_bucket(
    config: &QuotaConfig,
    tokens_remaining: f64,
    last_refill_at_ms: i64,
    now_ms: i64,
) -> Evaluation {
    let capacity = f64::from(config.capacity);
    let rate = f64::from(config.rate);
    let period_ms = config.period_ms().max(1) as f64;

    let elapsed_ms = now_ms.saturating_sub(last_refill_at_ms).max(0) as f64;
    let refilled = (tokens_remaining + elapsed_ms / period_ms * rate).min(capacity);

    if refilled >= 1.0 {
        return Evaluation {
            admission: Admission::Allowed,
            next: Some(QuotaRecord::TokenBucket {
                tokens_remaining: refilled - 1.0,
                last_refill_at_ms: now_ms,
            }),
        };
    }

    let retry_after_ms = if rate > 0.0 {
        let wait_ms = ((1.0 - tokens_remaining) * period_ms / rate).ceil() as i64;
        last_refill_at_ms.saturating_add(wait_ms)
    } else {
        i64::MAX
    };

    Evaluation {
        admission: Admission::Denied { retry_after_ms },
        next: None,
    }
}

fn evaluate_fixed_window(
    config: &QuotaConfig,
    window_start_ms: i64,
    count_in_window: u32,
    now_ms: i64,
) -> Evaluation {
    let period_ms = config.period_ms();
    let (window_start_ms, count_in_window) = if now_ms - window_start_ms >= period_ms {
        (now_ms, 0)
    } else {
        (window_start_ms, count_in_window)
    };

    if count_in_window < config.rate {
        return Evaluation {
            admission: Admission::Allowed,
            next: Some(QuotaRecord::FixedWindow {
                window_start_ms,
                count_in_window: count_in_window + 1,
            }),
        };
    }

    Evaluation {
        admission: Admission::Denied {
            retry_after_ms: window_start_ms + period_ms,
        },
        next: None,
    }
}
