//! PostgreSQL Repository Implementations

use crate::domain::entities::{GeneratedName, ResultBatch};
use crate::domain::repository::ResultRepository;
use crate::error::TrademarkResult;
use chrono::Utc;
use kernel::id::ResultBatchId;
use platform::client::ClientIdentifier;
use platform::rate_limit::{
    Admission, QuotaConfig, QuotaKind, QuotaRecord, QuotaStore, QuotaStoreError, evaluate,
};
use sqlx::PgPool;
use sqlx::types::Json;
use std::time::Duration;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgTrademarkRepository {
    pool: PgPool,
}

impl PgTrademarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete quota records untouched for longer than `max_age`
    pub async fn cleanup_expired(&self, max_age: Duration) -> TrademarkResult<u64> {
        let cutoff_ms = Utc::now().timestamp_millis() - max_age.as_millis() as i64;

        let quotas_deleted = sqlx::query("DELETE FROM trademark_quotas WHERE touched_at_ms < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(quotas = quotas_deleted, "Cleaned up stale quota records");

        Ok(quotas_deleted)
    }
}

impl ResultRepository for PgTrademarkRepository {
    async fn save(&self, batch: &ResultBatch) -> TrademarkResult<()> {
        sqlx::query(
            r#"
            INSERT INTO trademark_batches (
                trademark_batch_id,
                client_id,
                names,
                created_at_ms
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(batch.id.into_uuid())
        .bind(batch.client_id.as_str())
        .bind(Json(&batch.names))
        .bind(batch.created_at_ms)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            batch_id = %batch.id,
            client_id = %batch.client_id,
            "Result batch saved"
        );

        Ok(())
    }

    async fn latest(
        &self,
        client_id: Option<&ClientIdentifier>,
    ) -> TrademarkResult<Option<ResultBatch>> {
        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT
                trademark_batch_id,
                client_id,
                names,
                created_at_ms
            FROM trademark_batches
            WHERE $1::TEXT IS NULL OR client_id = $1
            ORDER BY created_at_ms DESC, batch_seq DESC
            LIMIT 1
            "#,
        )
        .bind(client_id.map(ClientIdentifier::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(BatchRow::into_batch))
    }
}

impl QuotaStore for PgTrademarkRepository {
    async fn consume(
        &self,
        config: &QuotaConfig,
        key: &str,
        now_ms: i64,
    ) -> Result<Admission, QuotaStoreError> {
        let mut tx = self.pool.begin().await.map_err(QuotaStoreError::backend)?;

        // Ensure a row exists so FOR UPDATE always has something to lock
        sqlx::query(
            r#"
            INSERT INTO trademark_quotas (quota_name, client_id, quota_kind, touched_at_ms)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (quota_name, client_id) DO NOTHING
            "#,
        )
        .bind(&config.name)
        .bind(key)
        .bind(config.kind.as_str())
        .bind(now_ms)
        .execute(&mut *tx)
        .await
        .map_err(QuotaStoreError::backend)?;

        let row = sqlx::query_as::<_, QuotaRow>(
            r#"
            SELECT
                quota_kind,
                tokens_remaining,
                last_refill_at_ms,
                window_start_ms,
                count_in_window
            FROM trademark_quotas
            WHERE quota_name = $1 AND client_id = $2
            FOR UPDATE
            "#,
        )
        .bind(&config.name)
        .bind(key)
        .fetch_one(&mut *tx)
        .await
        .map_err(QuotaStoreError::backend)?;

        let eval = evaluate(config, row.into_record().as_ref(), now_ms);

        if let Some(next) = eval.next {
            let (tokens, last_refill, window_start, count) = match next {
                QuotaRecord::TokenBucket {
                    tokens_remaining,
                    last_refill_at_ms,
                } => (Some(tokens_remaining), Some(last_refill_at_ms), None, None),
                QuotaRecord::FixedWindow {
                    window_start_ms,
                    count_in_window,
                } => (None, None, Some(window_start_ms), Some(count_in_window as i32)),
            };

            sqlx::query(
                r#"
                UPDATE trademark_quotas SET
                    quota_kind = $3,
                    tokens_remaining = $4,
                    last_refill_at_ms = $5,
                    window_start_ms = $6,
                    count_in_window = $7,
                    touched_at_ms = $8
                WHERE quota_name = $1 AND client_id = $2
                "#,
            )
            .bind(&config.name)
            .bind(key)
            .bind(next.kind().as_str())
            .bind(tokens)
            .bind(last_refill)
            .bind(window_start)
            .bind(count)
            .bind(next.touched_at_ms())
            .execute(&mut *tx)
            .await
            .map_err(QuotaStoreError::backend)?;
        }

        tx.commit().await.map_err(QuotaStoreError::backend)?;

        Ok(eval.admission)
    }

    async fn load(&self, quota: &str, key: &str) -> Result<Option<QuotaRecord>, QuotaStoreError> {
        let row = sqlx::query_as::<_, QuotaRow>(
            r#"
            SELECT
                quota_kind,
                tokens_remaining,
                last_refill_at_ms,
                window_start_ms,
                count_in_window
            FROM trademark_quotas
            WHERE quota_name = $1 AND client_id = $2
            "#,
        )
        .bind(quota)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(QuotaStoreError::backend)?;

        Ok(row.and_then(QuotaRow::into_record))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct BatchRow {
    trademark_batch_id: Uuid,
    client_id: String,
    names: Json<Vec<GeneratedName>>,
    created_at_ms: i64,
}

impl BatchRow {
    fn into_batch(self) -> Option<ResultBatch> {
        let client_id = match ClientIdentifier::parse(&self.client_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    batch_id = %self.trademark_batch_id,
                    error = %e,
                    "Skipping batch with malformed client identifier"
                );
                return None;
            }
        };

        Some(ResultBatch {
            id: ResultBatchId::from_uuid(self.trademark_batch_id),
            client_id,
            names: self.names.0,
            created_at_ms: self.created_at_ms,
        })
    }
}

#[derive(sqlx::FromRow)]
struct QuotaRow {
    quota_kind: String,
    tokens_remaining: Option<f64>,
    last_refill_at_ms: Option<i64>,
    window_start_ms: Option<i64>,
    count_in_window: Option<i32>,
}

impl QuotaRow {
    /// `None` for a freshly inserted placeholder row
    fn into_record(self) -> Option<QuotaRecord> {
        match self.quota_kind.as_str() {
            k if k == QuotaKind::TokenBucket.as_str() => Some(QuotaRecord::TokenBucket {
                tokens_remaining: self.tokens_remaining?,
                last_refill_at_ms: self.last_refill_at_ms?,
            }),
            k if k == QuotaKind::FixedWindow.as_str() => Some(QuotaRecord::FixedWindow {
                window_start_ms: self.window_start_ms?,
                count_in_window: self.count_in_window?.max(0) as u32,
            }),
            _ => None,
        }
    }
}
