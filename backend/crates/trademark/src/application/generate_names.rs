//! Generate Names Use Case
//!
//! Validate → Admit → Generate → Parse → Persist → Return. Each stage
//! short-circuits to a terminal error. Quota spent in Admit is never refunded.

use crate::application::config::TrademarkConfig;
use crate::application::generator::{NameGenerator, PromptTheme, ProviderError, TextProvider};
use crate::domain::entities::{GeneratedName, ResultBatch};
use crate::domain::repository::ResultRepository;
use crate::domain::services::parse_names_with;
use crate::error::{GenerationFailure, TrademarkError, TrademarkResult};
use kernel::id::ResultBatchId;
use platform::client::ClientIdentifier;
use platform::clock::Clock;
use platform::rate_limit::{GateDecision, QuotaStore, RateLimitGate};
use std::sync::Arc;

/// Output DTO for generate names
#[derive(Debug, Clone)]
pub struct GenerateNamesOutput {
    pub batch_id: ResultBatchId,
    pub client_id: ClientIdentifier,
    pub names: Vec<GeneratedName>,
    pub created_at_ms: i64,
}

/// Generate Names Use Case
pub struct GenerateNamesUseCase<R, Q, P>
where
    R: ResultRepository,
    Q: QuotaStore,
    P: TextProvider,
{
    result_repo: Arc<R>,
    gate: RateLimitGate<Q>,
    generator: NameGenerator<P>,
    clock: Arc<dyn Clock>,
    config: Arc<TrademarkConfig>,
}

impl<R, Q, P> GenerateNamesUseCase<R, Q, P>
where
    R: ResultRepository + Sync,
    Q: QuotaStore + Sync,
    P: TextProvider + Sync,
{
    pub fn new(
        result_repo: Arc<R>,
        quota_store: Arc<Q>,
        provider: Arc<P>,
        clock: Arc<dyn Clock>,
        config: Arc<TrademarkConfig>,
    ) -> Self {
        let gate = RateLimitGate::new(
            quota_store,
            Arc::new(config.rate_limit.clone()),
            clock.clone(),
        );
        let generator = NameGenerator::new(provider, config.provider.clone());
        Self {
            result_repo,
            gate,
            generator,
            clock,
            config,
        }
    }

    pub async fn execute(&self, raw_client_id: &str) -> TrademarkResult<GenerateNamesOutput> {
        self.execute_with_theme(raw_client_id, PromptTheme::random())
            .await
    }

    pub async fn execute_with_theme(
        &self,
        raw_client_id: &str,
        theme: PromptTheme,
    ) -> TrademarkResult<GenerateNamesOutput> {
        // Validate before any quota is touched
        let client_id = ClientIdentifier::parse(raw_client_id)?;

        if let GateDecision::Rejected {
            quota,
            retry_after_ms,
            retry_after_secs,
        } = self.gate.admit(client_id.as_str()).await?
        {
            return Err(TrademarkError::RateLimited {
                quota,
                retry_after_ms,
                retry_after_secs,
            });
        }

        let prompt = self.generator.prompt(theme);
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| match e {
                ProviderError::MissingCredential => TrademarkError::ProviderConfig,
                other => GenerationFailure::from(other).into(),
            })?;

        let names = parse_names_with(&raw, &self.config.limits).map_err(|e| {
            tracing::warn!(client_id = %client_id, error = %e, "Unparseable provider response");
            GenerationFailure::from(e)
        })?;

        if names.is_empty() {
            tracing::warn!(client_id = %client_id, "Provider response contained no names");
        }

        let batch = ResultBatch::new(client_id, names, self.clock.now_ms());
        self.result_repo.save(&batch).await?;

        tracing::info!(
            client_id = %batch.client_id,
            batch_id = %batch.id,
            theme = ?theme,
            names = batch.names.len(),
            "Generated trademark names"
        );

        Ok(GenerateNamesOutput {
            batch_id: batch.id,
            client_id: batch.client_id,
            names: batch.names,
            created_at_ms: batch.created_at_ms,
        })
    }
}
