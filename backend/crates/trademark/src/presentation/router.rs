//! Trademark Router

use crate::application::config::TrademarkConfig;
use crate::application::generator::{ProviderError, TextProvider};
use crate::infra::openai::OpenAiProvider;
use crate::infra::postgres::PgTrademarkRepository;
use crate::presentation::handlers::{self, TrademarkAppState, TrademarkStore};
use axum::{
    Router,
    routing::{get, post},
};
use platform::clock::{Clock, SystemClock};
use std::sync::Arc;

/// Create the trademark router with PostgreSQL repository and OpenAI provider
///
/// The provider is built from `config.provider`, the same settings the
/// generator checks.
pub fn trademark_router(
    repo: PgTrademarkRepository,
    config: TrademarkConfig,
) -> Result<Router, ProviderError> {
    let provider = OpenAiProvider::new(config.provider.clone())?;
    Ok(trademark_router_generic(
        repo,
        provider,
        Arc::new(SystemClock),
        config,
    ))
}

/// Create a generic trademark router for any storage and provider implementation
pub fn trademark_router_generic<R, P>(
    repo: R,
    provider: P,
    clock: Arc<dyn Clock>,
    config: TrademarkConfig,
) -> Router
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    let state = TrademarkAppState {
        repo: Arc::new(repo),
        provider: Arc::new(provider),
        clock,
        config: Arc::new(config),
    };

    Router::new()
        .route("/generate", post(handlers::generate_names::<R, P>))
        .route("/latest", get(handlers::latest_names::<R, P>))
        .route("/quota", get(handlers::quota_status::<R, P>))
        .route("/identity", get(handlers::issue_identity::<R, P>))
        .with_state(state)
}
