//! HTTP Handlers

use crate::application::config::TrademarkConfig;
use crate::application::generate_names::GenerateNamesUseCase;
use crate::application::generator::TextProvider;
use crate::application::latest_names::LatestNamesUseCase;
use crate::application::quota_status::QuotaStatusUseCase;
use crate::domain::entities::GeneratedName;
use crate::domain::repository::ResultRepository;
use crate::error::TrademarkResult;
use crate::presentation::dto::{
    BatchResponse, ClientQuery, GenerateRequest, IdentityResponse, QuotaResponse,
};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, header};
use platform::client::{ClientIdentifier, FingerprintSignals, extract_client_ip};
use platform::clock::Clock;
use platform::rate_limit::QuotaStore;
use std::net::SocketAddr;
use std::sync::Arc;

/// Storage the handlers need: result history plus quota state
pub trait TrademarkStore:
    ResultRepository + QuotaStore + Clone + Send + Sync + 'static
{
}

impl<T> TrademarkStore for T where
    T: ResultRepository + QuotaStore + Clone + Send + Sync + 'static
{
}

/// Shared state for trademark handlers
#[derive(Clone)]
pub struct TrademarkAppState<R, P>
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub provider: Arc<P>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<TrademarkConfig>,
}

impl<R, P> TrademarkAppState<R, P>
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    /// Identifier from an explicit value, falling back to the identity cookie
    fn resolve_client_id(&self, explicit: Option<String>, headers: &HeaderMap) -> String {
        explicit
            .or_else(|| self.config.cookie.read(headers))
            .unwrap_or_default()
    }
}

/// POST /api/trademarks/generate
pub async fn generate_names<R, P>(
    State(state): State<TrademarkAppState<R, P>>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> TrademarkResult<Json<Vec<GeneratedName>>>
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable generate body, using cookie identity");
            GenerateRequest::default()
        }
    };
    let client_id = state.resolve_client_id(req.ip_address, &headers);

    let use_case = GenerateNamesUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.provider.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&client_id).await?;

    Ok(Json(output.names))
}

/// GET /api/trademarks/latest
pub async fn latest_names<R, P>(
    State(state): State<TrademarkAppState<R, P>>,
    Query(query): Query<ClientQuery>,
) -> TrademarkResult<Json<Option<BatchResponse>>>
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    let use_case = LatestNamesUseCase::new(state.repo.clone());

    let batch = use_case.execute(query.client_id.as_deref()).await?;

    Ok(Json(batch.map(BatchResponse::from)))
}

/// GET /api/trademarks/quota
pub async fn quota_status<R, P>(
    State(state): State<TrademarkAppState<R, P>>,
    headers: HeaderMap,
    Query(query): Query<ClientQuery>,
) -> TrademarkResult<Json<QuotaResponse>>
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    let client_id = state.resolve_client_id(query.client_id, &headers);

    let use_case =
        QuotaStatusUseCase::new(state.repo.clone(), state.clock.clone(), state.config.clone());

    let output = use_case.execute(&client_id).await?;

    Ok(Json(QuotaResponse {
        client_id: output.client_id,
        tiers: output.tiers,
    }))
}

/// GET /api/trademarks/identity
///
/// Returns the cookie identity when it is well-formed, otherwise derives one
/// from request signals and sets the cookie.
pub async fn issue_identity<R, P>(
    State(state): State<TrademarkAppState<R, P>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> (HeaderMap, Json<IdentityResponse>)
where
    R: TrademarkStore,
    P: TextProvider + Clone + Send + Sync + 'static,
{
    let existing = state
        .config
        .cookie
        .read(&headers)
        .and_then(|value| ClientIdentifier::parse(&value).ok());

    if let Some(client_id) = existing {
        return (
            HeaderMap::new(),
            Json(IdentityResponse {
                client_id,
                issued: false,
            }),
        );
    }

    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let client_id = ClientIdentifier::derive(&FingerprintSignals::from_headers(&headers, client_ip));

    let mut response_headers = HeaderMap::new();
    if let Some(cookie) = state.config.cookie.set_cookie_header(client_id.as_str()) {
        response_headers.insert(header::SET_COOKIE, cookie);
    }

    tracing::info!(client_id = %client_id, "Issued client identifier");

    (
        response_headers,
        Json(IdentityResponse {
            client_id,
            issued: true,
        }),
    )
}
