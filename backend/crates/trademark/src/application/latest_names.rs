//! Latest Names Use Case

use crate::domain::entities::ResultBatch;
use crate::domain::repository::ResultRepository;
use crate::error::TrademarkResult;
use platform::client::ClientIdentifier;
use std::sync::Arc;

/// Latest Names Use Case
///
/// Read-only; never triggers generation or touches quotas.
pub struct LatestNamesUseCase<R>
where
    R: ResultRepository,
{
    result_repo: Arc<R>,
}

impl<R> LatestNamesUseCase<R>
where
    R: ResultRepository + Sync,
{
    pub fn new(result_repo: Arc<R>) -> Self {
        Self { result_repo }
    }

    /// Global latest batch when `raw_client_id` is `None`, else that client's latest
    pub async fn execute(&self, raw_client_id: Option<&str>) -> TrademarkResult<Option<ResultBatch>> {
        let client_id = raw_client_id.map(ClientIdentifier::parse).transpose()?;
        self.result_repo.latest(client_id.as_ref()).await
    }
}
