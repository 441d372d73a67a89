//! Trademark Error Types
//!
//! Tagged failure variants of the generation pipeline. Each converts into the
//! unified `kernel::error::AppError`, which carries a stable machine-readable
//! `code`. Message texts keep the substrings older clients match on.

use crate::application::generator::ProviderError;
use crate::domain::services::ParseError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::IdentifierError;
use platform::rate_limit::QuotaStoreError;
use thiserror::Error;

/// Trademark-specific result type alias
pub type TrademarkResult<T> = Result<T, TrademarkError>;

/// Machine-readable error codes
pub mod codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const PROVIDER_NOT_CONFIGURED: &str = "PROVIDER_NOT_CONFIGURED";
    pub const GENERATION_FAILED: &str = "GENERATION_FAILED";
    pub const PERSISTENCE_FAILED: &str = "PERSISTENCE_FAILED";
}

/// Why a generation attempt produced nothing usable
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Trademark-specific error variants
#[derive(Debug, Error)]
pub enum TrademarkError {
    /// Client identifier missing or malformed
    #[error("Invalid request. Please refresh the page and try again.")]
    InvalidRequest(#[from] IdentifierError),

    /// Denied by the named quota tier
    #[error("{}", rate_limit_message(quota))]
    RateLimited {
        quota: String,
        retry_after_ms: i64,
        retry_after_secs: u64,
    },

    /// No provider credential configured
    #[error("OpenAI API key is not configured")]
    ProviderConfig,

    /// Provider failed, returned nothing, or returned unparseable text
    #[error("Failed to generate trademarks. Please try again.")]
    GenerationFailed(#[from] GenerationFailure),

    /// Durable write or quota bookkeeping failed
    #[error("Failed to save generated names. Please try again.")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn rate_limit_message(quota: &str) -> &'static str {
    match quota {
        "hour" => "Hourly limit reached. Please wait a while before trying again.",
        "day" => "Daily limit reached. Please try again tomorrow.",
        _ => "Rate limit exceeded. Please try again later.",
    }
}

impl TrademarkError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrademarkError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TrademarkError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            TrademarkError::ProviderConfig => StatusCode::SERVICE_UNAVAILABLE,
            TrademarkError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            TrademarkError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrademarkError::InvalidRequest(_) => ErrorKind::BadRequest,
            TrademarkError::RateLimited { .. } => ErrorKind::TooManyRequests,
            TrademarkError::ProviderConfig => ErrorKind::ServiceUnavailable,
            TrademarkError::GenerationFailed(_) => ErrorKind::BadGateway,
            TrademarkError::Persistence(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable code clients switch on
    pub fn code(&self) -> &'static str {
        match self {
            TrademarkError::InvalidRequest(_) => codes::INVALID_REQUEST,
            TrademarkError::RateLimited { .. } => codes::RATE_LIMITED,
            TrademarkError::ProviderConfig => codes::PROVIDER_NOT_CONFIGURED,
            TrademarkError::GenerationFailed(_) => codes::GENERATION_FAILED,
            TrademarkError::Persistence(_) => codes::PERSISTENCE_FAILED,
        }
    }

    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        TrademarkError::Persistence(Box::new(err))
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            TrademarkError::Persistence(e) => {
                tracing::error!(error = %e, "Trademark persistence error");
            }
            TrademarkError::GenerationFailed(e) => {
                tracing::error!(error = %e, "Trademark generation failed");
            }
            TrademarkError::ProviderConfig => {
                tracing::error!("Text provider credential is not configured");
            }
            TrademarkError::RateLimited {
                quota,
                retry_after_ms,
                ..
            } => {
                tracing::warn!(quota = %quota, retry_after_ms, "Trademark rate limit exceeded");
            }
            TrademarkError::InvalidRequest(e) => {
                tracing::debug!(error = %e, "Invalid trademark request");
            }
        }
    }
}

impl From<sqlx::Error> for TrademarkError {
    fn from(err: sqlx::Error) -> Self {
        TrademarkError::persistence(err)
    }
}

impl From<QuotaStoreError> for TrademarkError {
    fn from(err: QuotaStoreError) -> Self {
        TrademarkError::persistence(err)
    }
}

impl From<TrademarkError> for AppError {
    fn from(err: TrademarkError) -> Self {
        let app = AppError::new(err.kind(), err.to_string()).with_code(err.code());
        match err {
            TrademarkError::RateLimited {
                quota,
                retry_after_ms,
                retry_after_secs,
            } => app
                .with_quota(quota)
                .with_retry_after_ms(retry_after_ms)
                .with_retry_after_secs(retry_after_secs),
            TrademarkError::InvalidRequest(e) => {
                app.with_action("Refresh the page and try again").with_source(e)
            }
            TrademarkError::GenerationFailed(e) => app.with_source(e),
            _ => app,
        }
    }
}

impl IntoResponse for TrademarkError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code_mapping() {
        let cases: Vec<(TrademarkError, StatusCode, &str)> = vec![
            (
                TrademarkError::InvalidRequest(IdentifierError::Empty),
                StatusCode::BAD_REQUEST,
                codes::INVALID_REQUEST,
            ),
            (
                TrademarkError::RateLimited {
                    quota: "minute".into(),
                    retry_after_ms: 0,
                    retry_after_secs: 0,
                },
                StatusCode::TOO_MANY_REQUESTS,
                codes::RATE_LIMITED,
            ),
            (
                TrademarkError::ProviderConfig,
                StatusCode::SERVICE_UNAVAILABLE,
                codes::PROVIDER_NOT_CONFIGURED,
            ),
            (
                TrademarkError::GenerationFailed(ProviderError::EmptyResponse.into()),
                StatusCode::BAD_GATEWAY,
                codes::GENERATION_FAILED,
            ),
            (
                TrademarkError::from(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::PERSISTENCE_FAILED,
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_code(), status);
            assert_eq!(error.kind().status_code(), status.as_u16());
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn test_messages_keep_client_substrings() {
        let tier = |quota: &str| {
            TrademarkError::RateLimited {
                quota: quota.into(),
                retry_after_ms: 0,
                retry_after_secs: 0,
            }
            .to_string()
        };
        assert!(tier("minute").contains("Rate limit"));
        assert!(tier("hour").contains("Hourly limit"));
        assert!(tier("day").contains("Daily limit"));
        assert!(
            TrademarkError::InvalidRequest(IdentifierError::MissingPrefix)
                .to_string()
                .contains("Invalid request")
        );
        assert!(
            TrademarkError::ProviderConfig
                .to_string()
                .contains("OpenAI API key")
        );
    }

    #[test]
    fn test_rate_limited_into_app_error() {
        let app: AppError = TrademarkError::RateLimited {
            quota: "minute".into(),
            retry_after_ms: 1_700_000_060_000,
            retry_after_secs: 60,
        }
        .into();

        assert_eq!(app.kind(), ErrorKind::TooManyRequests);
        assert_eq!(app.code(), Some(codes::RATE_LIMITED));
        assert_eq!(app.quota(), Some("minute"));
        assert_eq!(app.retry_after_ms(), Some(1_700_000_060_000));
        assert_eq!(app.retry_after_secs(), Some(60));
    }

    #[test]
    fn test_into_response_status() {
        let response = TrademarkError::ProviderConfig.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
