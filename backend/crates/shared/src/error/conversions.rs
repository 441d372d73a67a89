//! Error conversions - HTTP rendering of `AppError`
//!
//! Problem Details body plus the `Retry-After` header (feature `axum`).

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "code": self.code(),
            "detail": self.message(),
            "action": self.action(),
            "quota": self.quota(),
            "retryAfter": self.retry_after_ms(),
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(retry_after_secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "axum")]
    use super::*;

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_sets_retry_after_header() {
        use axum::response::IntoResponse;

        let response = AppError::too_many_requests("Rate limit exceeded")
            .with_code("RATE_LIMITED")
            .with_retry_after_ms(1_700_000_060_000)
            .with_retry_after_secs(42)
            .into_response();
        assert_eq!(response.status().as_u16(), 429);
        assert_eq!(response.headers()["retry-after"], "42");
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_retry_after_header_needs_explicit_seconds() {
        use axum::response::IntoResponse;

        let response = AppError::too_many_requests("Rate limit exceeded")
            .with_retry_after_ms(1_700_000_060_000)
            .into_response();
        assert!(!response.headers().contains_key("retry-after"));
    }
}
