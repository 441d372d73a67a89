//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// プロジェクト全体で使用する標準エラー型です。
/// ビルダーパターンを使用してエラーを構築できます。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `code` - 機械可読なエラーコード（UI はメッセージ文字列ではなくこれで分岐する）
/// * `message` - ユーザー向けのエラーメッセージ
/// * `action` - ユーザーが取るべきアクション（オプション）
/// * `quota` - 拒否したレート制限ティア名（オプション）
/// * `retry_after_ms` - 再試行可能になる時刻（epoch ミリ秒、オプション）
/// * `retry_after_secs` - 再試行までの待機秒数（`Retry-After` ヘッダー、オプション）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// // シンプルなエラー
/// let err = AppError::new(ErrorKind::BadRequest, "Invalid request");
///
/// // レート制限エラー
/// let err = AppError::too_many_requests("Rate limit exceeded")
///     .with_code("RATE_LIMITED")
///     .with_quota("minute")
///     .with_retry_after_ms(1_700_000_060_000);
/// assert_eq!(err.retry_after_ms(), Some(1_700_000_060_000));
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// 機械可読コード
    code: Option<&'static str>,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// ユーザーが取るべきアクション
    action: Option<Cow<'static, str>>,
    /// 拒否したティア名
    quota: Option<Cow<'static, str>>,
    /// 再試行可能時刻（epoch ミリ秒）
    retry_after_ms: Option<i64>,
    /// 再試行までの待機秒数
    retry_after_secs: Option<u64>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    ///
    /// ## Arguments
    /// * `kind` - エラー種別
    /// * `message` - ユーザー向けメッセージ
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            action: None,
            quota: None,
            retry_after_ms: None,
            retry_after_secs: None,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 400 Bad Request エラー
    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 404 Not Found エラー
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 409 Conflict エラー
    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// 429 Too Many Requests エラー
    #[inline]
    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// 502 Bad Gateway エラー
    #[inline]
    pub fn bad_gateway(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadGateway, message)
    }

    /// 503 Service Unavailable エラー
    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 機械可読コードを設定
    #[inline]
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// ユーザー向けアクションを設定
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::AppError;
    /// let err = AppError::bad_request("Invalid request")
    ///     .with_action("Refresh the page and try again");
    /// ```
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// 拒否したティア名を設定
    #[inline]
    pub fn with_quota(mut self, quota: impl Into<Cow<'static, str>>) -> Self {
        self.quota = Some(quota.into());
        self
    }

    /// 再試行可能時刻（epoch ミリ秒）を設定
    #[inline]
    pub fn with_retry_after_ms(mut self, retry_after_ms: i64) -> Self {
        self.retry_after_ms = Some(retry_after_ms);
        self
    }

    /// 再試行までの待機秒数を設定
    ///
    /// エラー生成時点の時計で計算した値を渡すこと。
    #[inline]
    pub fn with_retry_after_secs(mut self, retry_after_secs: u64) -> Self {
        self.retry_after_secs = Some(retry_after_secs);
        self
    }

    /// 元のエラーを設定（デバッグ用）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn read_config() -> AppResult<()> {
    ///     std::fs::read_to_string("config.json")
    ///         .map_err(|e| AppError::internal("Failed to read config").with_source(e))?;
    ///     Ok(())
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 機械可読コードを取得
    #[inline]
    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// アクションを取得
    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// ティア名を取得
    #[inline]
    pub fn quota(&self) -> Option<&str> {
        self.quota.as_deref()
    }

    /// 再試行可能時刻を取得
    #[inline]
    pub fn retry_after_ms(&self) -> Option<i64> {
        self.retry_after_ms
    }

    /// 再試行までの待機秒数を取得
    #[inline]
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after_secs
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// クライアントエラーかどうか
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        if let Some(code) = self.code {
            builder.field("code", &code);
        }
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(quota) = &self.quota {
            builder.field("quota", quota);
        }
        if let Some(retry_after_ms) = self.retry_after_ms {
            builder.field("retry_after_ms", &retry_after_ms);
        }
        if let Some(retry_after_secs) = self.retry_after_secs {
            builder.field("retry_after_secs", &retry_after_secs);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::BadRequest, "Invalid request");
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Invalid request");
        assert!(err.action().is_none());
        assert!(err.code().is_none());
        assert!(err.retry_after_ms().is_none());
        assert!(err.retry_after_secs().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::bad_request("test").status_code(), 400);
        assert_eq!(AppError::not_found("test").status_code(), 404);
        assert_eq!(AppError::conflict("test").status_code(), 409);
        assert_eq!(AppError::too_many_requests("test").status_code(), 429);
        assert_eq!(AppError::internal("test").status_code(), 500);
        assert_eq!(AppError::bad_gateway("test").status_code(), 502);
        assert_eq!(AppError::service_unavailable("test").status_code(), 503);
    }

    #[test]
    fn test_rate_limit_builder() {
        let err = AppError::too_many_requests("Hourly limit reached")
            .with_code("RATE_LIMITED")
            .with_quota("hour")
            .with_retry_after_ms(42)
            .with_retry_after_secs(1);
        assert_eq!(err.code(), Some("RATE_LIMITED"));
        assert_eq!(err.quota(), Some("hour"));
        assert_eq!(err.retry_after_ms(), Some(42));
        assert_eq!(err.retry_after_secs(), Some(1));
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppError::internal("Failed to read file").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::bad_gateway("Failed to generate trademarks");
        assert_eq!(err.to_string(), "[Bad Gateway] Failed to generate trademarks");

        let err_with_action = AppError::bad_request("Invalid request").with_action("Refresh");
        assert!(err_with_action.to_string().contains("Action:"));
    }
}
