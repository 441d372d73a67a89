//! Client identification utilities
//!
//! Anonymous callers are partitioned by a best-effort fingerprint of the form
//! `fp-<base36 hash>`. The identifier is a rate-limit partition key and a
//! storage index key, never a credential: any well-formed value is accepted,
//! however the client computed it.

use axum::http::{HeaderMap, header};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

use crate::crypto::{is_base36_char, sha256_u64, to_base36};

/// Prefix every client identifier carries
pub const CLIENT_ID_PREFIX: &str = "fp-";

/// Maximum length of the hash part after the prefix
pub const CLIENT_ID_MAX_HASH_LEN: usize = 32;

/// Number of User-Agent characters folded into a derived fingerprint
const USER_AGENT_SIGNAL_LEN: usize = 50;

/// Error when an identifier does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Client identifier is empty")]
    Empty,

    #[error("Client identifier must start with 'fp-'")]
    MissingPrefix,

    #[error("Client identifier has no hash after the prefix")]
    TooShort,

    #[error("Client identifier hash is too long (max {max}, got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Client identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Opaque identifier for an anonymous caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientIdentifier(String);

impl ClientIdentifier {
    /// Validate a client-supplied identifier
    ///
    /// Accepts `fp-` followed by 1 to [`CLIENT_ID_MAX_HASH_LEN`] lowercase
    /// base 36 characters. No trimming or case folding is applied.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let hash = raw
            .strip_prefix(CLIENT_ID_PREFIX)
            .ok_or(IdentifierError::MissingPrefix)?;
        if hash.is_empty() {
            return Err(IdentifierError::TooShort);
        }
        let len = hash.chars().count();
        if len > CLIENT_ID_MAX_HASH_LEN {
            return Err(IdentifierError::TooLong {
                max: CLIENT_ID_MAX_HASH_LEN,
                actual: len,
            });
        }
        if let Some(bad) = hash.chars().find(|c| !is_base36_char(*c)) {
            return Err(IdentifierError::InvalidCharacter(bad));
        }
        Ok(Self(raw.to_string()))
    }

    /// Derive an identifier from request signals
    ///
    /// Equal signals always yield the same identifier; distinct callers may
    /// collide.
    pub fn derive(signals: &FingerprintSignals) -> Self {
        let hash = sha256_u64(signals.canonical().as_bytes());
        Self(format!("{CLIENT_ID_PREFIX}{}", to_base36(hash)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ClientIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Request signals folded into a derived fingerprint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintSignals {
    /// First 50 characters of the User-Agent
    pub user_agent: Option<String>,
    /// Accept-Language header
    pub language: Option<String>,
    /// Client IP address
    pub ip: Option<IpAddr>,
}

impl FingerprintSignals {
    /// Collect signals from request headers
    pub fn from_headers(headers: &HeaderMap, client_ip: Option<IpAddr>) -> Self {
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        Self {
            user_agent: header_str(header::USER_AGENT)
                .map(|ua| ua.chars().take(USER_AGENT_SIGNAL_LEN).collect()),
            language: header_str(header::ACCEPT_LANGUAGE).map(str::to_string),
            ip: client_ip,
        }
    }

    fn canonical(&self) -> String {
        format!(
            "ua={}\nlang={}\nip={}",
            self.user_agent.as_deref().unwrap_or(""),
            self.language.as_deref().unwrap_or(""),
            self.ip.map(|ip| ip.to_string()).unwrap_or_default(),
        )
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_accepts_well_formed() {
        let id = ClientIdentifier::parse("fp-abc123").unwrap();
        assert_eq!(id.as_str(), "fp-abc123");
        assert!(ClientIdentifier::parse("fp-0").is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(ClientIdentifier::parse(""), Err(IdentifierError::Empty));
        assert_eq!(
            ClientIdentifier::parse("abc123"),
            Err(IdentifierError::MissingPrefix)
        );
        assert_eq!(ClientIdentifier::parse("fp-"), Err(IdentifierError::TooShort));
        assert_eq!(
            ClientIdentifier::parse("fp-ABC"),
            Err(IdentifierError::InvalidCharacter('A'))
        );
        assert_eq!(
            ClientIdentifier::parse(" fp-abc"),
            Err(IdentifierError::MissingPrefix)
        );
        let long = format!("fp-{}", "a".repeat(CLIENT_ID_MAX_HASH_LEN + 1));
        assert!(matches!(
            ClientIdentifier::parse(&long),
            Err(IdentifierError::TooLong { .. })
        ));
    }

    #[test]
    fn test_derive_is_stable_and_well_formed() {
        let signals = FingerprintSignals {
            user_agent: Some("Mozilla/5.0 Test Browser".to_string()),
            language: Some("en-US".to_string()),
            ip: Some("192.168.1.1".parse().unwrap()),
        };
        let a = ClientIdentifier::derive(&signals);
        let b = ClientIdentifier::derive(&signals);
        assert_eq!(a, b);
        assert!(ClientIdentifier::parse(a.as_str()).is_ok());

        let other = FingerprintSignals {
            language: Some("ja-JP".to_string()),
            ..signals
        };
        assert_ne!(a, ClientIdentifier::derive(&other));
    }

    #[test]
    fn test_signals_from_headers_truncates_user_agent() {
        let mut headers = HeaderMap::new();
        let ua = "x".repeat(120);
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&ua).unwrap());
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let signals = FingerprintSignals::from_headers(&headers, None);
        assert_eq!(signals.user_agent.as_deref().map(str::len), Some(50));
        assert_eq!(signals.language.as_deref(), Some("en-US"));
        assert!(signals.ip.is_none());
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }
}
