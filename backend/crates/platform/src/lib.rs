//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Client identification (fingerprint derivation, shape validation, client IP)
//! - Identity cookie management
//! - Hashing and base 36 encoding
//! - Wall-clock abstraction
//! - Rate limiting (token bucket, fixed window, multi-tier gate)

pub mod client;
pub mod clock;
pub mod cookie;
pub mod crypto;
pub mod rate_limit;
