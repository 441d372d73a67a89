//! Trademark Name Generation Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, tolerant response parsing, repository traits
//! - `application/` - Use cases, prompt construction, provider seam, configuration
//! - `infra/` - PostgreSQL and in-memory stores, OpenAI-compatible provider
//! - `presentation/` - HTTP handlers
//!
//! ## Request Model
//! - Callers are anonymous; a `fp-…` client identifier partitions quotas and history
//! - The identifier is validated for shape only and is never a credential
//! - Quotas (minute / hour / day) are checked in order before the provider is called
//! - Quota spent on a request is not refunded if generation later fails
//! - Names are returned only after their batch is durably stored

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{ProviderSettings, TrademarkConfig};
pub use error::{TrademarkError, TrademarkResult};
pub use infra::memory::InMemoryTrademarkRepository;
pub use infra::openai::OpenAiProvider;
pub use infra::postgres::PgTrademarkRepository;
pub use presentation::router::{trademark_router, trademark_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
