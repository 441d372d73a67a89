//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (GeneratedName, ResultBatch)
//! - Domain services (tolerant response parsing)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
