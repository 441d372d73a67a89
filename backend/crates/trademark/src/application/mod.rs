//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod generate_names;
pub mod generator;
pub mod latest_names;
pub mod quota_status;
