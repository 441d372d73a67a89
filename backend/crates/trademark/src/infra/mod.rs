//! Infrastructure Layer
//!
//! Storage backends and the external text provider.

pub mod memory;
pub mod openai;
pub mod postgres;
