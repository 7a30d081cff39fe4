//! # Domain Layer
//!
//! Core models, the error type and pure domain services.
//! This layer is independent of external frameworks and infrastructure.

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
