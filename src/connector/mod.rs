//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Storage (DuckDB, with in-memory fallbacks)
//! - Content extraction (text, PDF, OCR through tesseract)
//! - Language-model backends (OpenAI, Anthropic, Ollama)
//! - The CLI-facing container, router and controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
