mod bookmark_store;
mod capture_strategy;
mod chat_backend;
mod content_extractor;
mod conversation_repository;
mod index_repository;
mod key_value_store;
mod library_ref_repository;
mod ocr_service;
mod quiz_repository;
mod scoped_access;

pub use bookmark_store::*;
pub use capture_strategy::*;
pub use chat_backend::*;
pub use content_extractor::*;
pub use conversation_repository::*;
pub use index_repository::*;
pub use key_value_store::*;
pub use library_ref_repository::*;
pub use ocr_service::*;
pub use quiz_repository::*;
pub use scoped_access::*;
