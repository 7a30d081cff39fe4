mod anthropic_client;
mod duckdb_conversation_repository;
mod duckdb_index_repository;
mod duckdb_kv_store;
mod duckdb_library_ref_repository;
mod duckdb_quiz_repository;
mod file_content_extractor;
mod fs_bookmark_store;
mod in_memory_index_repository;
mod in_memory_stores;
mod ollama_client;
mod openai_client;
mod path_scoped_access;
mod tesseract_ocr;

pub use anthropic_client::*;
pub use duckdb_conversation_repository::*;
pub use duckdb_index_repository::*;
pub use duckdb_kv_store::*;
pub use duckdb_library_ref_repository::*;
pub use duckdb_quiz_repository::*;
pub use file_content_extractor::*;
pub use fs_bookmark_store::*;
pub use in_memory_index_repository::*;
pub use in_memory_stores::*;
pub use ollama_client::*;
pub use openai_client::*;
pub use path_scoped_access::*;
pub use tesseract_ocr::*;
