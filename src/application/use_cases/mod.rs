mod chat_session;
mod context_capture;
mod global_library;
mod index_files;
mod index_writer;
mod library;
mod provider_router;
mod search_chunks;
mod study_tools;

pub use chat_session::*;
pub use context_capture::*;
pub use global_library::*;
pub use index_files::*;
pub use index_writer::*;
pub use library::*;
pub use provider_router::*;
pub use search_chunks::*;
pub use study_tools::*;
