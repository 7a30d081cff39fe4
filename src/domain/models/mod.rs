mod conversation;
mod file_kind;
mod indexed_file;
mod library_file_ref;
mod project;
mod provider;
mod quiz;
mod search_result;

pub use conversation::*;
pub use file_kind::*;
pub use indexed_file::*;
pub use library_file_ref::*;
pub use project::*;
pub use provider::*;
pub use quiz::*;
pub use search_result::*;

/// Current unix time in seconds.
pub fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
