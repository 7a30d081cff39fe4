//! Domain services: the error type and pure text processing.

mod chunker;
mod error;

pub use chunker::*;
pub use error::*;
