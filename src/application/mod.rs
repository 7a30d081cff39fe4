//! # Application Layer
//!
//! Interfaces at every I/O seam and the use cases that orchestrate them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
