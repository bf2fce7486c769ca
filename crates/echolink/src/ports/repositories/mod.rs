//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod transcript_repository;

pub use transcript_repository::*;
