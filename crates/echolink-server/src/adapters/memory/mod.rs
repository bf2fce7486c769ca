//! In-memory Repository Implementations

mod transcript_repository;

pub use transcript_repository::InMemoryTranscriptRepository;
