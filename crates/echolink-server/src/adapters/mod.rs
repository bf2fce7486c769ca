//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod conversation;
pub mod memory;
pub mod postgres;
pub mod telephony;

// Re-exports
pub use conversation::{LlamaConversationEngine, MockConversationEngine};
pub use memory::InMemoryTranscriptRepository;
pub use postgres::PgTranscriptRepository;
pub use telephony::{MockTelephonyGateway, TwilioGateway};
