//! Conversation engine adapters

mod llama;
mod mock;

pub use llama::LlamaConversationEngine;
pub use mock::MockConversationEngine;
