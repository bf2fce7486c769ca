//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the telephony gateway, conversation engine and transcript store.

mod call_flow_service;
mod call_service;
mod conversation_history;

pub use call_flow_service::CallFlowService;
pub use call_service::{CallPage, CallService, CallbackUrls, MockData};
pub use conversation_history::ConversationHistory;
