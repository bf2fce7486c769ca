//! Service Ports
//!
//! Abstract interfaces for external services.

mod conversation_engine;
mod telephony_gateway;

pub use conversation_engine::*;
pub use telephony_gateway::*;
