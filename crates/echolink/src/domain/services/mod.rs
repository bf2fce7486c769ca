//! Domain Services
//!
//! Stateless logic that builds the documents returned to the provider.

pub mod call_flow;
mod voice_response;

pub use call_flow::CallFlowSettings;
pub use voice_response::*;
