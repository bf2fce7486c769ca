//! EchoLink Data Models
//!
//! - Call: REST API DTOs
//! - Twilio: webhook form payloads

mod call;
mod twilio;

pub use call::*;
pub use twilio::*;
