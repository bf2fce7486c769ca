//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod call_direction;
mod call_duration;
mod call_status;
mod speaker;

pub use call_direction::*;
pub use call_duration::*;
pub use call_status::*;
pub use speaker::*;
