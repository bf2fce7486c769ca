//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Call: A provider-owned phone call
//! - TranscriptEntry: One spoken line of a call
//! - Recording: Audio captured for a call

mod call;
mod recording;
mod transcript;

pub use call::*;
pub use recording::*;
pub use transcript::*;
