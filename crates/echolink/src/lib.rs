//! EchoLink Domain Library
//!
//! Core domain types and interfaces for the EchoLink voice gateway.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Call, TranscriptEntry, Recording)
//!   - `value_objects/`: Immutable value types (ProviderCallStatus, DisplayStatus, CallDuration, Speaker)
//!   - `services/`: Voice markup builder and the call-flow documents
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Transcript persistence
//!   - `services/`: Telephony gateway and conversation engine
//!
//! # Usage
//!
//! ```rust,ignore
//! use echolink::domain::call_flow;
//! use echolink::{CallFlowSettings, TelephonyGateway};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    call_flow, Call, CallDirection, CallDuration, CallFlowSettings, CreateCallParams,
    DisplayStatus, DomainError, Gather, ProviderCallStatus, Recording, Say, Speaker,
    StatusFilter, TranscriptEntry, Verb, VoiceResponse,
};
pub use ports::{
    CallFilter, ConversationEngine, RecordingFilter, TelephonyGateway, TranscriptRepository,
};
