//! Telephony gateway adapters

mod mock;
mod twilio;

pub use mock::MockTelephonyGateway;
pub use twilio::TwilioGateway;
