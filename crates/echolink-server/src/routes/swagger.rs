//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::models::{
    // Call models
    CallEntry,
    // Twilio webhook payloads
    CallStatusForm,
    CreateCallRequest,
    CreateCallResponse,
    ErrorResponse,
    ListCallsResponse,
    Pagination,
    RecordingResponse,
    SpeechInputForm,
    StatusCallbackResponse,
    TranscriptEntryResponse,
    VoiceWebhookForm,
};

use super::HealthCheck;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health_check,
        // Twilio webhooks
        super::twilio::voice,
        super::twilio::outbound_call,
        super::twilio::handle_input,
        super::twilio::call_status,
        // Call endpoints
        super::calls::list_calls,
        super::calls::create_call,
        super::calls::get_call,
        super::calls::list_recordings,
        super::calls::get_transcript,
    ),
    info(
        title = "EchoLink API",
        version = "0.1.0",
        description = "AI voice calling over Twilio, powered by Meta LLAMA 3.0.\n\nProvider webhooks drive each call; the REST API backs the dashboard.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Twilio", description = "Twilio voice webhooks (TwiML responses)"),
        (name = "Calls", description = "Calls - place calls and read their history"),
    ),
    components(
        schemas(
            HealthCheck,
            // Twilio
            VoiceWebhookForm,
            SpeechInputForm,
            CallStatusForm,
            StatusCallbackResponse,
            // Calls
            CallEntry,
            Pagination,
            ListCallsResponse,
            CreateCallRequest,
            CreateCallResponse,
            RecordingResponse,
            TranscriptEntryResponse,
            ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
)]
pub struct ApiDoc;
