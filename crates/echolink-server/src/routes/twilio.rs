//! Twilio Webhook Routes
//!
//! Every voice webhook answers 200 with TwiML, falling back to the spoken
//! apology when the request cannot be handled.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};

use echolink::{
    call_flow::{CALL_STATUS_PATH, HANDLE_INPUT_PATH, OUTBOUND_CALL_PATH, VOICE_PATH},
    ProviderCallStatus, VoiceResponse,
};

use crate::models::{
    CallStatusForm, ErrorResponse, SpeechInputForm, StatusCallbackResponse, VoiceWebhookForm,
};
use crate::AppState;

fn twiml(document: VoiceResponse) -> Response {
    (
        [(header::CONTENT_TYPE, "text/xml")],
        document.to_xml(),
    )
        .into_response()
}

/// Inbound call connected
#[utoipa::path(
    post,
    path = "/api/twilio/voice",
    request_body(content = VoiceWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Greeting and speech gather", content_type = "text/xml", body = String)
    ),
    tag = "Twilio"
)]
pub async fn voice(
    State(state): State<AppState>,
    form: Result<Form<VoiceWebhookForm>, FormRejection>,
) -> Response {
    let document = match form {
        Ok(Form(form)) => state.call_flow.inbound_entry(&form.call_sid, &form.from, &form.to),
        Err(e) => {
            tracing::error!("Error handling incoming call: {}", e);
            state.call_flow.apology()
        }
    };

    twiml(document)
}

/// Outbound call answered
#[utoipa::path(
    post,
    path = "/api/twilio/outbound-call",
    request_body(content = VoiceWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Greeting and speech gather", content_type = "text/xml", body = String)
    ),
    tag = "Twilio"
)]
pub async fn outbound_call(
    State(state): State<AppState>,
    form: Result<Form<VoiceWebhookForm>, FormRejection>,
) -> Response {
    let document = match form {
        Ok(Form(form)) => state.call_flow.outbound_entry(&form.call_sid, &form.from, &form.to),
        Err(e) => {
            tracing::error!("Error handling outbound call: {}", e);
            state.call_flow.apology()
        }
    };

    twiml(document)
}

/// Caller speech collected by a gather
#[utoipa::path(
    post,
    path = "/api/twilio/handle-input",
    request_body(content = SpeechInputForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Spoken reply and next gather, or an apology", content_type = "text/xml", body = String)
    ),
    tag = "Twilio"
)]
pub async fn handle_input(
    State(state): State<AppState>,
    form: Result<Form<SpeechInputForm>, FormRejection>,
) -> Response {
    let document = match form {
        Ok(Form(form)) => {
            if let Some(confidence) = form.confidence.as_deref() {
                tracing::debug!("Speech confidence for call {}: {}", form.call_sid, confidence);
            }
            state
                .call_flow
                .handle_speech(&form.call_sid, form.speech_result.as_deref())
                .await
        }
        Err(e) => {
            tracing::error!("Error handling speech input: {}", e);
            state.call_flow.apology()
        }
    };

    twiml(document)
}

/// Call lifecycle update
#[utoipa::path(
    post,
    path = "/api/twilio/call-status",
    request_body(content = CallStatusForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Update accepted", body = StatusCallbackResponse),
        (status = 500, description = "Transcript could not be stored", body = ErrorResponse)
    ),
    tag = "Twilio"
)]
pub async fn call_status(
    State(state): State<AppState>,
    form: Result<Form<CallStatusForm>, FormRejection>,
) -> Response {
    let failed = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to process call status update".to_string(),
            }),
        )
            .into_response()
    };

    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::error!("Error handling call status update: {}", e);
            return failed();
        }
    };

    if let Some(duration) = form.call_duration.as_deref() {
        tracing::debug!("Call {} lasted {}s", form.call_sid, duration);
    }

    let status = ProviderCallStatus::from(form.call_status.as_str());
    match state.call_flow.handle_status(&form.call_sid, &status).await {
        Ok(_) => Json(StatusCallbackResponse { success: true }).into_response(),
        Err(e) => {
            tracing::error!("Error handling call status update for {}: {}", form.call_sid, e);
            failed()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(VOICE_PATH, post(voice))
        .route(OUTBOUND_CALL_PATH, post(outbound_call))
        .route(HANDLE_INPUT_PATH, post(handle_input))
        .route(CALL_STATUS_PATH, post(call_status))
}
