use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod adapters;
mod application;
mod auth;
mod config;
mod error;
mod models;
mod routes;

use adapters::{
    InMemoryTranscriptRepository, LlamaConversationEngine, MockConversationEngine,
    MockTelephonyGateway, PgTranscriptRepository, TwilioGateway,
};
use application::{CallFlowService, CallService, CallbackUrls, MockData};
use config::{AppConfig, TranscriptStoreKind};
use echolink::{ConversationEngine, DomainError, TelephonyGateway, TranscriptRepository};

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub call_flow: Arc<CallFlowService>,
    pub calls: Arc<CallService>,
}

impl AppState {
    /// Wire mock or live adapters according to `use_dummy_data`
    pub fn build(config: AppConfig, pool: PgPool) -> Result<Self, DomainError> {
        let transcripts: Arc<dyn TranscriptRepository> = match config.transcript_store {
            TranscriptStoreKind::Memory => Arc::new(InMemoryTranscriptRepository::new()),
            TranscriptStoreKind::Postgres => Arc::new(PgTranscriptRepository::new(pool)),
        };

        let (gateway, engine): (Arc<dyn TelephonyGateway>, Arc<dyn ConversationEngine>) =
            if config.use_dummy_data {
                (
                    Arc::new(MockTelephonyGateway::new(
                        config.dummy_calls.clone(),
                        &config.urls.app_base_url,
                    )),
                    Arc::new(MockConversationEngine::new(&config.dummy_conversation)),
                )
            } else {
                let credentials = config.twilio.clone().ok_or_else(|| {
                    DomainError::NotConfigured("Twilio credentials".to_string())
                })?;
                (
                    Arc::new(TwilioGateway::new(credentials)?),
                    Arc::new(LlamaConversationEngine::new(
                        &config.urls.llama_api_endpoint,
                        config.llama.clone(),
                    )?),
                )
            };

        tracing::info!(
            "📞 Telephony: {} | 🦙 Conversation: {} | 📝 Transcripts: {:?}",
            gateway.gateway_name(),
            engine.engine_name(),
            config.transcript_store
        );

        let call_flow = CallFlowService::new(config.call_flow_settings(), engine, transcripts.clone());

        let mut calls = CallService::new(
            gateway,
            transcripts,
            CallbackUrls {
                voice: config.urls.twilio_webhook.clone(),
                status: config.urls.twilio_status_callback.clone(),
            },
        );
        if config.use_dummy_data {
            calls = calls.with_mock_data(MockData {
                call_count: config.dummy_calls.len(),
                conversation: config.dummy_conversation.clone(),
            });
        }

        Ok(Self {
            config: Arc::new(config),
            call_flow: Arc::new(call_flow),
            calls: Arc::new(calls),
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("☎️  EchoLink API initializing...");

    let config = AppConfig::from_lookup(|key| {
        secrets.get(key).or_else(|| std::env::var(key).ok())
    })
    .context("Invalid EchoLink configuration")?;

    if config.use_dummy_data {
        tracing::warn!("⚠️  USE_DUMMY_DATA enabled - serving canned calls and replies");
    }
    if config.api_key.is_some() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No ECHOLINK_API_KEY set - authentication disabled");
    }
    tracing::debug!("Configuration: {:?}", config);
    tracing::debug!("Development tunnel: {}", config.urls.ngrok_url);

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("✅ Database migrations completed");

    let state = AppState::build(config, pool).context("Failed to initialize services")?;
    tracing::info!("🌐 Webhooks answer under {}", state.config.urls.app_base_url);

    let router = routes::build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ EchoLink API ready");

    Ok(router.into())
}
