//! Hospitality Bot server entry point.
//!
//! Wires configuration, storage backends, AI providers and the axum router.
//! Without a database section the service runs on in-memory repositories;
//! without redis the rate limiter is per process.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hospitality_bot::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, OpenAIConfig, OpenAIProvider,
};
use hospitality_bot::adapters::auth::JwtSessionValidator;
use hospitality_bot::adapters::http::{build_router, expose_internal_errors, AppState};
use hospitality_bot::adapters::memory::{
    InMemoryBusinessRepository, InMemoryConversationRepository, InMemoryKnowledgeRepository,
    InMemoryTouchpointRepository,
};
use hospitality_bot::adapters::postgres::{
    PostgresBusinessRepository, PostgresConversationRepository, PostgresKnowledgeRepository,
    PostgresTouchpointRepository,
};
use hospitality_bot::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig, RedisRateLimiter};
use hospitality_bot::application::ChatSettings;
use hospitality_bot::config::{AiConfig, AiProvider, AppConfig};
use hospitality_bot::ports::{AIError, AIProvider, RateLimiter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        database = config.database.is_some(),
        redis = config.redis.is_some(),
        fallback_only = config.ai.is_fallback_only(),
        "Starting hospitality bot"
    );

    let state = build_state(&config).await?;
    expose_internal_errors(config.features.verbose_errors);
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

async fn build_state(config: &AppConfig) -> Result<AppState, BoxError> {
    let mut state = AppState {
        businesses: Arc::new(InMemoryBusinessRepository::new()),
        knowledge: Arc::new(InMemoryKnowledgeRepository::new()),
        conversations: Arc::new(InMemoryConversationRepository::new()),
        touchpoints: Arc::new(InMemoryTouchpointRepository::new()),
        ai: build_ai_provider(&config.ai)?,
        sessions: Arc::new(JwtSessionValidator::new(&config.auth)),
        limiter: build_rate_limiter(config).await,
        chat: ChatSettings::from_config(&config.ai, &config.features),
        widget: config.widget.clone(),
    };

    match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .min_connections(database.min_connections)
                .max_connections(database.max_connections)
                .acquire_timeout(database.acquire_timeout())
                .connect(&database.url)
                .await?;

            if database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
            }

            state.businesses = Arc::new(PostgresBusinessRepository::new(pool.clone()));
            state.knowledge = Arc::new(PostgresKnowledgeRepository::new(pool.clone()));
            state.conversations = Arc::new(PostgresConversationRepository::new(pool.clone()));
            state.touchpoints = Arc::new(PostgresTouchpointRepository::new(pool));
        }
        None => {
            tracing::warn!("No database configured, using in-memory repositories; data is lost on restart");
        }
    }

    Ok(state)
}

/// Primary provider, wrapped with the fallback provider when one is keyed.
fn build_ai_provider(ai: &AiConfig) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    if ai.is_fallback_only() {
        tracing::warn!("No AI provider key configured, serving fallback replies only");
        return Ok(None);
    }

    let primary = provider(ai, ai.primary_provider)?.ok_or(AIError::NotConfigured)?;
    let mut failover = FailoverAIProvider::new(primary);

    if let Some(kind) = ai.fallback_provider.filter(|kind| *kind != ai.primary_provider) {
        match provider(ai, kind)? {
            Some(fallback) => failover = failover.with_fallback(fallback),
            None => tracing::warn!(provider = ?kind, "Fallback AI provider has no API key, ignoring"),
        }
    }

    Ok(Some(Arc::new(failover)))
}

fn provider(ai: &AiConfig, kind: AiProvider) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    let provider: Arc<dyn AIProvider> = match kind {
        AiProvider::Anthropic => {
            let Some(key) = ai.anthropic_api_key.as_ref().filter(|_| ai.has_anthropic()) else {
                return Ok(None);
            };
            Arc::new(AnthropicProvider::new(
                AnthropicConfig::new(key.expose_secret().as_str())
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            )?)
        }
        AiProvider::OpenAI => {
            let Some(key) = ai.openai_api_key.as_ref().filter(|_| ai.has_openai()) else {
                return Ok(None);
            };
            Arc::new(OpenAIProvider::new(
                OpenAIConfig::new(key.expose_secret().as_str())
                    .with_model(ai.openai_model.as_str())
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            )?)
        }
    };
    Ok(Some(provider))
}

/// Redis when configured and reachable, otherwise per-process counters.
async fn build_rate_limiter(config: &AppConfig) -> Arc<dyn RateLimiter> {
    let limits = RateLimitConfig::from(&config.widget);

    if let Some(redis_config) = &config.redis {
        match tokio::time::timeout(redis_config.timeout(), connect_redis(&redis_config.url)).await {
            Ok(Ok(conn)) => {
                tracing::info!("Using Redis rate limiter");
                return Arc::new(RedisRateLimiter::new(conn, limits));
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "Redis unavailable, using in-memory rate limiter"),
            Err(_) => tracing::warn!("Redis connection timed out, using in-memory rate limiter"),
        }
    }

    Arc::new(InMemoryRateLimiter::new(limits))
}

async fn connect_redis(url: &str) -> redis::RedisResult<redis::aio::MultiplexedConnection> {
    redis::Client::open(url)?
        .get_multiplexed_async_connection()
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
