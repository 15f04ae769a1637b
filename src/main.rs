use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use grading_worker::application::ports::{DeadLetterSink, LlmClient, TaskQueue};
use grading_worker::application::services::{
    GradingOrchestrator, QueueConsumer, RetryExecutor, RubricGrader, TranscriptionService,
};
use grading_worker::infrastructure::http::HttpAudioFetcher;
use grading_worker::infrastructure::llm::{ModelEndpoint, ModelRouter, OpenAiChatClient};
use grading_worker::infrastructure::observability::{init_tracing, TracingConfig};
use grading_worker::infrastructure::persistence::{create_pool, PgResultStore};
use grading_worker::infrastructure::queue::{self, RedisTaskQueue, RedisTranscriptCache};
use grading_worker::infrastructure::stt::WhisperClient;
use grading_worker::presentation::{create_router, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::from_env()?;

    init_tracing(&TracingConfig {
        json_format: environment.is_prod(),
    });
    tracing::info!(environment = %environment, "starting grading worker");

    // Long-lived shared resources, opened once and reused across tasks.
    let redis_conn = queue::connect(&settings.redis.url).await?;
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;

    let task_queue = Arc::new(RedisTaskQueue::new(
        redis_conn.clone(),
        settings.redis.grading_queue.clone(),
        settings.redis.dead_letter_queue.clone(),
    ));
    let transcript_cache = Arc::new(RedisTranscriptCache::new(redis_conn));
    let store = Arc::new(PgResultStore::new(pool));

    let llm_timeout = Duration::from_secs(settings.llm.timeout_secs);
    let primary: Arc<dyn LlmClient> = Arc::new(OpenAiChatClient::new(
        ModelEndpoint {
            model: settings.llm.model.clone(),
            api_base: settings.llm.api_base.clone(),
            api_key: settings.llm.api_key.clone(),
        },
        llm_timeout,
        settings.llm.temperature,
    )?);
    let fallback: Option<Arc<dyn LlmClient>> = match &settings.llm.fallback_model {
        Some(model) => Some(Arc::new(OpenAiChatClient::new(
            ModelEndpoint {
                model: model.clone(),
                api_base: settings
                    .llm
                    .fallback_api_base
                    .clone()
                    .unwrap_or_else(|| settings.llm.api_base.clone()),
                api_key: settings
                    .llm
                    .fallback_api_key
                    .clone()
                    .unwrap_or_else(|| settings.llm.api_key.clone()),
            },
            llm_timeout,
            settings.llm.temperature,
        )?)),
        None => None,
    };
    let router: Arc<dyn LlmClient> =
        Arc::new(ModelRouter::new(primary, fallback, settings.llm.retries));

    let fetcher = Arc::new(HttpAudioFetcher::new(Duration::from_secs(
        settings.stt.download_timeout_secs,
    ))?);
    let stt = Arc::new(WhisperClient::new(
        settings.stt.api_key.clone(),
        settings.stt.api_base.clone(),
        settings.stt.model.clone(),
        Duration::from_secs(settings.stt.timeout_secs),
    )?);

    let orchestrator = GradingOrchestrator::new(
        RubricGrader::new(router),
        TranscriptionService::new(fetcher, transcript_cache, stt),
    );
    let executor = RetryExecutor::new(
        orchestrator,
        store,
        task_queue.clone() as Arc<dyn DeadLetterSink>,
        settings.grading.max_retries,
    );
    let consumer = QueueConsumer::new(
        task_queue as Arc<dyn TaskQueue>,
        executor,
        Duration::from_secs(settings.grading.pop_timeout_secs),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("health endpoint listening on {}", addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, create_router()).await {
            tracing::error!(error = %e, "health server exited");
        }
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    consumer.run(shutdown_rx).await;

    Ok(())
}
