// src/main.rs

use std::{sync::Arc, time::Duration};

use mindmate::{
    clients::{ArxivClient, CompletionService, DocumentExtractor, OpenAiClient},
    config::Config,
    quiz::{SessionRegistry, spawn_ticker},
    routes,
    services::Orchestrator,
    state::AppState,
    storage::{FileStore, FlashcardStore, HistoryStore, KeyValueStore},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (reads .env if present)
    let (config, config_warnings) = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    // Persisted collections
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir)?);
    tracing::info!("Storage ready in {}", config.storage_dir);

    let llm = OpenAiClient::from_config(&config).map(|client| {
        tracing::info!("Completion API configured, model: {}", config.openai_model);
        Arc::new(client) as Arc<dyn CompletionService>
    });
    if llm.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; LLM-backed endpoints will fail");
    }

    let quizzes = SessionRegistry::new(HistoryStore::new(kv.clone()), config.quiz_time_limit);
    let _ticker = spawn_ticker(quizzes.clone(), Duration::from_secs(1));

    // Create AppState
    let state = AppState {
        config: config.clone(),
        orchestrator: Orchestrator::new(llm),
        papers: Arc::new(ArxivClient::new(&config)),
        extractor: Arc::new(DocumentExtractor),
        flashcards: FlashcardStore::new(kv),
        quizzes,
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
