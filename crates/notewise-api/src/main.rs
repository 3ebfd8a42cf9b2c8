//! notewise-api - HTTP API server for notewise

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notewise_api::{router, ApiConfig, AppState, RetrievalConfig};
use notewise_core::RetrievalBackend;
use notewise_db::{Database, SupabaseRpc};
use notewise_inference::{GeminiBackend, NoteEnrichmentPipeline};
use notewise_search::SearchOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "notewise_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notewise_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Daily-rotated file output when LOG_FILE is set
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notewise-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ApiConfig::from_env()?;

    // Gemini serves both analysis and embeddings
    let gemini = Arc::new(GeminiBackend::new(config.gemini.clone())?);

    let retrieval: Arc<dyn RetrievalBackend> = match &config.retrieval {
        RetrievalConfig::Supabase(supabase) => {
            info!(url = %supabase.url, "Using Supabase RPC retrieval");
            Arc::new(SupabaseRpc::new(supabase.clone())?)
        }
        RetrievalConfig::Postgres {
            database_url,
            migrate_on_startup,
            pool,
        } => {
            info!("Connecting to database...");
            let db = Database::connect_with_config(database_url, pool).await?;
            if *migrate_on_startup {
                info!("Running database migrations...");
                db.migrate().await?;
            }
            Arc::new(db.retrieval)
        }
    };

    let pipeline = NoteEnrichmentPipeline::new(gemini.clone(), gemini.clone())
        .with_language(config.analysis_language.clone());
    let search = SearchOrchestrator::new(gemini, retrieval);

    let app = router(AppState::new(pipeline, search), &config.http);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
