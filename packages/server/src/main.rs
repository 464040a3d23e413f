use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tubeblog_server::config::AppConfig;
use tubeblog_server::repository::SeaOrmArticles;
use tubeblog_server::state::AppState;
use tubeblog_server::summarizer::GeminiSummarizer;
use tubeblog_server::youtube::YoutubeTranscripts;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tubeblog_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = tubeblog_server::database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let transcripts = YoutubeTranscripts::new(Duration::from_secs(
        config.transcript.request_timeout_secs,
    ))
    .context("Failed to build transcript client")?;
    let summarizer =
        GeminiSummarizer::new(&config.generation).context("Failed to build generation client")?;

    info!(
        model = %config.generation.model,
        language = %config.transcript.language,
        "Clients configured"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        articles: Arc::new(SeaOrmArticles::new(db.clone())),
        transcripts: Arc::new(transcripts),
        summarizer: Arc::new(summarizer),
        db,
        config,
    };

    let app = tubeblog_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
