mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use careerbot_api::routes;
use careerbot_api::{AppState, AppStateInner};
use careerbot_db::Database;
use careerbot_llm::{ChatProxy, OpenAiProvider};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "careerbot=debug,careerbot_api=debug,careerbot_db=debug,careerbot_llm=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // The store connects in the background; until it is up, auth and
    // conversation routes answer 503 and /api/health still passes.
    let db = Database::new(config.database_url.clone());
    if db.is_configured() {
        let connecting = db.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = connecting.connect() {
                warn!("Server will start, but authentication will not work: {}", e);
            }
        });
    } else {
        warn!("DATABASE_URL not set; authentication and conversations are disabled");
    }

    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY not set; /api/answer will return upstream errors");
    }
    let provider = OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_timeout,
    )?
    .with_base_url(config.openai_base_url.clone());
    let chat = ChatProxy::new(Arc::new(provider));
    info!("Chat proxy using model {}", chat.model());

    if !config.answer_requires_auth {
        warn!("/api/answer is not gated; set ANSWER_REQUIRES_AUTH=true to require a bearer token");
    }

    let state: AppState = Arc::new(AppStateInner {
        db: db.clone(),
        jwt_secret: config.jwt_secret.clone(),
        chat,
        answer_requires_auth: config.answer_requires_auth,
    });

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("CareerBOT server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = db.disconnect() {
        warn!("Error closing database: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
