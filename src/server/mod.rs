//! Local web server: the HTML page plus the JSON session API.

mod handlers;
mod page;

pub use handlers::{status_for, ApiError};

use crate::cli::{open_browser, Output};
use crate::config::{Prompts, Settings};
use crate::session::{OpenAISessionFactory, SessionStore};
use crate::transcript::{TranscriptFetcher, YoutubeTranscriptSource};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state.
pub struct AppState {
    pub sessions: SessionStore,
}

/// Build the application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(page::index_page))
        .route("/health", get(handlers::health))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/{id}/video", post(handlers::load_video))
        .route("/api/sessions/{id}/questions", post(handlers::ask_question))
        .route(
            "/api/sessions/{id}/transcript",
            get(handlers::download_transcript),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Wire up the real YouTube and OpenAI backends and serve until Ctrl+C.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let source = YoutubeTranscriptSource::new(settings.youtube.languages.clone())?;
    let fetcher = TranscriptFetcher::new(Arc::new(source), settings.youtube.fetch_title);
    let factory = OpenAISessionFactory::new(settings.clone(), prompts, fetcher);

    let state = Arc::new(AppState {
        sessions: SessionStore::new(Arc::new(factory), settings.server.session_idle_minutes),
    });
    let app = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let url = format!("http://{}", listener.local_addr()?);

    Output::header("YouTube Video Q&A");
    println!();
    Output::success(&format!("Listening on {}", url));
    Output::kv("Chat model", &settings.llm.model);
    Output::kv("Embeddings", &settings.embedding.model);
    Output::kv("Vector store", &settings.vector_store.backend.to_string());
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    if settings.server.open_browser {
        if let Err(e) = open_browser(&url) {
            warn!("Could not open a browser: {}", e);
            Output::warning(&format!("Open {} in your browser.", url));
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
