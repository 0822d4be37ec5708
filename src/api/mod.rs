//! HTTP layer exposing stored files and their analyses.

pub mod extract;
pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Settings,
    data::{FileStore, SqliteFileStore},
    nlp::ner::{self, Ner},
};

/// Collaborators built once at start-up and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FileStore>,
    pub ner: Arc<dyn Ner>,
    /// Largest accepted request body on `POST /upload_file`.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Open the database and load the NER model described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store = SqliteFileStore::open(&settings.database_path)?;
        Ok(Self {
            store: Arc::new(store),
            ner: ner::load_model(settings),
            max_upload_bytes: settings.max_upload_bytes,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    Router::new()
        .route("/", get(routes::root))
        .route("/upload_file", post(routes::upload_file).layer(upload_limit))
        .route("/file", get(routes::list_files))
        .route("/file/:file_id", get(routes::get_file))
        .route("/file/:file_id/tokens", get(routes::get_tokens))
        .route("/file/:file_id/words", get(routes::get_tokens))
        .route("/file/:file_id/sentiment", get(routes::get_sentiment))
        .route("/file/:file_id/named_entities", get(routes::get_named_entities))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let state = AppState::from_settings(&settings)?;
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving docsense API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
