//! HTTP surface: router construction and the server loop.

pub mod activity;
pub mod records;

use crate::config::Config;
use crate::db::{RecordStore, SharedStore};
use crate::errors::{AppError, AppResult};
use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRequest, State};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

// JSON extractor whose rejection is an AppError, so malformed bodies get the
// same `{"error": ...}` shape as every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub static_dir: PathBuf,
    pub activity_limit: usize,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(store: SharedStore, cfg: &Config) -> Self {
        Self {
            store,
            static_dir: PathBuf::from(&cfg.static_dir),
            activity_limit: cfg.activity_limit,
            body_limit: cfg.body_limit_bytes(),
        }
    }

    /// Run a store operation on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(&dyn RecordStore) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref())).await?
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /: landing page from the static dir, or a plain-text notice.
pub async fn index(State(state): State<AppState>) -> Response {
    let page = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&page).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => "AS management server is running".into_response(),
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /healthz
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let body_limit = state.body_limit;

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health))
        // Records
        .route(
            "/api/data/{category}",
            get(records::list)
                .post(records::create)
                .delete(records::delete_all),
        )
        .route(
            "/api/data/{category}/{id}",
            get(records::get_one)
                .put(records::update)
                .delete(records::delete_one),
        )
        .route("/api/bulk/{category}", post(records::bulk))
        .route("/api/reindex/{category}", post(records::reindex))
        .route("/api/next-no/{category}", get(records::next_no))
        // Dashboard and activity log
        .route("/api/dashboard", get(activity::dashboard))
        .route(
            "/api/activities",
            get(activity::list_recent).post(activity::record),
        )
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, serve until Ctrl-C / SIGTERM, then return so the caller can drop
/// the store.
pub async fn serve(cfg: &Config, store: SharedStore) -> AppResult<()> {
    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, backend = store.backend_name(), "AS management server listening");
    info!("open http://localhost:{} in a browser", cfg.port);

    let app = build_router(AppState::new(store, cfg));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
