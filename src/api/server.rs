//! HTTP server

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{StatusCode, Uri},
    routing::{any, get},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::compression::Compression;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::config::Config;
use crate::error::Result;
use crate::gateway;
use crate::templates::{Templates, ERROR_TEMPLATE, HOME_TEMPLATE, LOGIN_TEMPLATE};
use crate::ui;

use super::routes;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Application state shared across handlers
///
/// Everything here is immutable once serving starts; the session store does
/// its own locking.
pub struct AppState {
    pub config: Config,
    pub templates: Templates,
    pub sessions: Arc<dyn SessionStore>,
    pub http: reqwest::Client,
    pub public_dir: PathBuf,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: Config,
        templates: Templates,
        sessions: Arc<dyn SessionStore>,
        public_dir: PathBuf,
    ) -> Result<Self> {
        Ok(Self {
            config,
            templates,
            sessions,
            http: gateway::build_client()?,
            public_dir,
        })
    }
}

/// Build the application state from a config and a resources directory
///
/// Templates come from `<resources>/templates`, static files from
/// `<resources>/public`.
pub async fn build_state(config: Config, resources: &Path) -> Result<AppState> {
    let templates = Templates::load(&resources.join("templates"))?;
    templates.require(&[HOME_TEMPLATE, LOGIN_TEMPLATE, ERROR_TEMPLATE])?;
    tracing::info!(
        "Loaded templates: {}",
        templates.names().collect::<Vec<_>>().join(", ")
    );

    let sessions: Arc<dyn SessionStore> = match &config.session.path {
        Some(path) => Arc::new(FileSessionStore::open(path, config.session.max_age).await?),
        None => Arc::new(MemorySessionStore::new(config.session.max_age)),
    };

    AppState::new(config, templates, sessions, resources.join("public"))
}

/// Run the HTTP server
pub async fn run_server(state: SharedState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Starting HTTP server on {}", addr);

    spawn_session_cleanup(state.sessions.clone());

    let app = create_router(state);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let not_found = {
        let state = state.clone();
        move |uri: Uri| {
            let state = state.clone();
            async move {
                tracing::warn!("File not found: {}", uri.path());
                ui::http_error(&state, StatusCode::NOT_FOUND, "This file was not found")
            }
        }
    };
    let assets = Compression::new(
        ServeDir::new(&state.public_dir).not_found_service(not_found.into_service()),
    );

    Router::new()
        .route("/", get(ui::home).head(ui::home_head))
        .route("/login", get(ui::login_page).post(ui::login_submit))
        .route("/logout", any(ui::logout))
        // Standard base64 may contain '/', so take the rest of the path
        .route("/status/{*b64url}", get(routes::status))
        .route(
            "/proxy/{*b64url}",
            any(routes::proxy).layer(DefaultBodyLimit::disable()),
        )
        .fallback_service(assets)
        // Middleware
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop expired sessions
fn spawn_session_cleanup(sessions: Arc<dyn SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired session(s)", removed),
                Err(e) => tracing::warn!("Session cleanup failed: {}", e),
            }
        }
    })
}
