//! # HTTP Server
//!
//! Combines the JSON API, HTML views and static assets into one router.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Json, Router};
use bookshelf_core::core_version;
use bookshelf_core::db::{open_db, DbError};
use log::info;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use super::book_routes::book_routes;
use super::config::{ConfigError, ServerConfig};
use super::request_log::log_requests;
use super::state::AppState;
use super::view_routes::view_routes;

/// Startup failure.
#[derive(Debug)]
pub enum ServerError {
    Config(ConfigError),
    Store(DbError),
    Io(io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "store bootstrap failed: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for ServerError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// HTTP server for the bookshelf catalog.
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn with_config(config: ServerConfig) -> Result<Self, ServerError> {
        let state = Arc::new(AppState::new(config.database_path()?));
        let router = build_router(state, &config.static_dir);
        Ok(Self { config, router })
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Migrates the store, binds, and serves until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        let db_path = self.config.database_path()?;
        open_db(&db_path).map_err(ServerError::Store)?;
        info!(
            "event=store_ready module=gateway status=ok path={}",
            db_path.display()
        );

        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "invalid socket address")
        })?;
        let listener = TcpListener::bind(addr).await?;
        info!(
            "event=server_start module=gateway status=ok addr={} version={}",
            addr,
            core_version()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("event=server_stop module=gateway status=ok");
        Ok(())
    }
}

/// Builds the full router over `state`.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(view_routes(state.clone()))
        .nest("/api", book_routes(state))
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .layer(middleware::from_fn(log_requests))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "version": core_version() }))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_with_custom_port() {
        let config = ServerConfig::with_port(8080);
        let server = HttpServer::with_config(config).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_server_rejects_unsupported_database_uri() {
        let config = ServerConfig {
            database_uri: "mongodb://localhost:27017".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            HttpServer::with_config(config),
            Err(ServerError::Config(_))
        ));
    }
}
