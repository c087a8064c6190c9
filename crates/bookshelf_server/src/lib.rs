//! HTTP gateway for the Bookshelf catalog.
//!
//! Maps verbs and paths onto `bookshelf_core` services and renders results
//! as JSON or HTML.

pub mod book_routes;
pub mod config;
pub mod error;
pub mod request_log;
pub mod server;
pub mod state;
pub mod view_routes;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use server::{build_router, HttpServer, ServerError};
pub use state::AppState;
