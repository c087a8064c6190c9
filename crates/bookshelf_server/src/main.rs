//! Bookshelf server entry point.

use std::process::ExitCode;

use bookshelf_server::{HttpServer, ServerConfig};
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bookshelf: {err}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = config.log_dir.to_string_lossy().into_owned();
    if let Err(err) = bookshelf_core::init_logging(&config.log_level, &log_dir, true) {
        eprintln!("bookshelf: {err}");
        return ExitCode::FAILURE;
    }

    let server = match HttpServer::with_config(config) {
        Ok(server) => server,
        Err(err) => {
            error!("event=server_start module=gateway status=error error={err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = server.start().await {
        error!("event=server_start module=gateway status=error error={err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
