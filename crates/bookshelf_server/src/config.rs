//! Server configuration.
//!
//! Every setting has a default; environment variables override them.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URI` | `sqlite://<temp dir>/bookshelf.sqlite3` |
//! | `BOOKSHELF_HOST` | `0.0.0.0` |
//! | `BOOKSHELF_PORT` | `3030` |
//! | `BOOKSHELF_LOG_LEVEL` | `debug` in debug builds, `info` otherwise |
//! | `BOOKSHELF_LOG_DIR` | `<temp dir>/bookshelf-logs` |
//! | `BOOKSHELF_STATIC_DIR` | this crate's `static/` directory |

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATABASE_URI_ENV: &str = "DATABASE_URI";
pub const HOST_ENV: &str = "BOOKSHELF_HOST";
pub const PORT_ENV: &str = "BOOKSHELF_PORT";
pub const LOG_LEVEL_ENV: &str = "BOOKSHELF_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKSHELF_LOG_DIR";
pub const STATIC_DIR_ENV: &str = "BOOKSHELF_STATIC_DIR";

const DATABASE_FILE_NAME: &str = "bookshelf.sqlite3";
const SQLITE_SCHEME: &str = "sqlite://";
const FILE_SCHEME: &str = "file:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
    UnsupportedDatabaseUri(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(value) => write!(f, "invalid {PORT_ENV} value `{value}`"),
            Self::UnsupportedDatabaseUri(value) => write!(
                f,
                "unsupported {DATABASE_URI_ENV} `{value}`; expected sqlite://<path>, file:<path> or a path"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Bookshelf server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Store connection address.
    #[serde(default = "default_database_uri")]
    pub database_uri: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_database_uri() -> String {
    format!(
        "{SQLITE_SCHEME}{}",
        std::env::temp_dir().join(DATABASE_FILE_NAME).display()
    )
}

fn default_log_level() -> String {
    bookshelf_core::default_log_level().to_string()
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("bookshelf-logs")
}

fn default_static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_uri: default_database_uri(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(host) = get(HOST_ENV) {
            config.host = host;
        }
        if let Some(port) = get(PORT_ENV) {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(uri) = get(DATABASE_URI_ENV) {
            config.database_uri = uri;
        }
        if let Some(level) = get(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(dir) = get(LOG_DIR_ENV) {
            config.log_dir = absolute(PathBuf::from(dir));
        }
        if let Some(dir) = get(STATIC_DIR_ENV) {
            config.static_dir = PathBuf::from(dir);
        }

        config.database_path()?;
        Ok(config)
    }

    /// Creates a default config bound to `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Resolves `database_uri` to the SQLite file it names.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_database_path(&self.database_uri)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts `sqlite://<path>`, `file:<path>` or a bare path.
pub fn resolve_database_path(uri: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = uri.trim();
    let path = if let Some(rest) = trimmed.strip_prefix(SQLITE_SCHEME) {
        rest
    } else if let Some(rest) = trimmed.strip_prefix(FILE_SCHEME) {
        rest
    } else if trimmed.contains("://") {
        return Err(ConfigError::UnsupportedDatabaseUri(trimmed.to_string()));
    } else {
        trimmed
    };

    if path.is_empty() || path == ":memory:" {
        return Err(ConfigError::UnsupportedDatabaseUri(trimmed.to_string()));
    }
    Ok(PathBuf::from(path))
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3030);
        assert!(config.database_uri.starts_with("sqlite://"));
        assert!(config.log_dir.is_absolute());
        assert_eq!(
            config.database_path().unwrap(),
            std::env::temp_dir().join("bookshelf.sqlite3")
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides_defaults_and_blank_values_are_ignored() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (PORT_ENV, "9000"),
            (DATABASE_URI_ENV, "file:/var/lib/bookshelf/books.db"),
            (HOST_ENV, "   "),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/var/lib/bookshelf/books.db")
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[(PORT_ENV, "http")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("http".to_string()));
    }

    #[test]
    fn test_resolve_database_path_schemes() {
        assert_eq!(
            resolve_database_path("sqlite:///tmp/a.db").unwrap(),
            PathBuf::from("/tmp/a.db")
        );
        assert_eq!(
            resolve_database_path("books.db").unwrap(),
            PathBuf::from("books.db")
        );
        assert!(matches!(
            resolve_database_path("mongodb://localhost:27017"),
            Err(ConfigError::UnsupportedDatabaseUri(_))
        ));
        assert!(resolve_database_path("sqlite://").is_err());
    }
}
