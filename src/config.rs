//! Runtime configuration.
//!
//! Settings come from `TODO_*` environment variables with documented
//! defaults. The binary layers CLI flags on top through the `with_*`
//! builders, giving the precedence CLI flag > env var > default. An env
//! file can seed the process environment before any of this is read.

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_DIR_NAME: &str = ".todo-list-mcp";
pub const DEFAULT_DB_FILE: &str = "todos.sqlite";
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 4041;
pub const DEFAULT_SSE_PATH: &str = "/sse";
pub const DEFAULT_MESSAGES_PATH: &str = "/messages";
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the SQLite file
    pub db_folder: PathBuf,
    /// SQLite file name inside `db_folder`
    pub db_file: String,
    /// Host name or address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path of the SSE connect endpoint
    pub sse_path: String,
    /// Path of the message POST endpoint
    pub messages_path: String,
    /// Scheme expected in the `Authorization` header
    pub auth_scheme: String,
    /// Shared secret; `None` disables authentication
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_folder: default_db_folder(),
            db_file: DEFAULT_DB_FILE.to_string(),
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            sse_path: DEFAULT_SSE_PATH.to_string(),
            messages_path: DEFAULT_MESSAGES_PATH.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            auth_token: None,
        }
    }
}

impl Config {
    /// Build configuration from the process environment.
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        Self {
            db_folder: var("TODO_DB_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_folder),
            db_file: var("TODO_DB_FILE").unwrap_or(defaults.db_file),
            host: var("TODO_HTTP_HOST").unwrap_or(defaults.host),
            port: parse_port(var("TODO_HTTP_PORT").as_deref(), DEFAULT_HTTP_PORT),
            sse_path: var("TODO_HTTP_SSE_PATH").unwrap_or(defaults.sse_path),
            messages_path: var("TODO_HTTP_MESSAGES_PATH").unwrap_or(defaults.messages_path),
            auth_scheme: var("TODO_HTTP_AUTH_SCHEME")
                .map(|scheme| scheme.trim().to_string())
                .unwrap_or(defaults.auth_scheme),
            auth_token: normalize_token(var("TODO_HTTP_AUTH_TOKEN").as_deref()),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_db_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.db_folder = folder.into();
        self
    }

    pub fn with_db_file(mut self, file: impl Into<String>) -> Self {
        self.db_file = file.into();
        self
    }

    /// Set the shared secret. Blank tokens disable authentication.
    pub fn with_auth_token(mut self, token: Option<&str>) -> Self {
        self.auth_token = normalize_token(token);
        self
    }

    pub fn with_auth_scheme(mut self, scheme: &str) -> Self {
        self.auth_scheme = scheme.trim().to_string();
        self
    }

    /// Full path of the SQLite file
    pub fn db_path(&self) -> PathBuf {
        self.db_folder.join(&self.db_file)
    }

    /// `http://host:port`, bracketing bare IPv6 hosts.
    pub fn base_url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("http://{}:{}", host, self.port)
    }

    pub fn sse_url(&self) -> String {
        format!("{}{}", self.base_url(), self.sse_path)
    }

    pub fn messages_url(&self) -> String {
        format!("{}{}", self.base_url(), self.messages_path)
    }

    pub fn requires_auth(&self) -> bool {
        self.auth_token.is_some()
    }

    /// The exact `Authorization` header value clients must send.
    pub fn expected_auth_header(&self) -> Option<String> {
        self.auth_token
            .as_ref()
            .map(|token| format!("{} {}", self.auth_scheme, token))
    }
}

/// Load `KEY=value` pairs from an env file into the process environment.
///
/// Without an explicit path, `.env` is searched for from the working
/// directory upward and a missing file is fine. Variables already set in the
/// process are never overwritten. Returns the file that was loaded.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    match path {
        Some(path) => dotenvy::from_path(path).map(|()| Some(path.to_path_buf())),
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e),
        },
    }
}

/// `~/.todo-list-mcp`, or a relative directory when there is no home.
pub fn default_db_folder() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DB_DIR_NAME)
}

fn normalize_token(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn parse_port(value: Option<&str>, fallback: u16) -> u16 {
    value
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .filter(|port| *port > 0)
        .unwrap_or(fallback)
}
