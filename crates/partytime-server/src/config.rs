//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use partytime_shared::constants::{DEFAULT_HTTP_PORT, DEFAULT_MAX_UPLOAD_SIZE};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`, or `PORT` for `0.0.0.0:<port>`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Secret used to sign session tokens. Never rotated at runtime.
    /// Env: `JWT_SECRET`
    /// Default: a fixed development secret (logged as a warning).
    pub jwt_secret: String,

    /// Mark the session cookie `Secure`.
    /// Env: `COOKIE_SECURE` (true/false), or `NODE_ENV=production`
    /// Default: `false`
    pub cookie_secure: bool,

    /// Browser origin allowed to make credentialed cross-origin requests.
    /// Env: `FRONTEND_URL`
    /// Default: none (no cross-origin access).
    pub frontend_origin: Option<String>,

    /// Directory under which uploaded images are stored.
    /// Env: `UPLOAD_DIR`
    /// Default: `./uploads`
    pub upload_dir: PathBuf,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `./partytime.db`
    pub database_path: PathBuf,

    /// Maximum accepted image size in bytes.
    /// Env: `MAX_UPLOAD_SIZE`
    /// Default: 10 MiB
    pub max_upload_size: usize,

    /// Admin identity provisioned at startup if missing.
    /// Env: `ADMIN_USERNAME`
    pub admin_username: Option<String>,

    /// Env: `ADMIN_PASSWORD`
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("jwt_secret", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("frontend_origin", &self.frontend_origin)
            .field("upload_dir", &self.upload_dir)
            .field("database_path", &self.database_path)
            .field("max_upload_size", &self.max_upload_size)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cookie_secure: false,
            frontend_origin: None,
            upload_dir: PathBuf::from("./uploads"),
            database_path: PathBuf::from("./partytime.db"),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            admin_username: None,
            admin_password: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.http_addr.set_port(port),
                Err(_) => tracing::warn!(value = %port, "Invalid PORT, using default"),
            }
        }

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            config.jwt_secret = secret;
        }

        if lookup("NODE_ENV").as_deref() == Some("production") {
            config.cookie_secure = true;
        }
        if let Some(val) = lookup("COOKIE_SECURE") {
            config.cookie_secure = parse_bool(&val);
        }

        if let Some(origin) = lookup("FRONTEND_URL").filter(|s| !s.is_empty()) {
            config.frontend_origin = Some(origin);
        }

        if let Some(path) = lookup("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(path);
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(val) = lookup("MAX_UPLOAD_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_upload_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_UPLOAD_SIZE, using default"),
            }
        }

        config.admin_username = lookup("ADMIN_USERNAME").filter(|s| !s.is_empty());
        config.admin_password = lookup("ADMIN_PASSWORD").filter(|s| !s.is_empty());

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_bool(val: &str) -> bool {
    val != "false" && val != "0" && !val.is_empty()
}
