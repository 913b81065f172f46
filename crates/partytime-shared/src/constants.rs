/// Application name
pub const APP_NAME: &str = "PartyTime";

/// Cookie that carries the session token
pub const TOKEN_COOKIE: &str = "token";

/// Session token validity window in seconds (24 hours)
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// URL prefix under which uploaded images are served
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Multipart field name carrying a decoration image
pub const IMAGE_FIELD: &str = "image";

/// Image extensions accepted by the upload path
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif"];

/// Default maximum image size in bytes (10 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 8080;
