//! HTTP API.
//!
//! Public reads, login/logout and the contact form are open; every other
//! route sits behind [`require_session`].

mod admin;
mod categories;
mod decorations;
mod extract;
mod messages;
mod uploads;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use partytime_shared::constants::TOKEN_TTL_SECS;
use partytime_shared::protocol::HealthResponse;
use partytime_store::Database;

use crate::auth::session::require_session;
use crate::auth::{CredentialStore, TokenService};
use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Room for the non-file multipart fields on top of the image itself.
const FORM_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub credentials: CredentialStore,
    pub tokens: Arc<TokenService>,
    pub media: Arc<MediaStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, media: MediaStore, config: ServerConfig) -> Self {
        let db = Arc::new(Mutex::new(db));
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), TOKEN_TTL_SECS);

        Self {
            credentials: CredentialStore::new(db.clone()),
            db,
            tokens: Arc::new(tokens),
            media: Arc::new(media),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/categories", get(categories::list))
        .route("/decorations", get(decorations::list))
        .route("/decorations/{id}", get(decorations::get_one))
        .route("/messages", post(messages::create))
        .route("/uploads/{file}", get(uploads::serve_file));

    let protected = Router::new()
        .route("/admin/change-password", post(admin::change_password))
        .route("/admin/me", get(admin::me))
        .route("/categories", post(categories::create))
        .route("/categories/{id}", put(categories::update).delete(categories::remove))
        .route("/decorations", post(decorations::create))
        .route("/decorations/{id}", put(decorations::update).delete(decorations::remove))
        .route("/messages", get(messages::list))
        .route("/messages/{id}", delete(messages::remove))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.config.max_upload_size + FORM_OVERHEAD))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured frontend origin only.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .frontend_origin
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable FRONTEND_URL");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
