use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use partytime_shared::constants::APP_NAME;

use partytime_server::api::{self, AppState};
use partytime_server::config::ServerConfig;
use partytime_server::media::MediaStore;
use partytime_server::provision::provision_admin;
use partytime_store::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,partytime_server=debug")),
        )
        .init();

    info!("Starting {} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");
    if config.uses_dev_secret() {
        warn!("Session tokens are signed with the development secret; set JWT_SECRET");
    }

    // -----------------------------------------------------------------------
    // 3. Open storage
    // -----------------------------------------------------------------------
    let db = Database::open_at(&config.database_path)?;
    info!(path = %config.database_path.display(), "Database opened");

    let media = MediaStore::new(config.upload_dir.clone(), config.max_upload_size).await?;

    let http_addr = config.http_addr;
    let admin = config.admin_username.clone().zip(config.admin_password.clone());
    let state = AppState::new(db, media, config);

    // -----------------------------------------------------------------------
    // 4. Provision the admin identity
    // -----------------------------------------------------------------------
    match admin {
        Some((username, password)) => {
            provision_admin(&state.credentials, &username, &password).await?;
        }
        None => info!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping admin provisioning"),
    }

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
