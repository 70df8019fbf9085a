use clinicdesk::config::Config;
use clinicdesk::media::{CloudinaryUploader, MediaUploader};
use clinicdesk::utils::logging::mask_tail;
use clinicdesk::{ClinicDeskState, clinicdesk_router};
use mimalloc::MiMalloc;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        auth_gate_enabled = cfg.basic.auth_gate_enabled,
        admin_username = %cfg.basic.admin_username.as_deref().unwrap_or("<unset>"),
        media_cloud = %cfg.media.cloud_name,
        media_api_key = %mask_tail(&cfg.media.api_key),
        media_folder = %cfg.media.folder,
        max_upload_bytes = cfg.upload.max_upload_bytes,
    );

    if !cfg.basic.auth_gate_enabled {
        warn!("Session gate disabled: every route is open (demo deployment)");
    }
    if !cfg.media.has_credentials() {
        warn!("Media host credentials missing; clinic creation will fail at upload");
    }

    let db = clinicdesk::db::spawn(&cfg.basic.database_url).await?;
    let media: Arc<dyn MediaUploader> = Arc::new(CloudinaryUploader::new(cfg.media.clone())?);

    let state = ClinicDeskState::new(&cfg, db, media);
    let app = clinicdesk_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
