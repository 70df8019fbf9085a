use crate::config::{Config, UploadConfig};
use crate::db::DbActorHandle;
use crate::media::MediaUploader;
use crate::server::guards::session::{RequirePageSession, RequireSession};
use crate::server::routes::{auth, clinics, pages, stats};
use crate::session::{SessionGate, cookie_key};

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef, Request},
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, event};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

/// Per-request context: store handle, media host, session gate and upload limits.
#[derive(Clone)]
pub struct ClinicDeskState {
    pub db: DbActorHandle,
    pub media: Arc<dyn MediaUploader>,
    pub gate: SessionGate,
    pub upload: Arc<UploadConfig>,
    pub media_folder: Arc<str>,
    cookie_key: Key,
}

impl ClinicDeskState {
    pub fn new(cfg: &Config, db: DbActorHandle, media: Arc<dyn MediaUploader>) -> Self {
        Self {
            db,
            media,
            gate: SessionGate::from_config(&cfg.basic),
            upload: Arc::new(cfg.upload.clone()),
            media_folder: Arc::from(cfg.media.folder.as_str()),
            cookie_key: cookie_key(cfg.basic.session_secret.as_deref()),
        }
    }
}

impl FromRef<ClinicDeskState> for Key {
    fn from_ref(state: &ClinicDeskState) -> Self {
        state.cookie_key.clone()
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let protocol = format_http_version(req.version());

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    macro_rules! log_at {
        ($level:expr) => {
            event!(
                $level,
                "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
                status.as_u16(),
                request_id,
                method.as_str(),
                protocol,
                path,
                latency_ms,
                user_agent
            )
        };
    }

    if status.is_server_error() {
        log_at!(Level::ERROR);
    } else if status.is_client_error() {
        log_at!(Level::WARN);
    } else {
        log_at!(Level::INFO);
    }

    resp
}

/// Builds the full route table. Whether protected routes actually demand a session
/// is decided by `state.gate`, so admin and demo deployments share this router.
pub fn clinicdesk_router(state: ClinicDeskState) -> Router {
    let max_upload = state.upload.max_upload_bytes;

    let api = Router::new()
        .route(
            "/api/clinics",
            get(clinics::list_clinics)
                .post(clinics::create_clinic)
                .layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/api/patient-analytics", get(stats::patient_analytics))
        .route(
            "/api/hospital-distribution",
            get(stats::hospital_distribution),
        )
        .route_layer(middleware::from_extractor_with_state::<RequireSession, _>(
            state.clone(),
        ));

    let pages = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/clinics", get(pages::clinics))
        .route_layer(middleware::from_extractor_with_state::<
            RequirePageSession,
            _,
        >(state.clone()));

    let open = Router::new()
        .route("/", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/api/stats", get(stats::basic_stats));

    Router::new()
        .merge(open)
        .merge(api)
        .merge(pages)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
