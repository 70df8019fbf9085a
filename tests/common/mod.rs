#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use clinicdesk::ClinicDeskError;
use clinicdesk::config::Config;
use clinicdesk::db::DbActorHandle;
use clinicdesk::media::{ImageUpload, MediaUploader, UploadedMedia};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "letmein";
const BOUNDARY: &str = "clinicdesk-test-boundary";

/// Media host stand-in that counts calls and can be told to fail.
#[derive(Default)]
pub struct RecordingUploader {
    calls: AtomicUsize,
    fail: bool,
}

impl RecordingUploader {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaUploader for RecordingUploader {
    async fn upload(
        &self,
        image: ImageUpload,
        folder: &str,
    ) -> Result<UploadedMedia, ClinicDeskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClinicDeskError::Upload("media host unreachable".to_string()));
        }
        Ok(UploadedMedia {
            secure_url: format!("https://media.test/{folder}/{}", image.file_name),
            public_id: Some(format!("{folder}/{}", image.file_name)),
        })
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: DbActorHandle,
    pub uploader: Arc<RecordingUploader>,
    pub database_url: String,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let path = self.db_path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(format!("{path}-wal"));
        let _ = std::fs::remove_file(format!("{path}-shm"));
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "clinicdesk-{tag}-{}-{nanos}.sqlite",
        std::process::id()
    ));
    path
}

pub fn test_config(auth_gate_enabled: bool) -> Config {
    let mut cfg = Config::default();
    cfg.basic.auth_gate_enabled = auth_gate_enabled;
    cfg.basic.admin_username = Some(ADMIN_USER.to_string());
    cfg.basic.admin_password = Some(ADMIN_PASS.to_string());
    cfg.basic.session_secret = Some("test-session-secret".to_string());
    cfg
}

pub async fn spawn_app(tag: &str, cfg: Config, uploader: RecordingUploader) -> TestApp {
    let db_path = temp_db_path(tag);
    let database_url = format!("sqlite:{}", db_path.display());
    let db = clinicdesk::db::spawn(&database_url)
        .await
        .expect("failed to spawn DbActor");

    let uploader = Arc::new(uploader);
    let media: Arc<dyn MediaUploader> = uploader.clone();
    let state = clinicdesk::ClinicDeskState::new(&cfg, db.clone(), media);
    let app = clinicdesk::clinicdesk_router(state);

    TestApp {
        app,
        db,
        uploader,
        database_url,
        db_path,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(req).await.expect("request failed")
    }

    /// Logs in as the configured admin and returns a `Cookie` header value.
    pub async fn login(&self) -> String {
        let resp = self
            .send(login_request(ADMIN_USER, ADMIN_PASS, None))
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/dashboard"));
        cookie_header(&resp)
    }
}

pub fn login_request(username: &str, password: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(format!("username={username}&password={password}")))
        .expect("failed to build request")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

/// Image part for [`create_clinic_request`]: (filename, bytes).
pub type ImagePart<'a> = Option<(&'a str, &'a [u8])>;

pub fn multipart_body(fields: &[(&str, &str)], image: ImagePart<'_>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn create_clinic_request(
    fields: &[(&str, &str)],
    image: ImagePart<'_>,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/clinics")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(multipart_body(fields, image)))
        .expect("failed to build request")
}

pub fn clinic_fields<'a>(username: &'a str, location: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", "Hope Clinic"),
        ("identifier", "HC-001"),
        ("location", location),
        ("username", username),
        ("password", "clinic-pass"),
    ]
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub async fn body_json(resp: Response<Body>) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not JSON")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The raw `Set-Cookie` line for `name`, attributes included.
pub fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(str::to_string)
}

/// Turns every `Set-Cookie` on a response into a single `Cookie` request header value,
/// skipping removal cookies.
pub fn cookie_header(resp: &Response<Body>) -> String {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.split_once('=').is_some_and(|(_, v)| !v.is_empty()))
        .map(str::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
