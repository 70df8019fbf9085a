use super::{ImageUpload, MediaUploader, UploadedMedia};
use crate::config::MediaConfig;
use crate::error::ClinicDeskError;
use crate::utils::logging::with_pretty_json_debug;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

const CLOUDINARY_USER_AGENT: &str = concat!("clinicdesk/", env!("CARGO_PKG_VERSION"));

/// Signed uploads to the Cloudinary image upload API.
#[derive(Clone)]
pub struct CloudinaryUploader {
    cfg: MediaConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    #[serde(default)]
    public_id: Option<String>,
}

impl CloudinaryUploader {
    pub fn new(cfg: MediaConfig) -> Result<Self, ClinicDeskError> {
        let client = reqwest::Client::builder()
            .user_agent(CLOUDINARY_USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { cfg, client })
    }

    fn upload_url(&self) -> Result<Url, ClinicDeskError> {
        let base = self.cfg.api_base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{}/image/upload", self.cfg.cloud_name))
            .map_err(|e| ClinicDeskError::Upload(format!("invalid media upload url: {e}")))
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as
/// `k=v&k=v`, secret appended, SHA-1 hex.
pub(crate) fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Pull `error.message` out of a Cloudinary error body, if present.
fn upstream_message(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(
        &self,
        image: ImageUpload,
        folder: &str,
    ) -> Result<UploadedMedia, ClinicDeskError> {
        if !self.cfg.has_credentials() {
            return Err(ClinicDeskError::Upload(
                "Media host credentials are not configured".to_string(),
            ));
        }

        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.cfg.api_secret,
        );

        let mut part = Part::bytes(image.bytes).file_name(image.file_name.clone());
        if let Some(mime) = image.content_type.as_deref() {
            part = part.mime_str(mime)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.cfg.api_key.clone())
            .text("signature", signature);

        let resp = self
            .client
            .post(self.upload_url()?)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        with_pretty_json_debug(&body, |pretty_body| {
            debug!(
                status = status.as_u16(),
                body = %pretty_body,
                "[Cloudinary] Upload response"
            );
        });

        if !status.is_success() {
            let message = upstream_message(&body)
                .map_or_else(|| format!("Media upload failed with status {status}"), str::to_string);
            error!(
                status = status.as_u16(),
                file = %image.file_name,
                "Cloudinary upload rejected: {message}"
            );
            return Err(ClinicDeskError::Upload(message));
        }

        let parsed: UploadResponse = serde_json::from_value(body)?;
        info!(
            file = %image.file_name,
            folder,
            public_id = parsed.public_id.as_deref().unwrap_or("-"),
            "Clinic image uploaded"
        );

        Ok(UploadedMedia {
            secure_url: parsed.secure_url,
            public_id: parsed.public_id,
        })
    }
}
