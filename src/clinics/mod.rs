//! Clinic records: create (with image upload) and list.

pub mod form;
pub mod password;

pub use form::{ClinicForm, DEFAULT_STATUS, ValidClinic};

use crate::config::UploadConfig;
use crate::db::{ClinicCreate, DbActorHandle, DbClinic};
use crate::error::ClinicDeskError;
use crate::media::MediaUploader;
use serde::Serialize;
use tracing::{info, warn};

/// `201` body of a successful create.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClinicCreated {
    pub message: String,
    pub id: String,
    pub image_url: String,
}

/// Collaborators needed to create a clinic.
pub struct ClinicRepository<'a> {
    pub db: &'a DbActorHandle,
    pub media: &'a dyn MediaUploader,
    pub upload: &'a UploadConfig,
    pub folder: &'a str,
}

impl ClinicRepository<'_> {
    /// Image check, upload, field validation, hashing, username check, insert.
    ///
    /// Upload and insert are not transactional: a failure after the upload
    /// leaves the image on the media host.
    pub async fn create(&self, mut form: ClinicForm) -> Result<ClinicCreated, ClinicDeskError> {
        let image = form.take_image()?;
        if self.upload.enforce_extensions && !self.upload.is_allowed_file(&image.file_name) {
            let ext = image
                .file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default();
            return Err(ClinicDeskError::UnsupportedImage(ext));
        }

        let uploaded = self.media.upload(image, self.folder).await?;
        let image_url = uploaded.secure_url;

        let valid = form.validate()?;
        let plain = valid.password.clone();
        let password = tokio::task::spawn_blocking(move || password::hash_password(&plain))
            .await
            .map_err(|e| ClinicDeskError::PasswordHash(e.to_string()))??;

        if self.db.username_exists(&valid.username).await? {
            warn!(username = %valid.username, "Clinic create rejected: username taken");
            return Err(ClinicDeskError::UsernameTaken);
        }

        let id = self
            .db
            .create_clinic(ClinicCreate {
                name: valid.name,
                identifier: valid.identifier,
                location: valid.location,
                status: valid.status,
                image_url: Some(image_url.clone()),
                username: valid.username,
                password,
            })
            .await?;

        info!(clinic.id = %id, "Clinic created");
        Ok(ClinicCreated {
            message: "Clinic created successfully".to_string(),
            id,
            image_url,
        })
    }
}

/// Every clinic, password hashes excluded.
pub async fn list_clinics(db: &DbActorHandle) -> Result<Vec<DbClinic>, ClinicDeskError> {
    db.list_clinics().await
}
