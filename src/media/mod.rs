//! External media host used for clinic images.

mod cloudinary;

pub use cloudinary::CloudinaryUploader;

use crate::error::ClinicDeskError;
use async_trait::async_trait;

/// An image file received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What the media host hands back after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Publicly fetchable HTTPS address of the stored image.
    pub secure_url: String,
    pub public_id: Option<String>,
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Store `image` under `folder`. No retries; failures are reported as-is.
    async fn upload(
        &self,
        image: ImageUpload,
        folder: &str,
    ) -> Result<UploadedMedia, ClinicDeskError>;
}
