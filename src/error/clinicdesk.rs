use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ClinicDeskError {
    #[error("No image provided")]
    NoImage,

    #[error("No selected image")]
    EmptyImageName,

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    /// Required form fields that were absent or empty, in validation order.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid form data: {0}")]
    InvalidForm(#[from] MultipartError),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Database(sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Ractor error: {0}")]
    RactorError(String),
}

impl From<sqlx::Error> for ClinicDeskError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => ClinicDeskError::UsernameTaken,
            _ => ClinicDeskError::Database(err),
        }
    }
}

impl ClinicDeskError {
    pub fn status(&self) -> StatusCode {
        match self {
            ClinicDeskError::NoImage
            | ClinicDeskError::EmptyImageName
            | ClinicDeskError::UnsupportedImage(_)
            | ClinicDeskError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ClinicDeskError::InvalidForm(e) => e.status(),
            ClinicDeskError::UsernameTaken => StatusCode::CONFLICT,
            ClinicDeskError::Unauthorized => StatusCode::UNAUTHORIZED,
            ClinicDeskError::Upload(_)
            | ClinicDeskError::Http(_)
            | ClinicDeskError::Json(_)
            | ClinicDeskError::Database(_)
            | ClinicDeskError::PasswordHash(_)
            | ClinicDeskError::RactorError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ClinicDeskError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ApiErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// JSON error payload shared by every API route: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}
