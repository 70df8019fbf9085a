use crate::clinics::{self, ClinicCreated, ClinicForm, ClinicRepository};
use crate::db::DbClinic;
use crate::error::ClinicDeskError;
use crate::server::router::ClinicDeskState;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use tracing::error;

/// GET /api/clinics
pub async fn list_clinics(
    State(state): State<ClinicDeskState>,
) -> Result<Json<Vec<DbClinic>>, ClinicDeskError> {
    Ok(Json(clinics::list_clinics(&state.db).await?))
}

/// POST /api/clinics
///
/// Multipart form with an `image` file part plus `name`, `identifier`, `location`,
/// `username`, `password` and optional `status`.
pub async fn create_clinic(
    State(state): State<ClinicDeskState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ClinicCreated>), ClinicDeskError> {
    // A body that is not multipart at all carries no image part.
    let multipart = multipart.map_err(|_| ClinicDeskError::NoImage)?;
    let form = ClinicForm::from_multipart(multipart).await?;

    let repo = ClinicRepository {
        db: &state.db,
        media: state.media.as_ref(),
        upload: &state.upload,
        folder: &state.media_folder,
    };

    match repo.create(form).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(err) => {
            if err.status().is_server_error() {
                error!(error = %err, "Clinic create failed");
            }
            Err(err)
        }
    }
}
