use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Clinic row as returned to clients. The password hash is never selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbClinic {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub identifier: String,
    pub location: String,
    pub status: String,
    pub image_url: Option<String>,
    pub username: String,
}

/// Insert payload for a clinic; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct ClinicCreate {
    pub name: String,
    pub identifier: String,
    pub location: String,
    pub status: String,
    pub image_url: Option<String>,
    pub username: String,
    pub password: String,
}
