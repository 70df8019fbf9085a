pub mod clinics;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod server;
pub mod session;
pub mod stats;
pub mod utils;

pub use error::ClinicDeskError;
pub use server::{ClinicDeskState, clinicdesk_router};
