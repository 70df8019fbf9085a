mod clinicdesk;

pub use clinicdesk::{ApiErrorBody, ClinicDeskError};
