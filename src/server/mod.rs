pub mod guards;
pub mod router;
pub mod routes;

pub use router::{ClinicDeskState, clinicdesk_router};
