//! HTTP adapter for enrollment endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{EnrollResponse, EnrollmentListResponse, EnrollmentResponse};
pub use handlers::enroll;
pub use routes::enrollment_routes;
