//! HTTP adapter for lesson endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    LessonResponse, LessonStatusResponse, LessonTermsRequest, PricingResponse,
    SetLessonStatusRequest,
};
pub use routes::lesson_routes;
