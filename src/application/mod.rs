//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers open a roster session, mutate, commit, then publish;
//! query handlers read committed state only.

pub mod handlers;

pub use handlers::{
    // Lesson handlers
    CreateLessonCommand, CreateLessonHandler, CreateLessonResult,
    GetLessonHandler, GetLessonPricingHandler, GetLessonPricingQuery, GetLessonQuery,
    ListEnrollmentsHandler, ListEnrollmentsQuery, LessonView,
    SetLessonStatusCommand, SetLessonStatusHandler, SetLessonStatusResult,
    UpdateLessonCommand, UpdateLessonHandler, UpdateLessonResult,
    // Enrollment handlers
    ApproveRefundCommand, ApproveRefundHandler, ApproveRefundResult,
    CancelEnrollmentCommand, CancelEnrollmentHandler, CancelEnrollmentResult,
    EnrollCommand, EnrollHandler, EnrollResult,
    RequestRefundCommand, RequestRefundHandler, RequestRefundResult,
};
