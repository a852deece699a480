//! Enrollment command handlers.

mod approve_refund;
mod cancel_enrollment;
mod enroll;
mod request_refund;

pub use approve_refund::{ApproveRefundCommand, ApproveRefundHandler, ApproveRefundResult};
pub use cancel_enrollment::{
    CancelEnrollmentCommand, CancelEnrollmentHandler, CancelEnrollmentResult,
};
pub use enroll::{EnrollCommand, EnrollHandler, EnrollResult};
pub use request_refund::{RequestRefundCommand, RequestRefundHandler, RequestRefundResult};
