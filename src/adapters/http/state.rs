//! Handler state shared by the lesson and enrollment routers.

use std::sync::Arc;

use crate::application::handlers::{
    ApproveRefundHandler, CancelEnrollmentHandler, CreateLessonHandler, EnrollHandler,
    GetLessonHandler, GetLessonPricingHandler, ListEnrollmentsHandler, RequestRefundHandler,
    SetLessonStatusHandler, UpdateLessonHandler,
};
use crate::domain::schedule::DeadlinePolicy;
use crate::ports::{Clock, EventPublisher, RosterReader, RosterRepository};

#[derive(Clone)]
pub struct ApiState {
    pub(crate) create_lesson: Arc<CreateLessonHandler>,
    pub(crate) update_lesson: Arc<UpdateLessonHandler>,
    pub(crate) set_lesson_status: Arc<SetLessonStatusHandler>,
    pub(crate) get_lesson: Arc<GetLessonHandler>,
    pub(crate) get_pricing: Arc<GetLessonPricingHandler>,
    pub(crate) list_enrollments: Arc<ListEnrollmentsHandler>,
    pub(crate) enroll: Arc<EnrollHandler>,
    pub(crate) cancel_enrollment: Arc<CancelEnrollmentHandler>,
    pub(crate) request_refund: Arc<RequestRefundHandler>,
    pub(crate) approve_refund: Arc<ApproveRefundHandler>,
}

impl ApiState {
    /// Wires every handler against one set of ports.
    pub fn new(
        repository: Arc<dyn RosterRepository>,
        reader: Arc<dyn RosterReader>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        policy: DeadlinePolicy,
    ) -> Self {
        Self {
            create_lesson: Arc::new(CreateLessonHandler::new(
                repository.clone(),
                event_publisher.clone(),
                clock.clone(),
                policy,
            )),
            update_lesson: Arc::new(UpdateLessonHandler::new(
                repository.clone(),
                event_publisher.clone(),
                clock.clone(),
                policy,
            )),
            set_lesson_status: Arc::new(SetLessonStatusHandler::new(
                repository.clone(),
                event_publisher.clone(),
                clock.clone(),
            )),
            get_lesson: Arc::new(GetLessonHandler::new(reader.clone(), clock.clone())),
            get_pricing: Arc::new(GetLessonPricingHandler::new(reader.clone())),
            list_enrollments: Arc::new(ListEnrollmentsHandler::new(reader)),
            enroll: Arc::new(EnrollHandler::new(
                repository.clone(),
                event_publisher.clone(),
                clock.clone(),
            )),
            cancel_enrollment: Arc::new(CancelEnrollmentHandler::new(
                repository.clone(),
                event_publisher.clone(),
                clock.clone(),
            )),
            request_refund: Arc::new(RequestRefundHandler::new(
                repository.clone(),
                event_publisher.clone(),
                clock.clone(),
            )),
            approve_refund: Arc::new(ApproveRefundHandler::new(
                repository,
                event_publisher,
                clock,
            )),
        }
    }
}
