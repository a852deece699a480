//! Plumbing shared by the command handlers.

use crate::domain::enrollment::EnrollmentError;
use crate::domain::foundation::{EnrollmentId, LessonId, UserId};
use crate::domain::lesson::LessonError;
use crate::domain::roster::RosterEvent;
use crate::ports::{EventPublisher, RosterRepository, RosterSession};

/// Opens the roster session of a lesson, failing with `NotFound`.
pub(crate) async fn open_lesson(
    repository: &dyn RosterRepository,
    lesson_id: LessonId,
) -> Result<Box<dyn RosterSession>, LessonError> {
    repository
        .open(lesson_id)
        .await?
        .ok_or_else(|| LessonError::not_found(lesson_id))
}

/// Opens the roster session that owns an enrollment, failing with `NotFound`.
pub(crate) async fn open_enrollment(
    repository: &dyn RosterRepository,
    enrollment_id: EnrollmentId,
) -> Result<Box<dyn RosterSession>, EnrollmentError> {
    let lesson_id = repository
        .lesson_id_for(enrollment_id)
        .await?
        .ok_or_else(|| EnrollmentError::not_found(enrollment_id))?;

    // A lesson is never deleted, so a missing roster here is corruption.
    repository.open(lesson_id).await?.ok_or_else(|| {
        EnrollmentError::infrastructure(format!(
            "enrollment {} references missing lesson {}",
            enrollment_id, lesson_id
        ))
    })
}

/// Hands committed events to the publisher.
///
/// Never fails: the transition is already durable, so a delivery problem is
/// logged and the operation still succeeds.
pub(crate) async fn publish_committed(
    publisher: &dyn EventPublisher,
    events: Vec<RosterEvent>,
    actor: &UserId,
) {
    let mut envelopes = Vec::with_capacity(events.len());
    for event in &events {
        match event.to_envelope() {
            Ok(envelope) => envelopes.push(envelope.with_user_id(actor.as_str())),
            Err(e) => tracing::warn!(
                event_type = event.event_type(),
                error = %e,
                "dropping event that could not be serialized"
            ),
        }
    }
    if envelopes.is_empty() {
        return;
    }

    let count = envelopes.len();
    if let Err(e) = publisher.publish_all(envelopes).await {
        tracing::warn!(error = %e, count, "event publication failed after commit");
    }
}
