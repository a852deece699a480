//! Enrollment entity.
//!
//! One student's seat in one lesson. Transitions report the capacity delta
//! they imply; applying it to the lesson is the roster's job, so the two are
//! always committed together.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EnrollmentId, LessonId, StateMachine, Timestamp, UserId};
use crate::domain::lesson::CapacityDelta;
use crate::domain::schedule::CancellationWindow;

use super::{EnrollmentError, EnrollmentStatus};

/// Persisted shape of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentSnapshot {
    pub id: EnrollmentId,
    pub lesson_id: LessonId,
    pub student_id: UserId,
    pub status: EnrollmentStatus,
    pub enrolled_at: Timestamp,
    pub canceled_at: Option<Timestamp>,
    pub refund_requested_at: Option<Timestamp>,
    pub refunded_at: Option<Timestamp>,
}

/// Enrollment entity.
///
/// # Invariants
///
/// - `enrolled_at` never changes
/// - each transition timestamp is set exactly once, by its own transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    id: EnrollmentId,
    lesson_id: LessonId,
    student_id: UserId,
    status: EnrollmentStatus,
    enrolled_at: Timestamp,
    canceled_at: Option<Timestamp>,
    refund_requested_at: Option<Timestamp>,
    refunded_at: Option<Timestamp>,
}

impl Enrollment {
    /// Creates an `ENROLLED` enrollment. Admission is checked by the roster.
    pub(crate) fn new(
        id: EnrollmentId,
        lesson_id: LessonId,
        student_id: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            lesson_id,
            student_id,
            status: EnrollmentStatus::Enrolled,
            enrolled_at: now,
            canceled_at: None,
            refund_requested_at: None,
            refunded_at: None,
        }
    }

    /// Rebuilds an enrollment from storage.
    ///
    /// Rejects rows whose transition timestamps disagree with the status.
    pub fn reconstitute(snapshot: EnrollmentSnapshot) -> Result<Self, EnrollmentError> {
        use EnrollmentStatus::*;
        let expected = match snapshot.status {
            Enrolled => (false, false, false),
            Canceled => (true, false, false),
            RefundRequested => (false, true, false),
            Refunded => (false, true, true),
        };
        let actual = (
            snapshot.canceled_at.is_some(),
            snapshot.refund_requested_at.is_some(),
            snapshot.refunded_at.is_some(),
        );
        if expected != actual {
            return Err(EnrollmentError::ValidationFailed {
                field: "status".to_string(),
                message: format!(
                    "transition timestamps do not match status {}",
                    snapshot.status
                ),
            });
        }

        Ok(Self {
            id: snapshot.id,
            lesson_id: snapshot.lesson_id,
            student_id: snapshot.student_id,
            status: snapshot.status,
            enrolled_at: snapshot.enrolled_at,
            canceled_at: snapshot.canceled_at,
            refund_requested_at: snapshot.refund_requested_at,
            refunded_at: snapshot.refunded_at,
        })
    }

    pub fn snapshot(&self) -> EnrollmentSnapshot {
        EnrollmentSnapshot {
            id: self.id,
            lesson_id: self.lesson_id,
            student_id: self.student_id.clone(),
            status: self.status,
            enrolled_at: self.enrolled_at,
            canceled_at: self.canceled_at,
            refund_requested_at: self.refund_requested_at,
            refunded_at: self.refunded_at,
        }
    }

    pub fn id(&self) -> EnrollmentId {
        self.id
    }

    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    pub fn student_id(&self) -> &UserId {
        &self.student_id
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn enrolled_at(&self) -> Timestamp {
        self.enrolled_at
    }

    pub fn canceled_at(&self) -> Option<Timestamp> {
        self.canceled_at
    }

    pub fn refund_requested_at(&self) -> Option<Timestamp> {
        self.refund_requested_at
    }

    pub fn refunded_at(&self) -> Option<Timestamp> {
        self.refunded_at
    }

    /// True while the enrollment counts toward the lesson head count.
    pub fn holds_seat(&self) -> bool {
        self.status.holds_seat()
    }

    /// Fails with `Forbidden` unless `user_id` is the enrolled student.
    pub fn ensure_owned_by(&self, user_id: &UserId) -> Result<(), EnrollmentError> {
        if &self.student_id != user_id {
            return Err(EnrollmentError::forbidden(self.id, user_id.clone()));
        }
        Ok(())
    }

    /// Free cancellation, only while the cancellation window is open.
    ///
    /// Returns the capacity delta to apply to the lesson.
    ///
    /// # Errors
    ///
    /// - `AlreadyFinalized` unless currently `ENROLLED` (checked first)
    /// - `CancellationWindowClosed` once the deadline has been reached
    pub fn cancel(
        &mut self,
        window: CancellationWindow,
        now: Timestamp,
    ) -> Result<CapacityDelta, EnrollmentError> {
        self.ensure_enrolled()?;
        if window == CancellationWindow::Closed {
            return Err(EnrollmentError::CancellationWindowClosed(self.id));
        }
        self.advance(EnrollmentStatus::Canceled)?;
        self.canceled_at = Some(now);
        Ok(CapacityDelta::Leave)
    }

    /// Refund request, only after the cancellation window has closed.
    ///
    /// The seat is released immediately. Returns the capacity delta.
    ///
    /// # Errors
    ///
    /// - `AlreadyFinalized` unless currently `ENROLLED` (checked first)
    /// - `CancellationWindowStillOpen` before the deadline
    pub fn request_refund(
        &mut self,
        window: CancellationWindow,
        now: Timestamp,
    ) -> Result<CapacityDelta, EnrollmentError> {
        self.ensure_enrolled()?;
        if window == CancellationWindow::Open {
            return Err(EnrollmentError::CancellationWindowStillOpen(self.id));
        }
        self.advance(EnrollmentStatus::RefundRequested)?;
        self.refund_requested_at = Some(now);
        Ok(CapacityDelta::Leave)
    }

    /// Settlement approval of a pending refund. Moves no seat.
    ///
    /// # Errors
    ///
    /// - `NotInRefundRequestedState` unless currently `REFUND_REQUESTED`
    pub fn approve_refund(&mut self, now: Timestamp) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::RefundRequested {
            return Err(EnrollmentError::NotInRefundRequestedState {
                enrollment_id: self.id,
                status: self.status,
            });
        }
        self.advance(EnrollmentStatus::Refunded)?;
        self.refunded_at = Some(now);
        Ok(())
    }

    fn ensure_enrolled(&self) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::Enrolled {
            return Err(EnrollmentError::already_finalized(self.id, self.status));
        }
        Ok(())
    }

    fn advance(&mut self, target: EnrollmentStatus) -> Result<(), EnrollmentError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| EnrollmentError::already_finalized(self.id, self.status))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment() -> Enrollment {
        Enrollment::new(
            EnrollmentId::new(),
            LessonId::new(),
            UserId::new("student-1").unwrap(),
            Timestamp::now(),
        )
    }

    #[test]
    fn new_enrollment_holds_a_seat() {
        let e = enrollment();
        assert_eq!(e.status(), EnrollmentStatus::Enrolled);
        assert!(e.holds_seat());
        assert!(e.canceled_at().is_none());
    }

    #[test]
    fn cancel_inside_window_releases_seat() {
        let mut e = enrollment();
        let now = Timestamp::now();

        let delta = e.cancel(CancellationWindow::Open, now).unwrap();

        assert_eq!(delta, CapacityDelta::Leave);
        assert_eq!(e.status(), EnrollmentStatus::Canceled);
        assert_eq!(e.canceled_at(), Some(now));
        assert!(!e.holds_seat());
    }

    #[test]
    fn cancel_after_deadline_is_rejected() {
        let mut e = enrollment();
        let err = e.cancel(CancellationWindow::Closed, Timestamp::now()).unwrap_err();
        assert_eq!(err, EnrollmentError::CancellationWindowClosed(e.id()));
        assert_eq!(e.status(), EnrollmentStatus::Enrolled);
    }

    #[test]
    fn second_cancel_is_already_finalized() {
        let mut e = enrollment();
        let first = Timestamp::now();
        e.cancel(CancellationWindow::Open, first).unwrap();

        let err = e.cancel(CancellationWindow::Open, Timestamp::now()).unwrap_err();

        assert!(matches!(err, EnrollmentError::AlreadyFinalized { .. }));
        assert_eq!(e.canceled_at(), Some(first));
    }

    #[test]
    fn finalized_wins_over_window_check() {
        let mut e = enrollment();
        e.request_refund(CancellationWindow::Closed, Timestamp::now())
            .unwrap();
        let err = e.cancel(CancellationWindow::Closed, Timestamp::now()).unwrap_err();
        assert!(matches!(
            err,
            EnrollmentError::AlreadyFinalized {
                status: EnrollmentStatus::RefundRequested,
                ..
            }
        ));
    }

    #[test]
    fn refund_request_before_deadline_is_rejected() {
        let mut e = enrollment();
        let err = e
            .request_refund(CancellationWindow::Open, Timestamp::now())
            .unwrap_err();
        assert_eq!(err, EnrollmentError::CancellationWindowStillOpen(e.id()));
    }

    #[test]
    fn refund_request_after_deadline_releases_seat() {
        let mut e = enrollment();
        let now = Timestamp::now();
        let delta = e.request_refund(CancellationWindow::Closed, now).unwrap();
        assert_eq!(delta, CapacityDelta::Leave);
        assert_eq!(e.status(), EnrollmentStatus::RefundRequested);
        assert_eq!(e.refund_requested_at(), Some(now));
    }

    #[test]
    fn refund_request_from_canceled_is_already_finalized() {
        let mut e = enrollment();
        e.cancel(CancellationWindow::Open, Timestamp::now()).unwrap();
        let err = e
            .request_refund(CancellationWindow::Closed, Timestamp::now())
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::AlreadyFinalized { .. }));
    }

    #[test]
    fn approve_refund_completes_request() {
        let mut e = enrollment();
        e.request_refund(CancellationWindow::Closed, Timestamp::now())
            .unwrap();
        let now = Timestamp::now();
        e.approve_refund(now).unwrap();
        assert_eq!(e.status(), EnrollmentStatus::Refunded);
        assert_eq!(e.refunded_at(), Some(now));
    }

    #[test]
    fn approve_refund_requires_pending_request() {
        let mut e = enrollment();
        let err = e.approve_refund(Timestamp::now()).unwrap_err();
        assert!(matches!(
            err,
            EnrollmentError::NotInRefundRequestedState {
                status: EnrollmentStatus::Enrolled,
                ..
            }
        ));
    }

    #[test]
    fn ensure_owned_by_checks_student() {
        let e = enrollment();
        assert!(e.ensure_owned_by(&UserId::new("student-1").unwrap()).is_ok());
        assert!(e.ensure_owned_by(&UserId::new("student-2").unwrap()).is_err());
    }

    #[test]
    fn reconstitute_rejects_inconsistent_timestamps() {
        let mut snapshot = enrollment().snapshot();
        snapshot.status = EnrollmentStatus::Canceled;
        assert!(Enrollment::reconstitute(snapshot.clone()).is_err());

        snapshot.canceled_at = Some(Timestamp::now());
        assert!(Enrollment::reconstitute(snapshot).is_ok());
    }
}
