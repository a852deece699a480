//! Roster aggregate - a lesson together with every enrollment in it.
//!
//! The roster is the unit of serialization: storage adapters hand out one
//! roster per lesson under an exclusive lock, and every change to the head
//! count goes through here. That keeps
//! `lesson.current_student == count(ENROLLED)` true after every operation.

use crate::domain::enrollment::{Enrollment, EnrollmentError, EnrollmentEvent};
use crate::domain::foundation::{EnrollmentId, Timestamp, UserId};
use crate::domain::lesson::{
    CapacityDelta, Lesson, LessonError, LessonEvent, LessonStatus, LessonTerms,
};
use crate::domain::schedule::DeadlinePolicy;

use super::RosterEvent;

/// A lesson and its enrollments, ordered by enrollment time.
#[derive(Debug, Clone)]
pub struct Roster {
    lesson: Lesson,
    enrollments: Vec<Enrollment>,
    domain_events: Vec<RosterEvent>,
}

impl Roster {
    /// Starts the roster of a freshly created lesson.
    pub fn new(lesson: Lesson) -> Self {
        let event = LessonEvent::Created {
            lesson_id: lesson.id(),
            teacher_id: lesson.teacher_id().clone(),
            title: lesson.title().to_string(),
            amount: lesson.amount(),
            max_student: lesson.max_student(),
            occurred_at: lesson.created_at(),
        };
        Self {
            lesson,
            enrollments: Vec::new(),
            domain_events: vec![event.into()],
        }
    }

    /// Rebuilds a roster from storage.
    ///
    /// Fails if the stored head count disagrees with the enrollments, or if
    /// an enrollment belongs to another lesson.
    pub fn reconstitute(
        lesson: Lesson,
        mut enrollments: Vec<Enrollment>,
    ) -> Result<Self, LessonError> {
        if let Some(stray) = enrollments.iter().find(|e| e.lesson_id() != lesson.id()) {
            return Err(LessonError::infrastructure(format!(
                "enrollment {} does not belong to lesson {}",
                stray.id(),
                lesson.id()
            )));
        }
        enrollments.sort_by_key(|e| e.enrolled_at());

        let roster = Self {
            lesson,
            enrollments,
            domain_events: Vec::new(),
        };
        if !roster.is_consistent() {
            return Err(LessonError::infrastructure(format!(
                "lesson {} counts {} students but has {} enrolled",
                roster.lesson.id(),
                roster.lesson.current_student(),
                roster.enrolled_count()
            )));
        }
        Ok(roster)
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn enrollment(&self, id: EnrollmentId) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| e.id() == id)
    }

    /// Looks up an enrollment, failing with `NotFound`.
    pub fn require_enrollment(&self, id: EnrollmentId) -> Result<&Enrollment, EnrollmentError> {
        self.enrollment(id)
            .ok_or_else(|| EnrollmentError::not_found(id))
    }

    /// Number of enrollments currently holding a seat.
    pub fn enrolled_count(&self) -> u32 {
        self.enrollments.iter().filter(|e| e.holds_seat()).count() as u32
    }

    /// True when the cached head count matches the enrollments.
    pub fn is_consistent(&self) -> bool {
        self.lesson.current_student() == self.enrolled_count()
            && self.lesson.current_student() <= self.lesson.max_student()
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<RosterEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ───────────────────────────────────────────────────────────────
    // Enrollment lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Seats a student.
    ///
    /// # Errors
    ///
    /// - `LessonFull` when no seat is left (checked before status)
    /// - `LessonNotActive` when the lesson is closed or canceled
    /// - `AlreadyEnrolled` when the student already holds a seat here
    pub fn enroll(
        &mut self,
        id: EnrollmentId,
        student_id: UserId,
        now: Timestamp,
    ) -> Result<&Enrollment, EnrollmentError> {
        self.lesson.check_admission()?;
        if self
            .enrollments
            .iter()
            .any(|e| e.holds_seat() && e.student_id() == &student_id)
        {
            return Err(EnrollmentError::already_enrolled(self.lesson.id(), student_id));
        }

        let enrollment = Enrollment::new(id, self.lesson.id(), student_id, now);
        let previous = self.lesson.status();
        let change = self.lesson.apply_capacity_delta(CapacityDelta::Join, now)?;

        self.record(EnrollmentEvent::Enrolled {
            enrollment_id: enrollment.id(),
            lesson_id: enrollment.lesson_id(),
            student_id: enrollment.student_id().clone(),
            current_student: change.current_student,
            occurred_at: now,
        });
        if change.auto_closed {
            self.record_auto_close(previous, now);
        }

        self.enrollments.push(enrollment);
        Ok(&self.enrollments[self.enrollments.len() - 1])
    }

    /// Free cancellation before the deadline; releases the seat.
    ///
    /// # Errors
    ///
    /// - `NotFound`, `AlreadyFinalized`, `CancellationWindowClosed`
    pub fn cancel(
        &mut self,
        id: EnrollmentId,
        now: Timestamp,
    ) -> Result<&Enrollment, EnrollmentError> {
        let window = self.lesson.cancellation_window(now);
        let index = self.index_of(id)?;

        let mut enrollment = self.enrollments[index].clone();
        let delta = enrollment.cancel(window, now)?;
        self.lesson.apply_capacity_delta(delta, now)?;

        self.record(EnrollmentEvent::Canceled {
            enrollment_id: id,
            lesson_id: enrollment.lesson_id(),
            student_id: enrollment.student_id().clone(),
            occurred_at: now,
        });
        self.enrollments[index] = enrollment;
        Ok(&self.enrollments[index])
    }

    /// Refund request after the deadline; releases the seat immediately.
    ///
    /// # Errors
    ///
    /// - `NotFound`, `AlreadyFinalized`, `CancellationWindowStillOpen`
    pub fn request_refund(
        &mut self,
        id: EnrollmentId,
        now: Timestamp,
    ) -> Result<&Enrollment, EnrollmentError> {
        let window = self.lesson.cancellation_window(now);
        let index = self.index_of(id)?;

        let mut enrollment = self.enrollments[index].clone();
        let delta = enrollment.request_refund(window, now)?;
        self.lesson.apply_capacity_delta(delta, now)?;

        self.record(EnrollmentEvent::RefundRequested {
            enrollment_id: id,
            lesson_id: enrollment.lesson_id(),
            student_id: enrollment.student_id().clone(),
            occurred_at: now,
        });
        self.enrollments[index] = enrollment;
        Ok(&self.enrollments[index])
    }

    /// Settlement approval of a pending refund.
    ///
    /// # Errors
    ///
    /// - `NotFound`, `NotInRefundRequestedState`
    pub fn approve_refund(
        &mut self,
        id: EnrollmentId,
        now: Timestamp,
    ) -> Result<&Enrollment, EnrollmentError> {
        let index = self.index_of(id)?;
        self.enrollments[index].approve_refund(now)?;

        let enrollment = &self.enrollments[index];
        let event = EnrollmentEvent::Refunded {
            enrollment_id: id,
            lesson_id: enrollment.lesson_id(),
            student_id: enrollment.student_id().clone(),
            occurred_at: now,
        };
        self.record(event);
        Ok(&self.enrollments[index])
    }

    // ───────────────────────────────────────────────────────────────
    // Lesson lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Teacher-driven status change. Returns the previous status; the
    /// resulting one is `self.lesson().status()`.
    pub fn set_lesson_status(
        &mut self,
        target: LessonStatus,
        now: Timestamp,
    ) -> Result<LessonStatus, LessonError> {
        let previous = self.lesson.set_status(target, now)?;
        let current = self.lesson.status();
        if previous != current {
            self.record(LessonEvent::StatusChanged {
                lesson_id: self.lesson.id(),
                from: previous,
                to: current,
                automatic: false,
                occurred_at: now,
            });
        }
        Ok(previous)
    }

    /// Teacher edit of the lesson terms.
    pub fn update_terms(
        &mut self,
        terms: LessonTerms,
        policy: &DeadlinePolicy,
        now: Timestamp,
    ) -> Result<&Lesson, LessonError> {
        let previous = self.lesson.status();
        let auto_closed = self.lesson.update_terms(terms, policy, now)?;

        self.record(LessonEvent::Updated {
            lesson_id: self.lesson.id(),
            teacher_id: self.lesson.teacher_id().clone(),
            occurred_at: now,
        });
        if auto_closed {
            self.record_auto_close(previous, now);
        }
        Ok(&self.lesson)
    }

    fn index_of(&self, id: EnrollmentId) -> Result<usize, EnrollmentError> {
        self.enrollments
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| EnrollmentError::not_found(id))
    }

    fn record_auto_close(&mut self, previous: LessonStatus, now: Timestamp) {
        self.record(LessonEvent::StatusChanged {
            lesson_id: self.lesson.id(),
            from: previous,
            to: self.lesson.status(),
            automatic: true,
            occurred_at: now,
        });
    }

    fn record(&mut self, event: impl Into<RosterEvent>) {
        self.domain_events.push(event.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::EnrollmentStatus;
    use crate::domain::foundation::LessonId;
    use chrono::{DateTime, NaiveDate, Utc};
    use proptest::prelude::*;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    // Deadline for a 2024-06-10 start is 2024-06-03.
    fn before_deadline() -> Timestamp {
        at("2024-05-20T10:00:00Z")
    }

    fn after_deadline() -> Timestamp {
        at("2024-06-05T10:00:00Z")
    }

    fn roster(min: u32, max: u32) -> Roster {
        let terms = LessonTerms {
            title: "Watercolor basics".to_string(),
            amount: 200_000,
            min_student: min,
            max_student: max,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        };
        let lesson = Lesson::create(
            LessonId::new(),
            UserId::new("teacher").unwrap(),
            terms,
            &DeadlinePolicy::default(),
            before_deadline(),
        )
        .unwrap();
        let mut roster = Roster::new(lesson);
        roster.take_events();
        roster
    }

    fn student(n: usize) -> UserId {
        UserId::new(format!("student-{}", n)).unwrap()
    }

    fn enroll(roster: &mut Roster, n: usize) -> EnrollmentId {
        roster
            .enroll(EnrollmentId::new(), student(n), before_deadline())
            .unwrap()
            .id()
    }

    #[test]
    fn new_roster_records_created_event() {
        let lesson = roster(1, 2).lesson().clone();
        let mut fresh = Roster::new(lesson);
        let events = fresh.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "lesson.created.v1");
        assert!(fresh.take_events().is_empty());
    }

    #[test]
    fn enroll_takes_a_seat() {
        let mut r = roster(2, 4);
        enroll(&mut r, 1);
        assert_eq!(r.lesson().current_student(), 1);
        assert_eq!(r.enrolled_count(), 1);
        assert!(r.is_consistent());
        let events = r.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "enrollment.enrolled.v1");
    }

    #[test]
    fn fifth_enrollment_closes_lesson_in_same_operation() {
        let mut r = roster(2, 5);
        for n in 0..4 {
            enroll(&mut r, n);
        }
        r.take_events();
        assert_eq!(r.lesson().status(), LessonStatus::Active);

        enroll(&mut r, 4);

        assert_eq!(r.lesson().status(), LessonStatus::Closed);
        let events = r.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            RosterEvent::Lesson(LessonEvent::StatusChanged {
                automatic: true,
                to: LessonStatus::Closed,
                ..
            })
        ));
    }

    #[test]
    fn enroll_on_full_lesson_is_lesson_full() {
        let mut r = roster(1, 1);
        enroll(&mut r, 1);
        let err = r
            .enroll(EnrollmentId::new(), student(2), before_deadline())
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Lesson(LessonError::Full { .. })));
        assert_eq!(r.enrollments().len(), 1);
    }

    #[test]
    fn enroll_on_canceled_lesson_is_not_active() {
        let mut r = roster(1, 3);
        r.set_lesson_status(LessonStatus::Canceled, before_deadline())
            .unwrap();
        let err = r
            .enroll(EnrollmentId::new(), student(1), before_deadline())
            .unwrap_err();
        assert!(matches!(
            err,
            EnrollmentError::Lesson(LessonError::NotActive { .. })
        ));
    }

    #[test]
    fn enroll_on_canceled_full_lesson_is_not_active() {
        let mut r = roster(1, 1);
        enroll(&mut r, 1);
        r.set_lesson_status(LessonStatus::Canceled, before_deadline())
            .unwrap();

        let err = r
            .enroll(EnrollmentId::new(), student(2), before_deadline())
            .unwrap_err();

        assert!(matches!(
            err,
            EnrollmentError::Lesson(LessonError::NotActive {
                status: LessonStatus::Canceled,
                ..
            })
        ));
        assert_eq!(r.lesson().current_student(), 1);
    }

    #[test]
    fn reopening_full_lesson_records_no_event() {
        let mut r = roster(1, 1);
        enroll(&mut r, 1);
        r.take_events();

        let previous = r
            .set_lesson_status(LessonStatus::Active, before_deadline())
            .unwrap();

        assert_eq!(previous, LessonStatus::Closed);
        assert_eq!(r.lesson().status(), LessonStatus::Closed);
        assert!(r.take_events().is_empty());
    }

    #[test]
    fn same_student_cannot_hold_two_seats() {
        let mut r = roster(1, 3);
        enroll(&mut r, 1);
        let err = r
            .enroll(EnrollmentId::new(), student(1), before_deadline())
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::AlreadyEnrolled { .. }));
    }

    #[test]
    fn student_may_rejoin_after_canceling() {
        let mut r = roster(1, 3);
        let first = enroll(&mut r, 1);
        r.cancel(first, before_deadline()).unwrap();
        enroll(&mut r, 1);
        assert_eq!(r.lesson().current_student(), 1);
        assert_eq!(r.enrollments().len(), 2);
    }

    #[test]
    fn cancel_before_deadline_releases_seat() {
        let mut r = roster(1, 3);
        let id = enroll(&mut r, 1);
        let enrollment = r.cancel(id, before_deadline()).unwrap();
        assert_eq!(enrollment.status(), EnrollmentStatus::Canceled);
        assert_eq!(r.lesson().current_student(), 0);
        assert!(r.is_consistent());
    }

    #[test]
    fn cancel_twice_moves_counter_once() {
        let mut r = roster(1, 3);
        enroll(&mut r, 0);
        let id = enroll(&mut r, 1);
        r.cancel(id, before_deadline()).unwrap();
        let err = r.cancel(id, before_deadline()).unwrap_err();
        assert!(matches!(err, EnrollmentError::AlreadyFinalized { .. }));
        assert_eq!(r.lesson().current_student(), 1);
    }

    #[test]
    fn cancel_after_deadline_leaves_state_untouched() {
        let mut r = roster(1, 3);
        let id = enroll(&mut r, 1);
        r.take_events();
        let err = r.cancel(id, after_deadline()).unwrap_err();
        assert_eq!(err, EnrollmentError::CancellationWindowClosed(id));
        assert_eq!(r.lesson().current_student(), 1);
        assert!(r.take_events().is_empty());
    }

    #[test]
    fn cancel_exactly_at_deadline_is_closed() {
        let mut r = roster(1, 3);
        let id = enroll(&mut r, 1);
        let err = r.cancel(id, at("2024-06-03T00:00:00Z")).unwrap_err();
        assert_eq!(err, EnrollmentError::CancellationWindowClosed(id));
    }

    #[test]
    fn refund_request_before_deadline_is_still_open() {
        let mut r = roster(1, 3);
        let id = enroll(&mut r, 1);
        let err = r.request_refund(id, before_deadline()).unwrap_err();
        assert_eq!(err, EnrollmentError::CancellationWindowStillOpen(id));
    }

    #[test]
    fn refund_flow_releases_seat_on_request() {
        let mut r = roster(1, 3);
        let id = enroll(&mut r, 1);
        r.take_events();

        r.request_refund(id, after_deadline()).unwrap();
        assert_eq!(r.lesson().current_student(), 0);

        let enrollment = r.approve_refund(id, after_deadline()).unwrap();
        assert_eq!(enrollment.status(), EnrollmentStatus::Refunded);
        assert_eq!(r.lesson().current_student(), 0);

        let types: Vec<_> = r.take_events().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec!["enrollment.refund_requested.v1", "enrollment.refunded.v1"]
        );
    }

    #[test]
    fn approve_without_request_is_rejected() {
        let mut r = roster(1, 3);
        let id = enroll(&mut r, 1);
        let err = r.approve_refund(id, after_deadline()).unwrap_err();
        assert!(matches!(err, EnrollmentError::NotInRefundRequestedState { .. }));
    }

    #[test]
    fn unknown_enrollment_is_not_found() {
        let mut r = roster(1, 3);
        let id = EnrollmentId::new();
        assert_eq!(
            r.cancel(id, before_deadline()).unwrap_err(),
            EnrollmentError::NotFound(id)
        );
    }

    #[test]
    fn freed_seat_does_not_reopen_closed_lesson() {
        let mut r = roster(1, 2);
        let id = enroll(&mut r, 1);
        enroll(&mut r, 2);
        assert_eq!(r.lesson().status(), LessonStatus::Closed);

        r.cancel(id, before_deadline()).unwrap();
        assert_eq!(r.lesson().status(), LessonStatus::Closed);

        r.set_lesson_status(LessonStatus::Active, before_deadline())
            .unwrap();
        enroll(&mut r, 3);
        assert_eq!(r.lesson().status(), LessonStatus::Closed);
    }

    #[test]
    fn unchanged_status_records_no_event() {
        let mut r = roster(1, 2);
        r.set_lesson_status(LessonStatus::Active, before_deadline())
            .unwrap();
        assert!(r.take_events().is_empty());
    }

    #[test]
    fn update_terms_can_close_lesson() {
        let mut r = roster(1, 4);
        enroll(&mut r, 1);
        enroll(&mut r, 2);
        r.take_events();

        let mut terms = LessonTerms {
            title: "Watercolor basics".to_string(),
            amount: 150_000,
            min_student: 1,
            max_student: 2,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        };
        r.update_terms(terms.clone(), &DeadlinePolicy::default(), before_deadline())
            .unwrap();

        assert_eq!(r.lesson().status(), LessonStatus::Closed);
        assert_eq!(r.take_events().len(), 2);

        terms.max_student = 1;
        assert!(r
            .update_terms(terms, &DeadlinePolicy::default(), before_deadline())
            .is_err());
    }

    #[test]
    fn reconstitute_rejects_inconsistent_count() {
        let mut r = roster(1, 3);
        enroll(&mut r, 1);
        let mut enrollments = r.enrollments().to_vec();
        enrollments.clear();
        assert!(Roster::reconstitute(r.lesson().clone(), enrollments).is_err());
    }

    #[test]
    fn reconstitute_accepts_consistent_roster() {
        let mut r = roster(1, 3);
        enroll(&mut r, 1);
        enroll(&mut r, 2);
        let rebuilt = Roster::reconstitute(r.lesson().clone(), r.enrollments().to_vec()).unwrap();
        assert_eq!(rebuilt.enrolled_count(), 2);
    }

    // ───────────────────────────────────────────────────────────────
    // Property: head count always matches ENROLLED enrollments
    // ───────────────────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Enroll(usize),
        Cancel(usize),
        RequestRefund(usize),
        ApproveRefund(usize),
        SetStatus(LessonStatus),
        PassDeadline,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0usize..8).prop_map(Op::Enroll),
            2 => (0usize..8).prop_map(Op::Cancel),
            2 => (0usize..8).prop_map(Op::RequestRefund),
            1 => (0usize..8).prop_map(Op::ApproveRefund),
            1 => prop_oneof![
                Just(LessonStatus::Active),
                Just(LessonStatus::Closed),
                Just(LessonStatus::Canceled),
            ]
            .prop_map(Op::SetStatus),
            1 => Just(Op::PassDeadline),
        ]
    }

    proptest! {
        #[test]
        fn head_count_matches_enrolled_enrollments(
            max in 1u32..6,
            ops in prop::collection::vec(op(), 1..60),
        ) {
            let mut r = roster(1, max);
            let mut now = before_deadline();

            for op in ops {
                let pick = |r: &Roster, i: usize| {
                    let all = r.enrollments();
                    (!all.is_empty()).then(|| all[i % all.len()].id())
                };
                match op {
                    Op::Enroll(n) => {
                        let _ = r.enroll(EnrollmentId::new(), student(n), now);
                    }
                    Op::Cancel(i) => {
                        if let Some(id) = pick(&r, i) {
                            let _ = r.cancel(id, now);
                        }
                    }
                    Op::RequestRefund(i) => {
                        if let Some(id) = pick(&r, i) {
                            let _ = r.request_refund(id, now);
                        }
                    }
                    Op::ApproveRefund(i) => {
                        if let Some(id) = pick(&r, i) {
                            let _ = r.approve_refund(id, now);
                        }
                    }
                    Op::SetStatus(status) => {
                        let _ = r.set_lesson_status(status, now);
                    }
                    Op::PassDeadline => now = after_deadline(),
                }

                prop_assert!(r.is_consistent());
                prop_assert!(r.lesson().current_student() <= max);
                prop_assert!(
                    !(r.lesson().status() == LessonStatus::Active && r.lesson().is_full())
                );
            }
        }
    }
}
