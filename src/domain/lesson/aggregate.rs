//! Lesson aggregate entity.
//!
//! A Lesson is a fixed-price offering whose price is shared by the students
//! that join it. It owns the recruiting status and the head count.
//!
//! # Design Decisions
//!
//! - **Amounts are integers**: a single currency, no minor units, no floats
//! - **Head count is a cache**: `current_student` mirrors the number of
//!   `ENROLLED` enrollments and only moves through `apply_capacity_delta`
//! - **Deadline is stored**: derived from `start_date` when the lesson is
//!   created or edited, never per request
//! - **No auto-reopen**: freeing a seat never moves `CLOSED` back to `ACTIVE`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LessonId, StateMachine, Timestamp, UserId};
use crate::domain::pricing::{PriceQuote, PricingCalculator};
use crate::domain::schedule::{CancellationWindow, DeadlinePolicy};

use super::{LessonError, LessonStatus, LessonTerms};

/// A signed unit change in a lesson's enrolled head count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityDelta {
    /// A student took a seat (+1).
    Join,
    /// A student released a seat (-1).
    Leave,
}

impl CapacityDelta {
    /// Signed value of the delta.
    pub fn value(&self) -> i32 {
        match self {
            CapacityDelta::Join => 1,
            CapacityDelta::Leave => -1,
        }
    }
}

/// What applying a capacity delta did to the lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityChange {
    pub current_student: u32,
    /// True when this delta filled the last seat of an active lesson.
    pub auto_closed: bool,
}

/// Persisted shape of a lesson, used by storage adapters to rebuild the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSnapshot {
    pub id: LessonId,
    pub teacher_id: UserId,
    pub title: String,
    pub amount: i64,
    pub min_student: u32,
    pub max_student: u32,
    pub current_student: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub deadline: NaiveDate,
    pub status: LessonStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lesson aggregate.
///
/// # Invariants
///
/// - `1 <= min_student <= max_student`
/// - `0 <= current_student <= max_student`
/// - `start_date <= end_date`
/// - `deadline < start_date`
/// - `Canceled` is never left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    teacher_id: UserId,
    title: String,
    amount: i64,
    min_student: u32,
    max_student: u32,
    current_student: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    deadline: NaiveDate,
    status: LessonStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Lesson {
    /// Creates a new recruiting lesson.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the terms are malformed or the start date is
    ///   not after the current date
    pub fn create(
        id: LessonId,
        teacher_id: UserId,
        terms: LessonTerms,
        policy: &DeadlinePolicy,
        now: Timestamp,
    ) -> Result<Self, LessonError> {
        let deadline = Self::checked_deadline(&terms, policy, now)?;

        Ok(Self {
            id,
            teacher_id,
            title: terms.title.trim().to_string(),
            amount: terms.amount,
            min_student: terms.min_student,
            max_student: terms.max_student,
            current_student: 0,
            start_date: terms.start_date,
            end_date: terms.end_date,
            deadline,
            status: LessonStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a lesson from storage, re-checking the invariants.
    pub fn reconstitute(snapshot: LessonSnapshot) -> Result<Self, LessonError> {
        let terms = LessonTerms {
            title: snapshot.title,
            amount: snapshot.amount,
            min_student: snapshot.min_student,
            max_student: snapshot.max_student,
            start_date: snapshot.start_date,
            end_date: snapshot.end_date,
        };
        terms.validate()?;
        if snapshot.current_student > snapshot.max_student {
            return Err(LessonError::validation(
                "current_student",
                format!(
                    "{} exceeds max_student {}",
                    snapshot.current_student, snapshot.max_student
                ),
            ));
        }
        if snapshot.deadline >= snapshot.start_date {
            return Err(LessonError::validation(
                "deadline",
                "must fall before start_date",
            ));
        }

        Ok(Self {
            id: snapshot.id,
            teacher_id: snapshot.teacher_id,
            title: terms.title,
            amount: terms.amount,
            min_student: terms.min_student,
            max_student: terms.max_student,
            current_student: snapshot.current_student,
            start_date: terms.start_date,
            end_date: terms.end_date,
            deadline: snapshot.deadline,
            status: snapshot.status,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    /// Flattens the lesson for storage.
    pub fn snapshot(&self) -> LessonSnapshot {
        LessonSnapshot {
            id: self.id,
            teacher_id: self.teacher_id.clone(),
            title: self.title.clone(),
            amount: self.amount,
            min_student: self.min_student,
            max_student: self.max_student,
            current_student: self.current_student,
            start_date: self.start_date,
            end_date: self.end_date,
            deadline: self.deadline,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ── accessors ──────────────────────────────────────────────────────────

    pub fn id(&self) -> LessonId {
        self.id
    }

    pub fn teacher_id(&self) -> &UserId {
        &self.teacher_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn min_student(&self) -> u32 {
        self.min_student
    }

    pub fn max_student(&self) -> u32 {
        self.max_student
    }

    pub fn current_student(&self) -> u32 {
        self.current_student
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn status(&self) -> LessonStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ── queries ────────────────────────────────────────────────────────────

    /// Current group-buying price.
    pub fn price_quote(&self) -> PriceQuote {
        PricingCalculator::quote(self.amount, self.min_student, self.current_student)
    }

    /// Seats still open.
    pub fn remaining_seats(&self) -> u32 {
        self.max_student - self.current_student
    }

    pub fn is_full(&self) -> bool {
        self.current_student >= self.max_student
    }

    /// True once the start date has been reached.
    pub fn has_started(&self, now: Timestamp) -> bool {
        now.date() >= self.start_date
    }

    /// Which cancellation path is open to enrolled students at `now`.
    pub fn cancellation_window(&self, now: Timestamp) -> CancellationWindow {
        DeadlinePolicy::window_at(now, self.deadline)
    }

    /// Fails with `Forbidden` unless `user_id` is the owning teacher.
    pub fn ensure_owned_by(&self, user_id: &UserId) -> Result<(), LessonError> {
        if &self.teacher_id != user_id {
            return Err(LessonError::forbidden(self.id, user_id.clone()));
        }
        Ok(())
    }

    /// Checks that a new student could take a seat right now.
    ///
    /// A canceled lesson always reports `NotActive`. Otherwise capacity is
    /// checked before status, so a lesson that auto-closed because its last
    /// seat was just taken reports `Full`, not `NotActive`.
    pub fn check_admission(&self) -> Result<(), LessonError> {
        if self.status == LessonStatus::Canceled {
            return Err(LessonError::not_active(self.id, self.status));
        }
        if self.is_full() {
            return Err(LessonError::full(self.id, self.max_student));
        }
        if !self.status.accepts_enrollments() {
            return Err(LessonError::not_active(self.id, self.status));
        }
        Ok(())
    }

    // ── commands ───────────────────────────────────────────────────────────

    /// Applies a head-count change. The only path that mutates `current_student`.
    ///
    /// Filling the last seat of an `Active` lesson closes it in the same step.
    ///
    /// # Errors
    ///
    /// - `Full` if a `Join` would exceed `max_student`
    /// - `CapacityUnderflow` if a `Leave` would go below zero
    pub fn apply_capacity_delta(
        &mut self,
        delta: CapacityDelta,
        now: Timestamp,
    ) -> Result<CapacityChange, LessonError> {
        match delta {
            CapacityDelta::Join => {
                if self.is_full() {
                    return Err(LessonError::full(self.id, self.max_student));
                }
                self.current_student += 1;
            }
            CapacityDelta::Leave => {
                if self.current_student == 0 {
                    return Err(LessonError::CapacityUnderflow(self.id));
                }
                self.current_student -= 1;
            }
        }

        let auto_closed = self.close_if_full();
        self.updated_at = now;

        Ok(CapacityChange {
            current_student: self.current_student,
            auto_closed,
        })
    }

    /// Teacher-driven status change. Returns the previous status.
    ///
    /// Reopening a lesson with no free seat leaves it `Closed`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` when leaving `Canceled`
    pub fn set_status(
        &mut self,
        target: LessonStatus,
        now: Timestamp,
    ) -> Result<LessonStatus, LessonError> {
        let previous = self.status;
        self.status = previous
            .transition_to(target)
            .map_err(|_| LessonError::invalid_transition(previous, target))?;
        self.close_if_full();
        self.updated_at = now;
        Ok(previous)
    }

    /// Replaces the teacher-editable terms and re-derives the deadline.
    ///
    /// Returns true if the new capacity closed an active lesson.
    ///
    /// # Errors
    ///
    /// - `NotActive` if the lesson is canceled
    /// - `AlreadyStarted` once the start date has been reached
    /// - `ValidationFailed` if the terms are malformed, the new start date is
    ///   not after today, or `max_student` drops below the enrolled count
    pub fn update_terms(
        &mut self,
        terms: LessonTerms,
        policy: &DeadlinePolicy,
        now: Timestamp,
    ) -> Result<bool, LessonError> {
        if self.status == LessonStatus::Canceled {
            return Err(LessonError::not_active(self.id, self.status));
        }
        if self.has_started(now) {
            return Err(LessonError::AlreadyStarted(self.id));
        }
        let deadline = Self::checked_deadline(&terms, policy, now)?;
        if terms.max_student < self.current_student {
            return Err(LessonError::validation(
                "max_student",
                format!(
                    "cannot be lower than the {} students already enrolled",
                    self.current_student
                ),
            ));
        }

        self.title = terms.title.trim().to_string();
        self.amount = terms.amount;
        self.min_student = terms.min_student;
        self.max_student = terms.max_student;
        self.start_date = terms.start_date;
        self.end_date = terms.end_date;
        self.deadline = deadline;
        self.updated_at = now;

        Ok(self.close_if_full())
    }

    fn close_if_full(&mut self) -> bool {
        if self.status == LessonStatus::Active && self.is_full() {
            self.status = LessonStatus::Closed;
            return true;
        }
        false
    }

    fn checked_deadline(
        terms: &LessonTerms,
        policy: &DeadlinePolicy,
        now: Timestamp,
    ) -> Result<NaiveDate, LessonError> {
        terms.validate()?;
        if terms.start_date <= now.date() {
            return Err(LessonError::validation(
                "start_date",
                "must be after the current date",
            ));
        }
        Ok(policy.compute_deadline(terms.start_date)?)
    }
}
