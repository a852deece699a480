//! Roster repository port (write side).
//!
//! Every state transition on a lesson runs inside a `RosterSession`: an
//! exclusive, per-lesson unit of work. Two sessions for the same lesson never
//! overlap, so the capacity check and the capacity change of `enroll` are
//! atomic, and duplicate cancellations see the first one's result.
//!
//! # Design
//!
//! - **Working copy**: changes made through `roster_mut` become visible to
//!   readers only on `commit`
//! - **Drop discards**: a session dropped without `commit` leaves storage as
//!   it was, so an enrollment transition and its capacity delta are
//!   persisted together or not at all
//! - **Keep it short**: nothing should await external I/O while a session
//!   is open
//!
//! # Example
//!
//! ```ignore
//! let mut session = repo
//!     .open(lesson_id)
//!     .await?
//!     .ok_or(LessonError::not_found(lesson_id))?;
//!
//! session.roster_mut().enroll(EnrollmentId::new(), student_id, now)?;
//! let events = session.roster_mut().take_events();
//! session.commit().await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EnrollmentId, LessonId};
use crate::domain::roster::Roster;

/// Repository port for lesson rosters.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Persists the roster of a newly created lesson.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure or duplicate lesson ID
    async fn insert(&self, roster: &Roster) -> Result<(), DomainError>;

    /// Opens an exclusive session on a lesson's roster.
    ///
    /// Waits while another session holds the lesson. Returns `None` if the
    /// lesson does not exist.
    async fn open(&self, lesson_id: LessonId)
        -> Result<Option<Box<dyn RosterSession>>, DomainError>;

    /// Resolves the lesson an enrollment belongs to.
    ///
    /// The mapping never changes once an enrollment exists, so it can be
    /// read before opening a session.
    async fn lesson_id_for(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<LessonId>, DomainError>;
}

/// Exclusive unit of work over one lesson's roster.
#[async_trait]
pub trait RosterSession: Send {
    /// The working copy.
    fn roster(&self) -> &Roster;

    /// Mutable access to the working copy.
    fn roster_mut(&mut self) -> &mut Roster;

    /// Publishes the working copy and releases the lock.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the changes could not be persisted; nothing is
    ///   written in that case
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn RosterRepository, _: Box<dyn RosterSession>) {}

    #[test]
    fn sessions_can_cross_tasks() {
        fn assert_send<T: Send + ?Sized>() {}
        assert_send::<Box<dyn RosterSession>>();
    }
}
