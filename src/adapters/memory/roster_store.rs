//! In-memory roster store.
//!
//! Each lesson has a gate (`tokio::sync::Mutex<()>`) held for the whole life
//! of a session, and a committed roster behind a `RwLock` that readers copy
//! from. Sessions work on a clone and swap it in on commit, so readers never
//! see a half-applied transition and never wait on the gate.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{DomainError, EnrollmentId, ErrorCode, LessonId};
use crate::domain::lesson::Lesson;
use crate::domain::roster::Roster;
use crate::ports::{RosterReader, RosterRepository, RosterSession};

#[derive(Debug)]
struct LessonSlot {
    gate: Arc<Mutex<()>>,
    committed: RwLock<Roster>,
}

type EnrollmentIndex = Arc<RwLock<HashMap<EnrollmentId, LessonId>>>;

/// In-memory implementation of `RosterRepository` and `RosterReader`.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterStore {
    slots: Arc<RwLock<HashMap<LessonId, Arc<LessonSlot>>>>,
    enrollment_index: EnrollmentIndex,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored lessons.
    pub async fn lesson_count(&self) -> usize {
        self.slots.read().await.len()
    }

    async fn slot(&self, lesson_id: LessonId) -> Option<Arc<LessonSlot>> {
        self.slots.read().await.get(&lesson_id).cloned()
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterStore {
    async fn insert(&self, roster: &Roster) -> Result<(), DomainError> {
        let lesson_id = roster.lesson().id();
        let mut slots = self.slots.write().await;
        if slots.contains_key(&lesson_id) {
            return Err(DomainError::database(format!(
                "lesson {} already exists",
                lesson_id
            )));
        }

        let mut stored = roster.clone();
        stored.take_events();
        let enrollment_ids: Vec<_> = stored.enrollments().iter().map(|e| e.id()).collect();

        slots.insert(
            lesson_id,
            Arc::new(LessonSlot {
                gate: Arc::new(Mutex::new(())),
                committed: RwLock::new(stored),
            }),
        );
        drop(slots);

        let mut index = self.enrollment_index.write().await;
        for id in enrollment_ids {
            index.insert(id, lesson_id);
        }
        tracing::debug!(%lesson_id, "lesson stored");
        Ok(())
    }

    async fn open(
        &self,
        lesson_id: LessonId,
    ) -> Result<Option<Box<dyn RosterSession>>, DomainError> {
        let Some(slot) = self.slot(lesson_id).await else {
            return Ok(None);
        };

        let guard = slot.gate.clone().lock_owned().await;
        let working = slot.committed.read().await.clone();

        Ok(Some(Box::new(InMemoryRosterSession {
            _guard: guard,
            slot,
            working,
            enrollment_index: self.enrollment_index.clone(),
        })))
    }

    async fn lesson_id_for(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<LessonId>, DomainError> {
        Ok(self.enrollment_index.read().await.get(&enrollment_id).copied())
    }
}

#[async_trait]
impl RosterReader for InMemoryRosterStore {
    async fn find_lesson(&self, id: LessonId) -> Result<Option<Lesson>, DomainError> {
        match self.slot(id).await {
            Some(slot) => Ok(Some(slot.committed.read().await.lesson().clone())),
            None => Ok(None),
        }
    }

    async fn find_enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let Some(lesson_id) = self.lesson_id_for(id).await? else {
            return Ok(None);
        };
        let slot = self.slot(lesson_id).await.ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("enrollment {} points at missing lesson {}", id, lesson_id),
            )
        })?;
        let roster = slot.committed.read().await;
        Ok(roster.enrollment(id).cloned())
    }

    async fn list_enrollments(&self, lesson_id: LessonId) -> Result<Vec<Enrollment>, DomainError> {
        match self.slot(lesson_id).await {
            Some(slot) => Ok(slot.committed.read().await.enrollments().to_vec()),
            None => Ok(Vec::new()),
        }
    }
}

/// Session over one lesson; holds the lesson's gate until dropped.
struct InMemoryRosterSession {
    _guard: OwnedMutexGuard<()>,
    slot: Arc<LessonSlot>,
    working: Roster,
    enrollment_index: EnrollmentIndex,
}

#[async_trait]
impl RosterSession for InMemoryRosterSession {
    fn roster(&self) -> &Roster {
        &self.working
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.working
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryRosterSession {
            _guard,
            slot,
            mut working,
            enrollment_index,
        } = *self;

        // Events are delivered by the caller, not stored.
        working.take_events();
        let lesson_id = working.lesson().id();
        let enrollment_ids: Vec<_> = working.enrollments().iter().map(|e| e.id()).collect();

        *slot.committed.write().await = working;

        let mut index = enrollment_index.write().await;
        for id in enrollment_ids {
            index.entry(id).or_insert(lesson_id);
        }
        drop(index);

        tracing::debug!(%lesson_id, "roster committed");
        Ok(())
    }
}
