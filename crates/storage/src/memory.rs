//! In-memory storage
//!
//! Plans, sessions, known exercises and settings are kept for the lifetime of the storage object. The storage is
//! meant for a single thread, like the browser storage of the user interface. Only the log is
//! shared between threads, as the logger may be called from anywhere.

use std::{cell::RefCell, collections::VecDeque, sync::Mutex};

use log::debug;
use setlist_app::{Settings, SettingsRepository};
use setlist_domain as domain;

#[derive(Default)]
pub struct MemoryStorage {
    plans: RefCell<Vec<domain::WorkoutPlan>>,
    sessions: RefCell<Vec<domain::WorkoutSessionLog>>,
    exercises: RefCell<Vec<domain::ExerciseDef>>,
    settings: RefCell<Option<Settings>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(plans: Vec<domain::WorkoutPlan>) -> Self {
        Self {
            plans: RefCell::new(plans),
            ..Self::default()
        }
    }
}

impl domain::PlanRepository for MemoryStorage {
    async fn read_plans(&self) -> Result<Vec<domain::WorkoutPlan>, domain::ReadError> {
        Ok(self.plans.borrow().clone())
    }

    async fn read_plan(
        &self,
        id: &domain::PlanID,
    ) -> Result<domain::WorkoutPlan, domain::ReadError> {
        self.plans
            .borrow()
            .iter()
            .find(|plan| plan.id == *id)
            .cloned()
            .ok_or(domain::ReadError::Storage(domain::StorageError::NotFound))
    }

    async fn create_plan(
        &self,
        plan: domain::WorkoutPlan,
    ) -> Result<domain::WorkoutPlan, domain::CreateError> {
        let mut plans = self.plans.borrow_mut();
        plans.retain(|p| p.id != plan.id);
        plans.push(plan.clone());
        debug!("stored plan {}", plan.id);
        Ok(plan)
    }

    async fn replace_plans(
        &self,
        plans: Vec<domain::WorkoutPlan>,
    ) -> Result<Vec<domain::WorkoutPlan>, domain::UpdateError> {
        debug!("storing {} plans", plans.len());
        self.plans.borrow_mut().clone_from(&plans);
        Ok(plans)
    }
}

impl domain::HistoryRepository for MemoryStorage {
    async fn read_sessions(&self) -> Result<Vec<domain::WorkoutSessionLog>, domain::ReadError> {
        Ok(self.sessions.borrow().clone())
    }

    /// Sessions are kept ordered by start time, most recent first.
    async fn create_session(
        &self,
        session: domain::WorkoutSessionLog,
    ) -> Result<domain::WorkoutSessionLog, domain::CreateError> {
        let mut sessions = self.sessions.borrow_mut();
        if sessions.iter().any(|s| s.id == session.id) {
            return Err(domain::CreateError::Conflict);
        }
        let position = sessions.partition_point(|s| s.start_time > session.start_time);
        sessions.insert(position, session.clone());
        debug!("stored session {position} of {}", sessions.len());
        Ok(session)
    }

    async fn delete_sessions(&self) -> Result<(), domain::DeleteError> {
        self.sessions.borrow_mut().clear();
        Ok(())
    }
}

impl domain::ExerciseRepository for MemoryStorage {
    async fn read_exercises(&self) -> Result<Vec<domain::ExerciseDef>, domain::ReadError> {
        Ok(self.exercises.borrow().clone())
    }

    async fn write_exercises(
        &self,
        exercises: Vec<domain::ExerciseDef>,
    ) -> Result<Vec<domain::ExerciseDef>, domain::UpdateError> {
        self.exercises.borrow_mut().clone_from(&exercises);
        Ok(exercises)
    }
}

impl SettingsRepository for MemoryStorage {
    async fn read_settings(&self) -> Result<Settings, String> {
        Ok(self.settings.borrow().unwrap_or_default())
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        *self.settings.borrow_mut() = Some(settings);
        Ok(())
    }
}

/// Keeps the most recent log entries, newest first.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<VecDeque<setlist_app::log::Entry>>,
}

impl setlist_app::log::Repository for MemoryLog {
    fn read_entries(&self) -> Result<VecDeque<setlist_app::log::Entry>, setlist_app::log::Error> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|err| setlist_app::log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: setlist_app::log::Entry) -> Result<(), setlist_app::log::Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| setlist_app::log::Error::Unknown(err.to_string()))?;
        entries.push_front(entry);
        entries.truncate(setlist_app::log::MAX_ENTRIES);
        Ok(())
    }
}
