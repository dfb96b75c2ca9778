use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, PlanID, ReadError, Streak, TagVolume, VolumeMetric,
    Weight,
};

#[allow(async_fn_in_trait)]
pub trait HistoryService {
    async fn get_sessions(&self) -> Result<Vec<WorkoutSessionLog>, ReadError>;
    async fn save_session(
        &self,
        session: WorkoutSessionLog,
    ) -> Result<WorkoutSessionLog, CreateError>;
    async fn get_last_weight(&self, exercise_id: &ExerciseID) -> Result<Option<Weight>, ReadError>;
    async fn get_exercise_progress(
        &self,
        exercise_id: &ExerciseID,
    ) -> Result<Vec<ProgressPoint>, ReadError>;
    async fn get_volume_comparison(
        &self,
        weeks: u32,
        metric: VolumeMetric,
        now: DateTime<Utc>,
    ) -> Result<Vec<TagVolume>, ReadError>;
    async fn get_workout_streak<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Streak, ReadError>;
    async fn clear_history(&self) -> Result<(), DeleteError>;
}

/// Sessions are returned most recent first.
#[allow(async_fn_in_trait)]
pub trait HistoryRepository {
    async fn read_sessions(&self) -> Result<Vec<WorkoutSessionLog>, ReadError>;
    async fn create_session(
        &self,
        session: WorkoutSessionLog,
    ) -> Result<WorkoutSessionLog, CreateError>;
    async fn delete_sessions(&self) -> Result<(), DeleteError>;
}

pub trait LastWeightLookup {
    fn last_weight(&self, exercise_id: &ExerciseID) -> Option<Weight>;
}

/// The weight of the final set of the most recent session containing the exercise.
impl LastWeightLookup for [WorkoutSessionLog] {
    fn last_weight(&self, exercise_id: &ExerciseID) -> Option<Weight> {
        self.iter().find_map(|session| {
            session
                .exercise(exercise_id)
                .and_then(|e| e.sets.last())
                .map(|set| set.weight)
        })
    }
}

impl LastWeightLookup for BTreeMap<ExerciseID, Weight> {
    fn last_weight(&self, exercise_id: &ExerciseID) -> Option<Weight> {
        self.get(exercise_id).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSessionLog {
    pub id: SessionID,
    pub plan_id: PlanID,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub exercises: Vec<ExerciseLog>,
}

impl WorkoutSessionLog {
    #[must_use]
    pub fn exercise(&self, exercise_id: &ExerciseID) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise_id == *exercise_id)
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseLog {
    pub exercise_id: ExerciseID,
    pub sets: Vec<SetLog>,
}

impl ExerciseLog {
    #[must_use]
    pub fn max_weight(&self) -> Option<Weight> {
        self.sets
            .iter()
            .map(|s| s.weight)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetLog {
    pub set_number: u32,
    pub weight: Weight,
    pub completed_at: DateTime<Utc>,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionID(Uuid);

impl SessionID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for SessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPoint {
    pub time: DateTime<Utc>,
    pub weight: Weight,
}

/// The heaviest set of each session containing the exercise, in chronological order.
#[must_use]
pub fn exercise_progress(
    sessions: &[WorkoutSessionLog],
    exercise_id: &ExerciseID,
) -> Vec<ProgressPoint> {
    let mut sessions = sessions.iter().collect::<Vec<_>>();
    sessions.sort_by_key(|s| s.start_time);
    sessions
        .into_iter()
        .filter_map(|session| {
            let weight = session.exercise(exercise_id)?.max_weight()?;
            Some(ProgressPoint {
                time: session.end_time,
                weight,
            })
        })
        .collect()
}
