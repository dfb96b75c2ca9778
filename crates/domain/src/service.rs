use chrono::{DateTime, TimeZone, Utc};
use log::{debug, error, warn};

use crate::{
    CreateError, DeleteError, ExerciseDef, ExerciseID, ExerciseRegistry, ExerciseRepository,
    ExerciseService, HistoryRepository, HistoryService, LastWeightLookup, PlanID, PlanRepository,
    PlanService, ProgressPoint, ReadError, StorageError, Streak, TagVolume, UpdateError,
    VolumeMetric, Weight, WorkoutPlan, WorkoutSession, WorkoutSessionLog, catalog,
    exercise_progress, volume_comparison, workout_streak,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R> Service<R>
where
    R: PlanRepository + HistoryRepository + ExerciseRepository,
{
    /// Starts a session for the given plan.
    ///
    /// Weights are prefilled from the stored history. An unavailable history does not prevent
    /// the session from being started.
    pub async fn start_session(
        &self,
        plan_id: &PlanID,
        now: DateTime<Utc>,
    ) -> Result<WorkoutSession, ReadError> {
        let plan = self.get_plan(plan_id).await?;
        let sessions = match self.get_sessions().await {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!("starting session without history: {err}");
                vec![]
            }
        };
        debug!("starting session of plan {plan_id}");
        Ok(WorkoutSession::new(plan, now, sessions.as_slice()))
    }
}

impl<R: PlanRepository> Service<R> {
    async fn read_plan_or_default(&self, id: &PlanID) -> Result<WorkoutPlan, ReadError> {
        match self.repository.read_plan(id).await {
            Err(ReadError::Storage(StorageError::NotFound)) => catalog::PLANS
                .iter()
                .find(|plan| plan.id == *id)
                .cloned()
                .ok_or(ReadError::Storage(StorageError::NotFound)),
            result => result,
        }
    }

    async fn read_plans_or_default(&self) -> Result<Vec<WorkoutPlan>, ReadError> {
        let plans = self.repository.read_plans().await?;
        Ok(if plans.is_empty() {
            catalog::default_plans()
        } else {
            plans
        })
    }

    /// The built-in plans are stored before the first plan is added.
    async fn create_plan_with_defaults(
        &self,
        plan: WorkoutPlan,
    ) -> Result<WorkoutPlan, CreateError> {
        if self.repository.read_plans().await?.is_empty() {
            self.repository
                .replace_plans(catalog::default_plans())
                .await?;
        }
        self.repository.create_plan(plan).await
    }

    async fn update_stored_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, UpdateError> {
        let mut plans = self.read_plans_or_default().await?;
        let Some(stored) = plans.iter_mut().find(|p| p.id == plan.id) else {
            return Err(UpdateError::Storage(StorageError::NotFound));
        };
        *stored = plan.clone();
        self.repository.replace_plans(plans).await?;
        Ok(plan)
    }

    async fn delete_stored_plan(&self, id: &PlanID) -> Result<PlanID, DeleteError> {
        let mut plans = self.read_plans_or_default().await?;
        let num_plans = plans.len();
        plans.retain(|p| p.id != *id);
        if plans.len() == num_plans {
            return Err(DeleteError::Storage(StorageError::NotFound));
        }
        self.repository.replace_plans(plans).await?;
        Ok(id.clone())
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> Service<R> {
    /// Failures are logged but do not affect the plans that have already been stored.
    async fn register_exercises(&self, exercises: Vec<ExerciseDef>) {
        if let Err(err) = self.update_registry(exercises).await {
            warn!("failed to update exercise registry: {err}");
        }
    }

    async fn update_registry(&self, exercises: Vec<ExerciseDef>) -> Result<(), UpdateError> {
        let mut registry = self.get_known_exercises().await?;
        registry.register(exercises);
        self.repository
            .write_exercises(registry.into_exercises())
            .await?;
        Ok(())
    }
}

impl<R: PlanRepository + ExerciseRepository> PlanService for Service<R> {
    /// Stored plans that are not hidden, or the built-in plans if none are stored.
    async fn get_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError> {
        Ok(self
            .get_all_plans()
            .await?
            .into_iter()
            .filter(|plan| !plan.hidden)
            .collect())
    }

    async fn get_all_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError> {
        log_on_error!(self.read_plans_or_default(), ReadError, "get", "plans")
    }

    async fn get_plan(&self, id: &PlanID) -> Result<WorkoutPlan, ReadError> {
        log_on_error!(self.read_plan_or_default(id), ReadError, "get", "plan")
    }

    async fn create_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError> {
        let plan = log_on_error!(
            self.create_plan_with_defaults(plan),
            CreateError,
            "create",
            "plan"
        )?;
        self.register_exercises(plan.exercises.clone()).await;
        Ok(plan)
    }

    async fn update_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, UpdateError> {
        let plan = log_on_error!(self.update_stored_plan(plan), UpdateError, "update", "plan")?;
        self.register_exercises(plan.exercises.clone()).await;
        Ok(plan)
    }

    async fn replace_plans(
        &self,
        plans: Vec<WorkoutPlan>,
    ) -> Result<Vec<WorkoutPlan>, UpdateError> {
        let plans = log_on_error!(
            self.repository.replace_plans(plans),
            UpdateError,
            "replace",
            "plans"
        )?;
        self.register_exercises(
            plans
                .iter()
                .flat_map(|p| p.exercises.iter().cloned())
                .collect(),
        )
        .await;
        Ok(plans)
    }

    async fn delete_plan(&self, id: &PlanID) -> Result<PlanID, DeleteError> {
        log_on_error!(self.delete_stored_plan(id), DeleteError, "delete", "plan")
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_known_exercises(&self) -> Result<ExerciseRegistry, ReadError> {
        let stored = log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )?;
        Ok(ExerciseRegistry::new(catalog::default_exercises(), stored))
    }
}

impl<R: HistoryRepository + ExerciseRepository> HistoryService for Service<R> {
    async fn get_sessions(&self) -> Result<Vec<WorkoutSessionLog>, ReadError> {
        log_on_error!(
            self.repository.read_sessions(),
            ReadError,
            "get",
            "sessions"
        )
    }

    async fn save_session(
        &self,
        session: WorkoutSessionLog,
    ) -> Result<WorkoutSessionLog, CreateError> {
        log_on_error!(
            self.repository.create_session(session),
            CreateError,
            "save",
            "session"
        )
    }

    async fn get_last_weight(&self, exercise_id: &ExerciseID) -> Result<Option<Weight>, ReadError> {
        Ok(self.get_sessions().await?.last_weight(exercise_id))
    }

    async fn get_exercise_progress(
        &self,
        exercise_id: &ExerciseID,
    ) -> Result<Vec<ProgressPoint>, ReadError> {
        Ok(exercise_progress(&self.get_sessions().await?, exercise_id))
    }

    async fn get_volume_comparison(
        &self,
        weeks: u32,
        metric: VolumeMetric,
        now: DateTime<Utc>,
    ) -> Result<Vec<TagVolume>, ReadError> {
        let registry = self.get_known_exercises().await?;
        Ok(volume_comparison(
            &self.get_sessions().await?,
            &registry,
            weeks,
            metric,
            now,
        ))
    }

    async fn get_workout_streak<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Streak, ReadError> {
        Ok(workout_streak(&self.get_sessions().await?, now))
    }

    async fn clear_history(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_sessions(),
            DeleteError,
            "clear",
            "history"
        )
    }
}
