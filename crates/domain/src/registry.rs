use indexmap::IndexMap;

use crate::{ExerciseDef, ExerciseID, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    /// The built-in exercises together with all exercises that have been part of a stored plan.
    async fn get_known_exercises(&self) -> Result<ExerciseRegistry, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<ExerciseDef>, ReadError>;
    async fn write_exercises(
        &self,
        exercises: Vec<ExerciseDef>,
    ) -> Result<Vec<ExerciseDef>, UpdateError>;
}

/// Exercise definitions by ID, in the order they were first registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseRegistry(IndexMap<ExerciseID, ExerciseDef>);

impl ExerciseRegistry {
    /// Stored definitions replace the defaults. A stored definition without tags keeps the tags
    /// of the default definition.
    pub fn new(
        defaults: impl IntoIterator<Item = ExerciseDef>,
        stored: impl IntoIterator<Item = ExerciseDef>,
    ) -> Self {
        let mut exercises = defaults
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect::<IndexMap<_, _>>();
        for mut exercise in stored {
            if exercise.tags.is_empty() {
                if let Some(default) = exercises.get(&exercise.id) {
                    exercise.tags.clone_from(&default.tags);
                }
            }
            exercises.insert(exercise.id.clone(), exercise);
        }
        Self(exercises)
    }

    pub fn register(&mut self, exercises: impl IntoIterator<Item = ExerciseDef>) {
        for exercise in exercises {
            self.0.insert(exercise.id.clone(), exercise);
        }
    }

    #[must_use]
    pub fn get(&self, id: &ExerciseID) -> Option<&ExerciseDef> {
        self.0.get(id)
    }

    #[must_use]
    pub fn tags(&self, id: &ExerciseID) -> &[String] {
        self.0.get(id).map_or(&[], |e| e.tags.as_slice())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseDef> {
        self.0.values()
    }

    #[must_use]
    pub fn sorted_by_name(&self) -> Vec<&ExerciseDef> {
        let mut exercises = self.0.values().collect::<Vec<_>>();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        exercises
    }

    #[must_use]
    pub fn into_exercises(self) -> Vec<ExerciseDef> {
        self.0.into_values().collect()
    }
}
