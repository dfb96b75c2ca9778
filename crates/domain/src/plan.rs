use std::collections::BTreeSet;

use derive_more::{AsRef, Deref, Display};

use crate::{
    CreateError, DeleteError, ExerciseDef, ExerciseGroup, ExerciseID, ReadError, SupersetID,
    UpdateError, group_exercises,
};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    /// Plans offered for starting a session.
    async fn get_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError>;
    /// All plans including hidden ones.
    async fn get_all_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError>;
    async fn get_plan(&self, id: &PlanID) -> Result<WorkoutPlan, ReadError>;
    async fn create_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError>;
    async fn update_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, UpdateError>;
    async fn replace_plans(&self, plans: Vec<WorkoutPlan>)
    -> Result<Vec<WorkoutPlan>, UpdateError>;
    async fn delete_plan(&self, id: &PlanID) -> Result<PlanID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait PlanRepository {
    async fn read_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError>;
    async fn read_plan(&self, id: &PlanID) -> Result<WorkoutPlan, ReadError>;
    /// A stored plan with the same ID is replaced. The new plan is appended to the stored plans.
    async fn create_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError>;
    async fn replace_plans(&self, plans: Vec<WorkoutPlan>)
    -> Result<Vec<WorkoutPlan>, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub id: PlanID,
    pub name: String,
    pub exercises: Vec<ExerciseDef>,
    pub hidden: bool,
}

impl WorkoutPlan {
    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }

    #[must_use]
    pub fn groups(&self) -> Vec<ExerciseGroup<'_>> {
        group_exercises(&self.exercises)
    }

    #[must_use]
    pub fn exercise(&self, id: &ExerciseID) -> Option<&ExerciseDef> {
        self.exercises.iter().find(|e| e.id == *id)
    }

    /// Moves the group at position `from` to position `to` of the grouped plan.
    ///
    /// Returns false if either position does not exist.
    pub fn move_group(&mut self, from: usize, to: usize) -> bool {
        let mut groups = self
            .groups()
            .into_iter()
            .map(|g| g.indices)
            .collect::<Vec<_>>();
        if from >= groups.len() || to >= groups.len() {
            return false;
        }
        let group = groups.remove(from);
        groups.insert(to, group);
        self.reorder(groups.into_iter().flatten());
        true
    }

    /// Swaps a group with its neighbour.
    pub fn shift_group(&mut self, index: usize, direction: Direction) -> bool {
        direction
            .target(index)
            .is_some_and(|target| self.move_group(index, target))
    }

    /// Joins the selected exercises into a new superset.
    ///
    /// The superset is placed at the position of the first selected exercise. At least two
    /// exercises of the plan must be selected.
    pub fn create_superset(
        &mut self,
        exercise_ids: &BTreeSet<ExerciseID>,
        superset_id: SupersetID,
    ) -> bool {
        let is_selected = |e: &ExerciseDef| exercise_ids.contains(&e.id);
        if self.exercises.iter().filter(|&e| is_selected(e)).count() < 2 {
            return false;
        }
        let Some(position) = self.exercises.iter().position(is_selected) else {
            return false;
        };
        let (mut selected, mut remaining): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.exercises)
                .into_iter()
                .partition(is_selected);
        for exercise in &mut selected {
            exercise.superset_id = Some(superset_id.clone());
        }
        let tail = remaining.split_off(position);
        remaining.extend(selected);
        remaining.extend(tail);
        self.exercises = remaining;
        true
    }

    /// Inserts an exercise after the last member of an existing superset.
    pub fn add_to_superset(
        &mut self,
        superset_id: &SupersetID,
        mut exercise: ExerciseDef,
    ) -> bool {
        let Some(last) = self
            .exercises
            .iter()
            .rposition(|e| e.superset_id.as_ref() == Some(superset_id))
        else {
            return false;
        };
        exercise.superset_id = Some(superset_id.clone());
        self.exercises.insert(last + 1, exercise);
        true
    }

    /// Replaces the exercise at `index`, or appends it if `index` is the number of exercises.
    pub fn set_exercise(&mut self, index: usize, exercise: ExerciseDef) -> bool {
        if index == self.exercises.len() {
            self.exercises.push(exercise);
            return true;
        }
        match self.exercises.get_mut(index) {
            Some(current) => {
                *current = exercise;
                true
            }
            None => false,
        }
    }

    /// A superset left with a single member is dissolved.
    pub fn remove_exercise(&mut self, index: usize) -> Option<ExerciseDef> {
        if index >= self.exercises.len() {
            return None;
        }
        let removed = self.exercises.remove(index);
        if let Some(superset_id) = &removed.superset_id {
            let is_member = |e: &ExerciseDef| e.superset_id.as_ref() == Some(superset_id);
            if self.exercises.iter().filter(|&e| is_member(e)).count() <= 1 {
                for exercise in &mut self.exercises {
                    if is_member(exercise) {
                        exercise.superset_id = None;
                    }
                }
            }
        }
        Some(removed)
    }

    pub fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
    }

    fn reorder(&mut self, order: impl IntoIterator<Item = usize>) {
        let mut exercises = std::mem::take(&mut self.exercises)
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();
        self.exercises = order
            .into_iter()
            .filter_map(|i| exercises.get_mut(i).and_then(Option::take))
            .collect();
    }
}

/// Swaps a plan with its neighbour.
pub fn move_plan(plans: &mut [WorkoutPlan], index: usize, direction: Direction) -> bool {
    match direction.target(index) {
        Some(target) if index < plans.len() && target < plans.len() => {
            plans.swap(index, target);
            true
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn target(self, index: usize) -> Option<usize> {
        match self {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        }
    }
}

#[derive(AsRef, Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanID(String);

impl From<&str> for PlanID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlanID {
    fn from(value: String) -> Self {
        Self(value)
    }
}
