use std::fmt;

use crate::{ExerciseDef, ExerciseID, SupersetID};

/// A contiguous run of exercises from a plan.
///
/// Superset groups contain the adjacent exercises sharing one superset ID. Every other exercise
/// forms a group of its own. Groups are derived from the plan on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseGroup<'a> {
    pub id: GroupID,
    pub is_superset: bool,
    pub items: Vec<&'a ExerciseDef>,
    pub indices: Vec<usize>,
}

impl<'a> ExerciseGroup<'a> {
    fn single(index: usize, exercise: &'a ExerciseDef) -> Self {
        Self {
            id: GroupID::Single {
                exercise_id: exercise.id.clone(),
                index,
            },
            is_superset: false,
            items: vec![exercise],
            indices: vec![index],
        }
    }

    fn superset(superset_id: &SupersetID, index: usize, exercise: &'a ExerciseDef) -> Self {
        Self {
            id: GroupID::Superset(superset_id.clone()),
            is_superset: true,
            items: vec![exercise],
            indices: vec![index],
        }
    }

    fn push(&mut self, index: usize, exercise: &'a ExerciseDef) {
        self.items.push(exercise);
        self.indices.push(index);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// A superset with a single member behaves like a standalone exercise.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.is_superset && self.len() > 1
    }

    #[must_use]
    pub fn first_index(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// The plan index of the member following `index`, if `index` is not the last member.
    #[must_use]
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let position = self.indices.iter().position(|i| *i == index)?;
        self.indices.get(position + 1).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupID {
    Superset(SupersetID),
    Single { exercise_id: ExerciseID, index: usize },
}

impl fmt::Display for GroupID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroupID::Superset(superset_id) => write!(f, "{superset_id}"),
            GroupID::Single { exercise_id, index } => write!(f, "single_{exercise_id}_{index}"),
        }
    }
}

/// Partitions an ordered list of exercises into contiguous groups.
///
/// Grouping is positional: a superset ID that reappears after an unrelated exercise starts a new
/// group. Concatenating the items of all groups yields the input in its order.
#[must_use]
pub fn group_exercises(exercises: &[ExerciseDef]) -> Vec<ExerciseGroup<'_>> {
    let mut groups = Vec::new();
    let mut open: Option<ExerciseGroup> = None;

    for (index, exercise) in exercises.iter().enumerate() {
        let Some(superset_id) = &exercise.superset_id else {
            groups.extend(open.take());
            groups.push(ExerciseGroup::single(index, exercise));
            continue;
        };

        match open.as_mut() {
            Some(group) if matches!(&group.id, GroupID::Superset(id) if id == superset_id) => {
                group.push(index, exercise);
            }
            _ => {
                groups.extend(open.take());
                open = Some(ExerciseGroup::superset(superset_id, index, exercise));
            }
        }
    }

    groups.extend(open);
    groups
}

/// The group containing the exercise at `index`.
#[must_use]
pub fn find_group<'a, 'b>(
    groups: &'b [ExerciseGroup<'a>],
    index: usize,
) -> Option<&'b ExerciseGroup<'a>> {
    groups.iter().find(|g| g.contains(index))
}
