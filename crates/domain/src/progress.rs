use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::{ExerciseDef, ExerciseID, SetLog, Weight};

/// Completed, skipped and added sets of a session in progress, keyed by exercise.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SetTally {
    completed: BTreeMap<ExerciseID, Vec<SetLog>>,
    skipped: BTreeMap<ExerciseID, u32>,
    extra: BTreeMap<ExerciseID, u32>,
}

impl SetTally {
    #[must_use]
    pub fn completed_sets(&self, exercise_id: &ExerciseID) -> &[SetLog] {
        self.completed
            .get(exercise_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn completed_count(&self, exercise_id: &ExerciseID) -> u32 {
        u32::try_from(self.completed_sets(exercise_id).len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn skipped_count(&self, exercise_id: &ExerciseID) -> u32 {
        self.skipped.get(exercise_id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn extra_count(&self, exercise_id: &ExerciseID) -> u32 {
        self.extra.get(exercise_id).copied().unwrap_or_default()
    }

    /// Sets that were either completed or skipped.
    #[must_use]
    pub fn done_count(&self, exercise_id: &ExerciseID) -> u32 {
        self.completed_count(exercise_id) + self.skipped_count(exercise_id)
    }

    #[must_use]
    pub fn effective_target(&self, exercise: &ExerciseDef) -> u32 {
        exercise.sets + self.extra_count(&exercise.id)
    }

    #[must_use]
    pub fn is_complete(&self, exercise: &ExerciseDef) -> bool {
        self.done_count(&exercise.id) >= self.effective_target(exercise)
    }

    #[must_use]
    pub fn status(&self, exercise: &ExerciseDef) -> ExerciseStatus {
        if self.is_complete(exercise) {
            ExerciseStatus::Done
        } else if self.done_count(&exercise.id) > 0 {
            ExerciseStatus::InProgress
        } else {
            ExerciseStatus::Todo
        }
    }

    #[must_use]
    pub fn progress(&self, exercises: &[ExerciseDef]) -> Progress {
        let (total_planned, total_completed) =
            exercises.iter().fold((0, 0), |(planned, completed), e| {
                (
                    planned + self.effective_target(e),
                    completed + self.done_count(&e.id),
                )
            });
        Progress::new(total_planned, total_completed)
    }

    /// All completed sets, ordered by exercise ID.
    pub fn iter_completed(&self) -> impl Iterator<Item = (&ExerciseID, &[SetLog])> {
        self.completed.iter().map(|(id, sets)| (id, sets.as_slice()))
    }

    pub(crate) fn record_set(
        &mut self,
        exercise_id: &ExerciseID,
        weight: Weight,
        completed_at: DateTime<Utc>,
    ) -> SetLog {
        let sets = self.completed.entry(exercise_id.clone()).or_default();
        let set = SetLog {
            set_number: u32::try_from(sets.len()).unwrap_or(u32::MAX - 1) + 1,
            weight,
            completed_at,
        };
        sets.push(set);
        set
    }

    pub(crate) fn record_skip(&mut self, exercise_id: &ExerciseID) {
        *self.skipped.entry(exercise_id.clone()).or_default() += 1;
    }

    pub(crate) fn record_extra(&mut self, exercise_id: &ExerciseID) {
        *self.extra.entry(exercise_id.clone()).or_default() += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total_planned: u32,
    pub total_completed: u32,
    pub percent: u32,
}

impl Progress {
    #[must_use]
    pub fn new(total_planned: u32, total_completed: u32) -> Self {
        let percent = if total_planned > 0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                (f64::from(total_completed) * 100.0 / f64::from(total_planned)).round() as u32
            }
        } else {
            0
        };
        Self {
            total_planned,
            total_completed,
            percent,
        }
    }
}

/// Formats a duration as minutes and zero-padded seconds, e.g. `12:05`.
#[must_use]
pub fn format_elapsed(duration: Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use crate::tests::data::{PLAN, START, exercise};

    use super::*;

    #[test]
    fn test_set_tally_counts() {
        let squat = exercise("squat", 3, None);
        let mut tally = SetTally::default();

        assert_eq!(tally.done_count(&squat.id), 0);
        assert_eq!(tally.status(&squat), ExerciseStatus::Todo);

        let set = tally.record_set(&squat.id, Weight::new(60.0).unwrap(), *START);
        assert_eq!(set.set_number, 1);
        assert_eq!(tally.status(&squat), ExerciseStatus::InProgress);

        tally.record_skip(&squat.id);
        assert_eq!(
            tally
                .record_set(&squat.id, Weight::new(62.5).unwrap(), *START)
                .set_number,
            2
        );
        assert_eq!(tally.completed_count(&squat.id), 2);
        assert_eq!(tally.skipped_count(&squat.id), 1);
        assert_eq!(tally.done_count(&squat.id), 3);
        assert!(tally.is_complete(&squat));
        assert_eq!(tally.status(&squat), ExerciseStatus::Done);

        tally.record_extra(&squat.id);
        assert_eq!(tally.effective_target(&squat), 4);
        assert!(!tally.is_complete(&squat));
        assert_eq!(tally.status(&squat), ExerciseStatus::InProgress);
    }

    #[test]
    fn test_set_tally_done_may_exceed_target() {
        let squat = exercise("squat", 1, None);
        let mut tally = SetTally::default();
        tally.record_skip(&squat.id);
        tally.record_skip(&squat.id);
        assert!(tally.is_complete(&squat));
        assert_eq!(tally.progress(&[squat]), Progress::new(1, 2));
    }

    #[test]
    fn test_set_tally_progress() {
        let mut tally = SetTally::default();
        assert_eq!(
            tally.progress(&PLAN.exercises),
            Progress {
                total_planned: 13,
                total_completed: 0,
                percent: 0
            }
        );

        tally.record_set(&"x".into(), Weight::ZERO, *START);
        tally.record_skip(&"y".into());
        tally.record_extra(&"squat".into());
        assert_eq!(
            tally.progress(&PLAN.exercises),
            Progress {
                total_planned: 14,
                total_completed: 2,
                percent: 14
            }
        );
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(0, 3, 0)]
    #[case(3, 0, 0)]
    #[case(3, 1, 33)]
    #[case(3, 2, 67)]
    #[case(8, 1, 13)]
    #[case(3, 3, 100)]
    #[case(3, 4, 133)]
    fn test_progress_percent(
        #[case] total_planned: u32,
        #[case] total_completed: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(
            Progress::new(total_planned, total_completed).percent,
            expected
        );
    }

    #[rstest]
    #[case(0, "0:00")]
    #[case(9, "0:09")]
    #[case(75, "1:15")]
    #[case(3600, "60:00")]
    #[case(-5, "0:00")]
    fn test_format_elapsed(#[case] seconds: i64, #[case] expected: &str) {
        assert_eq!(format_elapsed(Duration::seconds(seconds)), expected);
    }

    #[derive(Debug, Clone)]
    enum Record {
        Set(usize),
        Skip(usize),
        Extra(usize),
    }

    proptest! {
        #[test]
        fn test_progress_total_completed_is_monotonic(
            records in prop::collection::vec(
                prop_oneof![
                    (0..5_usize).prop_map(Record::Set),
                    (0..5_usize).prop_map(Record::Skip),
                    (0..5_usize).prop_map(Record::Extra),
                ],
                0..40,
            )
        ) {
            let mut tally = SetTally::default();
            let mut previous = tally.progress(&PLAN.exercises).total_completed;
            for record in records {
                match record {
                    Record::Set(i) => {
                        tally.record_set(&PLAN.exercises[i].id, Weight::ZERO, *START);
                    }
                    Record::Skip(i) => tally.record_skip(&PLAN.exercises[i].id),
                    Record::Extra(i) => tally.record_extra(&PLAN.exercises[i].id),
                }
                let current = tally.progress(&PLAN.exercises).total_completed;
                prop_assert!(current >= previous);
                previous = current;
            }
        }
    }
}
