use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};

use crate::{ExerciseLog, ExerciseRegistry, WorkoutSessionLog};

/// Number of days covered by a workout streak.
pub const STREAK_DAYS: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeMetric {
    /// Number of sets.
    Sets,
    /// Sum of the weights of all sets.
    Load,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagVolume {
    pub tag: String,
    pub current: f32,
    pub previous: f32,
}

/// Compares the volume per tag of the last `weeks` weeks with the volume of the preceding period
/// of the same length.
///
/// Sessions are assigned to a period by their end time. The tags of an exercise are taken from
/// the registry. The result is sorted by the volume of the current period in descending order.
#[must_use]
pub fn volume_comparison(
    sessions: &[WorkoutSessionLog],
    registry: &ExerciseRegistry,
    weeks: u32,
    metric: VolumeMetric,
    now: DateTime<Utc>,
) -> Vec<TagVolume> {
    let period = Duration::weeks(i64::from(weeks));
    let current_start = now - period;
    let previous_start = current_start - period;

    let mut volumes: BTreeMap<&str, (f32, f32)> = BTreeMap::new();
    for session in sessions {
        let is_current = session.end_time >= current_start;
        if !is_current && session.end_time < previous_start {
            continue;
        }
        for exercise in &session.exercises {
            let value = volume(exercise, metric);
            for tag in registry
                .tags(&exercise.exercise_id)
                .iter()
                .filter(|t| !t.is_empty())
            {
                let (current, previous) = volumes.entry(tag.as_str()).or_default();
                if is_current {
                    *current += value;
                } else {
                    *previous += value;
                }
            }
        }
    }

    let mut result = volumes
        .into_iter()
        .map(|(tag, (current, previous))| TagVolume {
            tag: tag.to_string(),
            current,
            previous,
        })
        .collect::<Vec<_>>();
    result.sort_by(|a, b| b.current.total_cmp(&a.current));
    result
}

fn volume(exercise: &ExerciseLog, metric: VolumeMetric) -> f32 {
    match metric {
        #[allow(clippy::cast_precision_loss)]
        VolumeMetric::Sets => exercise.sets.len() as f32,
        VolumeMetric::Load => exercise.sets.iter().map(|s| f32::from(s.weight)).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakDay {
    pub date: NaiveDate,
    pub has_workout: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streak {
    pub days: Vec<StreakDay>,
    /// Number of days with at least one session.
    pub count: usize,
}

/// The days of the four weeks ending with the current week, starting on Monday.
///
/// A session counts for the date of its end time in the time zone of `now`.
#[must_use]
pub fn workout_streak<Tz: TimeZone>(
    sessions: &[WorkoutSessionLog],
    now: &DateTime<Tz>,
) -> Streak {
    let today = now.date_naive();
    let first = today - Days::new(3 * 7 + u64::from(today.weekday().num_days_from_monday()));
    let workout_dates = sessions
        .iter()
        .map(|s| s.end_time.with_timezone(&now.timezone()).date_naive())
        .collect::<BTreeSet<_>>();

    let days = first
        .iter_days()
        .take(STREAK_DAYS)
        .map(|date| StreakDay {
            date,
            has_workout: workout_dates.contains(&date),
            is_today: date == today,
        })
        .collect::<Vec<_>>();
    let count = days.iter().filter(|d| d.has_workout).count();

    Streak { days, count }
}
