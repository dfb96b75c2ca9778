use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::{
    Cue, DEFAULT_REST_ADJUSTMENT, DEFAULT_REST_TIME, ExerciseDef, ExerciseGroup, ExerciseID,
    ExerciseLog, ExerciseStatus, LastWeightLookup, Progress, RestTimer, SessionID, SetTally,
    Weight, WorkoutPlan, WorkoutSessionLog, find_group,
};

/// A workout in progress.
///
/// The session walks through the exercises of a plan snapshot. Completing a set either chains to
/// the next member of a superset, starts a rest after which the circuit loops back to its first
/// member, or starts a regular rest after which the pointer stays on the exercise or advances to
/// the next one. The navigation decision is taken when the rest starts and applied when it ends.
///
/// A session ends by being consumed by [`WorkoutSession::finish`] or [`WorkoutSession::abandon`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    plan: WorkoutPlan,
    start_time: DateTime<Utc>,
    tally: SetTally,
    exercise_idx: usize,
    weight_input: String,
    last_weights: BTreeMap<ExerciseID, Weight>,
    rest: Option<Rest>,
    rest_time: u32,
    rest_adjustment: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rest {
    pub timer: RestTimer,
    pub pending: PendingAction,
    pub next_up: NextUp,
}

/// Navigation applied when a rest ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    AdvanceToIndex(usize),
    LoopToIndex(usize),
    Stay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active(usize),
    Resting(usize, PendingAction),
}

/// Effect of a user action on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Stayed,
    Moved(usize),
    Resting(PendingAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextUp {
    Set {
        exercise_name: String,
        set_number: u32,
        target: u32,
        circuit: bool,
    },
    Finished,
}

impl fmt::Display for NextUp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NextUp::Set {
                exercise_name,
                set_number,
                target,
                circuit,
            } => {
                write!(f, "{exercise_name}: set {set_number} of {target}")?;
                if *circuit {
                    write!(f, " (circuit)")?;
                }
                Ok(())
            }
            NextUp::Finished => write!(f, "Workout finished"),
        }
    }
}

struct CyclePosition {
    first: usize,
    next: Option<usize>,
}

impl WorkoutSession {
    pub fn new(
        plan: WorkoutPlan,
        start_time: DateTime<Utc>,
        history: &(impl LastWeightLookup + ?Sized),
    ) -> Self {
        let last_weights = plan
            .exercises
            .iter()
            .filter_map(|e| history.last_weight(&e.id).map(|w| (e.id.clone(), w)))
            .collect();
        let mut session = Self {
            plan,
            start_time,
            tally: SetTally::default(),
            exercise_idx: 0,
            weight_input: String::new(),
            last_weights,
            rest: None,
            rest_time: DEFAULT_REST_TIME,
            rest_adjustment: DEFAULT_REST_ADJUSTMENT,
        };
        session.weight_input = session.prefilled_weight();
        session
    }

    #[must_use]
    pub fn with_rest_time(mut self, rest_time: u32) -> Self {
        self.rest_time = rest_time;
        self
    }

    #[must_use]
    pub fn with_rest_adjustment(mut self, rest_adjustment: u32) -> Self {
        self.rest_adjustment = rest_adjustment;
        self
    }

    /// Applies to rests started afterwards.
    pub fn set_rest_time(&mut self, rest_time: u32, rest_adjustment: u32) {
        self.rest_time = rest_time;
        self.rest_adjustment = rest_adjustment;
    }

    #[must_use]
    pub fn rest_time(&self) -> u32 {
        self.rest_time
    }

    #[must_use]
    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn tally(&self) -> &SetTally {
        &self.tally
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.exercise_idx
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&ExerciseDef> {
        self.plan.exercises.get(self.exercise_idx)
    }

    #[must_use]
    pub fn weight_input(&self) -> &str {
        &self.weight_input
    }

    #[must_use]
    pub fn rest(&self) -> Option<&Rest> {
        self.rest.as_ref()
    }

    #[must_use]
    pub fn is_resting(&self) -> bool {
        self.rest.is_some()
    }

    #[must_use]
    pub fn next_up(&self) -> Option<&NextUp> {
        self.rest.as_ref().map(|r| &r.next_up)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.rest {
            Some(rest) => SessionState::Resting(self.exercise_idx, rest.pending),
            None => SessionState::Active(self.exercise_idx),
        }
    }

    #[must_use]
    pub fn groups(&self) -> Vec<ExerciseGroup<'_>> {
        self.plan.groups()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.tally.progress(&self.plan.exercises)
    }

    /// Status of each exercise, in plan order.
    #[must_use]
    pub fn statuses(&self) -> Vec<ExerciseStatus> {
        self.plan
            .exercises
            .iter()
            .map(|e| self.tally.status(e))
            .collect()
    }

    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now - self.start_time
    }

    /// Whether the current exercise has reached its effective target.
    #[must_use]
    pub fn is_exercise_complete(&self) -> bool {
        self.current_exercise()
            .is_some_and(|e| self.tally.is_complete(e))
    }

    #[must_use]
    pub fn current_set_number(&self) -> u32 {
        self.current_exercise().map_or(0, |e| {
            (self.tally.done_count(&e.id) + 1).min(self.tally.effective_target(e))
        })
    }

    pub fn set_weight_input(&mut self, weight_input: impl Into<String>) {
        self.weight_input = weight_input.into();
    }

    pub fn increase_weight(&mut self) {
        self.weight_input = Weight::parse_lenient(&self.weight_input)
            .increased()
            .to_string();
    }

    pub fn decrease_weight(&mut self) {
        self.weight_input = Weight::parse_lenient(&self.weight_input)
            .decreased()
            .to_string();
    }

    pub fn complete_set(&mut self, now: DateTime<Utc>) -> Transition {
        if self.rest.is_some() {
            return Transition::Ignored;
        }
        let Some(exercise) = self.current_exercise().cloned() else {
            return Transition::Ignored;
        };

        let weight = Weight::parse_lenient(&self.weight_input);
        let set = self.tally.record_set(&exercise.id, weight, now);
        debug!(
            "completed set {} of {} with {weight} kg",
            set.set_number, exercise.id
        );
        let complete = self.tally.is_complete(&exercise);

        if let Some(cycle) = self.cycle_position(self.exercise_idx) {
            if let Some(next) = cycle.next {
                self.move_to(next);
                return Transition::Moved(next);
            }
            if !complete {
                let next_up = self.circuit_next_up(cycle.first);
                return self.begin_rest(PendingAction::LoopToIndex(cycle.first), next_up);
            }
        }

        let next_up = self.next_up_after(&exercise, complete);
        let pending = self.post_rest_action(complete);
        if exercise.is_duration {
            return self.resume(pending);
        }
        self.begin_rest(pending, next_up)
    }

    /// Counts a set as done without logging it. Skipping never starts a rest.
    pub fn skip_set(&mut self) -> Transition {
        if self.rest.is_some() {
            return Transition::Ignored;
        }
        let Some(exercise) = self.current_exercise().cloned() else {
            return Transition::Ignored;
        };

        self.tally.record_skip(&exercise.id);
        debug!("skipped set of {}", exercise.id);

        match self.post_rest_action(self.tally.is_complete(&exercise)) {
            PendingAction::AdvanceToIndex(index) | PendingAction::LoopToIndex(index) => {
                self.move_to(index);
                Transition::Moved(index)
            }
            PendingAction::Stay => Transition::Stayed,
        }
    }

    /// Returns false for exercises without weight input.
    pub fn add_extra_set(&mut self) -> bool {
        let Some(exercise) = self.plan.exercises.get(self.exercise_idx) else {
            return false;
        };
        if !exercise.accepts_extra_sets() {
            return false;
        }
        self.tally.record_extra(&exercise.id);
        debug!("added set to {}", exercise.id);
        true
    }

    pub fn jump_to_exercise(&mut self, index: usize) -> bool {
        if index >= self.plan.exercises.len() {
            return false;
        }
        self.move_to(index);
        true
    }

    pub fn move_next(&mut self) -> bool {
        if self.exercise_idx + 1 >= self.plan.exercises.len() {
            return false;
        }
        self.move_to(self.exercise_idx + 1);
        true
    }

    pub fn move_prev(&mut self) -> bool {
        if self.exercise_idx == 0 || self.plan.exercises.is_empty() {
            return false;
        }
        self.move_to(self.exercise_idx - 1);
        true
    }

    /// Starts a rest on request of the user. The pointer stays where it is when the rest ends.
    pub fn start_rest(&mut self) -> bool {
        if self.rest.is_some() {
            return false;
        }
        let Some(exercise) = self.current_exercise().cloned() else {
            return false;
        };
        let next_up = self.next_up_after(&exercise, self.tally.is_complete(&exercise));
        matches!(
            self.begin_rest(PendingAction::Stay, next_up),
            Transition::Resting(_)
        )
    }

    /// Advances the rest timer by one second. The pending action is applied when it expires.
    pub fn tick(&mut self) -> Option<Cue> {
        let rest = self.rest.as_mut()?;
        let cue = rest.timer.tick();
        if rest.timer.is_expired() {
            self.complete_rest();
        }
        cue
    }

    pub fn add_rest_time(&mut self) {
        if let Some(rest) = self.rest.as_mut() {
            rest.timer.add_time(self.rest_adjustment);
        }
    }

    pub fn subtract_rest_time(&mut self) -> Option<Cue> {
        let rest = self.rest.as_mut()?;
        let cue = rest.timer.subtract_time(self.rest_adjustment);
        if rest.timer.is_expired() {
            self.complete_rest();
        }
        cue
    }

    pub fn reset_rest(&mut self) {
        if let Some(rest) = self.rest.as_mut() {
            rest.timer.reset();
        }
    }

    pub fn skip_rest(&mut self) -> Transition {
        if let Some(rest) = self.rest.as_mut() {
            rest.timer.skip();
        }
        self.complete_rest()
    }

    /// Closing the rest view ends the rest like skipping it.
    pub fn dismiss_rest(&mut self) -> Transition {
        self.skip_rest()
    }

    /// Converts the session into its permanent record.
    ///
    /// Exercises without completed sets are omitted, so sets that were only skipped leave no
    /// trace.
    #[must_use]
    pub fn finish(self, now: DateTime<Utc>) -> WorkoutSessionLog {
        let mut seen = BTreeSet::new();
        let exercises = self
            .plan
            .exercises
            .iter()
            .filter(|e| seen.insert(&e.id))
            .filter_map(|e| {
                let sets = self.tally.completed_sets(&e.id);
                (!sets.is_empty()).then(|| ExerciseLog {
                    exercise_id: e.id.clone(),
                    sets: sets.to_vec(),
                })
            })
            .collect::<Vec<_>>();
        #[allow(clippy::cast_precision_loss)]
        let duration_seconds = (now - self.start_time).num_milliseconds() as f64 / 1000.;
        debug!(
            "finished session of plan {} after {duration_seconds} s",
            self.plan.id
        );
        WorkoutSessionLog {
            id: SessionID::new(),
            plan_id: self.plan.id,
            start_time: self.start_time,
            end_time: now,
            duration_seconds,
            exercises,
        }
    }

    pub fn abandon(self) {
        debug!(
            "abandoned session of plan {} with {} completed sets",
            self.plan.id,
            self.tally.iter_completed().map(|(_, s)| s.len()).sum::<usize>()
        );
    }

    fn move_to(&mut self, index: usize) {
        if index == self.exercise_idx || index >= self.plan.exercises.len() {
            return;
        }
        debug!("moving from exercise {} to {index}", self.exercise_idx);
        self.exercise_idx = index;
        self.weight_input = self.prefilled_weight();
    }

    fn prefilled_weight(&self) -> String {
        self.current_exercise()
            .and_then(|e| self.last_weights.get(&e.id).copied().or(e.default_weight))
            .map(|w| w.to_string())
            .unwrap_or_default()
    }

    fn cycle_position(&self, index: usize) -> Option<CyclePosition> {
        let groups = self.plan.groups();
        let group = find_group(&groups, index).filter(|g| g.is_cycle())?;
        Some(CyclePosition {
            first: group.first_index()?,
            next: group.next_index(index),
        })
    }

    fn post_rest_action(&self, complete: bool) -> PendingAction {
        if complete && self.exercise_idx + 1 < self.plan.exercises.len() {
            PendingAction::AdvanceToIndex(self.exercise_idx + 1)
        } else {
            PendingAction::Stay
        }
    }

    fn next_up_after(&self, exercise: &ExerciseDef, complete: bool) -> NextUp {
        if !complete {
            return NextUp::Set {
                exercise_name: exercise.name.clone(),
                set_number: self.tally.done_count(&exercise.id) + 1,
                target: self.tally.effective_target(exercise),
                circuit: false,
            };
        }
        match self.plan.exercises.get(self.exercise_idx + 1) {
            Some(next) => NextUp::Set {
                exercise_name: next.name.clone(),
                set_number: 1,
                target: next.sets,
                circuit: false,
            },
            None => NextUp::Finished,
        }
    }

    fn circuit_next_up(&self, first: usize) -> NextUp {
        let Some(exercise) = self.plan.exercises.get(first) else {
            return NextUp::Finished;
        };
        let target = self.tally.effective_target(exercise);
        NextUp::Set {
            exercise_name: exercise.name.clone(),
            set_number: (self.tally.completed_count(&exercise.id) + 1).min(target),
            target,
            circuit: true,
        }
    }

    fn begin_rest(&mut self, pending: PendingAction, next_up: NextUp) -> Transition {
        let timer = RestTimer::new(self.rest_time);
        if timer.is_expired() {
            return self.resume(pending);
        }
        debug!("resting for {} s before {next_up}", timer.target());
        self.rest = Some(Rest {
            timer,
            pending,
            next_up,
        });
        Transition::Resting(pending)
    }

    fn complete_rest(&mut self) -> Transition {
        match self.rest.take() {
            Some(rest) => self.resume(rest.pending),
            None => Transition::Ignored,
        }
    }

    fn resume(&mut self, pending: PendingAction) -> Transition {
        match pending {
            PendingAction::AdvanceToIndex(index) | PendingAction::LoopToIndex(index) => {
                self.move_to(index);
                Transition::Moved(index)
            }
            PendingAction::Stay => Transition::Stayed,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{
        PlanID, SetLog,
        tests::data::{START, duration_exercise, exercise, plan},
    };

    use super::*;

    fn session(exercises: Vec<ExerciseDef>) -> WorkoutSession {
        WorkoutSession::new(
            plan(exercises),
            *START,
            &BTreeMap::<ExerciseID, Weight>::new(),
        )
    }

    fn now(minutes: i64) -> DateTime<Utc> {
        *START + Duration::minutes(minutes)
    }

    fn tick_until_rest_ends(session: &mut WorkoutSession) -> Vec<Cue> {
        let mut cues = vec![];
        while session.is_resting() {
            cues.extend(session.tick());
        }
        cues
    }

    #[test]
    fn test_single_exercise() {
        let mut session = session(vec![exercise("a", 3, None)]);

        assert_eq!(session.current_set_number(), 1);
        assert_eq!(
            session.complete_set(now(1)),
            Transition::Resting(PendingAction::Stay)
        );
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("a"),
                set_number: 2,
                target: 3,
                circuit: false
            })
        );
        assert_eq!(session.skip_rest(), Transition::Stayed);
        assert_eq!(session.current_set_number(), 2);

        session.complete_set(now(2));
        session.skip_rest();
        assert!(!session.is_exercise_complete());

        assert_eq!(
            session.complete_set(now(3)),
            Transition::Resting(PendingAction::Stay)
        );
        assert_eq!(session.next_up(), Some(&NextUp::Finished));
        assert!(session.is_exercise_complete());
        assert_eq!(session.progress().percent, 100);

        assert_eq!(session.skip_rest(), Transition::Stayed);
        assert_eq!(session.current_index(), 0);
        assert!(!session.move_next());
        assert_eq!(
            session
                .tally()
                .completed_sets(&"a".into())
                .iter()
                .map(|s| s.set_number)
                .collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_standard_rest_advances_after_last_set() {
        let mut session = session(vec![exercise("a", 2, None), exercise("b", 3, None)]);

        assert_eq!(
            session.complete_set(now(1)),
            Transition::Resting(PendingAction::Stay)
        );
        assert_eq!(tick_until_rest_ends(&mut session).len(), 4);
        assert_eq!(session.current_index(), 0);

        assert_eq!(
            session.complete_set(now(3)),
            Transition::Resting(PendingAction::AdvanceToIndex(1))
        );
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("b"),
                set_number: 1,
                target: 3,
                circuit: false
            })
        );
        assert_eq!(session.current_index(), 0);
        assert_eq!(
            tick_until_rest_ends(&mut session),
            vec![Cue::Warning, Cue::Warning, Cue::Warning, Cue::End]
        );
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.state(), SessionState::Active(1));
    }

    #[test]
    fn test_superset_cycle() {
        let mut session = session(vec![
            exercise("x", 2, Some("s")),
            exercise("y", 2, Some("s")),
            exercise("z", 2, Some("s")),
            exercise("w", 3, None),
        ]);

        assert_eq!(session.complete_set(now(1)), Transition::Moved(1));
        assert!(!session.is_resting());
        assert_eq!(session.complete_set(now(2)), Transition::Moved(2));
        assert!(!session.is_resting());

        assert_eq!(
            session.complete_set(now(3)),
            Transition::Resting(PendingAction::LoopToIndex(0))
        );
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("x"),
                set_number: 2,
                target: 2,
                circuit: true
            })
        );
        assert_eq!(session.state(), SessionState::Resting(2, PendingAction::LoopToIndex(0)));
        tick_until_rest_ends(&mut session);
        assert_eq!(session.current_index(), 0);

        assert_eq!(session.complete_set(now(5)), Transition::Moved(1));
        assert_eq!(session.complete_set(now(6)), Transition::Moved(2));
        assert_eq!(
            session.complete_set(now(7)),
            Transition::Resting(PendingAction::AdvanceToIndex(3))
        );
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("w"),
                set_number: 1,
                target: 3,
                circuit: false
            })
        );
        tick_until_rest_ends(&mut session);
        assert_eq!(session.current_index(), 3);
        assert_eq!(
            session.statuses(),
            vec![
                ExerciseStatus::Done,
                ExerciseStatus::Done,
                ExerciseStatus::Done,
                ExerciseStatus::Todo
            ]
        );
    }

    #[test]
    fn test_superset_chaining_never_rests() {
        let mut session = session(vec![
            exercise("x", 3, Some("s")),
            exercise("y", 3, Some("s")),
            exercise("z", 3, Some("s")),
        ]);

        for round in 0..3 {
            assert_eq!(session.complete_set(now(round)), Transition::Moved(1));
            assert!(!session.is_resting());
            assert_eq!(session.complete_set(now(round)), Transition::Moved(2));
            assert!(!session.is_resting());
            let transition = session.complete_set(now(round));
            if round < 2 {
                assert_eq!(transition, Transition::Resting(PendingAction::LoopToIndex(0)));
            } else {
                assert_eq!(transition, Transition::Resting(PendingAction::Stay));
                assert_eq!(session.next_up(), Some(&NextUp::Finished));
            }
            session.skip_rest();
        }
        assert_eq!(session.progress().percent, 100);
    }

    #[test]
    fn test_superset_ending_with_duration_exercise() {
        let mut session = session(vec![
            exercise("crunch", 2, Some("abs")),
            ExerciseDef {
                superset_id: Some("abs".into()),
                ..duration_exercise("plank", 2)
            },
            exercise("squat", 3, None),
        ]);

        assert_eq!(session.complete_set(now(1)), Transition::Moved(1));
        assert_eq!(
            session.complete_set(now(2)),
            Transition::Resting(PendingAction::LoopToIndex(0))
        );
        session.dismiss_rest();
        assert_eq!(session.complete_set(now(4)), Transition::Moved(1));
        assert_eq!(session.complete_set(now(5)), Transition::Moved(2));
        assert!(!session.is_resting());
    }

    #[test]
    fn test_superset_with_differing_targets_follows_last_member() {
        let mut session = session(vec![
            exercise("x", 2, Some("s")),
            exercise("y", 3, Some("s")),
        ]);

        for _ in 0..2 {
            session.complete_set(now(1));
            assert_eq!(
                session.complete_set(now(2)),
                Transition::Resting(PendingAction::LoopToIndex(0))
            );
            session.skip_rest();
        }
        assert_eq!(session.next_up(), None);
        session.complete_set(now(3));
        assert_eq!(
            session.complete_set(now(4)),
            Transition::Resting(PendingAction::Stay)
        );
        assert_eq!(session.tally().completed_count(&"x".into()), 3);
        assert_eq!(session.tally().completed_count(&"y".into()), 3);
    }

    #[test]
    fn test_circuit_next_up_is_capped_at_target() {
        let mut session = session(vec![
            exercise("x", 1, Some("s")),
            exercise("y", 3, Some("s")),
        ]);
        session.complete_set(now(1));
        session.complete_set(now(2));
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("x"),
                set_number: 1,
                target: 1,
                circuit: true
            })
        );
    }

    #[test]
    fn test_unmatched_superset_uses_standard_navigation() {
        let mut session = session(vec![
            exercise("a", 2, Some("s")),
            exercise("b", 2, None),
            exercise("c", 2, Some("s")),
        ]);

        assert_eq!(
            session.complete_set(now(1)),
            Transition::Resting(PendingAction::Stay)
        );
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("a"),
                set_number: 2,
                target: 2,
                circuit: false
            })
        );
        session.skip_rest();
        assert_eq!(
            session.complete_set(now(2)),
            Transition::Resting(PendingAction::AdvanceToIndex(1))
        );
    }

    #[test]
    fn test_duration_exercise_skips_rest() {
        let mut session = session(vec![
            duration_exercise("warmup", 1),
            exercise("squat", 3, None),
            duration_exercise("stretch", 2),
        ]);

        assert_eq!(session.complete_set(now(10)), Transition::Moved(1));
        assert!(!session.is_resting());

        session.jump_to_exercise(2);
        assert_eq!(session.complete_set(now(20)), Transition::Stayed);
        assert_eq!(session.complete_set(now(30)), Transition::Stayed);
        assert!(session.is_exercise_complete());
        assert!(!session.is_resting());
    }

    #[test]
    fn test_extra_set() {
        let mut session = session(vec![exercise("a", 3, None), exercise("b", 3, None)]);

        for minute in 0..3 {
            session.complete_set(now(minute));
            session.skip_rest();
        }
        assert_eq!(session.current_index(), 1);

        assert!(session.move_prev());
        assert!(session.is_exercise_complete());
        assert!(session.add_extra_set());
        assert_eq!(session.tally().effective_target(&exercise("a", 3, None)), 4);
        assert!(!session.is_exercise_complete());
        assert_eq!(session.current_set_number(), 4);

        assert_eq!(
            session.complete_set(now(4)),
            Transition::Resting(PendingAction::AdvanceToIndex(1))
        );
        assert_eq!(
            session.tally().completed_sets(&"a".into())[3].set_number,
            4
        );
        assert!(session.is_exercise_complete());
    }

    #[test]
    fn test_extra_set_rejected_without_weight_input() {
        let mut circuit = exercise("burpees", 3, None);
        circuit.is_circuit = true;
        let mut session = session(vec![duration_exercise("plank", 1), circuit]);

        assert!(!session.add_extra_set());
        session.move_next();
        assert!(!session.add_extra_set());
        assert_eq!(session.progress().total_planned, 4);
    }

    #[test]
    fn test_skip_sets() {
        let mut session = session(vec![exercise("a", 3, None), exercise("b", 3, None)]);

        assert_eq!(session.skip_set(), Transition::Stayed);
        assert_eq!(session.skip_set(), Transition::Stayed);
        assert_eq!(session.skip_set(), Transition::Moved(1));
        assert!(!session.is_resting());
        assert_eq!(session.tally().done_count(&"a".into()), 3);
        assert_eq!(session.progress().percent, 50);

        session.complete_set(now(1));
        let log = session.finish(now(2));
        assert_eq!(
            log.exercises
                .iter()
                .map(|e| e.exercise_id.clone())
                .collect::<Vec<_>>(),
            vec![ExerciseID::from("b")]
        );
    }

    #[test]
    fn test_skip_set_in_superset_does_not_loop() {
        let mut session = session(vec![
            exercise("x", 1, Some("s")),
            exercise("y", 1, Some("s")),
            exercise("z", 1, None),
        ]);

        assert_eq!(session.skip_set(), Transition::Moved(1));
        assert_eq!(session.skip_set(), Transition::Moved(2));
        assert!(!session.is_resting());
    }

    #[test]
    fn test_actions_while_resting() {
        let mut session = session(vec![exercise("a", 2, None), exercise("b", 2, None)]);
        session.complete_set(now(1));

        assert_eq!(session.complete_set(now(2)), Transition::Ignored);
        assert_eq!(session.skip_set(), Transition::Ignored);
        assert!(!session.start_rest());
        assert_eq!(session.tally().done_count(&"a".into()), 1);

        assert!(session.move_next());
        assert_eq!(session.current_index(), 1);
        assert!(session.is_resting());
        assert_eq!(session.skip_rest(), Transition::Stayed);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.skip_rest(), Transition::Ignored);
    }

    #[test]
    fn test_pending_action_survives_navigation() {
        let mut session = session(vec![
            exercise("a", 1, None),
            exercise("b", 2, None),
            exercise("c", 2, None),
        ]);
        assert_eq!(
            session.complete_set(now(1)),
            Transition::Resting(PendingAction::AdvanceToIndex(1))
        );
        session.jump_to_exercise(2);
        assert_eq!(session.dismiss_rest(), Transition::Moved(1));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_rest_adjustment() {
        let mut session = session(vec![exercise("a", 3, None)])
            .with_rest_time(30)
            .with_rest_adjustment(15);
        session.complete_set(now(1));
        assert_eq!(session.rest().unwrap().timer.seconds_left(), 30);

        session.add_rest_time();
        assert_eq!(session.rest().unwrap().timer.seconds_left(), 45);
        session.tick();
        session.reset_rest();
        assert_eq!(session.rest().unwrap().timer.seconds_left(), 30);

        assert_eq!(session.subtract_rest_time(), None);
        assert_eq!(session.rest().unwrap().timer.seconds_left(), 15);
        assert_eq!(session.subtract_rest_time(), Some(Cue::End));
        assert!(!session.is_resting());
        assert_eq!(session.subtract_rest_time(), None);
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn test_zero_rest_time_resumes_immediately() {
        let mut session = session(vec![exercise("a", 1, None), exercise("b", 1, None)])
            .with_rest_time(0);
        assert_eq!(session.complete_set(now(1)), Transition::Moved(1));
        assert!(!session.is_resting());
        assert!(!session.start_rest());
    }

    #[test]
    fn test_manual_rest() {
        let mut session = session(vec![exercise("a", 2, None), exercise("b", 2, None)]);

        assert!(session.start_rest());
        assert_eq!(session.state(), SessionState::Resting(0, PendingAction::Stay));
        assert_eq!(
            session.next_up(),
            Some(&NextUp::Set {
                exercise_name: String::from("a"),
                set_number: 1,
                target: 2,
                circuit: false
            })
        );
        assert!(!session.start_rest());
        tick_until_rest_ends(&mut session);
        assert_eq!(session.state(), SessionState::Active(0));
        assert_eq!(session.progress().total_completed, 0);
    }

    #[rstest]
    #[case(0, true, 0)]
    #[case(2, true, 2)]
    #[case(3, false, 0)]
    #[case(100, false, 0)]
    fn test_jump_to_exercise(
        #[case] index: usize,
        #[case] expected: bool,
        #[case] expected_index: usize,
    ) {
        let mut session = session(vec![
            exercise("a", 1, None),
            exercise("b", 1, None),
            exercise("c", 1, None),
        ]);
        assert_eq!(session.jump_to_exercise(index), expected);
        assert_eq!(session.current_index(), expected_index);
    }

    #[test]
    fn test_move_next_and_prev_are_clamped() {
        let mut session = session(vec![exercise("a", 1, None), exercise("b", 1, None)]);

        assert!(!session.move_prev());
        assert!(session.move_next());
        assert!(!session.move_next());
        assert_eq!(session.current_index(), 1);
        assert!(session.move_prev());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_empty_plan() {
        let mut session = session(vec![]);

        assert_eq!(session.current_exercise(), None);
        assert!(!session.move_next());
        assert!(!session.move_prev());
        assert!(!session.jump_to_exercise(0));
        assert_eq!(session.complete_set(now(1)), Transition::Ignored);
        assert_eq!(session.skip_set(), Transition::Ignored);
        assert!(!session.add_extra_set());
        assert!(!session.start_rest());
        assert_eq!(session.tick(), None);
        assert_eq!(session.progress(), Progress::default());
        assert_eq!(session.current_set_number(), 0);
        assert!(!session.is_exercise_complete());
        assert!(session.finish(now(1)).exercises.is_empty());
    }

    #[test]
    fn test_weight_prefill() {
        let mut squat = exercise("squat", 3, None);
        squat.default_weight = Some(Weight::new(20.0).unwrap());
        let mut bench = exercise("bench", 3, None);
        bench.default_weight = Some(Weight::new(25.0).unwrap());
        let history = BTreeMap::from([
            (ExerciseID::from("bench"), Weight::new(40.0).unwrap()),
            (ExerciseID::from("other"), Weight::new(90.0).unwrap()),
        ]);
        let mut session = WorkoutSession::new(
            plan(vec![squat, bench, exercise("row", 3, None)]),
            *START,
            &history,
        );

        assert_eq!(session.weight_input(), "20");
        session.move_next();
        assert_eq!(session.weight_input(), "40");
        session.move_next();
        assert_eq!(session.weight_input(), "");
        session.set_weight_input("32.5");
        session.jump_to_exercise(2);
        assert_eq!(session.weight_input(), "32.5");
        session.jump_to_exercise(0);
        assert_eq!(session.weight_input(), "20");
    }

    #[test]
    fn test_weight_input() {
        let mut session = session(vec![exercise("a", 5, None)]);

        session.set_weight_input("not a number");
        session.complete_set(now(1));
        session.skip_rest();

        session.set_weight_input("17.5");
        session.increase_weight();
        assert_eq!(session.weight_input(), "18.75");
        session.complete_set(now(2));
        session.skip_rest();

        session.decrease_weight();
        session.decrease_weight();
        assert_eq!(session.weight_input(), "16.25");
        session.set_weight_input("");
        session.decrease_weight();
        assert_eq!(session.weight_input(), "0");

        assert_eq!(
            session
                .tally()
                .completed_sets(&"a".into())
                .iter()
                .map(|s| f32::from(s.weight))
                .collect::<Vec<_>>(),
            vec![0.0, 18.75]
        );
    }

    #[test]
    fn test_finish() {
        let mut session = session(vec![
            exercise("a", 2, None),
            exercise("b", 2, None),
            exercise("c", 2, None),
        ]);
        session.set_weight_input("50");
        session.complete_set(now(1));
        session.skip_rest();
        session.move_next();
        session.skip_set();
        session.move_next();
        session.set_weight_input("10");
        session.complete_set(now(3));
        session.skip_rest();
        session.complete_set(now(4));

        let end = now(30) + Duration::milliseconds(500);
        let log = session.finish(end);

        assert!(!log.id.is_nil());
        assert_eq!(log.plan_id, PlanID::from("test"));
        assert_eq!(log.start_time, *START);
        assert_eq!(log.end_time, end);
        assert_approx_eq!(log.duration_seconds, 1800.5);
        assert_eq!(
            log.exercises,
            vec![
                ExerciseLog {
                    exercise_id: "a".into(),
                    sets: vec![SetLog {
                        set_number: 1,
                        weight: Weight::new(50.0).unwrap(),
                        completed_at: now(1)
                    }]
                },
                ExerciseLog {
                    exercise_id: "c".into(),
                    sets: vec![
                        SetLog {
                            set_number: 1,
                            weight: Weight::new(10.0).unwrap(),
                            completed_at: now(3)
                        },
                        SetLog {
                            set_number: 2,
                            weight: Weight::new(10.0).unwrap(),
                            completed_at: now(4)
                        }
                    ]
                },
            ]
        );
    }

    #[test]
    fn test_elapsed() {
        let session = session(vec![exercise("a", 1, None)]);
        assert_eq!(session.elapsed(now(12)), Duration::minutes(12));
    }

    #[rstest]
    #[case(
        NextUp::Set { exercise_name: String::from("Squat"), set_number: 2, target: 3, circuit: false },
        "Squat: set 2 of 3"
    )]
    #[case(
        NextUp::Set { exercise_name: String::from("Plank"), set_number: 1, target: 3, circuit: true },
        "Plank: set 1 of 3 (circuit)"
    )]
    #[case(NextUp::Finished, "Workout finished")]
    fn test_next_up_display(#[case] next_up: NextUp, #[case] expected: &str) {
        assert_eq!(next_up.to_string(), expected);
    }
}
