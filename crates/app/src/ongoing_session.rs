use chrono::{DateTime, Utc};
use log::debug;
use setlist_domain::{
    Cue, LastWeightLookup, Transition, WorkoutPlan, WorkoutSession, WorkoutSessionLog,
};

use crate::Settings;

/// Audio output for rest timer cues.
pub trait Beeper {
    /// `gain` is between 0 and 1.
    fn play_beep(&self, frequency: f32, duration: f32, gain: f32);
}

/// A session driven by the user interface.
///
/// Applies the settings to the rests of the session and plays the cues of the rest timer.
pub struct OngoingSession<B> {
    session: WorkoutSession,
    settings: Settings,
    beeper: B,
}

impl<B: Beeper> OngoingSession<B> {
    pub fn new(
        plan: WorkoutPlan,
        start_time: DateTime<Utc>,
        history: &(impl LastWeightLookup + ?Sized),
        settings: Settings,
        beeper: B,
    ) -> Self {
        Self::from_session(WorkoutSession::new(plan, start_time, history), settings, beeper)
    }

    pub fn from_session(mut session: WorkoutSession, settings: Settings, beeper: B) -> Self {
        session.set_rest_time(settings.rest_time, settings.rest_adjustment);
        Self {
            session,
            settings,
            beeper,
        }
    }

    #[must_use]
    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    /// Actions without audio feedback are performed on the session directly.
    pub fn session_mut(&mut self) -> &mut WorkoutSession {
        &mut self.session
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// A running rest keeps its duration.
    pub fn apply_settings(&mut self, settings: Settings) {
        debug!("applying rest time of {} s", settings.rest_time);
        self.session
            .set_rest_time(settings.rest_time, settings.rest_adjustment);
        self.settings = settings;
    }

    /// Called once per second.
    pub fn tick(&mut self) -> Option<Cue> {
        let cue = self.session.tick();
        self.play(cue);
        cue
    }

    pub fn subtract_rest_time(&mut self) -> Option<Cue> {
        let cue = self.session.subtract_rest_time();
        self.play(cue);
        cue
    }

    pub fn complete_set(&mut self, now: DateTime<Utc>) -> Transition {
        self.session.complete_set(now)
    }

    #[must_use]
    pub fn finish(self, now: DateTime<Utc>) -> WorkoutSessionLog {
        self.session.finish(now)
    }

    fn play(&self, cue: Option<Cue>) {
        let Some(cue) = cue else {
            return;
        };
        let gain = self.settings.beep_gain();
        if gain > 0. {
            self.beeper.play_beep(cue.frequency(), cue.duration(), gain);
        }
    }
}
