pub const DEFAULT_REST_TIME: u32 = 75;
pub const DEFAULT_REST_ADJUSTMENT: u32 = 10;

/// Countdown between sets.
///
/// The timer is decremented by [`RestTimer::tick`] once per second and expires exactly once,
/// either by counting down to zero or by being skipped. It knows nothing about what happens
/// after the rest; the session pairs it with the pending navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestTimer {
    target: u32,
    state: TimerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running { seconds_left: u32 },
    Expired,
}

impl RestTimer {
    #[must_use]
    pub fn new(target: u32) -> Self {
        Self {
            target,
            state: if target > 0 {
                TimerState::Running {
                    seconds_left: target,
                }
            } else {
                TimerState::Expired
            },
        }
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn seconds_left(&self) -> u32 {
        match self.state {
            TimerState::Running { seconds_left } => seconds_left,
            TimerState::Expired => 0,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Counts down one second and returns the audio cue due at the new remaining time.
    pub fn tick(&mut self) -> Option<Cue> {
        match self.state {
            TimerState::Running { seconds_left } => self.set_seconds_left(seconds_left - 1),
            TimerState::Expired => None,
        }
    }

    pub fn add_time(&mut self, seconds: u32) {
        if let TimerState::Running { seconds_left } = self.state {
            self.state = TimerState::Running {
                seconds_left: seconds_left.saturating_add(seconds),
            };
        }
    }

    /// Reducing the remaining time to zero expires the timer.
    pub fn subtract_time(&mut self, seconds: u32) -> Option<Cue> {
        match self.state {
            TimerState::Running { seconds_left } => {
                self.set_seconds_left(seconds_left.saturating_sub(seconds))
            }
            TimerState::Expired => None,
        }
    }

    pub fn reset(&mut self) {
        if let TimerState::Running { .. } = self.state {
            self.state = TimerState::Running {
                seconds_left: self.target,
            };
        }
    }

    /// Expires the timer immediately. Returns false if it had already expired.
    pub fn skip(&mut self) -> bool {
        let running = !self.is_expired();
        self.state = TimerState::Expired;
        running
    }

    fn set_seconds_left(&mut self, seconds_left: u32) -> Option<Cue> {
        if seconds_left == 0 {
            self.state = TimerState::Expired;
            return Some(Cue::End);
        }
        self.state = TimerState::Running { seconds_left };
        (seconds_left <= 3).then_some(Cue::Warning)
    }
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REST_TIME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Played at three, two and one seconds remaining.
    Warning,
    /// Played when the countdown reaches zero.
    End,
}

impl Cue {
    /// Frequency in Hz.
    #[must_use]
    pub fn frequency(self) -> f32 {
        match self {
            Cue::Warning => 880.,
            Cue::End => 1200.,
        }
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration(self) -> f32 {
        match self {
            Cue::Warning => 0.2,
            Cue::End => 0.8,
        }
    }
}
