//! Running/not-running state machine, independent of any timer.

/// A change in whether the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Stopped,
}

/// Folds one sample into the prior state.
///
/// `prior` is `None` before the first sample. The first sample emits
/// `Started` only if the game is already running; after that only flips
/// emit events.
pub fn transition(prior: Option<bool>, sample: bool) -> (bool, Option<GameEvent>) {
    match (prior, sample) {
        (None | Some(false), true) => (true, Some(GameEvent::Started)),
        (Some(true), false) => (false, Some(GameEvent::Stopped)),
        (_, running) => (running, None),
    }
}

/// Holds the last observed state between samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchState {
    last: Option<bool>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, sample: bool) -> Option<GameEvent> {
        let (running, event) = transition(self.last, sample);
        self.last = Some(running);
        event
    }

    /// Last observed state; false before the first sample.
    pub fn is_running(&self) -> bool {
        self.last.unwrap_or(false)
    }

    /// Forgets history so the next sample counts as the first.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
