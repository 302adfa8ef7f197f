//! Game process polling.
//!
//! A dedicated thread samples the process list at a fixed interval and
//! reports `Started`/`Stopped` transitions to a handler. Each tick runs to
//! completion, handler included, before the next wait begins, so ticks never
//! overlap.
//!
//! SAFETY CONSTRAINTS: this module only reads process *names*. It never
//! opens, reads or writes the game process.

use super::matcher::ProcessMatcher;
use super::source::{ProcessSource, SystemProcesses};
use super::transition::{GameEvent, WatchState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Configuration for the game poller.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often to sample the process list (default: 2000ms).
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// Per-run stop signal and observed state. A fresh one is created by every
/// `start`.
#[derive(Debug, Default)]
struct RunSignal {
    stop: AtomicBool,
    running: AtomicBool,
}

impl RunSignal {
    fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Whether this run last saw the game, false once the run is stopped.
    fn game_running(&self) -> bool {
        !self.is_stopped() && self.running.load(Ordering::SeqCst)
    }
}

/// Cloneable handle that stops the polling run it was returned for.
///
/// Safe to use from inside the event handler, where joining the polling
/// thread would deadlock. A handle kept from an earlier run has no effect on
/// later runs.
#[derive(Debug, Clone)]
pub struct StopHandle {
    signal: Arc<RunSignal>,
    thread: thread::Thread,
}

impl StopHandle {
    pub fn stop(&self) {
        self.signal.stop.store(true, Ordering::SeqCst);
        self.thread.unpark();
    }
}

/// Watches the OS process list for the game.
pub struct GameProcessMonitor {
    config: MonitorConfig,
    matcher: Arc<ProcessMatcher>,
    source: Arc<dyn ProcessSource>,
    run: Option<(StopHandle, JoinHandle<()>)>,
}

impl Default for GameProcessMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl GameProcessMonitor {
    /// Monitor backed by the real process list.
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_source(config, ProcessMatcher::default(), SystemProcesses)
    }

    pub fn with_source(
        config: MonitorConfig,
        matcher: ProcessMatcher,
        source: impl ProcessSource + 'static,
    ) -> Self {
        Self {
            config,
            matcher: Arc::new(matcher),
            source: Arc::new(source),
            run: None,
        }
    }

    /// Last state the poller observed; false when stopped.
    pub fn last_known_running(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|(stop, _)| stop.signal.game_running())
    }

    pub fn is_started(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|(stop, _)| !stop.signal.is_stopped())
    }

    /// One synchronous sample, outside the polling loop.
    pub fn check_once(&self) -> bool {
        sample(self.source.as_ref(), &self.matcher, false)
    }

    /// Starts polling and returns a handle that can stop this run.
    ///
    /// The handler runs on the polling thread. Returns `None` without doing
    /// anything when a run is already active.
    pub fn start<F>(&mut self, mut handler: F) -> Option<StopHandle>
    where
        F: FnMut(GameEvent) + Send + 'static,
    {
        if self.is_started() {
            tracing::warn!("Game watcher already running");
            return None;
        }
        // A run stopped from its own handler is still winding down
        self.join_finished_run();

        let signal = Arc::new(RunSignal::default());
        let thread_signal = Arc::clone(&signal);
        let source = Arc::clone(&self.source);
        let matcher = Arc::clone(&self.matcher);
        let interval = self.config.poll_interval;

        let join = thread::spawn(move || {
            tracing::info!(interval_ms = interval.as_millis(), "Game watcher started");

            let mut state = WatchState::new();
            let mut first = true;

            while !thread_signal.is_stopped() {
                let running = sample(source.as_ref(), &matcher, first);
                first = false;

                let event = state.observe(running);
                thread_signal.running.store(state.is_running(), Ordering::SeqCst);

                if let Some(event) = event {
                    match event {
                        GameEvent::Started => tracing::info!("Foxhole started"),
                        GameEvent::Stopped => tracing::info!("Foxhole stopped"),
                    }
                    handler(event);
                }

                wait_interruptible(&thread_signal, interval);
            }

            tracing::info!("Game watcher shutting down");
        });

        let stop = StopHandle {
            signal,
            thread: join.thread().clone(),
        };
        self.run = Some((stop.clone(), join));
        Some(stop)
    }

    /// Stops polling and resets the last known state. Idempotent.
    pub fn stop(&mut self) {
        let Some((stop, join)) = self.run.take() else {
            return;
        };

        tracing::info!("Stopping game watcher...");
        stop.stop();

        if join.thread().id() == thread::current().id() {
            // Called from the handler via a shared monitor; the thread exits
            // on its own once the handler returns.
            return;
        }
        if join.join().is_err() {
            tracing::error!("Game watcher thread panicked");
        }
    }

    fn join_finished_run(&mut self) {
        if let Some((_, join)) = self.run.take() {
            if join.join().is_err() {
                tracing::error!("Game watcher thread panicked");
            }
        }
    }
}

impl Drop for GameProcessMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleeps for `interval` unless the run is stopped first.
fn wait_interruptible(signal: &RunSignal, interval: Duration) {
    let deadline = Instant::now() + interval;
    while !signal.is_stopped() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::park_timeout(deadline - now);
    }
}

/// Takes one sample. Enumeration errors count as "not running".
fn sample(source: &dyn ProcessSource, matcher: &ProcessMatcher, log_details: bool) -> bool {
    let names = match source.process_names() {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(%e, "Error checking process list");
            return false;
        }
    };

    if log_details {
        tracing::info!(count = names.len(), "Checking processes for Foxhole");
        let game_like = matcher.game_like(&names);
        if !game_like.is_empty() {
            tracing::info!(?game_like, "Found Foxhole-like processes");
        }
    }

    matcher.any_match(&names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessEnumerationError;
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Replays scripted samples, then repeats the last one.
    struct ScriptedSource {
        samples: Mutex<Vec<Option<bool>>>,
        last: Mutex<Option<bool>>,
    }

    impl ScriptedSource {
        /// `None` entries simulate an enumeration failure.
        fn new(samples: Vec<Option<bool>>) -> Self {
            let mut samples = samples;
            samples.reverse();
            Self {
                samples: Mutex::new(samples),
                last: Mutex::new(Some(false)),
            }
        }
    }

    impl ProcessSource for ScriptedSource {
        fn process_names(&self) -> Result<Vec<String>, ProcessEnumerationError> {
            let next = self.samples.lock().unwrap().pop();
            let current = match next {
                Some(sample) => {
                    *self.last.lock().unwrap() = sample;
                    sample
                }
                None => *self.last.lock().unwrap(),
            };

            match current {
                Some(true) => Ok(vec!["explorer.exe".into(), "War-Win64-Shipping.exe".into()]),
                Some(false) => Ok(vec!["explorer.exe".into()]),
                None => Err(ProcessEnumerationError("access denied".into())),
            }
        }
    }

    fn fast_config() -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(10),
        }
    }

    fn monitor_with(source: ScriptedSource) -> GameProcessMonitor {
        GameProcessMonitor::with_source(fast_config(), ProcessMatcher::default(), source)
    }

    fn collect(rx: &mpsc::Receiver<GameEvent>, count: usize) -> Vec<GameEvent> {
        (0..count)
            .filter_map(|_| rx.recv_timeout(Duration::from_secs(5)).ok())
            .collect()
    }

    #[test]
    fn test_monitor_config_default() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
    }

    #[test]
    fn test_events_follow_transitions() {
        let source = ScriptedSource::new(vec![
            Some(false),
            Some(false),
            Some(true),
            Some(true),
            Some(false),
        ]);
        let mut monitor = monitor_with(source);

        let (tx, rx) = mpsc::channel();
        monitor.start(move |event| {
            let _ = tx.send(event);
        });

        let events = collect(&rx, 2);
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Stopped]);

        // The script now repeats `false`; nothing else should arrive
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        monitor.stop();
    }

    #[test]
    fn test_running_at_startup_emits_start() {
        let source = ScriptedSource::new(vec![Some(true)]);
        let mut monitor = monitor_with(source);

        let (tx, rx) = mpsc::channel();
        monitor.start(move |event| {
            let _ = tx.send(event);
        });

        assert_eq!(collect(&rx, 1), vec![GameEvent::Started]);
        assert!(monitor.last_known_running());

        monitor.stop();
        assert!(!monitor.last_known_running());
    }

    #[test]
    fn test_enumeration_failure_counts_as_not_running() {
        let source = ScriptedSource::new(vec![Some(true), None, Some(true)]);
        let mut monitor = monitor_with(source);

        let (tx, rx) = mpsc::channel();
        monitor.start(move |event| {
            let _ = tx.send(event);
        });

        let events = collect(&rx, 3);
        assert_eq!(
            events,
            vec![GameEvent::Started, GameEvent::Stopped, GameEvent::Started]
        );
        monitor.stop();
    }

    #[test]
    fn test_stop_is_idempotent_and_restartable() {
        let source = ScriptedSource::new(vec![Some(true)]);
        let mut monitor = monitor_with(source);

        let (tx, rx) = mpsc::channel();
        let tx2 = tx.clone();
        assert!(monitor.start(move |event| {
            let _ = tx.send(event);
        })
        .is_some());
        assert_eq!(collect(&rx, 1), vec![GameEvent::Started]);

        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_started());

        // Fresh run: the first sample is treated as new again
        monitor.start(move |event| {
            let _ = tx2.send(event);
        });
        assert_eq!(collect(&rx, 1), vec![GameEvent::Started]);
        monitor.stop();
    }

    #[test]
    fn test_stale_handle_leaves_later_run_alone() {
        let mut monitor = monitor_with(ScriptedSource::new(vec![Some(true)]));

        let (tx, rx) = mpsc::channel();
        let tx2 = tx.clone();
        let stale = monitor
            .start(move |event| {
                let _ = tx.send(event);
            })
            .unwrap();
        assert_eq!(collect(&rx, 1), vec![GameEvent::Started]);
        monitor.stop();

        monitor.start(move |event| {
            let _ = tx2.send(event);
        });
        assert_eq!(collect(&rx, 1), vec![GameEvent::Started]);
        assert!(monitor.last_known_running());

        stale.stop();
        assert!(monitor.is_started());
        assert!(monitor.last_known_running());

        monitor.stop();
        assert!(!monitor.last_known_running());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let source = ScriptedSource::new(vec![]);
        let mut monitor = monitor_with(source);

        assert!(monitor.start(|_| {}).is_some());
        assert!(monitor.start(|_| {}).is_none());
        monitor.stop();
    }

    #[test]
    fn test_stop_from_handler() {
        let source = ScriptedSource::new(vec![Some(true), Some(false)]);
        let mut monitor = monitor_with(source);

        let (tx, rx) = mpsc::channel();
        let stop_slot: Arc<Mutex<Option<StopHandle>>> = Arc::new(Mutex::new(None));
        let handler_slot = Arc::clone(&stop_slot);

        let handle = monitor
            .start(move |event| {
                if let Some(stop) = handler_slot.lock().unwrap().as_ref() {
                    stop.stop();
                }
                let _ = tx.send(event);
            })
            .unwrap();
        *stop_slot.lock().unwrap() = Some(handle);

        // At most one event gets through before the run stops itself
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, GameEvent::Started);
        thread::sleep(Duration::from_millis(100));
        assert!(!monitor.is_started());

        monitor.stop();
        assert!(!monitor.last_known_running());
    }

    #[test]
    fn test_check_once() {
        let monitor = GameProcessMonitor::with_source(
            fast_config(),
            ProcessMatcher::default(),
            ScriptedSource::new(vec![Some(true)]),
        );
        assert!(monitor.check_once());
        assert!(monitor.check_once());
    }
}
