//! Playback engine: a deterministic, observable state machine over a
//! [`StepSequence`] with timer-driven auto-advance.
//!
//! The engine owns exactly one [`PlaybackState`] and at most one pending
//! timer. Every transition that touches play, pause, speed, or the loaded
//! steps cancels the pending timer before optionally scheduling a new one,
//! so a tick scheduled under an old speed can never advance the cursor.
//! Fired timers are reported back through [`PlaybackEngine::on_timer`];
//! an id that is not the pending one is discarded as stale.
//!
//! Every state change notifies all subscribed listeners synchronously,
//! exactly once, with the post-change state. Calls that change nothing
//! (out-of-range seeks, stepping past either end, `play` with no steps)
//! are silent no-ops and notify nobody.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use stepwise_types::{PlaybackMode, PlaybackState, Step, StepSequence};
use tracing::{debug, info, trace};

use crate::config::{self, PlaybackConfig};
use crate::scheduler::{ManualScheduler, Scheduler, TimerId};

/// Display time for steps without a duration hint.
pub const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(1000);

/// Shortest tick delay. Very high speeds clamp to this so a tick always
/// lands strictly after the one that scheduled it.
pub const MIN_TICK_DELAY: Duration = Duration::from_millis(1);

/// Errors raised by caller-contract violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    /// A speed multiplier that is zero, negative, or not finite.
    #[error("speed multiplier must be finite and positive, got {speed}")]
    InvalidSpeed {
        /// The rejected value.
        speed: f64,
    },

    /// A zero default step duration.
    #[error("default step duration must be non-zero")]
    ZeroDefaultDuration,
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Handle returned by [`PlaybackEngine::subscribe`].
///
/// Cloning the handle is cheap, and any clone can unsubscribe. This
/// includes a clone captured by the listener itself, which may unsubscribe
/// while it is being notified.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// Identifier of the listener this handle controls.
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stop delivering notifications to the listener.
    ///
    /// Takes effect immediately, even mid-notification: the listener will
    /// not be called again, and other listeners are unaffected. Calling
    /// it more than once is harmless.
    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Whether the listener is still receiving notifications.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Listener callback type.
type Listener = Box<dyn FnMut(&PlaybackState) + Send>;

/// A registered listener and its liveness flag.
struct ListenerEntry {
    active: Arc<AtomicBool>,
    callback: Listener,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Step playback engine.
///
/// Generic over the [`Scheduler`] that provides its timer, so tests can
/// drive it with a [`ManualScheduler`] and a real host with
/// [`TokioScheduler`](crate::scheduler::TokioScheduler).
pub struct PlaybackEngine<S: Scheduler> {
    /// The one state this engine owns.
    state: PlaybackState,
    /// Timer capability.
    scheduler: S,
    /// The single outstanding auto-advance timer, if any.
    pending_timer: Option<TimerId>,
    /// Display time for steps without a hint.
    default_duration: Duration,
    /// Registered listeners, in subscription order.
    listeners: Vec<ListenerEntry>,
    /// Next subscription id to hand out.
    next_subscription: u64,
}

impl<S: Scheduler> core::fmt::Debug for PlaybackEngine<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("steps", &self.state.steps.len())
            .field("current_index", &self.state.current_index)
            .field("is_playing", &self.state.is_playing)
            .field("speed_multiplier", &self.state.speed_multiplier)
            .field("loop_enabled", &self.state.loop_enabled)
            .field("pending_timer", &self.pending_timer)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> PlaybackEngine<S> {
    /// Create an empty engine with default duration, speed 1.0, no loop.
    pub fn new(scheduler: S) -> Self {
        Self {
            state: PlaybackState::default(),
            scheduler,
            pending_timer: None,
            default_duration: DEFAULT_STEP_DURATION,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create an empty engine from playback configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ZeroDefaultDuration`] or
    /// [`PlaybackError::InvalidSpeed`] if the configuration is unusable.
    pub fn with_config(config: &PlaybackConfig, scheduler: S) -> Result<Self, PlaybackError> {
        if config.default_step_duration_ms == 0 {
            return Err(PlaybackError::ZeroDefaultDuration);
        }
        if !config::is_valid_speed(config.initial_speed) {
            return Err(PlaybackError::InvalidSpeed {
                speed: config.initial_speed,
            });
        }
        let mut engine = Self::new(scheduler);
        engine.default_duration = Duration::from_millis(config.default_step_duration_ms);
        engine.state.speed_multiplier = config.initial_speed;
        engine.state.loop_enabled = config.loop_enabled;
        Ok(engine)
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// A copy of the current state.
    pub fn state(&self) -> PlaybackState {
        self.state.clone()
    }

    /// Coarse mode of the engine.
    pub fn mode(&self) -> PlaybackMode {
        self.state.mode()
    }

    /// Cursor position.
    pub const fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Whether the engine is auto-advancing.
    pub const fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Step under the cursor, `None` when empty.
    pub fn current_step(&self) -> Option<&Step> {
        self.state.current_step()
    }

    /// Loaded steps.
    pub const fn steps(&self) -> &StepSequence {
        &self.state.steps
    }

    /// Display time for steps without a hint.
    pub const fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Whether an auto-advance timer is outstanding.
    pub const fn has_pending_timer(&self) -> bool {
        self.pending_timer.is_some()
    }

    /// Delay the engine uses for the current step at the current speed.
    ///
    /// This is the time the step under the cursor stays visible before
    /// the next tick: its duration hint (or the default) divided by the
    /// speed multiplier, never less than [`MIN_TICK_DELAY`].
    pub fn next_delay(&self) -> Duration {
        let base = self
            .state
            .current_step()
            .and_then(|step| step.duration_hint_ms)
            .map_or(self.default_duration, Duration::from_millis);
        Duration::try_from_secs_f64(base.as_secs_f64() / self.state.speed_multiplier)
            .unwrap_or(Duration::MAX)
            .max(MIN_TICK_DELAY)
    }

    /// The scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Number of listeners still receiving notifications.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.active.load(Ordering::Acquire))
            .count()
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Replace the loaded steps and rewind to a paused cursor at 0.
    ///
    /// Any pending tick is cancelled. Loading an empty sequence is valid
    /// and leaves the engine in [`PlaybackMode::Empty`].
    pub fn load_steps(&mut self, steps: StepSequence) {
        self.cancel_timer();
        self.state.steps = steps;
        self.state.current_index = 0;
        self.state.is_playing = false;
        debug!(steps = self.state.steps.len(), "Steps loaded");
        self.notify();
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    /// Start auto-advancing.
    ///
    /// At the last step, playback restarts from index 0. Does nothing when
    /// no steps are loaded, or when already playing short of the last step.
    pub fn play(&mut self) {
        if self.state.steps.is_empty() {
            trace!("play ignored: no steps loaded");
            return;
        }
        if self.state.is_playing && !self.state.is_at_end() {
            trace!("play ignored: already playing");
            return;
        }
        self.cancel_timer();
        if self.state.is_at_end() {
            self.state.current_index = 0;
        }
        self.state.is_playing = true;
        debug!(
            index = self.state.current_index,
            speed = self.state.speed_multiplier,
            "Playback started"
        );
        self.notify();
        self.schedule_tick();
    }

    /// Stop auto-advancing, keeping the cursor where it is.
    pub fn pause(&mut self) {
        self.cancel_timer();
        self.state.is_playing = false;
        debug!(index = self.state.current_index, "Playback paused");
        self.notify();
    }

    /// Stop auto-advancing and rewind to index 0.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.state.current_index = 0;
        self.state.is_playing = false;
        debug!("Playback reset");
        self.notify();
    }

    /// Move the cursor one step forward. No-op at the last step.
    ///
    /// Does not reschedule a pending tick.
    pub fn step_forward(&mut self) {
        if !self.state.can_step_forward() {
            trace!(index = self.state.current_index, "step_forward ignored at end");
            return;
        }
        self.state.current_index = self.state.current_index.saturating_add(1);
        self.notify();
    }

    /// Move the cursor one step back. No-op at index 0.
    ///
    /// Does not reschedule a pending tick.
    pub fn step_backward(&mut self) {
        if !self.state.can_step_backward() {
            trace!("step_backward ignored at start");
            return;
        }
        self.state.current_index = self.state.current_index.saturating_sub(1);
        self.notify();
    }

    /// Move the cursor to `index`. Out-of-range indices are ignored.
    ///
    /// While playing, the pending tick keeps its original deadline and
    /// then continues from the new index.
    pub fn go_to_step(&mut self, index: usize) {
        if index >= self.state.steps.len() {
            trace!(index, len = self.state.steps.len(), "go_to_step ignored: out of range");
            return;
        }
        self.state.current_index = index;
        self.notify();
    }

    /// Change the speed multiplier.
    ///
    /// While playing, the pending tick is cancelled and rescheduled at the
    /// new rate, measured from now.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidSpeed`] if `speed` is not finite and
    /// positive. The state is left untouched.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        if !config::is_valid_speed(speed) {
            return Err(PlaybackError::InvalidSpeed { speed });
        }
        self.state.speed_multiplier = speed;
        debug!(speed, "Playback speed changed");
        self.notify();
        if self.state.is_playing {
            self.cancel_timer();
            self.schedule_tick();
        }
        Ok(())
    }

    /// Flip whether auto-advance wraps at the last step.
    pub fn toggle_loop(&mut self) {
        self.state.loop_enabled = !self.state.loop_enabled;
        debug!(loop_enabled = self.state.loop_enabled, "Loop toggled");
        self.notify();
    }

    /// Handle a fired timer.
    ///
    /// Advances the cursor, wraps to 0 when looping, or pauses at the last
    /// step. Ids other than the pending timer are stale and ignored.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.pending_timer != Some(id) {
            debug!(%id, "Stale timer ignored");
            return;
        }
        self.pending_timer = None;
        if !self.state.is_playing {
            return;
        }

        if self.state.can_step_forward() {
            self.state.current_index = self.state.current_index.saturating_add(1);
            self.notify();
            self.schedule_tick();
        } else if self.state.loop_enabled {
            self.state.current_index = 0;
            debug!("Playback wrapped to start");
            self.notify();
            self.schedule_tick();
        } else {
            self.state.is_playing = false;
            debug!(index = self.state.current_index, "Playback reached end");
            self.notify();
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Register a listener called after every state change.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&PlaybackState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        let active = Arc::new(AtomicBool::new(true));
        self.listeners.push(ListenerEntry {
            active: Arc::clone(&active),
            callback: Box::new(listener),
        });
        Subscription { id, active }
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Cancel any pending tick and drop every listener.
    ///
    /// Consumes the engine; there is no way back.
    pub fn destroy(mut self) {
        self.cancel_timer();
        self.listeners.clear();
        info!(steps = self.state.steps.len(), "Playback engine destroyed");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn schedule_tick(&mut self) {
        let delay = self.next_delay();
        let id = self.scheduler.schedule(delay);
        trace!(%id, delay_ms = delay.as_millis(), "Tick scheduled");
        self.pending_timer = Some(id);
    }

    fn cancel_timer(&mut self) {
        if let Some(id) = self.pending_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn notify(&mut self) {
        let state = &self.state;
        for entry in &mut self.listeners {
            if entry.active.load(Ordering::Acquire) {
                (entry.callback)(state);
            }
        }
        self.listeners.retain(|entry| entry.active.load(Ordering::Acquire));
    }
}

impl<S: Scheduler> Drop for PlaybackEngine<S> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

impl PlaybackEngine<ManualScheduler> {
    /// Advance the simulated clock by `by`, firing every timer that comes
    /// due along the way in deadline order. Returns how many fired.
    ///
    /// Timers scheduled by a tick during the advance fire too if their
    /// deadline falls inside the window.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let target = self.scheduler.now().saturating_add(by);
        let mut fired: usize = 0;
        while let Some(id) = self.scheduler.pop_due(target) {
            self.on_timer(id);
            fired = fired.saturating_add(1);
        }
        self.scheduler.set_now(target);
        fired
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use stepwise_types::{Snapshot, Step, StepId, StepKind};

    use super::*;

    fn sequence(len: u32) -> StepSequence {
        let steps = (0..len)
            .map(|i| Step::new(StepId(i), StepKind::Custom, format!("step {i}"), Snapshot::new()))
            .collect();
        StepSequence::new(steps).unwrap()
    }

    fn engine_with(len: u32) -> PlaybackEngine<ManualScheduler> {
        let mut engine = PlaybackEngine::new(ManualScheduler::new());
        engine.load_steps(sequence(len));
        engine
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new_engine_is_empty() {
        let engine = PlaybackEngine::new(ManualScheduler::new());
        let state = engine.state();
        assert_eq!(state.mode(), PlaybackMode::Empty);
        assert_eq!(state.current_index, 0);
        assert!(!engine.has_pending_timer());
    }

    #[test]
    fn play_on_empty_is_noop() {
        let mut engine = PlaybackEngine::new(ManualScheduler::new());
        engine.play();
        assert!(!engine.is_playing());
        assert_eq!(engine.scheduler().pending_count(), 0);
    }

    #[test]
    fn play_schedules_one_timer() {
        let mut engine = engine_with(3);
        engine.play();
        assert_eq!(engine.mode(), PlaybackMode::Playing);
        assert_eq!(engine.scheduler().pending_count(), 1);
        assert_eq!(engine.scheduler().last_delay(), Some(ms(1000)));
    }

    #[test]
    fn play_twice_does_not_duplicate_timer() {
        let mut engine = engine_with(3);
        engine.play();
        engine.play();
        assert_eq!(engine.scheduler().pending_count(), 1);
        assert_eq!(engine.advance_clock(ms(1000)), 1);
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn tick_advances_cursor() {
        let mut engine = engine_with(3);
        engine.play();
        engine.advance_clock(ms(999));
        assert_eq!(engine.current_index(), 0);
        engine.advance_clock(ms(1));
        assert_eq!(engine.current_index(), 1);
        assert!(engine.is_playing());
    }

    #[test]
    fn duration_hint_governs_new_step() {
        let steps = StepSequence::new(vec![
            Step::new(StepId(0), StepKind::Custom, "a", Snapshot::new()),
            Step::new(StepId(1), StepKind::Custom, "b", Snapshot::new()).with_duration_ms(300),
            Step::new(StepId(2), StepKind::Custom, "c", Snapshot::new()),
        ])
        .unwrap();
        let mut engine = PlaybackEngine::new(ManualScheduler::new());
        engine.load_steps(steps);
        engine.play();

        engine.advance_clock(ms(1000));
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.scheduler().last_delay(), Some(ms(300)));

        engine.advance_clock(ms(300));
        assert_eq!(engine.current_index(), 2);
    }

    #[test]
    fn pause_cancels_timer() {
        let mut engine = engine_with(3);
        engine.play();
        engine.pause();
        assert_eq!(engine.mode(), PlaybackMode::Paused);
        assert_eq!(engine.scheduler().pending_count(), 0);
        assert_eq!(engine.advance_clock(ms(5000)), 0);
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn reset_rewinds_and_pauses() {
        let mut engine = engine_with(4);
        engine.go_to_step(3);
        engine.play();
        engine.advance_clock(ms(1000));
        engine.reset();
        assert_eq!(engine.current_index(), 0);
        assert!(!engine.is_playing());
        assert!(!engine.has_pending_timer());
    }

    #[test]
    fn step_forward_and_backward_respect_bounds() {
        let mut engine = engine_with(2);
        engine.step_backward();
        assert_eq!(engine.current_index(), 0);
        engine.step_forward();
        assert_eq!(engine.current_index(), 1);
        engine.step_forward();
        assert_eq!(engine.current_index(), 1);
        engine.step_backward();
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn go_to_step_ignores_out_of_range() {
        let mut engine = engine_with(3);
        engine.go_to_step(2);
        assert_eq!(engine.current_index(), 2);
        let before = engine.state();
        engine.go_to_step(3);
        engine.go_to_step(usize::MAX);
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn go_to_step_while_playing_keeps_pending_tick() {
        let mut engine = engine_with(5);
        engine.play();
        engine.advance_clock(ms(600));
        engine.go_to_step(3);
        assert_eq!(engine.scheduler().pending_count(), 1);
        // Original deadline at 1000ms still fires, continuing from index 3.
        engine.advance_clock(ms(400));
        assert_eq!(engine.current_index(), 4);
    }

    #[test]
    fn set_speed_rejects_invalid_values() {
        let mut engine = engine_with(2);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = engine.set_speed(bad);
            assert!(matches!(result, Err(PlaybackError::InvalidSpeed { .. })));
        }
        assert!((engine.state().speed_multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn set_speed_reschedules_while_playing() {
        let mut engine = engine_with(3);
        engine.play();
        engine.advance_clock(ms(900));
        engine.set_speed(2.0).unwrap();
        assert_eq!(engine.scheduler().pending_count(), 1);
        assert_eq!(engine.scheduler().last_delay(), Some(ms(500)));

        // The tick originally due at 1000ms must not fire.
        engine.advance_clock(ms(100));
        assert_eq!(engine.current_index(), 0);
        engine.advance_clock(ms(400));
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn set_speed_while_paused_schedules_nothing() {
        let mut engine = engine_with(3);
        engine.set_speed(3.0).unwrap();
        assert!(!engine.has_pending_timer());
        assert_eq!(engine.scheduler().pending_count(), 0);
    }

    #[test]
    fn next_delay_divides_by_speed() {
        let mut engine = engine_with(2);
        assert_eq!(engine.next_delay(), ms(1000));
        engine.set_speed(4.0).unwrap();
        assert_eq!(engine.next_delay(), ms(250));
        engine.set_speed(0.5).unwrap();
        assert_eq!(engine.next_delay(), ms(2000));
    }

    #[test]
    fn huge_speed_clamps_delay_and_clock_terminates() {
        let mut engine = engine_with(3);
        engine.set_speed(1e10).unwrap();
        assert_eq!(engine.next_delay(), MIN_TICK_DELAY);

        engine.toggle_loop();
        engine.play();
        assert_eq!(engine.advance_clock(ms(1)), 1);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.advance_clock(ms(10)), 10);
        assert!(engine.is_playing());
        assert_eq!(engine.scheduler().pending_count(), 1);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut engine = engine_with(3);
        engine.play();
        engine.on_timer(TimerId::new(999));
        assert_eq!(engine.current_index(), 0);
        assert!(engine.has_pending_timer());
    }

    #[test]
    fn with_config_applies_settings() {
        let config = PlaybackConfig {
            default_step_duration_ms: 250,
            initial_speed: 2.0,
            loop_enabled: true,
            ..PlaybackConfig::default()
        };
        let engine = PlaybackEngine::with_config(&config, ManualScheduler::new()).unwrap();
        let state = engine.state();
        assert!(state.loop_enabled);
        assert!((state.speed_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(engine.default_duration(), ms(250));
        assert_eq!(engine.next_delay(), ms(125));
    }

    #[test]
    fn with_config_rejects_bad_values() {
        let zero = PlaybackConfig {
            default_step_duration_ms: 0,
            ..PlaybackConfig::default()
        };
        assert_eq!(
            PlaybackEngine::with_config(&zero, ManualScheduler::new()).err(),
            Some(PlaybackError::ZeroDefaultDuration)
        );

        let slow = PlaybackConfig {
            initial_speed: -1.0,
            ..PlaybackConfig::default()
        };
        assert!(PlaybackEngine::with_config(&slow, ManualScheduler::new()).is_err());
    }

    #[test]
    fn listener_receives_post_change_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = engine_with(3);
        let sink = Arc::clone(&seen);
        engine.subscribe(move |state| {
            sink.lock().unwrap().push(state.current_index);
        });

        engine.step_forward();
        engine.go_to_step(2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let count = Arc::new(Mutex::new(0_u32));
        let mut engine = engine_with(3);
        let sink = Arc::clone(&count);
        let sub = engine.subscribe(move |_| {
            *sink.lock().unwrap() += 1;
        });

        engine.step_forward();
        sub.unsubscribe();
        sub.unsubscribe();
        engine.step_forward();

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(!sub.is_active());
        assert_eq!(engine.listener_count(), 0);
    }

    /// Scheduler that records cancellations somewhere the test can still
    /// see after the engine is gone.
    struct RecordingScheduler {
        inner: ManualScheduler,
        cancelled: Arc<Mutex<Vec<TimerId>>>,
    }

    impl Scheduler for RecordingScheduler {
        fn schedule(&mut self, delay: Duration) -> TimerId {
            self.inner.schedule(delay)
        }

        fn cancel(&mut self, id: TimerId) {
            self.cancelled.lock().unwrap().push(id);
            self.inner.cancel(id);
        }
    }

    fn recording_engine() -> (PlaybackEngine<RecordingScheduler>, Arc<Mutex<Vec<TimerId>>>) {
        let cancelled = Arc::new(Mutex::new(Vec::new()));
        let scheduler = RecordingScheduler {
            inner: ManualScheduler::new(),
            cancelled: Arc::clone(&cancelled),
        };
        let mut engine = PlaybackEngine::new(scheduler);
        engine.load_steps(sequence(3));
        (engine, cancelled)
    }

    #[test]
    fn destroy_cancels_pending_timer_and_drops_listeners() {
        let (mut engine, cancelled) = recording_engine();
        let calls = Arc::new(Mutex::new(0_u32));
        let sink = Arc::clone(&calls);
        let sub = engine.subscribe(move |_| {
            *sink.lock().unwrap() += 1;
        });
        engine.play();
        assert_eq!(*calls.lock().unwrap(), 1);

        engine.destroy();
        assert_eq!(cancelled.lock().unwrap().len(), 1);
        // The handle outlives the engine and stays harmless.
        sub.unsubscribe();
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn drop_cancels_pending_timer() {
        let (mut engine, cancelled) = recording_engine();
        engine.play();
        drop(engine);
        assert_eq!(cancelled.lock().unwrap().len(), 1);
    }

    #[test]
    fn destroy_without_timer_cancels_nothing() {
        let (engine, cancelled) = recording_engine();
        engine.destroy();
        assert!(cancelled.lock().unwrap().is_empty());
    }
}
