//! Timer capability injected into the playback engine.
//!
//! The engine never sleeps or spawns anything itself. It asks a
//! [`Scheduler`] for a one-shot timer and is told, through
//! [`PlaybackEngine::on_timer`], when that timer fires. Two schedulers are
//! provided:
//!
//! - [`ManualScheduler`] -- a simulated clock advanced explicitly, used by
//!   tests and by any host that owns its own frame loop.
//! - [`TokioScheduler`] -- real timers on the tokio runtime, delivering
//!   fired ids over an unbounded channel.
//!
//! [`PlaybackEngine::on_timer`]: crate::engine::PlaybackEngine::on_timer

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle for one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw id. Custom schedulers use this to mint their ids.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Return the raw numeric id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for TimerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// A source of one-shot delayed callbacks.
///
/// Ids returned by [`schedule`](Scheduler::schedule) must be unique for the
/// lifetime of the scheduler. Cancelling an id that already fired or was
/// already cancelled is a no-op.
pub trait Scheduler {
    /// Arrange for `id` to be reported as fired after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Withdraw a pending timer so it never fires.
    fn cancel(&mut self, id: TimerId);
}

// ---------------------------------------------------------------------------
// Manual (simulated) clock
// ---------------------------------------------------------------------------

/// Deterministic simulated clock.
///
/// Time only moves when the owner calls [`pop_due`](Self::pop_due) or
/// [`set_now`](Self::set_now). The playback engine wraps both in
/// `advance_clock`.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    /// Current simulated time since creation.
    now: Duration,
    /// Next id to hand out.
    next_id: u64,
    /// Pending timers and their absolute deadlines.
    pending: BTreeMap<TimerId, Duration>,
    /// Delay requested by the most recent `schedule` call.
    last_delay: Option<Duration>,
    /// Number of timers that have fired.
    fired: u64,
}

impl ManualScheduler {
    /// Create a clock at time zero with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers scheduled and not yet fired or cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().min().copied()
    }

    /// Delay passed to the most recent `schedule` call.
    pub const fn last_delay(&self) -> Option<Duration> {
        self.last_delay
    }

    /// Total number of timers that have fired.
    pub const fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock forward to its deadline.
    ///
    /// Ties on deadline are broken by scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (id, deadline) = self
            .pending
            .iter()
            .map(|(id, deadline)| (*id, *deadline))
            .min_by_key(|(id, deadline)| (*deadline, *id))?;
        if deadline > until {
            return None;
        }
        self.pending.remove(&id);
        if deadline > self.now {
            self.now = deadline;
        }
        self.fired = self.fired.saturating_add(1);
        Some(id)
    }

    /// Move the clock to `now` without firing anything. Never moves backward.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.pending.insert(id, self.now.saturating_add(delay));
        self.last_delay = Some(delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}

// ---------------------------------------------------------------------------
// Tokio
// ---------------------------------------------------------------------------

/// Real-time scheduler backed by `tokio::time::sleep`.
///
/// Each timer is a spawned task that sleeps and then sends its id on the
/// channel returned by [`TokioScheduler::channel`]. The host loop receives ids
/// and forwards them to the engine. Cancelling aborts the task; if the id
/// was already sent, the engine discards it as stale.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    /// Next id to hand out.
    next_id: u64,
    /// Channel fired ids are delivered on.
    fired_tx: mpsc::UnboundedSender<TimerId>,
    /// Sleep tasks that may still be running.
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver fired timer ids arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            fired_tx,
            tasks: HashMap::new(),
        };
        (scheduler, fired_rx)
    }

    /// Number of sleep tasks that have not finished.
    pub fn live_tasks(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.tasks.retain(|_, task| !task.is_finished());

        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone only when the host loop has shut down.
            let _sent = tx.send(id);
        });
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}
