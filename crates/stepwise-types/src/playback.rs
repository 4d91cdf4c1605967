//! Playback state exposed by the engine to its observers.

use serde::{Deserialize, Serialize};

use crate::enums::PlaybackMode;
use crate::step::{Step, StepSequence};

/// Snapshot of a playback engine's state.
///
/// Observers and callers only ever receive copies of this struct. Steps
/// are shared immutably, so copying is cheap and nothing a caller does
/// to its copy reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Loaded steps.
    pub steps: StepSequence,
    /// Cursor into `steps`; 0 when empty.
    pub current_index: usize,
    /// Whether an auto-advance timer is driving the cursor.
    pub is_playing: bool,
    /// Playback rate; always finite and positive.
    pub speed_multiplier: f64,
    /// Whether auto-advance wraps from the last step to the first.
    pub loop_enabled: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            steps: StepSequence::empty(),
            current_index: 0,
            is_playing: false,
            speed_multiplier: 1.0,
            loop_enabled: false,
        }
    }
}

impl PlaybackState {
    /// Coarse mode derived from the fields.
    pub fn mode(&self) -> PlaybackMode {
        if self.steps.is_empty() {
            PlaybackMode::Empty
        } else if self.is_playing {
            PlaybackMode::Playing
        } else {
            PlaybackMode::Paused
        }
    }

    /// Step under the cursor, `None` when empty.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_index)
    }

    /// Whether the cursor is on the last step.
    pub fn is_at_end(&self) -> bool {
        self.steps.last_index() == Some(self.current_index)
    }

    /// Whether `step_forward` would move the cursor.
    pub fn can_step_forward(&self) -> bool {
        self.steps
            .last_index()
            .is_some_and(|last| self.current_index < last)
    }

    /// Whether `step_backward` would move the cursor.
    pub const fn can_step_backward(&self) -> bool {
        self.current_index > 0
    }

    /// Position as a fraction in `0.0..=1.0`; 0 when fewer than two steps.
    pub fn progress(&self) -> f64 {
        match self.steps.last_index() {
            Some(last) if last > 0 => {
                let current = u32::try_from(self.current_index).unwrap_or(u32::MAX);
                let last = u32::try_from(last).unwrap_or(u32::MAX);
                (f64::from(current) / f64::from(last)).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
