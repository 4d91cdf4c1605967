//! Identifier types.
//!
//! [`RunId`] tags one execution of a step producer and is a UUID v7 so runs
//! sort by creation time in logs. [`StepId`] is sequence-local: producers
//! number their steps from zero, and the id never changes once the step is
//! built, which keeps it stable across re-renders.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for one producer run loaded into a session.
///
/// Serializes as the bare UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunId(Uuid);

impl RunId {
    /// Mint a fresh, time-ordered run id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The underlying UUID.
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "run-{}", self.0.simple())
    }
}

/// Identifier of a step, unique within its owning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepId(pub u32);

impl StepId {
    /// Return the raw numeric id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for StepId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "step-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_unique() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn run_id_display_and_serde() {
        let id = RunId::new();
        let text = id.to_string();
        assert!(text.starts_with("run-"));
        assert_eq!(text.len(), 36);

        let json = serde_json::to_string(&id).ok();
        assert_eq!(json, Some(format!("\"{}\"", id.as_uuid())));
    }

    #[test]
    fn step_id_display() {
        assert_eq!(StepId(7).to_string(), "step-7");
        assert_eq!(StepId(7).get(), 7);
    }

    #[test]
    fn step_id_serializes_as_number() {
        let json = serde_json::to_string(&StepId(3)).ok();
        assert_eq!(json.as_deref(), Some("3"));
    }
}
