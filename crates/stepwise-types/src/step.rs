//! Steps and step sequences.
//!
//! A [`Step`] is one immutable position in a run. A [`StepSequence`] is the
//! complete ordered list for one run, shared behind an [`Arc`] so engines
//! and observers can hold it without copying the snapshots.
//!
//! Sequences can only be built through a validating constructor. This
//! covers deserialization as well: a JSON array of steps that fails
//! validation does not deserialize.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::enums::StepKind;
use crate::ids::StepId;
use crate::snapshot::Snapshot;

/// Errors raised when a step list violates the sequence contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// Two steps share an id.
    #[error("duplicate step id {id} at index {index}")]
    DuplicateId {
        /// The repeated id.
        id: StepId,
        /// Index of the second occurrence.
        index: usize,
    },

    /// A step asks to be shown for zero milliseconds.
    #[error("step {id} at index {index} has a zero duration hint")]
    ZeroDuration {
        /// The offending step.
        id: StepId,
        /// Its index.
        index: usize,
    },
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One immutable snapshot of an algorithm's execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Step {
    /// Identifier, unique within the owning sequence.
    pub id: StepId,
    /// What kind of operation this step records.
    pub kind: StepKind,
    /// Human-readable explanation.
    pub description: String,
    /// Line in the displayed source listing.
    #[serde(default)]
    pub source_line: Option<u32>,
    /// Suggested display time in milliseconds; `None` uses the default.
    #[serde(default)]
    pub duration_hint_ms: Option<u64>,
    /// Full rendering payload.
    pub snapshot: Snapshot,
    /// Variable values for inspector display.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

impl Step {
    /// Create a step with no source line, duration hint, or variables.
    pub fn new(
        id: StepId,
        kind: StepKind,
        description: impl Into<String>,
        snapshot: Snapshot,
    ) -> Self {
        Self {
            id,
            kind,
            description: description.into(),
            source_line: None,
            duration_hint_ms: None,
            snapshot,
            variables: BTreeMap::new(),
        }
    }

    /// Attach a source line marker.
    #[must_use]
    pub const fn at_line(mut self, line: u32) -> Self {
        self.source_line = Some(line);
        self
    }

    /// Attach a duration hint in milliseconds.
    #[must_use]
    pub const fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_hint_ms = Some(ms);
        self
    }

    /// Attach a variable for inspector display.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// StepSequence
// ---------------------------------------------------------------------------

/// Ordered, immutable list of steps for one run.
///
/// Cloning is cheap: clones share the same backing allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Step>", try_from = "Vec<Step>")]
pub struct StepSequence {
    steps: Arc<[Step]>,
}

impl StepSequence {
    /// Validate and wrap a list of steps.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::DuplicateId`] if two steps share an id, or
    /// [`SequenceError::ZeroDuration`] if a duration hint is zero.
    pub fn new(steps: Vec<Step>) -> Result<Self, SequenceError> {
        let mut seen = BTreeSet::new();
        for (index, step) in steps.iter().enumerate() {
            if !seen.insert(step.id) {
                return Err(SequenceError::DuplicateId { id: step.id, index });
            }
            if step.duration_hint_ms == Some(0) {
                return Err(SequenceError::ZeroDuration { id: step.id, index });
            }
        }
        Ok(Self {
            steps: steps.into(),
        })
    }

    /// An empty sequence.
    pub fn empty() -> Self {
        Self {
            steps: Arc::from(Vec::new()),
        }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Index of the last step, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// All steps as a slice.
    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Whether two sequences share the same backing allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.steps, &other.steps)
    }
}

impl Default for StepSequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<Step>> for StepSequence {
    type Error = SequenceError;

    fn try_from(steps: Vec<Step>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<StepSequence> for Vec<Step> {
    fn from(sequence: StepSequence) -> Self {
        sequence.steps.to_vec()
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn step(id: u32) -> Step {
        Step::new(StepId(id), StepKind::Custom, format!("step {id}"), Snapshot::new())
    }

    #[test]
    fn accepts_unique_ids() {
        let seq = StepSequence::new(vec![step(0), step(1), step(2)]).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.last_index(), Some(2));
        assert_eq!(seq.get(1).map(|s| s.id), Some(StepId(1)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = StepSequence::new(vec![step(0), step(1), step(1)]);
        assert_eq!(
            result.err(),
            Some(SequenceError::DuplicateId {
                id: StepId(1),
                index: 2
            })
        );
    }

    #[test]
    fn rejects_zero_duration() {
        let result = StepSequence::new(vec![step(0), step(1).with_duration_ms(0)]);
        assert!(matches!(
            result,
            Err(SequenceError::ZeroDuration { index: 1, .. })
        ));
    }

    #[test]
    fn empty_sequence_is_valid() {
        let seq = StepSequence::new(Vec::new()).unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.last_index(), None);
        assert_eq!(seq, StepSequence::empty());
    }

    #[test]
    fn clones_share_storage() {
        let seq = StepSequence::new(vec![step(0)]).unwrap();
        let copy = seq.clone();
        assert!(seq.ptr_eq(&copy));
    }

    #[test]
    fn deserialize_validates() {
        let good = StepSequence::new(vec![step(0), step(1)]).unwrap();
        let json = serde_json::to_string(&good).unwrap();
        let back: StepSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, good);

        let dup = serde_json::to_string(&vec![step(4), step(4)]).unwrap();
        let bad: Result<StepSequence, _> = serde_json::from_str(&dup);
        assert!(bad.is_err());
    }

    #[test]
    fn builder_sets_optional_fields() {
        let s = step(0)
            .at_line(12)
            .with_duration_ms(250)
            .with_variable("i", 3);
        assert_eq!(s.source_line, Some(12));
        assert_eq!(s.duration_hint_ms, Some(250));
        assert_eq!(s.variables.get("i"), Some(&Value::from(3)));
    }
}
