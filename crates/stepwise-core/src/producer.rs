//! Step producer contract and the recorder producers build sequences with.
//!
//! A [`StepProducer`] turns an algorithm input into a complete
//! [`StepSequence`] plus a result, synchronously and without side effects.
//! The sequence must hold at least one step, every snapshot must be a full
//! picture on its own, and recursive calls must appear as explicit
//! [`StepKind::Call`] / [`StepKind::Return`] steps so a stack visual can be
//! driven from the sequence alone.
//!
//! [`StepRecorder`] takes care of the mechanical parts: sequential ids, the
//! call stack, and the final validation.

use std::collections::BTreeMap;

use serde_json::Value;
use stepwise_types::{
    SequenceError, Snapshot, StackFrame, StackView, Step, StepId, StepKind, StepSequence, Visual,
};

/// Violations of the producer contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The producer returned no steps.
    #[error("step producer returned an empty sequence")]
    EmptySequence,

    /// The produced steps do not form a valid sequence.
    #[error("invalid step sequence: {source}")]
    Sequence {
        /// The underlying validation error.
        #[from]
        source: SequenceError,
    },

    /// `leave` was called with no call in progress.
    #[error("return recorded with an empty call stack")]
    UnbalancedReturn,
}

/// Output of one producer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Produced<O> {
    /// The complete step sequence.
    pub steps: StepSequence,
    /// The algorithm's answer.
    pub result: O,
}

impl<O> Produced<O> {
    /// Check the parts of the contract a sequence cannot check by itself.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::EmptySequence`] if there are no steps.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.steps.is_empty() {
            return Err(ContractError::EmptySequence);
        }
        Ok(())
    }
}

/// An algorithm that precomputes its execution as a step sequence.
pub trait StepProducer {
    /// Algorithm input.
    type Input: ?Sized;
    /// Algorithm answer.
    type Output;
    /// Failure for malformed input or internal faults.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short machine-friendly name, used in logs.
    fn name(&self) -> &'static str;

    /// Run the algorithm to completion and return every step.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the input is malformed or the run fails.
    /// No partial sequence is ever returned.
    fn produce(&self, input: &Self::Input) -> Result<Produced<Self::Output>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Builds a step sequence one step at a time.
///
/// While a call is in progress the recorder appends the current call stack
/// as a [`Visual::Stack`] to every snapshot that does not already carry
/// one, so each step stays self-contained.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<Step>,
    next_id: u32,
    stack: Vec<StackFrame>,
    unbalanced: bool,
}

impl StepRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps recorded so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current call depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Record one step.
    pub fn record(
        &mut self,
        kind: StepKind,
        description: impl Into<String>,
        snapshot: Snapshot,
    ) -> StepDraft<'_> {
        let snapshot = self.with_stack(snapshot);
        let id = StepId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.steps.push(Step::new(id, kind, description, snapshot));
        let index = self.steps.len().saturating_sub(1);
        StepDraft {
            steps: &mut self.steps,
            index,
        }
    }

    /// Push a call frame and record the [`StepKind::Call`] step for it.
    pub fn enter(
        &mut self,
        label: impl Into<String>,
        args: BTreeMap<String, Value>,
        description: impl Into<String>,
        snapshot: Snapshot,
    ) -> StepDraft<'_> {
        self.stack.push(StackFrame {
            label: label.into(),
            args,
            returned: None,
        });
        self.record(StepKind::Call, description, snapshot)
    }

    /// Record the [`StepKind::Return`] step for the innermost call, then pop
    /// its frame.
    ///
    /// The return step still shows the frame, now carrying `returned`, so
    /// the pop is visible. With no call in progress a plain return step is
    /// recorded and [`finish`](Self::finish) reports
    /// [`ContractError::UnbalancedReturn`].
    pub fn leave(
        &mut self,
        returned: Value,
        description: impl Into<String>,
        snapshot: Snapshot,
    ) -> StepDraft<'_> {
        match self.stack.last_mut() {
            Some(frame) => frame.returned = Some(returned),
            None => self.unbalanced = true,
        }
        let snapshot = self.with_stack(snapshot);
        self.stack.pop();
        self.record(StepKind::Return, description, snapshot)
    }

    /// Validate the recorded steps and pair them with the result.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::EmptySequence`] if nothing was recorded,
    /// [`ContractError::UnbalancedReturn`] if `leave` outnumbered `enter`,
    /// or [`ContractError::Sequence`] if the steps fail validation.
    pub fn finish<O>(self, result: O) -> Result<Produced<O>, ContractError> {
        if self.unbalanced {
            return Err(ContractError::UnbalancedReturn);
        }
        let produced = Produced {
            steps: StepSequence::new(self.steps)?,
            result,
        };
        produced.validate()?;
        Ok(produced)
    }

    fn with_stack(&self, mut snapshot: Snapshot) -> Snapshot {
        if !self.stack.is_empty() && snapshot.stack().is_none() {
            snapshot.visuals.push(Visual::Stack(StackView {
                frames: self.stack.clone(),
            }));
        }
        snapshot
    }
}

/// Borrowed handle to the step just recorded, for setting optional fields.
#[derive(Debug)]
pub struct StepDraft<'a> {
    steps: &'a mut Vec<Step>,
    index: usize,
}

impl StepDraft<'_> {
    fn step(&mut self) -> Option<&mut Step> {
        self.steps.get_mut(self.index)
    }

    /// Set the source line marker.
    pub fn line(mut self, line: u32) -> Self {
        if let Some(step) = self.step() {
            step.source_line = Some(line);
        }
        self
    }

    /// Set the display duration hint.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        if let Some(step) = self.step() {
            step.duration_hint_ms = Some(ms);
        }
        self
    }

    /// Add an inspector variable.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(step) = self.step() {
            step.variables.insert(name.into(), value.into());
        }
        self
    }
}
