//! A visualization session: one producer run loaded into one engine.
//!
//! The session is the glue a presentation layer talks to. It runs a
//! [`StepProducer`], loads the resulting sequence into its
//! [`PlaybackEngine`], keeps the algorithm's result, and projects the
//! current step into the pieces a view renders: snapshot, source line,
//! variables, description.

use std::collections::BTreeMap;

use serde_json::Value;
use stepwise_types::{RunId, Snapshot, Step};
use tracing::{error, info};

use crate::engine::PlaybackEngine;
use crate::producer::{ContractError, StepProducer};
use crate::scheduler::Scheduler;

/// Errors from running a producer inside a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The producer rejected its input or failed internally.
    #[error("producer {producer} failed: {source}")]
    Producer {
        /// Name of the failing producer.
        producer: &'static str,
        /// The producer's own error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The producer returned output that breaks the contract.
    #[error("producer output rejected: {source}")]
    Contract {
        /// The contract violation.
        #[from]
        source: ContractError,
    },
}

/// One engine plus the result of the run currently loaded into it.
pub struct Session<O, S: Scheduler> {
    engine: PlaybackEngine<S>,
    result: Option<O>,
    run_id: Option<RunId>,
}

impl<O, S: Scheduler> core::fmt::Debug for Session<O, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("has_result", &self.result.is_some())
            .field("run_id", &self.run_id)
            .finish()
    }
}

impl<O, S: Scheduler> Session<O, S> {
    /// Wrap an engine. Nothing is loaded until [`run`](Self::run).
    pub const fn new(engine: PlaybackEngine<S>) -> Self {
        Self {
            engine,
            result: None,
            run_id: None,
        }
    }

    /// Run `producer` on `input` and load its steps, replacing any
    /// previous run.
    ///
    /// On failure the engine and the previous result are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Producer`] if the producer fails, or
    /// [`SessionError::Contract`] if its output is empty.
    pub fn run<P>(&mut self, producer: &P, input: &P::Input) -> Result<RunId, SessionError>
    where
        P: StepProducer<Output = O>,
    {
        let name = producer.name();
        let produced = match producer.produce(input) {
            Ok(produced) => produced,
            Err(e) => {
                error!(producer = name, error = %e, "Producer failed");
                return Err(SessionError::Producer {
                    producer: name,
                    source: Box::new(e),
                });
            }
        };
        if let Err(e) = produced.validate() {
            error!(producer = name, error = %e, "Producer output rejected");
            return Err(e.into());
        }

        let run_id = RunId::new();
        let steps = produced.steps.len();
        self.engine.load_steps(produced.steps);
        self.result = Some(produced.result);
        self.run_id = Some(run_id);
        info!(producer = name, %run_id, steps, "Run loaded");
        Ok(run_id)
    }

    /// The engine.
    pub const fn engine(&self) -> &PlaybackEngine<S> {
        &self.engine
    }

    /// The engine, for transport controls and subscriptions.
    pub const fn engine_mut(&mut self) -> &mut PlaybackEngine<S> {
        &mut self.engine
    }

    /// Identifier of the loaded run.
    pub const fn run_id(&self) -> Option<RunId> {
        self.run_id
    }

    /// Result of the loaded run. `None` when no steps are loaded.
    pub fn result(&self) -> Option<&O> {
        if self.engine.steps().is_empty() {
            return None;
        }
        self.result.as_ref()
    }

    /// Step under the cursor.
    pub fn current_step(&self) -> Option<&Step> {
        self.engine.current_step()
    }

    /// Snapshot of the step under the cursor.
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.current_step().map(|step| &step.snapshot)
    }

    /// Source line of the step under the cursor, if it has one.
    pub fn current_source_line(&self) -> Option<u32> {
        self.current_step().and_then(|step| step.source_line)
    }

    /// Inspector variables of the step under the cursor.
    pub fn current_variables(&self) -> Option<&BTreeMap<String, Value>> {
        self.current_step().map(|step| &step.variables)
    }

    /// Narration of the step under the cursor.
    pub fn current_description(&self) -> Option<&str> {
        self.current_step().map(|step| step.description.as_str())
    }

    /// Tear the session down, cancelling any pending tick.
    pub fn destroy(self) {
        self.engine.destroy();
    }
}
