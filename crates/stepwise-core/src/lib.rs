//! Playback engine and producer contract for Stepwise.
//!
//! This crate turns a precomputed [`StepSequence`] into an observable,
//! timer-driven playback, and defines how algorithms produce those
//! sequences in the first place.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `stepwise-config.yaml` into
//!   strongly-typed structs.
//! - [`scheduler`] -- [`Scheduler`] trait, [`ManualScheduler`] simulated
//!   clock, and [`TokioScheduler`] real-time timers.
//! - [`engine`] -- [`PlaybackEngine`], the transport state machine.
//! - [`producer`] -- [`StepProducer`] trait and [`StepRecorder`].
//! - [`session`] -- [`Session`], one producer run loaded into one engine.
//!
//! [`StepSequence`]: stepwise_types::StepSequence
//! [`Scheduler`]: scheduler::Scheduler
//! [`ManualScheduler`]: scheduler::ManualScheduler
//! [`TokioScheduler`]: scheduler::TokioScheduler
//! [`PlaybackEngine`]: engine::PlaybackEngine
//! [`StepProducer`]: producer::StepProducer
//! [`StepRecorder`]: producer::StepRecorder
//! [`Session`]: session::Session

pub mod config;
pub mod engine;
pub mod producer;
pub mod scheduler;
pub mod session;
