//! Shared type definitions for Stepwise.
//!
//! This crate holds the data that flows from step producers, through the
//! playback engine, to the rendering layer. Step and snapshot types are
//! exported to `TypeScript` via `ts-rs` so renderers consume the same shapes.
//!
//! # Modules
//!
//! - [`ids`] -- Run and step identifiers
//! - [`enums`] -- Step kinds, highlight roles, playback modes
//! - [`snapshot`] -- Rendering payloads (array, tree, list, stack visuals)
//! - [`step`] -- [`Step`] and the validated [`StepSequence`]
//! - [`playback`] -- [`PlaybackState`] handed to observers

pub mod enums;
pub mod ids;
pub mod playback;
pub mod snapshot;
pub mod step;

pub use enums::{AnnotationTone, HighlightRole, PlaybackMode, StepKind};
pub use ids::{RunId, StepId};
pub use playback::PlaybackState;
pub use snapshot::{
    Annotation, ArrayView, ListNode, ListView, Snapshot, StackFrame, StackView, TreeNode, TreeView,
    Visual,
};
pub use step::{SequenceError, Step, StepSequence};
