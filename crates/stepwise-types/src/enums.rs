//! Enumeration types shared by producers, the engine, and renderers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Step kinds
// ---------------------------------------------------------------------------

/// The nature of the operation a step records.
///
/// Renderers use the kind for styling; the playback engine never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum StepKind {
    /// Setup of the initial state before the algorithm's main work.
    Initialize,
    /// Two values are compared.
    Compare,
    /// A value is written (assignment, swap, pointer move).
    Assign,
    /// A loop advances to its next iteration.
    Iterate,
    /// A recursive call is entered; a stack frame is pushed.
    Call,
    /// A call or the whole algorithm returns; a stack frame is popped.
    Return,
    /// Anything the fixed kinds do not cover.
    Custom,
}

impl StepKind {
    /// Short lowercase label for logs and terminal output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initialize => "init",
            Self::Compare => "compare",
            Self::Assign => "assign",
            Self::Iterate => "iterate",
            Self::Call => "call",
            Self::Return => "return",
            Self::Custom => "custom",
        }
    }
}

// ---------------------------------------------------------------------------
// Visual styling tags
// ---------------------------------------------------------------------------

/// Why an element of a visual is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum HighlightRole {
    /// The element currently being worked on.
    Active,
    /// The element is one side of a comparison.
    Compared,
    /// The element was just moved or swapped.
    Swapped,
    /// The element is in its final position.
    Settled,
    /// The element is the search target or answer.
    Found,
    /// The element is outside the live search range.
    Excluded,
}

/// Tone of a free-text annotation attached to a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AnnotationTone {
    /// Neutral explanatory note.
    #[default]
    Info,
    /// Something went as hoped (found, sorted, done).
    Success,
    /// Something noteworthy or negative (not found, base case hit).
    Warning,
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Coarse mode of a playback engine, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PlaybackMode {
    /// No steps are loaded.
    Empty,
    /// Steps are loaded and the cursor is fixed.
    Paused,
    /// An auto-advance timer is driving the cursor.
    Playing,
}
