//! Rendering payloads carried by each step.
//!
//! A [`Snapshot`] is always the complete picture at one point in an
//! algorithm's execution, never a delta against the previous step. The
//! playback engine relies on this to jump to any index directly.
//!
//! Visuals form a closed set, one variant per renderer category. Anything a
//! producer needs beyond that goes in [`Snapshot::extensions`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::enums::{AnnotationTone, HighlightRole};

/// Complete rendering state for one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Visuals to render, in display order.
    #[serde(default)]
    pub visuals: Vec<Visual>,
    /// Free-text notes shown alongside the visuals.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Producer-specific data outside the closed visual set.
    #[serde(default)]
    pub extensions: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visual.
    #[must_use]
    pub fn with_visual(mut self, visual: impl Into<Visual>) -> Self {
        self.visuals.push(visual.into());
        self
    }

    /// Append an annotation.
    #[must_use]
    pub fn with_annotation(mut self, tone: AnnotationTone, text: impl Into<String>) -> Self {
        self.annotations.push(Annotation {
            text: text.into(),
            tone,
        });
        self
    }

    /// Set an extension field, replacing any previous value under `key`.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Return the first call-stack visual, if any.
    pub fn stack(&self) -> Option<&StackView> {
        self.visuals.iter().find_map(|v| match v {
            Visual::Stack(stack) => Some(stack),
            _ => None,
        })
    }

    /// Iterate over all array visuals.
    pub fn arrays(&self) -> impl Iterator<Item = &ArrayView> {
        self.visuals.iter().filter_map(|v| match v {
            Visual::Array(array) => Some(array),
            _ => None,
        })
    }
}

/// One renderable visual inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Visual {
    /// Indexed array of values.
    Array(ArrayView),
    /// Binary tree.
    Tree(TreeView),
    /// Singly linked list.
    LinkedList(ListView),
    /// Call stack of a recursive algorithm.
    Stack(StackView),
}

impl From<ArrayView> for Visual {
    fn from(view: ArrayView) -> Self {
        Self::Array(view)
    }
}

impl From<TreeView> for Visual {
    fn from(view: TreeView) -> Self {
        Self::Tree(view)
    }
}

impl From<ListView> for Visual {
    fn from(view: ListView) -> Self {
        Self::LinkedList(view)
    }
}

impl From<StackView> for Visual {
    fn from(view: StackView) -> Self {
        Self::Stack(view)
    }
}

// ---------------------------------------------------------------------------
// Array
// ---------------------------------------------------------------------------

/// Array visual: values plus per-index highlights and named pointers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ArrayView {
    /// Caption shown above the array.
    pub label: String,
    /// Element values.
    pub values: Vec<Value>,
    /// Highlighted indices.
    #[serde(default)]
    pub highlights: BTreeMap<usize, HighlightRole>,
    /// Named index pointers, e.g. `lo`, `mid`, `hi`.
    #[serde(default)]
    pub pointers: BTreeMap<String, usize>,
}

impl ArrayView {
    /// Build an array visual from anything convertible to JSON values.
    pub fn new<T: Into<Value> + Clone>(label: impl Into<String>, values: &[T]) -> Self {
        Self {
            label: label.into(),
            values: values.iter().cloned().map(Into::into).collect(),
            highlights: BTreeMap::new(),
            pointers: BTreeMap::new(),
        }
    }

    /// Highlight `index` with `role`.
    #[must_use]
    pub fn highlight(mut self, index: usize, role: HighlightRole) -> Self {
        self.highlights.insert(index, role);
        self
    }

    /// Place pointer `name` at `index`.
    #[must_use]
    pub fn pointer(mut self, name: impl Into<String>, index: usize) -> Self {
        self.pointers.insert(name.into(), index);
        self
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A node of a [`TreeView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TreeNode {
    /// Node identifier, unique within the tree.
    pub id: u32,
    /// Displayed value.
    pub value: Value,
    /// Left child id.
    pub left: Option<u32>,
    /// Right child id.
    pub right: Option<u32>,
}

/// Binary tree visual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TreeView {
    /// Caption shown above the tree.
    pub label: String,
    /// All nodes, in any order.
    pub nodes: Vec<TreeNode>,
    /// Root node id, `None` for an empty tree.
    pub root: Option<u32>,
    /// Highlighted node ids.
    #[serde(default)]
    pub highlights: BTreeMap<u32, HighlightRole>,
}

// ---------------------------------------------------------------------------
// Linked list
// ---------------------------------------------------------------------------

/// A node of a [`ListView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ListNode {
    /// Node identifier, unique within the list.
    pub id: u32,
    /// Displayed value.
    pub value: Value,
    /// Id of the next node.
    pub next: Option<u32>,
}

/// Singly linked list visual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ListView {
    /// Caption shown above the list.
    pub label: String,
    /// All nodes, in any order.
    pub nodes: Vec<ListNode>,
    /// Head node id, `None` for an empty list.
    pub head: Option<u32>,
    /// Named pointers to node ids, e.g. `prev`, `curr`.
    #[serde(default)]
    pub pointers: BTreeMap<String, Option<u32>>,
}

// ---------------------------------------------------------------------------
// Call stack
// ---------------------------------------------------------------------------

/// One frame of a [`StackView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StackFrame {
    /// Call label, e.g. `fib(4)`.
    pub label: String,
    /// Argument values by name.
    #[serde(default)]
    pub args: BTreeMap<String, Value>,
    /// Value returned by this frame, once known.
    #[serde(default)]
    pub returned: Option<Value>,
}

/// Call-stack visual; the top frame is last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StackView {
    /// Frames from bottom to top.
    pub frames: Vec<StackFrame>,
}

impl StackView {
    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost frame.
    pub fn top(&self) -> Option<&StackFrame> {
        self.frames.last()
    }
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// Free-text note attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Annotation {
    /// The note text.
    pub text: String,
    /// How the note should be styled.
    #[serde(default)]
    pub tone: AnnotationTone,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn array_builder_collects_highlights_and_pointers() {
        let view = ArrayView::new("data", &[3_i64, 1, 2])
            .highlight(0, HighlightRole::Compared)
            .highlight(1, HighlightRole::Compared)
            .pointer("i", 0);

        assert_eq!(view.values, vec![json!(3), json!(1), json!(2)]);
        assert_eq!(view.highlights.len(), 2);
        assert_eq!(view.pointers.get("i"), Some(&0));
    }

    #[test]
    fn snapshot_finds_stack_visual() {
        let snapshot = Snapshot::new()
            .with_visual(ArrayView::new("data", &[1_i64]))
            .with_visual(StackView {
                frames: vec![StackFrame {
                    label: String::from("fib(2)"),
                    args: BTreeMap::new(),
                    returned: None,
                }],
            });

        let stack = snapshot.stack().unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().map(|f| f.label.as_str()), Some("fib(2)"));
        assert_eq!(snapshot.arrays().count(), 1);
    }

    #[test]
    fn snapshot_without_stack() {
        let snapshot = Snapshot::new().with_annotation(AnnotationTone::Info, "empty input");
        assert!(snapshot.stack().is_none());
        assert_eq!(snapshot.annotations.len(), 1);
    }

    #[test]
    fn extensions_survive_json() {
        let snapshot = Snapshot::new().with_extension("comparisons", json!(4));
        let text = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back.extensions.get("comparisons"), Some(&json!(4)));
    }

    #[test]
    fn missing_optional_sections_default() {
        let back: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(back.visuals.is_empty());
        assert!(back.annotations.is_empty());
        assert!(back.extensions.is_empty());
    }
}
