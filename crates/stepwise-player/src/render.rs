//! Plain-text rendering of playback state for the terminal.
//!
//! Highlights are drawn as a one-character suffix on the element:
//!
//! | Role | Marker |
//! |---|---|
//! | Active | `!` |
//! | Compared | `?` |
//! | Swapped | `~` |
//! | Settled | `.` |
//! | Found | `*` |
//! | Excluded | `-` |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde_json::Value;
use stepwise_types::{
    AnnotationTone, ArrayView, HighlightRole, ListView, PlaybackMode, PlaybackState, StackView,
    TreeView, Visual,
};

/// Render the step under the cursor with a status header.
pub fn render_state(state: &PlaybackState) -> String {
    let Some(step) = state.current_step() else {
        return "(no steps loaded)".to_owned();
    };
    let mode = match state.mode() {
        PlaybackMode::Playing => "playing",
        PlaybackMode::Paused => "paused",
        PlaybackMode::Empty => "empty",
    };
    let line = step
        .source_line
        .map_or_else(|| "   ".to_owned(), |l| format!("L{l:<2}"));

    let mut out = format!(
        "[{:>3}/{}] {mode:<7} x{:<4} {line} {:<8} {}",
        state.current_index.saturating_add(1),
        state.steps.len(),
        state.speed_multiplier,
        step.kind.label(),
        step.description,
    );
    for visual in &step.snapshot.visuals {
        let _ = write!(out, "\n        {}", render_visual(visual));
    }
    for note in &step.snapshot.annotations {
        let tone = match note.tone {
            AnnotationTone::Info => "note",
            AnnotationTone::Success => "ok",
            AnnotationTone::Warning => "warn",
        };
        let _ = write!(out, "\n        {tone}: {}", note.text);
    }
    out
}

/// Render one visual on a single line.
pub fn render_visual(visual: &Visual) -> String {
    match visual {
        Visual::Array(view) => render_array(view),
        Visual::Tree(view) => render_tree(view),
        Visual::LinkedList(view) => render_list(view),
        Visual::Stack(view) => render_stack(view),
    }
}

const fn marker(role: HighlightRole) -> &'static str {
    match role {
        HighlightRole::Active => "!",
        HighlightRole::Compared => "?",
        HighlightRole::Swapped => "~",
        HighlightRole::Settled => ".",
        HighlightRole::Found => "*",
        HighlightRole::Excluded => "-",
    }
}

fn cell(value: &Value, role: Option<&HighlightRole>) -> String {
    format!("{value}{}", role.copied().map_or("", marker))
}

fn render_array(view: &ArrayView) -> String {
    let cells: Vec<String> = view
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| cell(v, view.highlights.get(&i)))
        .collect();
    let mut out = format!("{}: [{}]", view.label, cells.join(" "));
    for (name, index) in &view.pointers {
        let _ = write!(out, " {name}={index}");
    }
    out
}

fn render_list(view: &ListView) -> String {
    let by_id: BTreeMap<u32, _> = view.nodes.iter().map(|n| (n.id, n)).collect();
    let mut parts = Vec::new();
    let mut seen = BTreeSet::new();
    let mut cursor = view.head;
    while let Some(node) = cursor.and_then(|id| by_id.get(&id)) {
        if !seen.insert(node.id) {
            parts.push("...".to_owned());
            break;
        }
        parts.push(node.value.to_string());
        cursor = node.next;
    }
    parts.push("null".to_owned());

    let mut out = format!("{}: {}", view.label, parts.join(" -> "));
    for (name, id) in &view.pointers {
        let target = id
            .and_then(|id| by_id.get(&id))
            .map_or_else(|| "null".to_owned(), |n| n.value.to_string());
        let _ = write!(out, " {name}={target}");
    }
    out
}

fn render_tree(view: &TreeView) -> String {
    let by_id: BTreeMap<u32, _> = view.nodes.iter().map(|n| (n.id, n)).collect();
    let mut out = format!("{}: ", view.label);
    match view.root {
        Some(root) => write_subtree(&mut out, root, view, &by_id, 0),
        None => out.push_str("(empty)"),
    }
    out
}

/// Parenthesized pre-order: `value(left,right)`, `_` for a missing child.
fn write_subtree(
    out: &mut String,
    id: u32,
    view: &TreeView,
    by_id: &BTreeMap<u32, &stepwise_types::TreeNode>,
    depth: usize,
) {
    let Some(node) = by_id.get(&id) else {
        out.push('_');
        return;
    };
    if depth > view.nodes.len() {
        out.push_str("...");
        return;
    }
    out.push_str(&cell(&node.value, view.highlights.get(&id)));
    if node.left.is_none() && node.right.is_none() {
        return;
    }
    let next = depth.saturating_add(1);
    out.push('(');
    match node.left {
        Some(left) => write_subtree(out, left, view, by_id, next),
        None => out.push('_'),
    }
    out.push(',');
    match node.right {
        Some(right) => write_subtree(out, right, view, by_id, next),
        None => out.push('_'),
    }
    out.push(')');
}

fn render_stack(view: &StackView) -> String {
    let frames: Vec<String> = view
        .frames
        .iter()
        .map(|frame| match &frame.returned {
            Some(value) => format!("{} = {value}", frame.label),
            None => frame.label.clone(),
        })
        .collect();
    format!("stack: {}", frames.join(" > "))
}
