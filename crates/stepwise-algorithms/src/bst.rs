//! Binary search tree construction by repeated insertion.

use std::collections::BTreeMap;

use stepwise_core::producer::{Produced, StepProducer, StepRecorder};
use stepwise_types::{AnnotationTone, HighlightRole, Snapshot, StepKind, TreeNode, TreeView};
use tracing::debug;

use crate::MAX_ARRAY_LEN;
use crate::error::{AlgorithmError, check_len};

/// Pseudo-code the step line markers point into.
pub const SOURCE: &str = "\
for key in keys:
    node = root
    while node != null:
        if key == node.key: skip
        if key < node.key: node = node.left
        else: node = node.right
    attach key at node
return in_order(root)";

/// Inserts keys one by one into an initially empty BST, highlighting the
/// search path of each insertion. Duplicates are skipped. Returns the
/// in-order traversal, i.e. the distinct keys sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BstInsert;

#[derive(Debug, Clone, Copy)]
struct Node {
    key: i64,
    left: Option<u32>,
    right: Option<u32>,
}

/// Arena of nodes; a node's id is its position.
#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    root: Option<u32>,
}

impl Tree {
    fn get(&self, id: u32) -> Option<&Node> {
        usize::try_from(id).ok().and_then(|i| self.nodes.get(i))
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Node> {
        usize::try_from(id).ok().and_then(|i| self.nodes.get_mut(i))
    }

    fn push(&mut self, key: i64) -> Option<u32> {
        let id = u32::try_from(self.nodes.len()).ok()?;
        self.nodes.push(Node {
            key,
            left: None,
            right: None,
        });
        Some(id)
    }

    fn view(&self, highlights: BTreeMap<u32, HighlightRole>) -> TreeView {
        let nodes = (0_u32..)
            .zip(&self.nodes)
            .map(|(id, node)| TreeNode {
                id,
                value: node.key.into(),
                left: node.left,
                right: node.right,
            })
            .collect();
        TreeView {
            label: "bst".to_owned(),
            nodes,
            root: self.root,
            highlights,
        }
    }

    fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(node) = cursor.and_then(|id| self.get(id)) {
                stack.push(*node);
                cursor = node.left;
            }
            let Some(node) = stack.pop() else {
                break;
            };
            out.push(node.key);
            cursor = node.right;
        }
        out
    }
}

/// Which child slot a search step follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

fn path_highlights(path: &[u32], active: Option<u32>) -> BTreeMap<u32, HighlightRole> {
    let mut highlights: BTreeMap<u32, HighlightRole> = path
        .iter()
        .map(|id| (*id, HighlightRole::Compared))
        .collect();
    if let Some(id) = active {
        highlights.insert(id, HighlightRole::Active);
    }
    highlights
}

impl StepProducer for BstInsert {
    type Input = [i64];
    type Output = Vec<i64>;
    type Error = AlgorithmError;

    fn name(&self) -> &'static str {
        "bst_insert"
    }

    fn produce(&self, input: &[i64]) -> Result<Produced<Vec<i64>>, AlgorithmError> {
        check_len(input.len(), MAX_ARRAY_LEN)?;
        let mut tree = Tree::default();
        let mut rec = StepRecorder::new();

        rec.record(
            StepKind::Initialize,
            format!("Insert {} keys into an empty tree", input.len()),
            Snapshot::new().with_visual(tree.view(BTreeMap::new())),
        )
        .line(1);

        for &key in input {
            rec.record(
                StepKind::Iterate,
                format!("Insert {key}"),
                Snapshot::new().with_visual(tree.view(BTreeMap::new())),
            )
            .line(2)
            .var("key", key);

            let mut path = Vec::new();
            let mut cursor = tree.root;
            let mut parent: Option<(u32, Side)> = None;
            let mut duplicate = false;

            while let Some(id) = cursor {
                let Some(node) = tree.get(id).copied() else {
                    break;
                };
                path.push(id);
                if key == node.key {
                    duplicate = true;
                    rec.record(
                        StepKind::Compare,
                        format!("{key} is already in the tree, skip it"),
                        Snapshot::new()
                            .with_visual(tree.view(path_highlights(&path, Some(id))))
                            .with_annotation(AnnotationTone::Warning, "duplicate key"),
                    )
                    .line(4)
                    .var("key", key)
                    .var("node", node.key);
                    break;
                }
                let (side, next, line) = if key < node.key {
                    (Side::Left, node.left, 5)
                } else {
                    (Side::Right, node.right, 6)
                };
                let relation = if side == Side::Left { '<' } else { '>' };
                rec.record(
                    StepKind::Compare,
                    format!("{key} {relation} {}, go {}", node.key, side.label()),
                    Snapshot::new().with_visual(tree.view(path_highlights(&path, Some(id)))),
                )
                .line(line)
                .var("key", key)
                .var("node", node.key);
                parent = Some((id, side));
                cursor = next;
            }

            if duplicate {
                continue;
            }

            let Some(id) = tree.push(key) else {
                break;
            };
            let description = match parent {
                None => {
                    tree.root = Some(id);
                    format!("{key} becomes the root")
                }
                Some((parent_id, side)) => {
                    let parent_key = tree.get(parent_id).map_or(key, |p| p.key);
                    if let Some(p) = tree.get_mut(parent_id) {
                        match side {
                            Side::Left => p.left = Some(id),
                            Side::Right => p.right = Some(id),
                        }
                    }
                    format!("Attach {key} as the {} child of {parent_key}", side.label())
                }
            };
            let mut highlights = path_highlights(&path, None);
            highlights.insert(id, HighlightRole::Found);
            rec.record(
                StepKind::Assign,
                description,
                Snapshot::new().with_visual(tree.view(highlights)),
            )
            .line(7)
            .var("key", key);
        }

        let sorted = tree.in_order();
        let settled = (0_u32..)
            .take(tree.nodes.len())
            .map(|id| (id, HighlightRole::Settled))
            .collect();
        rec.record(
            StepKind::Return,
            "In-order traversal yields the keys sorted",
            Snapshot::new()
                .with_visual(tree.view(settled))
                .with_annotation(AnnotationTone::Success, format!("{sorted:?}")),
        )
        .line(8);

        debug!(
            producer = self.name(),
            steps = rec.len(),
            nodes = tree.nodes.len(),
            "Steps produced"
        );
        Ok(rec.finish(sorted)?)
    }
}
