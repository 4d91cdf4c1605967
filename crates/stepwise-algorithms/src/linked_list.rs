//! In-place reversal of a singly linked list.

use stepwise_core::producer::{Produced, StepProducer, StepRecorder};
use stepwise_types::{AnnotationTone, ListNode, ListView, Snapshot, StepKind};
use tracing::debug;

use crate::MAX_ARRAY_LEN;
use crate::error::{AlgorithmError, check_len};

/// Pseudo-code the step line markers point into.
pub const SOURCE: &str = "\
prev = null, curr = head
while curr != null:
    next = curr.next
    curr.next = prev
    prev = curr
    curr = next
head = prev";

/// Reverses a list built from the input values, relinking one node per
/// iteration. Returns the values in their new order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseLinkedList;

/// Node links and the three walking pointers.
struct Links<'a> {
    values: &'a [i64],
    next: Vec<Option<u32>>,
    head: Option<u32>,
    prev: Option<u32>,
    curr: Option<u32>,
    ahead: Option<u32>,
}

impl Links<'_> {
    fn next_of(&self, id: u32) -> Option<u32> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.next.get(i))
            .copied()
            .flatten()
    }

    fn set_next(&mut self, id: u32, target: Option<u32>) {
        if let Some(slot) = usize::try_from(id).ok().and_then(|i| self.next.get_mut(i)) {
            *slot = target;
        }
    }

    fn value_of(&self, id: Option<u32>) -> Option<i64> {
        id.and_then(|id| usize::try_from(id).ok())
            .and_then(|i| self.values.get(i))
            .copied()
    }

    fn view(&self) -> ListView {
        let nodes = (0_u32..)
            .zip(self.values.iter().zip(&self.next))
            .map(|(id, (value, next))| ListNode {
                id,
                value: (*value).into(),
                next: *next,
            })
            .collect();
        let pointers = [("prev", self.prev), ("curr", self.curr), ("next", self.ahead)]
            .into_iter()
            .map(|(name, id)| (name.to_owned(), id))
            .collect();
        ListView {
            label: "list".to_owned(),
            nodes,
            head: self.head,
            pointers,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new().with_visual(self.view())
    }

    /// Values reached by walking from `head`.
    fn walk(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.values.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if out.len() >= self.values.len() {
                break;
            }
            if let Some(value) = self.value_of(Some(id)) {
                out.push(value);
            }
            cursor = self.next_of(id);
        }
        out
    }
}

fn describe(id: Option<u32>, links: &Links<'_>) -> String {
    match links.value_of(id) {
        Some(value) => format!("node {value}"),
        None => "null".to_owned(),
    }
}

impl StepProducer for ReverseLinkedList {
    type Input = [i64];
    type Output = Vec<i64>;
    type Error = AlgorithmError;

    fn name(&self) -> &'static str {
        "reverse_linked_list"
    }

    fn produce(&self, input: &[i64]) -> Result<Produced<Vec<i64>>, AlgorithmError> {
        check_len(input.len(), MAX_ARRAY_LEN)?;
        let mut next: Vec<Option<u32>> = (1_u32..).take(input.len()).map(Some).collect();
        if let Some(tail) = next.last_mut() {
            *tail = None;
        }
        let head = if input.is_empty() { None } else { Some(0) };
        let mut links = Links {
            values: input,
            next,
            head,
            prev: None,
            curr: head,
            ahead: None,
        };
        let mut rec = StepRecorder::new();

        rec.record(
            StepKind::Initialize,
            format!("Reverse a list of {} nodes", input.len()),
            links.snapshot(),
        )
        .line(1);

        while let Some(curr) = links.curr {
            rec.record(
                StepKind::Compare,
                format!("curr is {}, keep going", describe(Some(curr), &links)),
                links.snapshot(),
            )
            .line(2);

            links.ahead = links.next_of(curr);
            rec.record(
                StepKind::Assign,
                format!("Remember next = {}", describe(links.ahead, &links)),
                links.snapshot(),
            )
            .line(3);

            links.set_next(curr, links.prev);
            rec.record(
                StepKind::Assign,
                format!(
                    "Point {} back at {}",
                    describe(Some(curr), &links),
                    describe(links.prev, &links)
                ),
                links.snapshot(),
            )
            .line(4);

            links.prev = Some(curr);
            links.curr = links.ahead;
            links.ahead = None;
            rec.record(
                StepKind::Iterate,
                format!(
                    "Advance: prev = {}, curr = {}",
                    describe(links.prev, &links),
                    describe(links.curr, &links)
                ),
                links.snapshot(),
            )
            .line(6);
        }

        rec.record(
            StepKind::Compare,
            "curr is null, the loop ends",
            links.snapshot(),
        )
        .line(2);

        links.head = links.prev;
        let reversed = links.walk();
        rec.record(
            StepKind::Return,
            format!("head = {}", describe(links.head, &links)),
            links
                .snapshot()
                .with_annotation(AnnotationTone::Success, format!("{reversed:?}")),
        )
        .line(7);

        debug!(producer = self.name(), steps = rec.len(), n = input.len(), "Steps produced");
        Ok(rec.finish(reversed)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stepwise_types::Visual;

    use super::*;

    fn list_of(snapshot: &Snapshot) -> &ListView {
        snapshot
            .visuals
            .iter()
            .find_map(|v| match v {
                Visual::LinkedList(list) => Some(list),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn reverses_values() {
        let produced = ReverseLinkedList.produce(&[1, 2, 3, 4]).unwrap();
        assert_eq!(produced.result, vec![4, 3, 2, 1]);
    }

    #[test]
    fn first_and_last_snapshots_show_both_orders() {
        let produced = ReverseLinkedList.produce(&[10, 20, 30]).unwrap();
        let first = list_of(&produced.steps.get(0).unwrap().snapshot);
        assert_eq!(first.head, Some(0));
        assert_eq!(first.pointers.get("curr"), Some(&Some(0)));

        let last = list_of(&produced.steps.as_slice().last().unwrap().snapshot);
        assert_eq!(last.head, Some(2));
        let tail = last.nodes.iter().find(|n| n.id == 0).unwrap();
        assert_eq!(tail.next, None);
    }

    #[test]
    fn four_steps_per_node() {
        let produced = ReverseLinkedList.produce(&[5, 6]).unwrap();
        // Initialize, 4 per node, final check, return.
        assert_eq!(produced.steps.len(), 1 + 4 * 2 + 2);
    }

    #[test]
    fn empty_list_still_produces_steps() {
        let produced = ReverseLinkedList.produce(&[]).unwrap();
        assert!(produced.result.is_empty());
        assert_eq!(produced.steps.len(), 3);
        let last = list_of(&produced.steps.as_slice().last().unwrap().snapshot);
        assert_eq!(last.head, None);
    }
}
