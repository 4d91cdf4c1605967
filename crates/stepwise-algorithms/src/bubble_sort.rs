//! Bubble sort with early exit.

use stepwise_core::producer::{Produced, StepProducer, StepRecorder};
use stepwise_types::{AnnotationTone, ArrayView, HighlightRole, Snapshot, StepKind};
use tracing::debug;

use crate::MAX_ARRAY_LEN;
use crate::error::{AlgorithmError, check_len};

/// Pseudo-code the step line markers point into.
pub const SOURCE: &str = "\
for i in 0 .. n - 1:
    swapped = false
    for j in 0 .. n - 1 - i:
        if a[j] > a[j + 1]:
            swap(a[j], a[j + 1])
            swapped = true
    if not swapped: break
return a";

/// Sorts integers ascending, recording every comparison and swap.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl StepProducer for BubbleSort {
    type Input = [i64];
    type Output = Vec<i64>;
    type Error = AlgorithmError;

    fn name(&self) -> &'static str {
        "bubble_sort"
    }

    fn produce(&self, input: &[i64]) -> Result<Produced<Vec<i64>>, AlgorithmError> {
        check_len(input.len(), MAX_ARRAY_LEN)?;
        let mut a = input.to_vec();
        let n = a.len();
        let mut rec = StepRecorder::new();

        rec.record(
            StepKind::Initialize,
            format!("Sort {n} values"),
            Snapshot::new().with_visual(view(&a, n)),
        )
        .line(1)
        .var("n", n);

        // Everything from `settled` onward is in its final position.
        let mut settled = n;
        for i in 0..n.saturating_sub(1) {
            let mut swapped = false;
            let limit = n.saturating_sub(1).saturating_sub(i);
            for j in 0..limit {
                let k = j.saturating_add(1);
                let (Some(&left), Some(&right)) = (a.get(j), a.get(k)) else {
                    break;
                };
                rec.record(
                    StepKind::Compare,
                    format!("Compare a[{j}] = {left} with a[{k}] = {right}"),
                    Snapshot::new().with_visual(
                        view(&a, settled)
                            .highlight(j, HighlightRole::Compared)
                            .highlight(k, HighlightRole::Compared)
                            .pointer("j", j),
                    ),
                )
                .line(4)
                .var("i", i)
                .var("j", j)
                .var("swapped", swapped);

                if left > right {
                    a.swap(j, k);
                    swapped = true;
                    rec.record(
                        StepKind::Assign,
                        format!("{left} > {right}, swap them"),
                        Snapshot::new().with_visual(
                            view(&a, settled)
                                .highlight(j, HighlightRole::Swapped)
                                .highlight(k, HighlightRole::Swapped)
                                .pointer("j", j),
                        ),
                    )
                    .line(5)
                    .var("i", i)
                    .var("j", j)
                    .var("swapped", true);
                }
            }

            settled = limit;
            if swapped {
                rec.record(
                    StepKind::Iterate,
                    format!("Pass {} done, a[{limit}] is in place", i.saturating_add(1)),
                    Snapshot::new().with_visual(view(&a, settled)),
                )
                .line(1)
                .var("i", i);
            } else {
                settled = 0;
                rec.record(
                    StepKind::Iterate,
                    format!("No swaps in pass {}, the array is sorted", i.saturating_add(1)),
                    Snapshot::new()
                        .with_visual(view(&a, settled))
                        .with_annotation(AnnotationTone::Info, "Early exit"),
                )
                .line(7)
                .var("i", i);
                break;
            }
        }

        rec.record(
            StepKind::Return,
            "Sorted",
            Snapshot::new()
                .with_visual(view(&a, 0))
                .with_annotation(AnnotationTone::Success, format!("{a:?}")),
        )
        .line(8);

        debug!(producer = self.name(), steps = rec.len(), n, "Steps produced");
        Ok(rec.finish(a)?)
    }
}

/// Array visual with every index from `settled` onward marked as settled.
fn view(a: &[i64], settled: usize) -> ArrayView {
    (settled..a.len()).fold(ArrayView::new("a", a), |view, index| {
        view.highlight(index, HighlightRole::Settled)
    })
}
