//! Binary search over a sorted slice.

use stepwise_core::producer::{Produced, StepProducer, StepRecorder};
use stepwise_types::{AnnotationTone, ArrayView, HighlightRole, Snapshot, StepKind};
use tracing::debug;

use crate::MAX_ARRAY_LEN;
use crate::error::{AlgorithmError, check_len};

/// Pseudo-code the step line markers point into.
pub const SOURCE: &str = "\
lo = 0, hi = n
while lo < hi:
    mid = lo + (hi - lo) / 2
    if a[mid] == target: return mid
    if a[mid] < target: lo = mid + 1
    else: hi = mid
return none";

/// Finds `target` in an ascending slice, recording how the window shrinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearch {
    /// Value to look for.
    pub target: i64,
}

impl BinarySearch {
    /// Search for `target`.
    pub const fn new(target: i64) -> Self {
        Self { target }
    }
}

impl StepProducer for BinarySearch {
    type Input = [i64];
    type Output = Option<usize>;
    type Error = AlgorithmError;

    fn name(&self) -> &'static str {
        "binary_search"
    }

    fn produce(&self, input: &[i64]) -> Result<Produced<Option<usize>>, AlgorithmError> {
        check_len(input.len(), MAX_ARRAY_LEN)?;
        if let Some(index) = input
            .iter()
            .zip(input.iter().skip(1))
            .position(|(a, b)| a > b)
        {
            return Err(AlgorithmError::UnsortedInput { index });
        }

        let target = self.target;
        let n = input.len();
        let mut rec = StepRecorder::new();
        let mut lo: usize = 0;
        let mut hi: usize = n;

        rec.record(
            StepKind::Initialize,
            format!("Search for {target} in {n} sorted values"),
            Snapshot::new().with_visual(window(input, lo, hi, None)),
        )
        .line(1)
        .var("target", target)
        .var("lo", lo)
        .var("hi", hi);

        let mut found = None;
        while lo < hi {
            let mid = lo.saturating_add(hi.saturating_sub(lo) / 2);
            let Some(&value) = input.get(mid) else {
                break;
            };
            rec.record(
                StepKind::Compare,
                format!("mid = {mid}, compare a[{mid}] = {value} with {target}"),
                Snapshot::new().with_visual(
                    window(input, lo, hi, Some(mid)).highlight(mid, HighlightRole::Compared),
                ),
            )
            .line(3)
            .var("lo", lo)
            .var("mid", mid)
            .var("hi", hi);

            if value == target {
                found = Some(mid);
                rec.record(
                    StepKind::Return,
                    format!("Found {target} at index {mid}"),
                    Snapshot::new()
                        .with_visual(
                            window(input, lo, hi, Some(mid)).highlight(mid, HighlightRole::Found),
                        )
                        .with_annotation(AnnotationTone::Success, format!("index {mid}")),
                )
                .line(4)
                .var("mid", mid);
                break;
            }

            if value < target {
                lo = mid.saturating_add(1);
                rec.record(
                    StepKind::Assign,
                    format!("{value} < {target}, discard the left half"),
                    Snapshot::new().with_visual(window(input, lo, hi, None)),
                )
                .line(5)
                .var("lo", lo)
                .var("hi", hi);
            } else {
                hi = mid;
                rec.record(
                    StepKind::Assign,
                    format!("{value} > {target}, discard the right half"),
                    Snapshot::new().with_visual(window(input, lo, hi, None)),
                )
                .line(6)
                .var("lo", lo)
                .var("hi", hi);
            }
        }

        if found.is_none() {
            rec.record(
                StepKind::Return,
                format!("{target} is not present"),
                Snapshot::new()
                    .with_visual(window(input, lo, hi, None))
                    .with_annotation(AnnotationTone::Warning, "not found"),
            )
            .line(7);
        }

        debug!(producer = self.name(), steps = rec.len(), n, ?found, "Steps produced");
        Ok(rec.finish(found)?)
    }
}

/// Array visual for the half-open window `[lo, hi)`.
///
/// Indices outside the window are marked excluded. The `hi` pointer is
/// only drawn while it still points at an element.
fn window(a: &[i64], lo: usize, hi: usize, mid: Option<usize>) -> ArrayView {
    let mut view = (0..a.len())
        .filter(|i| *i < lo || *i >= hi)
        .fold(ArrayView::new("a", a), |view, index| {
            view.highlight(index, HighlightRole::Excluded)
        });
    if lo < a.len() {
        view = view.pointer("lo", lo);
    }
    if hi < a.len() {
        view = view.pointer("hi", hi);
    }
    if let Some(mid) = mid {
        view = view.pointer("mid", mid);
    }
    view
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn finds_present_value() {
        let produced = BinarySearch::new(7).produce(&[1, 3, 5, 7, 9, 11]).unwrap();
        assert_eq!(produced.result, Some(3));
        let last = produced.steps.as_slice().last().unwrap();
        assert_eq!(last.kind, StepKind::Return);
        assert_eq!(last.source_line, Some(4));
    }

    #[test]
    fn reports_missing_value() {
        let produced = BinarySearch::new(4).produce(&[1, 3, 5, 7]).unwrap();
        assert_eq!(produced.result, None);
        let last = produced.steps.as_slice().last().unwrap();
        assert_eq!(last.source_line, Some(7));
    }

    #[test]
    fn compares_are_logarithmic() {
        let values: Vec<i64> = (0..64).collect();
        let produced = BinarySearch::new(-1).produce(&values).unwrap();
        let compares = produced
            .steps
            .iter()
            .filter(|s| s.kind == StepKind::Compare)
            .count();
        assert!(compares <= 7);
    }

    #[test]
    fn rejects_unsorted_input() {
        let err = BinarySearch::new(1).produce(&[1, 4, 2, 8]).unwrap_err();
        assert_eq!(err, AlgorithmError::UnsortedInput { index: 1 });
    }

    #[test]
    fn empty_input_still_produces_steps() {
        let produced = BinarySearch::new(3).produce(&[]).unwrap();
        assert_eq!(produced.result, None);
        assert_eq!(produced.steps.len(), 2);
    }

    #[test]
    fn window_excludes_discarded_halves() {
        let produced = BinarySearch::new(9).produce(&[1, 3, 5, 7, 9]).unwrap();
        let shrink = produced
            .steps
            .iter()
            .find(|s| s.kind == StepKind::Assign)
            .unwrap();
        let view = shrink.snapshot.arrays().next().unwrap();
        assert_eq!(view.pointers.get("lo"), Some(&3));
        assert_eq!(view.highlights.get(&0), Some(&HighlightRole::Excluded));
        assert_eq!(view.highlights.get(&3), None);
    }
}
