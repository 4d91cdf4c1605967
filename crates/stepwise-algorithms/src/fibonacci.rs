//! Naive recursive Fibonacci.
//!
//! Every call and return is recorded, so the stack visual grows and
//! shrinks with the recursion. The recording is exponential in `n`, which
//! is why `n` is capped at [`MAX_N`].

use std::collections::BTreeMap;

use serde_json::json;
use stepwise_core::producer::{Produced, StepProducer, StepRecorder};
use stepwise_types::{AnnotationTone, Snapshot, StepKind};
use tracing::debug;

use crate::error::AlgorithmError;

/// Largest accepted input.
pub const MAX_N: u32 = 20;

/// Pseudo-code the step line markers point into.
pub const SOURCE: &str = "\
fn fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)";

/// Computes the `n`th Fibonacci number by plain recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fibonacci;

impl StepProducer for Fibonacci {
    type Input = u32;
    type Output = u64;
    type Error = AlgorithmError;

    fn name(&self) -> &'static str {
        "fibonacci"
    }

    fn produce(&self, input: &u32) -> Result<Produced<u64>, AlgorithmError> {
        let n = *input;
        if n > MAX_N {
            return Err(AlgorithmError::InputTooLarge {
                n: u64::from(n),
                max: u64::from(MAX_N),
            });
        }

        let mut rec = StepRecorder::new();
        let value = fib(&mut rec, n);
        rec.record(
            StepKind::Custom,
            format!("fib({n}) = {value}"),
            Snapshot::new().with_annotation(AnnotationTone::Success, value.to_string()),
        )
        .var("result", value);

        debug!(producer = self.name(), steps = rec.len(), n, "Steps produced");
        Ok(rec.finish(value)?)
    }
}

fn fib(rec: &mut StepRecorder, n: u32) -> u64 {
    let label = format!("fib({n})");
    let args = BTreeMap::from([("n".to_owned(), json!(n))]);
    rec.enter(label.clone(), args, format!("Call {label}"), Snapshot::new())
        .line(1)
        .var("n", n);

    if n < 2 {
        rec.record(StepKind::Compare, format!("{n} < 2, base case"), Snapshot::new())
            .line(2)
            .var("n", n);
        let value = u64::from(n);
        rec.leave(json!(value), format!("{label} returns {value}"), Snapshot::new())
            .line(3)
            .var("n", n);
        return value;
    }

    rec.record(StepKind::Compare, format!("{n} >= 2, recurse"), Snapshot::new())
        .line(2)
        .var("n", n);
    let a = fib(rec, n.saturating_sub(1));
    let b = fib(rec, n.saturating_sub(2));
    let value = a.saturating_add(b);
    rec.leave(
        json!(value),
        format!("{label} returns {a} + {b} = {value}"),
        Snapshot::new(),
    )
    .line(4)
    .var("n", n)
    .var("fib(n - 1)", a)
    .var("fib(n - 2)", b);
    value
}
