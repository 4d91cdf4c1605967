//! Error type shared by the reference producers.

use stepwise_core::producer::ContractError;

/// Errors a reference producer can return instead of a step sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    /// Binary search was given input that is not sorted ascending.
    #[error(
        "input must be sorted ascending, but element {index} is greater than element {}",
        index.saturating_add(1)
    )]
    UnsortedInput {
        /// Index of the first element greater than its successor.
        index: usize,
    },

    /// The input would produce an unreasonably long recording.
    #[error("input size {n} exceeds the maximum of {max}")]
    InputTooLarge {
        /// Requested size.
        n: u64,
        /// Largest accepted size.
        max: u64,
    },

    /// The recorded steps broke the producer contract.
    #[error(transparent)]
    Contract {
        /// The contract violation.
        #[from]
        source: ContractError,
    },
}

/// Reject inputs longer than `max`.
pub(crate) fn check_len(len: usize, max: usize) -> Result<(), AlgorithmError> {
    if len > max {
        return Err(AlgorithmError::InputTooLarge {
            n: u64::try_from(len).unwrap_or(u64::MAX),
            max: u64::try_from(max).unwrap_or(u64::MAX),
        });
    }
    Ok(())
}
