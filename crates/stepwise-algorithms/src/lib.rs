//! Reference step producers for Stepwise.
//!
//! Each module implements [`StepProducer`] for one classic algorithm and
//! exposes the pseudo-code its steps' line markers refer to as `SOURCE`.
//!
//! # Modules
//!
//! - [`bubble_sort`] -- [`BubbleSort`], array visual with compare/swap
//!   highlights.
//! - [`binary_search`] -- [`BinarySearch`], array visual with `lo`, `mid`
//!   and `hi` pointers.
//! - [`fibonacci`] -- [`Fibonacci`], recursion shown through the call
//!   stack visual.
//! - [`linked_list`] -- [`ReverseLinkedList`], linked-list visual with
//!   `prev`, `curr` and `next` pointers.
//! - [`bst`] -- [`BstInsert`], tree visual highlighting each search path.
//! - [`error`] -- [`AlgorithmError`].
//!
//! [`StepProducer`]: stepwise_core::producer::StepProducer

pub mod binary_search;
pub mod bst;
pub mod bubble_sort;
pub mod error;
pub mod fibonacci;
pub mod linked_list;

pub use binary_search::BinarySearch;
pub use bst::BstInsert;
pub use bubble_sort::BubbleSort;
pub use error::AlgorithmError;
pub use fibonacci::Fibonacci;
pub use linked_list::ReverseLinkedList;

/// Longest slice the array, list and tree producers accept.
pub const MAX_ARRAY_LEN: usize = 64;

/// The reference producers, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// [`BubbleSort`].
    BubbleSort,
    /// [`BinarySearch`].
    BinarySearch,
    /// [`Fibonacci`].
    Fibonacci,
    /// [`ReverseLinkedList`].
    ReverseLinkedList,
    /// [`BstInsert`].
    BstInsert,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Self; 5] = [
        Self::BubbleSort,
        Self::BinarySearch,
        Self::Fibonacci,
        Self::ReverseLinkedList,
        Self::BstInsert,
    ];

    /// Name used in configuration and logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BubbleSort => "bubble_sort",
            Self::BinarySearch => "binary_search",
            Self::Fibonacci => "fibonacci",
            Self::ReverseLinkedList => "reverse_linked_list",
            Self::BstInsert => "bst_insert",
        }
    }

    /// Look an algorithm up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Pseudo-code shown next to the visualization.
    pub const fn source(self) -> &'static str {
        match self {
            Self::BubbleSort => bubble_sort::SOURCE,
            Self::BinarySearch => binary_search::SOURCE,
            Self::Fibonacci => fibonacci::SOURCE,
            Self::ReverseLinkedList => linked_list::SOURCE,
            Self::BstInsert => bst::SOURCE,
        }
    }
}

impl core::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stepwise_core::producer::StepProducer;

    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_name(algorithm.name()), Some(algorithm));
        }
        assert_eq!(Algorithm::from_name("quick_sort"), None);
    }

    #[test]
    fn names_match_producers() {
        assert_eq!(Algorithm::BubbleSort.name(), BubbleSort.name());
        assert_eq!(Algorithm::BinarySearch.name(), BinarySearch::new(0).name());
        assert_eq!(Algorithm::Fibonacci.name(), Fibonacci.name());
        assert_eq!(Algorithm::ReverseLinkedList.name(), ReverseLinkedList.name());
        assert_eq!(Algorithm::BstInsert.name(), BstInsert.name());
    }

    #[test]
    fn sources_are_non_empty() {
        for algorithm in Algorithm::ALL {
            assert!(algorithm.source().lines().count() >= 4);
        }
    }
}
