//! Error type shared by every sequence, cursor, and grouping operation.
//!
//! Errors never get swallowed: an operator that fails while being pulled hands
//! the [`SeqError`] back to whoever drives the cursor, which for ordinary code
//! is the terminal operation (`to_vec`, `count`, `GroupMap::to_map`, ...).

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SeqError>;

/// Failure modes of the sequence engine.
#[derive(Debug, Error)]
pub enum SeqError {
    /// `next` was called on a cursor whose `has_next` is false.
    #[error("sequence exhausted: next() called with no remaining element")]
    ExhaustedSequence,

    /// Malformed operator configuration (zero window size, start > end, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An element lacks the capability an aggregation needs.
    #[error("type mismatch in {operation}: {detail}")]
    TypeMismatch {
        /// Operation that hit the element (`sum`, `average`, `sorted_numeric`).
        operation: &'static str,
        /// Description of the offending element.
        detail: String,
    },

    /// An integer aggregate left the range of its accumulator.
    #[error("arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that overflowed (`sum`, `average`).
        operation: &'static str,
    },

    /// `single()` saw zero or more than one element.
    #[error("expected exactly one element, found {found}")]
    NotExactlyOne {
        /// `"none"` or `"more than one"`.
        found: &'static str,
    },

    /// A caller-supplied collaborator (see `Seq::then_apply`) failed.
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] anyhow::Error),
}

impl SeqError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn mismatch(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::TypeMismatch {
            operation,
            detail: detail.into(),
        }
    }
}
