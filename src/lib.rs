//! # Ironseq
//!
//! A **lazy sequence-processing engine** for Rust. Ironseq lets you describe a
//! chain of transformations over a source of elements and defers every bit of
//! work until a terminal operation asks for a result.
//!
//! ## Key Features
//!
//! - **Deferred by construction** - building a chain never touches an element
//! - **Pull-based cursors** - each terminal call drives exactly one pass, and
//!   short-circuiting operators (`limit`, `take_while`, `zip`) pull no more
//!   than they need
//! - **Eager boundaries on first pull** - sort, reverse, shuffle materialize
//!   only when the chain is actually drained
//! - **Memoized grouping** - [`GroupMap`] drains its upstream once, even under
//!   concurrent readers, and layered transforms cache independently
//! - **Built-in combiners** - Count, Sum, Min, Max, Average, `DistinctCount`
//! - **Typed errors** - every failure is a [`SeqError`] returned through `?`
//!
//! ## Quick Start
//!
//! ```
//! use ironseq::*;
//!
//! # fn main() -> Result<()> {
//! let lines = Seq::from_vec(vec![
//!     "hello world".to_string(),
//!     "hello rust".to_string(),
//! ]);
//!
//! let counts = lines
//!     .flat_map(|line: String| {
//!         line.split_whitespace()
//!             .map(str::to_string)
//!             .collect::<Vec<_>>()
//!     })
//!     .group_by_combine(|word: &String| word.clone(), Count);
//!
//! assert_eq!(counts.to_map()?.get(&"hello".to_string()), Some(&2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Seq
//!
//! A [`Seq<T>`] is a shareable recipe for opening [`Cursor`]s. Sequences are:
//! - **Immutable** - operators return new sequences wrapping the caller
//! - **Lazy** - the upstream cursor is opened only when a downstream cursor is
//! - **Re-runnable** - every terminal call starts a fresh pass
//!
//! ### Transformations
//!
//! - element-wise: [`map`](Seq::map), [`filter`](Seq::filter),
//!   [`flat_map`](Seq::flat_map), [`peek`](Seq::peek)
//! - positional: [`skip`](Seq::skip), [`limit`](Seq::limit),
//!   [`take_while`](Seq::take_while), [`drop_while`](Seq::drop_while),
//!   [`slice`](Seq::slice), [`windowed`](Seq::windowed), [`chunked`](Seq::chunked)
//! - combining: [`concat`](Seq::concat), [`zip`](Seq::zip),
//!   [`union`](Seq::union), [`intersect`](Seq::intersect), [`minus`](Seq::minus)
//! - eager (materialized on first pull): [`sorted_by_rules`](Seq::sorted_by_rules),
//!   [`reversed`](Seq::reversed), [`shuffled`](Seq::shuffled),
//!   [`then_apply`](Seq::then_apply)
//!
//! ### Grouping
//!
//! [`Seq::group_by`] returns a [`GroupMap`] that has computed nothing.
//! [`GroupMap::to_map`] drains the upstream once and caches the table;
//! [`GroupMap::value_stream`] layers a per-group transform with its own cache.
//!
//! ## Feature Flags
//!
//! - `json` (default) - numeric aggregation over `serde_json::Value` elements
//!
//! ## Logging
//!
//! Ironseq emits `tracing` events (eager drains, group materialization, fast
//! paths) and installs no subscriber.

pub mod cache;
pub mod combiners;
pub mod cursor;
pub mod error;
pub mod group;
pub mod numeric;
pub mod ops;
pub mod seq;
pub mod sort;
pub mod source;
pub mod terminal;
pub mod testing;
pub mod utils;

pub use cache::CacheCell;
pub use combiners::{AverageF64, CombineFn, Count, DistinctCount, Max, Min, Sum, ToVec};
pub use cursor::{BoxCursor, Cursor, CursorIter, IterCursor};
pub use error::{Result, SeqError};
pub use group::{GroupMap, GroupTable, MappedGroups};
pub use numeric::{Accumulator, Numeric, Summary};
pub use ops::WindowSpec;
pub use ops::stateless::Predicate;
pub use seq::{Seq, SeqBound};
pub use sort::{NullPosition, OrderingRule, SortOrder, SortSpec};
pub use source::{Source, VecSource};
