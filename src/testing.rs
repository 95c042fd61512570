//! Testing utilities for sequence chains.
//!
//! - **Assertions**: compare drained output with expected values
//!   ([`assert_collections_equal`], [`assert_collections_unordered_equal`],
//!   [`assert_seq_yields`]).
//! - **Probes**: count how many elements a terminal really pulled
//!   ([`Probe`]), and check fast paths with a source that refuses
//!   iteration ([`SizedOnlySource`]).
//!
//! # Quick Start
//!
//! ```
//! use ironseq::Seq;
//! use ironseq::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let probe = Probe::new();
//! let firsts = probe
//!     .attach(&Seq::range(1, 101))
//!     .take_while(|x| *x <= 10)
//!     .count()?;
//!
//! assert_eq!(firsts, 10);
//! assert_eq!(probe.pulled(), 11);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod probe;

pub use assertions::*;
pub use probe::*;
