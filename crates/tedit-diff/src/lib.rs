//! # tedit-diff — Line diff engine for tedit
//!
//! Compares two line ranges and reports which lines changed on each side.
//! A line is an atomic unit: two lines are equal or they are not.
//!
//! - **[`compare`]** — `compare()`, `DiffOptions`, `DiffResult` and its
//!   navigation helpers
//! - **[`hash`]** — `HashBuffer`, line hashes plus a changed bitmap per side
//! - **[`myers`]** — the O(N·D) bisection on an explicit work stack
//!
//! ```
//! use tedit_diff::{compare, DiffOptions, Side};
//!
//! let a = ["a", "b", "c"];
//! let b = ["a", "x", "c"];
//! let result = compare(&a[..], 0..3, &b[..], 0..3, &DiffOptions::default());
//! assert_eq!(result.changed_a, [false, true, false]);
//! assert_eq!(result.next_change(Side::B, 0), Some(1));
//! ```

pub mod compare;
pub mod hash;
pub mod myers;

pub use compare::{DEFAULT_MAX_DIAGONAL, DiffOptions, DiffResult, LineStatus, Side, compare};
pub use hash::HashBuffer;
