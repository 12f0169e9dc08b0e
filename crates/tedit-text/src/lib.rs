//! # tedit-text — Text sources for tedit
//!
//! The lexical classifier and the diff engine never own text. They read
//! already-materialized lines through the [`TextSource`] contract defined
//! here:
//!
//! - **[`source`]** — the `TextSource` trait and its implementations for
//!   ropes, slices, and vectors of strings
//! - **[`buffer`]** — `Buffer`, a rope-backed file buffer
//! - **[`position`]** — `Position` (line, col), 0-indexed, char columns

pub mod buffer;
pub mod position;
pub mod source;

pub use buffer::Buffer;
pub use position::Position;
pub use source::TextSource;
