//! # tedit-syntax — Incremental lexical classifier for tedit
//!
//! Colors lines and matches brackets without rescanning the file on every
//! edit. Leaf to root:
//!
//! - **[`classify`]** — `SymbolClassifier`, the per-char lexical class table
//! - **[`scanner`]** — `LineScanner`, one line split into lexemes
//! - **[`annotation`]** — per-line marker strings and the comment-state model
//! - **[`lexer`]** — `Lexer`: coloring, comment tracking, edit notifications
//! - **[`pairs`]** — bracket matching over the annotation cache
//! - **[`profile`]** / **[`builtin`]** — language profiles and their registry
//! - **[`cells`]** — per-char colors expanded to terminal cells

pub mod annotation;
pub mod builtin;
pub mod cells;
pub mod classify;
pub mod error;
pub mod lexer;
pub mod pairs;
pub mod profile;
pub mod scanner;

pub use annotation::{AnnotationStore, CommentState, LineAnnotation, LineFlags};
pub use cells::{Cell, display_width, expand_cells};
pub use classify::{SymbolClass, SymbolClassifier};
pub use error::ProfileError;
pub use lexer::{Color, Lexer, Redraw};
pub use profile::{LanguageProfile, PLAIN, ProfileRegistry};
