//! File buffer — the text store handed to the lexer and the diff engine.
//!
//! A `Buffer` wraps a [`ropey::Rope`] with file loading and line-oriented
//! access through [`TextSource`].
//!
//! # Design choices
//!
//! - **ropey** provides O(log n) line indexing and Unicode handling. We build
//!   a small read-mostly API on top rather than reimplementing text storage.
//!
//! - **Columns are char offsets**, not byte offsets. Byte offsets never leak
//!   into the public API.
//!
//! - **Line endings stay in the rope.** `\n`, `\r\n` and `\r` are all line
//!   breaks to ropey; [`TextSource::line`] strips the terminator.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::source::TextSource;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope.
///
/// Each file opened for highlighting or comparison gets its own `Buffer`.
/// Line count follows rope semantics: an empty buffer has one empty line, and
/// text ending with a line break has a trailing empty line.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    /// Create a buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
        }
    }

    /// Load a buffer from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
        })
    }

    /// File path, if the buffer was loaded from disk.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl TextSource for Buffer {
    #[inline]
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    #[inline]
    fn line(&self, index: usize) -> Cow<'_, str> {
        TextSource::line(&self.rope, index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = Buffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "");
        assert!(buf.path().is_none());
    }

    #[test]
    fn crlf_lines_are_stripped() {
        let buf = Buffer::from_text("int x;\r\n// note\r\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line(0), "int x;");
        assert_eq!(buf.line(1), "// note");
        assert_eq!(buf.line(2), "");
    }

    #[test]
    fn bare_cr_breaks_lines() {
        let buf = Buffer::from_text("a\rb");
        assert!(!buf.is_empty());
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0), "a");
    }

    #[test]
    fn from_file_missing_is_error() {
        let err = Buffer::from_file(Path::new("/definitely/not/here.txt"));
        assert!(err.is_err());
    }

    #[test]
    fn from_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("tedit-buffer-{}.txt", std::process::id()));
        fs::write(&path, "a\nb\n").unwrap();
        let buf = Buffer::from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(buf.path(), Some(path.as_path()));
        assert_eq!(buf.line(1), "b");
    }
}
