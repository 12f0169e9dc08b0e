//! The line access contract shared by the lexer and the diff engine.
//!
//! A text source is an already-materialized sequence of lines. Line text is
//! returned **without** its terminator (`\n`, `\r\n`, `\r`). Asking for an
//! index outside `0..line_count()` is a caller contract violation; the
//! implementations here answer with an empty line rather than panicking.

use std::borrow::Cow;

use ropey::Rope;

/// Read-only, line-indexed access to text.
pub trait TextSource {
    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Text of line `index`, without the trailing line ending.
    fn line(&self, index: usize) -> Cow<'_, str>;
}

impl TextSource for Rope {
    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn line(&self, index: usize) -> Cow<'_, str> {
        if index >= self.len_lines() {
            return Cow::Borrowed("");
        }
        let slice = self.line(index);
        let text: Cow<'_, str> = slice.into();
        match text {
            Cow::Borrowed(s) => Cow::Borrowed(strip_line_ending(s)),
            Cow::Owned(s) => Cow::Owned(strip_line_ending(&s).to_owned()),
        }
    }
}

impl<S: AsRef<str>> TextSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Cow<'_, str> {
        self.get(index)
            .map_or(Cow::Borrowed(""), |s| Cow::Borrowed(strip_line_ending(s.as_ref())))
    }
}

impl<S: AsRef<str>> TextSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Cow<'_, str> {
        self.as_slice().line(index)
    }
}

/// Strip one trailing `\n`, `\r\n`, or `\r`.
#[must_use]
pub fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .or_else(|| s.strip_suffix('\r'))
        .unwrap_or(s)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rope_lines_drop_terminators() {
        let rope = Rope::from_str("one\r\ntwo\nthree");
        assert_eq!(TextSource::line_count(&rope), 3);
        assert_eq!(TextSource::line(&rope, 0), "one");
        assert_eq!(TextSource::line(&rope, 1), "two");
        assert_eq!(TextSource::line(&rope, 2), "three");
    }

    #[test]
    fn rope_trailing_newline_yields_empty_line() {
        let rope = Rope::from_str("a\n");
        assert_eq!(TextSource::line_count(&rope), 2);
        assert_eq!(TextSource::line(&rope, 1), "");
    }

    #[test]
    fn out_of_range_is_empty() {
        let rope = Rope::from_str("x");
        assert_eq!(TextSource::line(&rope, 7), "");
        let lines = vec!["a", "b"];
        assert_eq!(lines.line(2), "");
    }

    #[test]
    fn slices_and_vecs() {
        let owned: Vec<String> = vec!["int x;".into(), "y\n".into()];
        assert_eq!(owned.line_count(), 2);
        assert_eq!(owned.line(1), "y");

        let borrowed: &[&str] = &["a", "b", "c"];
        assert_eq!(borrowed.line_count(), 3);
        assert_eq!(borrowed.line(2), "c");
    }

    #[test]
    fn strip_only_one_terminator() {
        assert_eq!(strip_line_ending("a\n\n"), "a\n");
        assert_eq!(strip_line_ending("a\r"), "a");
        assert_eq!(strip_line_ending("a"), "a");
    }
}
