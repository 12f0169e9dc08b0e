//! Per-line annotations and the comment-state model.
//!
//! After a line is lexed, the lexer keeps a compact [`LineAnnotation`] for it:
//! a marker string plus a few flags. The marker string records, in order,
//!
//! - `O` for an effective block-comment open,
//! - `C` for an effective block-comment close,
//! - `T` for an effective toggled-comment marker,
//! - the literal bracket chars `()[]{}` found outside comments and strings,
//!   with an opener immediately followed by its closer collapsed away.
//!
//! Annotations live in an [`AnnotationStore`] keyed by line number. Lines
//! whose annotation would be empty are simply absent: absence means "no
//! comment transition, no continuation, no brackets". Next to them the store
//! keeps a color fingerprint of every lexed line, so an edit that only
//! recolors tokens can be told apart from one that changes nothing.
//!
//! # Reconstructing comment state
//!
//! [`AnnotationStore::state_before`] rebuilds the [`CommentState`] at the
//! start of a line without re-lexing anything. It walks backward to the
//! nearest entry flagged [`LineFlags::BALANCED`] (comment depth zero at the
//! end of that line) and replays the `O`/`C`/`T` markers of the entries after
//! it. The cost is the distance back to the last fully-closed comment region,
//! not the distance to line 0.

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use bitflags::bitflags;

/// Block comment opened.
pub const OPEN: char = 'O';
/// Block comment closed.
pub const CLOSE: char = 'C';
/// Toggled comment flipped.
pub const TOGGLE: char = 'T';

/// For a bracket char: its partner and whether it opens.
#[must_use]
pub const fn bracket_partner(ch: char) -> Option<(char, bool)> {
    match ch {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

bitflags! {
    /// End-of-line facts carried to later lines.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LineFlags: u8 {
        /// Comment depth is zero and no toggled comment is open at the end of
        /// the line. Backward reconstruction stops here.
        const BALANCED = 1;
        /// The last non-space lexeme is a lone backslash.
        const CONTINUATION = 1 << 1;
        /// The line ends inside a line comment that a continuation carries on.
        const LINE_COMMENT = 1 << 2;
        /// A string is still open at the end of the line.
        const STRING_CONTINUED = 1 << 3;
    }
}

// ---------------------------------------------------------------------------
// CommentState
// ---------------------------------------------------------------------------

/// Comment and string context at a point in the text. Never stored; always
/// rebuilt from annotations.
///
/// Only one string terminator is tracked: nested quoting is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentState {
    /// Open block-comment depth (toggled regions count one).
    pub depth: usize,
    /// A toggled comment region is open.
    pub toggled: bool,
    /// Index of the toggled marker that opened the region; only that marker
    /// closes it.
    pub toggle: usize,
    /// Inside a line comment.
    pub line_comment: bool,
    /// Terminator of an open string.
    pub quote: Option<char>,
}

impl CommentState {
    /// True when the text at this point is comment.
    #[inline]
    #[must_use]
    pub const fn in_comment(&self) -> bool {
        self.line_comment || self.depth > 0
    }

    /// True when no block or toggled comment is open.
    #[inline]
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.toggled
    }

    /// Apply one `O`/`C`/`T` marker. Other chars are ignored.
    pub fn apply(&mut self, marker: char, recursive: bool) {
        match marker {
            OPEN => self.depth += 1,
            CLOSE => {
                self.depth = if recursive {
                    self.depth.saturating_sub(1)
                } else {
                    0
                };
                self.line_comment = false;
            }
            TOGGLE => {
                if self.toggled {
                    self.toggled = false;
                    self.depth = self.depth.saturating_sub(1);
                } else {
                    self.toggled = true;
                    self.depth += 1;
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// LineAnnotation
// ---------------------------------------------------------------------------

/// Compact summary of one lexed line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineAnnotation {
    /// Marker and bracket chars in line order.
    pub markers: String,
    pub flags: LineFlags,
    /// Terminator of the string left open at the end of the line.
    pub quote: Option<char>,
    /// Toggled marker left open by a `T` on this line.
    pub toggle: Option<usize>,
}

impl LineAnnotation {
    /// True when the annotation carries nothing a later line could need.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.markers.is_empty()
            && self.quote.is_none()
            && self.toggle.is_none()
            && (self.flags - LineFlags::BALANCED).is_empty()
    }

    /// Append a comment marker.
    pub fn push_marker(&mut self, marker: char) {
        self.markers.push(marker);
    }

    /// Append a bracket, cancelling it against an opener of the same pair
    /// written immediately before.
    pub fn push_bracket(&mut self, ch: char) {
        if let Some((partner, false)) = bracket_partner(ch) {
            if self.markers.ends_with(partner) {
                self.markers.pop();
                return;
            }
        }
        self.markers.push(ch);
    }

    /// Comment markers only (brackets dropped).
    pub fn comment_markers(&self) -> impl Iterator<Item = char> + '_ {
        self.markers
            .chars()
            .filter(|&c| matches!(c, OPEN | CLOSE | TOGGLE))
    }

    /// True when `other` differs in anything that affects later lines:
    /// comment markers, continuation flags, or the open string.
    #[must_use]
    pub fn differs_structurally(&self, other: &Self) -> bool {
        let flags = |a: &Self| a.flags - LineFlags::BALANCED;
        flags(self) != flags(other)
            || self.quote != other.quote
            || self.toggle != other.toggle
            || !self.comment_markers().eq(other.comment_markers())
    }
}

// ---------------------------------------------------------------------------
// AnnotationStore
// ---------------------------------------------------------------------------

/// Sparse, line-keyed annotation map owned by one lexer.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: BTreeMap<usize, LineAnnotation>,
    digests: BTreeMap<usize, u64>,
}

/// Move every key at or after `at` down by `count`.
fn open_gap<T>(map: &mut BTreeMap<usize, T>, at: usize, count: usize) {
    let tail = map.split_off(&at);
    map.extend(tail.into_iter().map(|(line, v)| (line + count, v)));
}

/// Drop keys in `[at, at + count)` and move later keys up by `count`.
fn close_gap<T>(map: &mut BTreeMap<usize, T>, at: usize, count: usize) {
    let mut doomed = map.split_off(&at);
    let tail = doomed.split_off(&(at + count));
    map.extend(tail.into_iter().map(|(line, v)| (line - count, v)));
}

impl AnnotationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored (non-blank) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.digests.clear();
    }

    #[must_use]
    pub fn get(&self, line: usize) -> Option<&LineAnnotation> {
        self.entries.get(&line)
    }

    /// Store `annotation` for `line`; a blank annotation removes the entry.
    /// Returns the previous entry.
    pub fn set(&mut self, line: usize, annotation: LineAnnotation) -> Option<LineAnnotation> {
        if annotation.is_blank() {
            self.entries.remove(&line)
        } else {
            self.entries.insert(line, annotation)
        }
    }

    pub fn remove(&mut self, line: usize) -> Option<LineAnnotation> {
        self.digests.remove(&line);
        self.entries.remove(&line)
    }

    /// Color fingerprint recorded when `line` was last lexed.
    #[must_use]
    pub fn digest(&self, line: usize) -> Option<u64> {
        self.digests.get(&line).copied()
    }

    pub fn set_digest(&mut self, line: usize, digest: u64) {
        self.digests.insert(line, digest);
    }

    /// Stored entries whose line falls in `range`, in line order.
    pub fn range<R: RangeBounds<usize>>(
        &self,
        range: R,
    ) -> impl DoubleEndedIterator<Item = (usize, &LineAnnotation)> {
        self.entries.range(range).map(|(&line, a)| (line, a))
    }

    /// Stored line numbers in order.
    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Make room for `count` new lines at `at`: every entry at or after `at`
    /// moves down by `count`.
    pub fn insert_lines(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        open_gap(&mut self.entries, at, count);
        open_gap(&mut self.digests, at, count);
    }

    /// Drop entries in `[at, at + count)` and move every later entry up by
    /// `count`.
    pub fn remove_lines(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        close_gap(&mut self.entries, at, count);
        close_gap(&mut self.digests, at, count);
    }

    /// Forget the reconstruction checkpoints at and after `line`. Used when
    /// a comment transition changed, so later end-of-line states are suspect
    /// until those lines are lexed again.
    pub fn invalidate_from(&mut self, line: usize) {
        for (_, a) in self.entries.range_mut(line..) {
            a.flags.remove(LineFlags::BALANCED);
        }
    }

    /// Comment and string state at the start of `line`.
    #[must_use]
    pub fn state_before(&self, line: usize, recursive: bool) -> CommentState {
        let tail: Vec<&LineAnnotation> = self
            .entries
            .range(..line)
            .rev()
            .take_while(|(_, a)| !a.flags.contains(LineFlags::BALANCED))
            .map(|(_, a)| a)
            .collect();

        let mut state = CommentState::default();
        for annotation in tail.iter().rev() {
            for marker in annotation.comment_markers() {
                state.apply(marker, recursive);
            }
            if let Some(toggle) = annotation.toggle {
                state.toggle = toggle;
            }
        }
        state.line_comment = false;

        if let Some(prev) = line.checked_sub(1).and_then(|p| self.entries.get(&p)) {
            if prev.flags.contains(LineFlags::STRING_CONTINUED) {
                state.quote = prev.quote;
            }
            if prev
                .flags
                .contains(LineFlags::LINE_COMMENT | LineFlags::CONTINUATION)
            {
                state.line_comment = true;
            }
        }
        state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
