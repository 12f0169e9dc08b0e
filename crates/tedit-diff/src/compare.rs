//! `compare`: two line ranges in, two changed-line bitmaps out.
//!
//! Identical lines are first trimmed from both ends with exact line
//! comparison. What remains is either empty, a pure insert or delete, or is
//! hashed and handed to the Myers bisection.

use std::ops::Range;
use std::time::Instant;

use tedit_text::TextSource;

use crate::hash::{HashBuffer, lines_equal};
use crate::myers::diff_hashes;

/// Default bound on the edit distance searched per sub-problem.
pub const DEFAULT_MAX_DIAGONAL: usize = 4096;

/// Comparison settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Treat lines that differ only in whitespace as equal.
    pub ignore_whitespace: bool,
    /// Sub-problems needing more edits than this are marked changed as a
    /// whole instead of being searched further.
    pub max_diagonal: usize,
    /// Stop searching at this instant and mark what is left changed.
    pub deadline: Option<Instant>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            max_diagonal: DEFAULT_MAX_DIAGONAL,
            deadline: None,
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

/// Render status of one compared line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    Same,
    Changed,
}

/// Changed-line bitmaps for both sides, indexed relative to the start of
/// each compared range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffResult {
    pub changed_a: Vec<bool>,
    pub changed_b: Vec<bool>,
    /// Part of the comparison gave up (diagonal cap or deadline), so the
    /// marked lines are a valid but not minimal difference.
    pub approximate: bool,
}

impl DiffResult {
    /// The bitmap of `side`.
    #[must_use]
    pub fn changed(&self, side: Side) -> &[bool] {
        match side {
            Side::A => &self.changed_a,
            Side::B => &self.changed_b,
        }
    }

    /// True when no line is marked on either side.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        !self.changed_a.contains(&true) && !self.changed_b.contains(&true)
    }

    /// Number of changed lines on `side`.
    #[must_use]
    pub fn changed_count(&self, side: Side) -> usize {
        self.changed(side).iter().filter(|&&c| c).count()
    }

    /// Status of line `index` of `side`; lines outside the range are `Same`.
    #[must_use]
    pub fn line_status(&self, side: Side, index: usize) -> LineStatus {
        if self.changed(side).get(index).copied().unwrap_or(false) {
            LineStatus::Changed
        } else {
            LineStatus::Same
        }
    }

    /// True when a changed block starts at `index`.
    fn starts_block(bits: &[bool], index: usize) -> bool {
        bits[index] && (index == 0 || !bits[index - 1])
    }

    /// First line of the next changed block after `from`.
    #[must_use]
    pub fn next_change(&self, side: Side, from: usize) -> Option<usize> {
        let bits = self.changed(side);
        (from.saturating_add(1)..bits.len()).find(|&i| Self::starts_block(bits, i))
    }

    /// First line of the closest changed block starting before `from`.
    #[must_use]
    pub fn prev_change(&self, side: Side, from: usize) -> Option<usize> {
        let bits = self.changed(side);
        (0..from.min(bits.len()))
            .rev()
            .find(|&i| Self::starts_block(bits, i))
    }
}

/// Clamp `range` to `0..count`, logging a contract violation.
fn clamp(range: Range<usize>, count: usize, side: Side) -> Range<usize> {
    if range.end <= count && range.start <= range.end {
        return range;
    }
    log::warn!("compare: range {range:?} of side {side:?} outside 0..{count}");
    let end = range.end.min(count);
    range.start.min(end)..end
}

/// Compare `range_a` of `a` with `range_b` of `b`.
pub fn compare<A, B>(
    a: &A,
    range_a: Range<usize>,
    b: &B,
    range_b: Range<usize>,
    options: &DiffOptions,
) -> DiffResult
where
    A: TextSource + ?Sized,
    B: TextSource + ?Sized,
{
    let range_a = clamp(range_a, a.line_count(), Side::A);
    let range_b = clamp(range_b, b.line_count(), Side::B);
    let ws = options.ignore_whitespace;
    let mut result = DiffResult {
        changed_a: vec![false; range_a.len()],
        changed_b: vec![false; range_b.len()],
        approximate: false,
    };

    let mut prefix = 0;
    while prefix < range_a.len()
        && prefix < range_b.len()
        && lines_equal(&a.line(range_a.start + prefix), &b.line(range_b.start + prefix), ws)
    {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < range_a.len() - prefix
        && suffix < range_b.len() - prefix
        && lines_equal(&a.line(range_a.end - suffix - 1), &b.line(range_b.end - suffix - 1), ws)
    {
        suffix += 1;
    }

    let window_a = prefix..range_a.len() - suffix;
    let window_b = prefix..range_b.len() - suffix;
    log::debug!(
        "compare: {} x {} lines, {prefix} common prefix, {suffix} common suffix",
        range_a.len(),
        range_b.len()
    );

    match (window_a.is_empty(), window_b.is_empty()) {
        (true, true) => {}
        (true, false) => result.changed_b[window_b].fill(true),
        (false, true) => result.changed_a[window_a].fill(true),
        (false, false) => {
            let shift = |w: &Range<usize>, base: usize| base + w.start..base + w.end;
            let mut hashes_a = HashBuffer::new(a, shift(&window_a, range_a.start), ws);
            let mut hashes_b = HashBuffer::new(b, shift(&window_b, range_b.start), ws);
            // Equal-cost scripts are broken by argument order, so the
            // bisection always sees the two sides in one canonical order.
            let swapped = (hashes_a.hashes().len(), hashes_a.hashes())
                > (hashes_b.hashes().len(), hashes_b.hashes());
            let (first, second) = if swapped {
                (hashes_b.hashes(), hashes_a.hashes())
            } else {
                (hashes_a.hashes(), hashes_b.hashes())
            };
            let script = diff_hashes(first, second, options.max_diagonal, options.deadline);
            for change in script.changes {
                let (in_a, in_b) = if swapped {
                    (change.b, change.a)
                } else {
                    (change.a, change.b)
                };
                hashes_a.mark(in_a);
                hashes_b.mark(in_b);
            }
            result.changed_a[window_a].copy_from_slice(hashes_a.changed());
            result.changed_b[window_b].copy_from_slice(hashes_b.changed());
            result.approximate = script.fallbacks > 0;
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
