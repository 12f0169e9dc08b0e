//! Line hashes and changed-line bitmaps, one [`HashBuffer`] per compared
//! side.
//!
//! A line hash is a cheap equality oracle, not a guarantee: two lines with
//! the same hash are assumed equal by the bisection. With whitespace ignored,
//! whitespace chars are skipped both when hashing and when comparing.

use std::ops::Range;

use tedit_text::TextSource;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hash of a line.
#[must_use]
pub fn line_hash(text: &str, ignore_whitespace: bool) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for &b in bytes {
            hash ^= u64::from(b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };
    if ignore_whitespace {
        let mut buf = [0; 4];
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            feed(ch.encode_utf8(&mut buf).as_bytes());
        }
    } else {
        feed(text.as_bytes());
    }
    hash
}

/// Exact line equality, optionally ignoring whitespace.
#[must_use]
pub fn lines_equal(a: &str, b: &str, ignore_whitespace: bool) -> bool {
    if ignore_whitespace {
        a.chars()
            .filter(|c| !c.is_whitespace())
            .eq(b.chars().filter(|c| !c.is_whitespace()))
    } else {
        a == b
    }
}

/// Hashes of a run of lines plus a changed bit per line.
#[derive(Debug, Clone, Default)]
pub struct HashBuffer {
    hashes: Vec<u64>,
    changed: Vec<bool>,
}

impl HashBuffer {
    /// Hash `lines` of `source`. Index 0 of the buffer is `lines.start`.
    #[must_use]
    pub fn new<S: TextSource + ?Sized>(source: &S, lines: Range<usize>, ignore_whitespace: bool) -> Self {
        let hashes: Vec<u64> = lines
            .map(|i| line_hash(&source.line(i), ignore_whitespace))
            .collect();
        let changed = vec![false; hashes.len()];
        Self { hashes, changed }
    }

    /// All line hashes.
    #[must_use]
    pub fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    /// Mark `range` changed. Out-of-range indices are ignored.
    pub fn mark(&mut self, range: Range<usize>) {
        let end = range.end.min(self.changed.len());
        if range.start < end {
            self.changed[range.start..end].fill(true);
        }
    }

    /// The changed bitmap.
    #[must_use]
    pub fn changed(&self) -> &[bool] {
        &self.changed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
