//! Myers O(N·D) bisection over line hashes.
//!
//! Each sub-problem grows a forward and a backward frontier of furthest
//! reaching paths, one edit at a time, sliding along runs of equal hashes
//! ("snakes"). When the frontiers overlap, the overlap point splits the
//! sub-problem in two. Sub-problems live on an explicit work stack, so the
//! depth of the split tree never touches the call stack.
//!
//! Frontier vectors are allocated once per run with room for `max_d`
//! diagonals each way and reused by every sub-problem of that run.

use std::ops::Range;
use std::time::Instant;

/// A block of lines replaced between the two sides. One side may be empty
/// (pure insert or pure delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// Outcome of one diff run.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Changed blocks in line order.
    pub changes: Vec<Change>,
    /// Sub-problems given up on (diagonal cap or deadline) and marked
    /// changed wholesale.
    pub fallbacks: usize,
}

/// Result of bisecting one sub-problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bisect {
    /// Split at `(x, y)`: `a[..x]`/`b[..y]` and `a[x..]`/`b[y..]`.
    Split(usize, usize),
    /// The sides share no line: the whole block is changed.
    Disjoint,
    /// Diagonal cap or deadline reached before the frontiers met.
    GaveUp,
}

/// Frontier vectors shared by the sub-problems of one run.
struct Frontiers {
    forward: Vec<isize>,
    backward: Vec<isize>,
    cap: usize,
}

impl Frontiers {
    fn new(cap: usize) -> Self {
        let size = 2 * cap + 2;
        Self {
            forward: vec![-1; size],
            backward: vec![-1; size],
            cap,
        }
    }

    /// Find the split point of `a` against `b`, which share no prefix or
    /// suffix.
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::many_single_char_names,
        clippy::similar_names
    )]
    fn bisect(&mut self, a: &[u64], b: &[u64], deadline: Option<Instant>) -> Bisect {
        let n = a.len() as isize;
        let m = b.len() as isize;
        let full = (n + m + 1) / 2;
        let max_d = full.min(self.cap as isize);
        let offset = max_d;
        let len = 2 * max_d + 2;

        let v1 = &mut self.forward[..len as usize];
        let v2 = &mut self.backward[..len as usize];
        v1.fill(-1);
        v2.fill(-1);
        v1[(offset + 1) as usize] = 0;
        v2[(offset + 1) as usize] = 0;

        let delta = n - m;
        // With odd delta the frontiers first overlap on a forward step.
        let front = delta % 2 != 0;
        // Diagonals that ran off the grid are skipped on later rounds.
        let (mut k1start, mut k1end, mut k2start, mut k2end) = (0, 0, 0, 0);

        // A backward path of length x2 on diagonal k2, as a forward x.
        let backward_x = |v2: &[isize], k2: isize| -> Option<isize> {
            let i = offset + k2;
            if i < 0 || i >= len {
                return None;
            }
            let x2 = v2[i as usize];
            let y2 = x2 - k2;
            (x2 >= 0 && x2 <= n && y2 >= 0 && y2 <= m).then_some(n - x2)
        };

        for d in 0..max_d {
            if deadline.is_some_and(|t| Instant::now() >= t) {
                return Bisect::GaveUp;
            }

            let mut k1 = -d + k1start;
            while k1 <= d - k1end {
                let i = (offset + k1) as usize;
                let mut x1 = if k1 == -d || (k1 != d && v1[i - 1] < v1[i + 1]) {
                    v1[i + 1]
                } else {
                    v1[i - 1] + 1
                };
                let mut y1 = x1 - k1;
                while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                    x1 += 1;
                    y1 += 1;
                }
                v1[i] = x1;
                if x1 > n {
                    k1end += 2;
                } else if y1 > m {
                    k1start += 2;
                } else if front {
                    if let Some(x2) = backward_x(v2, delta - k1) {
                        if x1 >= x2 {
                            return Bisect::Split(x1 as usize, y1 as usize);
                        }
                    }
                }
                k1 += 2;
            }

            let mut k2 = -d + k2start;
            while k2 <= d - k2end {
                let i = (offset + k2) as usize;
                let mut x2 = if k2 == -d || (k2 != d && v2[i - 1] < v2[i + 1]) {
                    v2[i + 1]
                } else {
                    v2[i - 1] + 1
                };
                let mut y2 = x2 - k2;
                while x2 < n
                    && y2 < m
                    && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize]
                {
                    x2 += 1;
                    y2 += 1;
                }
                v2[i] = x2;
                if x2 > n {
                    k2end += 2;
                } else if y2 > m {
                    k2start += 2;
                } else if !front {
                    let k1 = delta - k2;
                    let j = offset + k1;
                    if j >= 0 && j < len {
                        let x1 = v1[j as usize];
                        let y1 = x1 - k1;
                        let reached = x1 >= 0 && x1 <= n && y1 >= 0 && y1 <= m;
                        if reached && x1 >= n - x2 {
                            return Bisect::Split(x1 as usize, y1 as usize);
                        }
                    }
                }
                k2 += 2;
            }
        }
        // Frontiers meet before `full` rounds unless the sides share nothing.
        if max_d == full {
            Bisect::Disjoint
        } else {
            Bisect::GaveUp
        }
    }
}

/// Diff two hash sequences. Sub-problems whose edit distance exceeds
/// `max_diagonal` (or that are reached after `deadline`) are reported as one
/// whole changed block.
#[must_use]
pub fn diff_hashes(a: &[u64], b: &[u64], max_diagonal: usize, deadline: Option<Instant>) -> Script {
    let cap = max_diagonal.min(a.len().max(b.len())).max(1);
    let mut frontiers = Frontiers::new(cap);
    let mut script = Script::default();
    let mut stack = vec![(0..a.len(), 0..b.len())];
    let mut splits = 0usize;

    while let Some((mut ra, mut rb)) = stack.pop() {
        while !ra.is_empty() && !rb.is_empty() && a[ra.start] == b[rb.start] {
            ra.start += 1;
            rb.start += 1;
        }
        while !ra.is_empty() && !rb.is_empty() && a[ra.end - 1] == b[rb.end - 1] {
            ra.end -= 1;
            rb.end -= 1;
        }
        if ra.is_empty() || rb.is_empty() {
            if !(ra.is_empty() && rb.is_empty()) {
                script.changes.push(Change { a: ra, b: rb });
            }
            continue;
        }

        match frontiers.bisect(&a[ra.clone()], &b[rb.clone()], deadline) {
            Bisect::Split(x, y) if (x, y) != (0, 0) && (x, y) != (ra.len(), rb.len()) => {
                splits += 1;
                // Second half pushed first so changes come out in line order.
                stack.push((ra.start + x..ra.end, rb.start + y..rb.end));
                stack.push((ra.start..ra.start + x, rb.start..rb.start + y));
            }
            Bisect::Disjoint => script.changes.push(Change { a: ra, b: rb }),
            Bisect::Split(..) | Bisect::GaveUp => {
                log::debug!(
                    "diff fallback: {} x {} lines marked changed at a{} b{}",
                    ra.len(),
                    rb.len(),
                    ra.start,
                    rb.start
                );
                script.fallbacks += 1;
                script.changes.push(Change { a: ra, b: rb });
            }
        }
    }

    log::trace!(
        "diff_hashes: {} x {} -> {} changes, {splits} splits",
        a.len(),
        b.len(),
        script.changes.len()
    );
    script
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
