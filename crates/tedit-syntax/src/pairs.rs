//! Bracket matching over the annotation cache.
//!
//! The bracket under the cursor is confirmed by lexing its line afresh, so a
//! bracket inside a string or comment never matches. The search then walks
//! the cached marker strings of the following (or preceding) lines, which
//! only contain brackets that were outside comments and strings when the line
//! was last lexed. The line where the nesting count reaches zero is lexed
//! again to recover the exact column.

use tedit_text::{Position, TextSource};

use crate::annotation::bracket_partner;
use crate::lexer::Lexer;

/// Feed bracket chars through a nesting counter. `same` deepens, `other`
/// closes one level. Returns the index at which `depth` reaches zero.
fn balance<I>(chars: I, same: char, other: char, depth: &mut usize) -> Option<usize>
where
    I: Iterator<Item = char>,
{
    for (i, c) in chars.enumerate() {
        if c == same {
            *depth += 1;
        } else if c == other {
            *depth = depth.saturating_sub(1);
            if *depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

impl Lexer {
    /// Brackets outside comments and strings on `line`, lexed fresh.
    fn fresh_brackets<S: TextSource + ?Sized>(&self, source: &S, line: usize) -> Vec<(usize, char)> {
        let chars: Vec<char> = source.line(line).chars().collect();
        self.lex_line(&chars, self.comment_state(line), None).brackets
    }

    /// Position of the bracket matching the one at `pos`, or `None` when
    /// `pos` is not a bracket outside comments and strings, or the bracket
    /// is unmatched.
    pub fn get_lex_pair<S: TextSource + ?Sized>(&self, source: &S, pos: Position) -> Option<Position> {
        if !self.profile().scan {
            return None;
        }
        let count = source.line_count();
        if pos.line >= count {
            log::warn!("get_lex_pair: line {} out of range ({count} lines)", pos.line);
            return None;
        }

        let fresh = self.fresh_brackets(source, pos.line);
        let index = fresh.iter().position(|&(col, _)| col == pos.col)?;
        let ch = fresh[index].1;
        let (partner, opens) = bracket_partner(ch)?;
        let mut depth = 1;

        if opens {
            let rest = &fresh[index + 1..];
            if let Some(i) = balance(rest.iter().map(|b| b.1), ch, partner, &mut depth) {
                return Some(Position::new(pos.line, rest[i].0));
            }
            for (line, annotation) in self.store.range(pos.line + 1..count) {
                let mut probe = depth;
                if balance(annotation.markers.chars(), ch, partner, &mut probe).is_none() {
                    depth = probe;
                    continue;
                }
                let found = self.fresh_brackets(source, line);
                if let Some(i) = balance(found.iter().map(|b| b.1), ch, partner, &mut depth) {
                    return Some(Position::new(line, found[i].0));
                }
                log::debug!("stale bracket annotation on line {line}");
            }
        } else {
            let before = &fresh[..index];
            if let Some(i) = balance(before.iter().rev().map(|b| b.1), ch, partner, &mut depth) {
                return Some(Position::new(pos.line, before[before.len() - 1 - i].0));
            }
            for (line, annotation) in self.store.range(..pos.line).rev() {
                let mut probe = depth;
                if balance(annotation.markers.chars().rev(), ch, partner, &mut probe).is_none() {
                    depth = probe;
                    continue;
                }
                let found = self.fresh_brackets(source, line);
                if let Some(i) = balance(found.iter().rev().map(|b| b.1), ch, partner, &mut depth) {
                    return Some(Position::new(line, found[found.len() - 1 - i].0));
                }
                log::debug!("stale bracket annotation on line {line}");
            }
        }
        None
    }

    /// True when the bracket at `pos` has a match.
    #[must_use]
    pub fn check_lex_pair<S: TextSource + ?Sized>(&self, source: &S, pos: Position) -> bool {
        self.get_lex_pair(source, pos).is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
