//! Line scanner — splits one line into lexemes.
//!
//! The scanner is stateless apart from the pending string terminator, which
//! the caller threads through successive calls (and across lines, when a
//! string continues past a trailing backslash).
//!
//! # Lexeme rules
//!
//! 1. A pending string terminator forces a string lexeme, whatever the char.
//! 2. Whitespace runs become one space lexeme.
//! 3. Toggled comment markers are matched before ordinary tokenization so
//!    they win over shorter punctuation runs and over quote chars.
//! 4. Runs of name, punctuation, control, and other chars extend while the
//!    next char has the same class.
//! 5. Delimiters and backslashes are always single-char lexemes.
//! 6. A quote opens a string that ends at the same quote. A backslash escapes
//!    the following non-space char. A backslash followed by nothing but
//!    whitespace continues the string onto the next line.

use std::ops::Range;

use crate::classify::{SymbolClass, SymbolClassifier};

/// Lexical class of a whole lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexClass {
    Space,
    Name,
    Punct,
    Control,
    Other,
    Delimiter,
    Backslash,
    String,
    /// A toggled comment marker matched at this offset.
    Toggle,
}

/// A span of chars `[start, end)` with its class. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub span: Range<usize>,
    pub class: LexClass,
}

impl Lexeme {
    const fn new(start: usize, end: usize, class: LexClass) -> Self {
        Self {
            span: start..end,
            class,
        }
    }
}

/// True when `marker` occurs in `chars` starting at `at`.
#[inline]
#[must_use]
pub fn starts_with(chars: &[char], at: usize, marker: &[char]) -> bool {
    !marker.is_empty() && chars.get(at..at + marker.len()) == Some(marker)
}

// ---------------------------------------------------------------------------
// LineScanner
// ---------------------------------------------------------------------------

/// Lexeme iterator over one line of chars.
pub struct LineScanner<'a> {
    chars: &'a [char],
    classes: &'a SymbolClassifier,
    toggles: &'a [Vec<char>],
}

impl<'a> LineScanner<'a> {
    #[must_use]
    pub const fn new(
        chars: &'a [char],
        classes: &'a SymbolClassifier,
        toggles: &'a [Vec<char>],
    ) -> Self {
        Self {
            chars,
            classes,
            toggles,
        }
    }

    /// The lexeme starting at `pos`, or `None` at end of line.
    ///
    /// `pending` is the terminator of a string still open from earlier; it
    /// is updated when a string closes or continues past the line end.
    /// With `strings` off (inside comments) quote chars lex as punctuation.
    pub fn next_lexeme(
        &self,
        pos: usize,
        pending: &mut Option<char>,
        strings: bool,
    ) -> Option<Lexeme> {
        let chars = self.chars;
        let &ch = chars.get(pos)?;

        if let Some(quote) = *pending {
            let end = self.string_end(pos, quote, pending);
            return Some(Lexeme::new(pos, end, LexClass::String));
        }

        let class = self.classes.classify(ch);
        if class == SymbolClass::Space {
            return Some(Lexeme::new(pos, self.run_end(pos, class), LexClass::Space));
        }

        if let Some(toggle) = self.toggles.iter().find(|t| starts_with(chars, pos, t)) {
            return Some(Lexeme::new(pos, pos + toggle.len(), LexClass::Toggle));
        }

        let lexeme = match class {
            SymbolClass::Quote if strings => {
                let end = self.string_end(pos + 1, ch, pending);
                Lexeme::new(pos, end, LexClass::String)
            }
            SymbolClass::Quote => Lexeme::new(pos, pos + 1, LexClass::Punct),
            SymbolClass::Delimiter => {
                Lexeme::new(pos, self.run_end(pos, class), LexClass::Delimiter)
            }
            SymbolClass::Backslash => {
                Lexeme::new(pos, self.run_end(pos, class), LexClass::Backslash)
            }
            SymbolClass::Name => Lexeme::new(pos, self.run_end(pos, class), LexClass::Name),
            SymbolClass::Punct => Lexeme::new(pos, self.run_end(pos, class), LexClass::Punct),
            SymbolClass::Control => {
                Lexeme::new(pos, self.run_end(pos, class), LexClass::Control)
            }
            SymbolClass::Other | SymbolClass::Space => {
                Lexeme::new(pos, self.run_end(pos, class), LexClass::Other)
            }
        };
        Some(lexeme)
    }

    /// End of the lexeme of `class` starting at `pos`: the whole same-class
    /// run for run classes, a single char otherwise.
    fn run_end(&self, pos: usize, class: SymbolClass) -> usize {
        let mut end = pos + 1;
        if class.is_run() {
            while end < self.chars.len() && self.classes.classify(self.chars[end]) == class {
                end += 1;
            }
        }
        end
    }

    /// End of a string body starting at `pos` (just past the opening quote,
    /// or at line start for a continued string). Sets `pending` to the quote
    /// when the string continues onto the next line, clears it otherwise.
    fn string_end(&self, pos: usize, quote: char, pending: &mut Option<char>) -> usize {
        let chars = self.chars;
        let mut i = pos;
        while i < chars.len() {
            let ch = chars[i];
            if ch == '\\' {
                if chars[i + 1..].iter().all(|c| c.is_whitespace()) {
                    *pending = Some(quote);
                    return chars.len();
                }
                // i + 1 exists: the remainder is not all whitespace.
                i += if chars[i + 1].is_whitespace() { 1 } else { 2 };
                continue;
            }
            if ch == quote {
                *pending = None;
                return i + 1;
            }
            i += 1;
        }
        // Unterminated without a continuation: the string ends with the line.
        *pending = None;
        chars.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
