//! Symbol classification — the per-char lexical class table.
//!
//! Every char maps to one coarse [`SymbolClass`]. The default mapping comes
//! from Unicode properties; a language profile then overrides individual
//! chars: its delimiter set becomes [`SymbolClass::Delimiter`], its extra
//! identifier chars become [`SymbolClass::Name`], and its quote chars become
//! [`SymbolClass::Quote`].
//!
//! ASCII lookups hit a flat 128-entry table. Non-ASCII chars consult a small
//! override map first and fall back to the Unicode default.

use std::collections::HashMap;

use crate::profile::LanguageProfile;

/// Coarse lexical class of a single char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    /// Whitespace within a line.
    Space,
    /// Letters, digits, underscore, plus profile name chars.
    Name,
    /// ASCII punctuation not claimed by the profile.
    Punct,
    /// Control chars other than whitespace.
    Control,
    /// Anything else (non-ASCII symbols, emoji, ...).
    Other,
    /// Profile delimiter. Always a single-char lexeme.
    Delimiter,
    /// `\`. Always a single-char lexeme.
    Backslash,
    /// Profile quote char; opens a string.
    Quote,
}

impl SymbolClass {
    /// True for classes whose lexemes extend over runs of same-class chars.
    #[inline]
    #[must_use]
    pub const fn is_run(self) -> bool {
        matches!(
            self,
            Self::Space | Self::Name | Self::Punct | Self::Control | Self::Other
        )
    }
}

/// Unicode-driven default for a char, before any profile override.
#[must_use]
pub fn default_class(ch: char) -> SymbolClass {
    if ch == '\\' {
        SymbolClass::Backslash
    } else if ch.is_whitespace() {
        SymbolClass::Space
    } else if ch.is_alphanumeric() || ch == '_' {
        SymbolClass::Name
    } else if ch.is_control() {
        SymbolClass::Control
    } else if ch.is_ascii_punctuation() {
        SymbolClass::Punct
    } else {
        SymbolClass::Other
    }
}

// ---------------------------------------------------------------------------
// SymbolClassifier
// ---------------------------------------------------------------------------

/// Char → class lookup with profile overrides.
#[derive(Debug, Clone)]
pub struct SymbolClassifier {
    ascii: [SymbolClass; 128],
    extra: HashMap<char, SymbolClass>,
}

impl SymbolClassifier {
    /// The default table, no overrides.
    #[must_use]
    pub fn new() -> Self {
        let mut ascii = [SymbolClass::Other; 128];
        for (code, slot) in (0u8..128).zip(ascii.iter_mut()) {
            *slot = default_class(char::from(code));
        }
        Self {
            ascii,
            extra: HashMap::new(),
        }
    }

    /// Build the table for a profile: defaults, then name chars, then
    /// delimiters, then quotes (later sets win on overlap).
    #[must_use]
    pub fn for_profile(profile: &LanguageProfile) -> Self {
        let mut table = Self::new();
        for ch in profile.name_chars.chars() {
            table.set(ch, SymbolClass::Name);
        }
        for ch in profile.delimiters.chars() {
            table.set(ch, SymbolClass::Delimiter);
        }
        for ch in profile.quotes.chars() {
            table.set(ch, SymbolClass::Quote);
        }
        table
    }

    /// Override the class of one char.
    pub fn set(&mut self, ch: char, class: SymbolClass) {
        if ch.is_ascii() {
            self.ascii[ch as usize] = class;
        } else {
            self.extra.insert(ch, class);
        }
    }

    /// Class of `ch` under this table.
    #[inline]
    #[must_use]
    pub fn classify(&self, ch: char) -> SymbolClass {
        if ch.is_ascii() {
            self.ascii[ch as usize]
        } else {
            self.extra.get(&ch).copied().unwrap_or_else(|| default_class(ch))
        }
    }
}

impl Default for SymbolClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
