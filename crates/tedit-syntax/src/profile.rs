//! Language profiles and the registry that owns them.
//!
//! A [`LanguageProfile`] describes how one language is lexed: which chars
//! delimit, which extend identifiers, which open strings, and which short
//! strings mark comments. Profiles are immutable once handed to a lexer.
//!
//! The [`ProfileRegistry`] is an explicit object rather than a process-wide
//! table: each editor instance (and each test) builds its own. It always
//! contains the built-in `plain` profile, which every failed lookup falls
//! back to.
//!
//! # Profile files
//!
//! Profiles load from TOML. Every field is optional:
//!
//! ```toml
//! [[language]]
//! name = "c"
//! masks = ["*.c", "*.h"]
//! delimiters = "(){}[];,"
//! line_comments = ["//"]
//! open_comments = ["/*"]
//! close_comments = ["*/"]
//! keywords = ["int", "return"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::builtin;
use crate::error::ProfileError;

/// Name of the fallback profile that always exists.
pub const PLAIN: &str = "plain";

// ---------------------------------------------------------------------------
// LanguageProfile
// ---------------------------------------------------------------------------

/// Lexing rules for one language.
///
/// Marker lists are tried in the order written. Overlapping or contradictory
/// markers are not rejected; the lexer applies its fixed priority order
/// (toggled, then open, then line) and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LanguageProfile {
    /// Registry key.
    pub name: String,
    /// File-name masks (`*.rs`, `Makefile`, `?akefile`).
    pub masks: Vec<String>,
    /// Chars lexed as single-char delimiter lexemes. Brackets among them
    /// take part in bracket matching.
    pub delimiters: String,
    /// Extra chars allowed inside identifiers.
    pub name_chars: String,
    /// Chars that open (and close) a string.
    pub quotes: String,
    /// Literal prefixes that suppress comment detection (`#!`, `$#`).
    pub special: Vec<String>,
    /// Markers that comment out the rest of the line.
    pub line_comments: Vec<String>,
    /// Markers that open a block comment.
    pub open_comments: Vec<String>,
    /// Markers that close a block comment.
    pub close_comments: Vec<String>,
    /// Markers that both open and close a comment region.
    pub toggled_comments: Vec<String>,
    /// Count nested block comments instead of resetting on any close.
    pub recursive_comment: bool,
    /// Keywords match regardless of case.
    pub case_insensitive: bool,
    /// Display width of a tab stop.
    pub tab_size: usize,
    /// Keyword list.
    pub keywords: Vec<String>,
    /// Lex at all. `false` paints every line in one color.
    pub scan: bool,
    /// Lex every line when a file is loaded, so bracket matching works
    /// before lines are drawn.
    pub eager_scan: bool,
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            masks: Vec::new(),
            delimiters: String::new(),
            name_chars: String::new(),
            quotes: "\"'".to_owned(),
            special: Vec::new(),
            line_comments: Vec::new(),
            open_comments: Vec::new(),
            close_comments: Vec::new(),
            toggled_comments: Vec::new(),
            recursive_comment: false,
            case_insensitive: false,
            tab_size: 4,
            keywords: Vec::new(),
            scan: true,
            eager_scan: false,
        }
    }
}

impl LanguageProfile {
    /// The keyword set, case-folded when the profile is case-insensitive.
    #[must_use]
    pub fn keyword_set(&self) -> HashSet<String> {
        self.keywords
            .iter()
            .map(|k| {
                if self.case_insensitive {
                    k.to_lowercase()
                } else {
                    k.clone()
                }
            })
            .collect()
    }

    /// True when the profile defines any comment marker.
    #[must_use]
    pub fn has_comments(&self) -> bool {
        !(self.line_comments.is_empty()
            && self.open_comments.is_empty()
            && self.close_comments.is_empty()
            && self.toggled_comments.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Masks
// ---------------------------------------------------------------------------

/// Compile a file-name glob (`*` any run, `?` any char) into an anchored regex.
fn compile_mask(mask: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(mask.len() + 8);
    pattern.push('^');
    for ch in mask.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

// ---------------------------------------------------------------------------
// ProfileRegistry
// ---------------------------------------------------------------------------

struct Entry {
    profile: Arc<LanguageProfile>,
    masks: Vec<Regex>,
}

/// Name → profile map with file-mask lookup.
pub struct ProfileRegistry {
    entries: Vec<Entry>,
}

#[derive(Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    language: Vec<LanguageProfile>,
}

impl ProfileRegistry {
    /// A registry holding only the `plain` profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![Entry {
                profile: Arc::new(builtin::plain()),
                masks: Vec::new(),
            }],
        }
    }

    /// A registry holding every built-in profile.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for profile in builtin::builtin_profiles() {
            // Built-in masks are literal globs; compilation cannot fail.
            if let Err(e) = registry.register(profile) {
                log::warn!("skipping built-in profile: {e}");
            }
        }
        registry
    }

    /// Add a profile, replacing any profile with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or a mask does not compile.
    pub fn register(&mut self, profile: LanguageProfile) -> Result<(), ProfileError> {
        if profile.name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let masks = profile
            .masks
            .iter()
            .map(|mask| {
                compile_mask(mask).map_err(|source| ProfileError::Mask {
                    profile: profile.name.clone(),
                    mask: mask.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let entry = Entry {
            profile: Arc::new(profile),
            masks,
        };
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|e| e.profile.name == entry.profile.name)
        {
            log::debug!("replacing language profile '{}'", entry.profile.name);
            *slot = entry;
        } else {
            log::debug!("registered language profile '{}'", entry.profile.name);
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Parse a TOML document of `[[language]]` tables and register each.
    /// Returns how many profiles were registered.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or a bad mask. Profiles preceding
    /// the bad one stay registered.
    pub fn load_toml(&mut self, text: &str) -> Result<usize, ProfileError> {
        let doc: ProfileDocument = toml::from_str(text)?;
        let count = doc.language.len();
        for profile in doc.language {
            self.register(profile)?;
        }
        Ok(count)
    }

    /// Read and register a TOML profile file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_toml(&text)
    }

    /// Look up a profile by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<LanguageProfile>> {
        self.entries
            .iter()
            .find(|e| e.profile.name == name)
            .map(|e| Arc::clone(&e.profile))
    }

    /// The `plain` profile.
    #[must_use]
    pub fn plain(&self) -> Arc<LanguageProfile> {
        self.get(PLAIN)
            .unwrap_or_else(|| Arc::new(builtin::plain()))
    }

    /// Look up by name, falling back to `plain`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Arc<LanguageProfile> {
        self.get(name).unwrap_or_else(|| {
            log::warn!("unknown language profile '{name}', using '{PLAIN}'");
            self.plain()
        })
    }

    /// First profile (in registration order) whose mask matches the file
    /// name of `path`, or `plain`.
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Arc<LanguageProfile> {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return self.plain();
        };
        self.entries
            .iter()
            .find(|e| e.masks.iter().any(|m| m.is_match(file_name)))
            .map_or_else(|| self.plain(), |e| Arc::clone(&e.profile))
    }

    /// Registered profile names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.profile.name.as_str())
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_registry_has_plain() {
        let reg = ProfileRegistry::new();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec![PLAIN]);
        assert!(!reg.plain().scan);
    }

    #[test]
    fn unknown_name_falls_back_to_plain() {
        let reg = ProfileRegistry::with_builtins();
        assert_eq!(reg.resolve("cobol").name, PLAIN);
        assert!(reg.get("cobol").is_none());
        assert_eq!(reg.resolve("c").name, "c");
    }

    #[test]
    fn find_by_mask() {
        let reg = ProfileRegistry::with_builtins();
        assert_eq!(reg.find_for_path(Path::new("/src/main.rs")).name, "rust");
        assert_eq!(reg.find_for_path(Path::new("a.h")).name, "c");
        assert_eq!(reg.find_for_path(Path::new("run.sh")).name, "shell");
        assert_eq!(reg.find_for_path(Path::new("notes.txt")).name, PLAIN);
        assert_eq!(reg.find_for_path(Path::new("/")).name, PLAIN);
    }

    #[test]
    fn mask_metachars_are_literal() {
        let re = compile_mask("*.c++").unwrap();
        assert!(re.is_match("x.c++"));
        assert!(!re.is_match("x.cxx"));
        let re = compile_mask("?akefile").unwrap();
        assert!(re.is_match("Makefile"));
        assert!(!re.is_match("akefile"));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut reg = ProfileRegistry::new();
        reg.register(LanguageProfile {
            name: "x".into(),
            tab_size: 2,
            ..LanguageProfile::default()
        })
        .unwrap();
        reg.register(LanguageProfile {
            name: "x".into(),
            tab_size: 8,
            ..LanguageProfile::default()
        })
        .unwrap();
        assert_eq!(reg.names().count(), 2);
        assert_eq!(reg.get("x").unwrap().tab_size, 8);
    }

    #[test]
    fn empty_name_rejected() {
        let mut reg = ProfileRegistry::new();
        let err = reg.register(LanguageProfile::default()).unwrap_err();
        assert!(matches!(err, ProfileError::EmptyName));
    }

    #[test]
    fn load_toml_profiles() {
        let mut reg = ProfileRegistry::new();
        let n = reg
            .load_toml(
                r#"
                [[language]]
                name = "lua"
                masks = ["*.lua"]
                line_comments = ["--"]
                open_comments = ["--[["]
                close_comments = ["]]"]
                keywords = ["local", "function", "end"]

                [[language]]
                name = "ini"
                masks = ["*.ini"]
                line_comments = [";"]
                scan = true
                "#,
            )
            .unwrap();
        assert_eq!(n, 2);
        let lua = reg.find_for_path(Path::new("init.lua"));
        assert_eq!(lua.name, "lua");
        assert_eq!(lua.line_comments, vec!["--".to_owned()]);
        assert_eq!(lua.quotes, "\"'");
        assert_eq!(lua.tab_size, 4);
        assert!(lua.scan);
    }

    #[test]
    fn load_toml_rejects_bad_types() {
        let mut reg = ProfileRegistry::new();
        let err = reg
            .load_toml("[[language]]\nname = \"x\"\ntab_size = \"wide\"\n")
            .unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }

    #[test]
    fn load_missing_file() {
        let mut reg = ProfileRegistry::new();
        let err = reg.load_file(Path::new("/no/such/profiles.toml")).unwrap_err();
        assert!(matches!(err, ProfileError::Read { .. }));
        assert!(err.to_string().contains("profiles.toml"));
    }

    #[test]
    fn keyword_set_folds_case() {
        let p = LanguageProfile {
            keywords: vec!["BEGIN".into(), "End".into()],
            case_insensitive: true,
            ..LanguageProfile::default()
        };
        let set = p.keyword_set();
        assert!(set.contains("begin"));
        assert!(set.contains("end"));

        let p = LanguageProfile {
            keywords: vec!["BEGIN".into()],
            ..LanguageProfile::default()
        };
        assert!(p.keyword_set().contains("BEGIN"));
    }
}
