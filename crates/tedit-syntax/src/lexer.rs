//! Incremental lexer — comment tracking, coloring, and edit notifications.
//!
//! A [`Lexer`] belongs to one open buffer. It lexes single lines on demand
//! and keeps an [`AnnotationStore`] so that the comment and string context of
//! any line can be rebuilt from nearby annotations instead of re-lexing the
//! file from the top.
//!
//! # Flow
//!
//! 1. On load, [`Lexer::index`] lexes every line when the profile asks for
//!    eager scanning (bracket matching then works before lines are drawn).
//! 2. On every repaint, [`Lexer::get_color`] is called once per visible line.
//!    It costs O(line length) plus the distance back to the last balanced
//!    annotation.
//! 3. On every edit, the editor reports [`Lexer::add_line`],
//!    [`Lexer::change_line`], or [`Lexer::delete_line`] and gets back how much
//!    of the screen to repaint.
//!
//! # Comment markers
//!
//! While lexing, each lexeme is tested for markers:
//!
//! - Outside comments: special prefixes first (they suppress marker checks),
//!   then toggled, open, and line markers at the lexeme start. Punctuation
//!   runs are also searched at every offset, since `a=/*b` lexes `=/*` as one
//!   run.
//! - Inside a block comment: close markers anywhere in the lexeme, and open
//!   markers too when comments nest.
//! - Inside a toggled region: only the toggled marker.
//!
//! Markers are matched against the line text, so a marker may extend past the
//! lexeme it starts in (`(*` where `(` is a delimiter).

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use tedit_text::TextSource;

use crate::annotation::{
    bracket_partner, AnnotationStore, CommentState, LineAnnotation, LineFlags, CLOSE, OPEN,
    TOGGLE,
};
use crate::classify::SymbolClassifier;
use crate::profile::{LanguageProfile, ProfileRegistry};
use crate::scanner::{starts_with, LexClass, Lexeme, LineScanner};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Color class of one char, resolved to a real color by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Text,
    Keyword,
    Number,
    String,
    Comment,
    Operator,
    Delimiter,
}

/// How much of the screen an edit invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    /// Nothing beyond the edited chars: colors and structure are unchanged.
    None,
    /// The edited line.
    Line,
    /// Every line from the edit down: a comment or continuation changed.
    View,
}

/// Marker strings as char vectors, ready for slice comparison.
#[derive(Debug, Clone, Default)]
struct Markers {
    special: Vec<Vec<char>>,
    line: Vec<Vec<char>>,
    open: Vec<Vec<char>>,
    close: Vec<Vec<char>>,
    toggled: Vec<Vec<char>>,
}

impl Markers {
    fn from_profile(profile: &LanguageProfile) -> Self {
        let convert = |list: &[String]| -> Vec<Vec<char>> {
            list.iter()
                .filter(|m| !m.is_empty())
                .map(|m| m.chars().collect())
                .collect()
        };
        Self {
            special: convert(&profile.special),
            line: convert(&profile.line_comments),
            open: convert(&profile.open_comments),
            close: convert(&profile.close_comments),
            toggled: convert(&profile.toggled_comments),
        }
    }
}

/// Which kind of marker matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Open,
    Close,
    /// Toggled marker, by index in the profile list.
    Toggle(usize),
    Line,
}

fn find_marker(chars: &[char], at: usize, list: &[Vec<char>]) -> Option<usize> {
    list.iter()
        .find(|m| starts_with(chars, at, m))
        .map(Vec::len)
}

fn find_toggle(chars: &[char], at: usize, list: &[Vec<char>]) -> Option<(usize, usize)> {
    list.iter()
        .position(|m| starts_with(chars, at, m))
        .map(|index| (index, list[index].len()))
}

/// Fingerprint of a line's colors, one entry per char.
fn color_digest(colors: &[Color]) -> u64 {
    let mut hasher = DefaultHasher::new();
    colors.hash(&mut hasher);
    hasher.finish()
}

/// What an edited line held before the edit.
struct Before {
    annotation: LineAnnotation,
    /// `None` when the line was never lexed.
    digest: Option<u64>,
}

fn paint(colors: &mut Option<&mut Vec<Color>>, from: usize, to: usize, color: Color) {
    if let Some(colors) = colors {
        let to = to.min(colors.len());
        if from < to {
            colors[from..to].fill(color);
        }
    }
}

/// Result of lexing one line.
pub(crate) struct LineLex {
    pub annotation: LineAnnotation,
    /// Bracket chars outside comments and strings, with their columns.
    pub brackets: Vec<(usize, char)>,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// Per-buffer incremental lexer.
pub struct Lexer {
    profile: Arc<LanguageProfile>,
    classes: SymbolClassifier,
    keywords: HashSet<String>,
    markers: Markers,
    /// The profile defines comment markers at all.
    comments: bool,
    pub(crate) store: AnnotationStore,
}

impl Lexer {
    /// A lexer for `profile` with an empty annotation store.
    #[must_use]
    pub fn new(profile: Arc<LanguageProfile>) -> Self {
        let mut lexer = Self {
            classes: SymbolClassifier::new(),
            keywords: HashSet::new(),
            markers: Markers::default(),
            comments: false,
            store: AnnotationStore::new(),
            profile: Arc::clone(&profile),
        };
        lexer.set_profile(profile);
        lexer
    }

    /// A lexer for the named profile, or `plain` if the name is unknown.
    #[must_use]
    pub fn for_language(registry: &ProfileRegistry, name: &str) -> Self {
        Self::new(registry.resolve(name))
    }

    /// Switch to the named profile (falling back to `plain`). Clears every
    /// annotation: they were computed under the old rules.
    pub fn set_language(&mut self, registry: &ProfileRegistry, name: &str) {
        self.set_profile(registry.resolve(name));
    }

    /// Switch to `profile` directly. Clears every annotation.
    pub fn set_profile(&mut self, profile: Arc<LanguageProfile>) {
        log::debug!("lexer profile -> '{}'", profile.name);
        self.classes = SymbolClassifier::for_profile(&profile);
        self.keywords = profile.keyword_set();
        self.markers = Markers::from_profile(&profile);
        self.comments = profile.has_comments();
        self.store.clear();
        self.profile = profile;
    }

    /// The active profile.
    #[must_use]
    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// The annotation cache (read-only).
    #[must_use]
    pub const fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    /// Comment and string context at the start of `line`.
    #[must_use]
    pub fn comment_state(&self, line: usize) -> CommentState {
        self.store.state_before(line, self.profile.recursive_comment)
    }

    // -- Scanning -----------------------------------------------------------

    /// Lex `text` as line `line` and cache its annotation, without returning
    /// colors.
    pub fn scan(&mut self, line: usize, text: &str) {
        if !self.profile.scan {
            return;
        }
        let chars: Vec<char> = text.chars().collect();
        let mut colors = vec![Color::Text; chars.len()];
        let lex = self.lex_line(&chars, self.comment_state(line), Some(&mut colors));
        self.store.set(line, lex.annotation);
        self.store.set_digest(line, color_digest(&colors));
    }

    /// Lex every line of `source` when the profile requests eager scanning.
    pub fn index<S: TextSource + ?Sized>(&mut self, source: &S) {
        if !(self.profile.scan && self.profile.eager_scan) {
            return;
        }
        let count = source.line_count();
        for line in 0..count {
            self.scan(line, &source.line(line));
        }
        log::debug!(
            "indexed {count} lines for '{}', {} annotations",
            self.profile.name,
            self.store.len()
        );
    }

    /// One color per char for the first `len` chars of `text` (padded with
    /// [`Color::Text`] past the end of the text). Caches the line's
    /// annotation as a side effect.
    pub fn get_color(&mut self, line: usize, text: &str, len: usize) -> Vec<Color> {
        if !self.profile.scan {
            return vec![Color::Text; len];
        }
        let chars: Vec<char> = text.chars().collect();
        let mut colors = vec![Color::Text; chars.len()];
        let lex = self.lex_line(&chars, self.comment_state(line), Some(&mut colors));
        self.store.set(line, lex.annotation);
        self.store.set_digest(line, color_digest(&colors));
        colors.resize(len, Color::Text);
        colors
    }

    // -- Edit notifications -------------------------------------------------

    /// A line was inserted at `line` with `text`.
    pub fn add_line(&mut self, line: usize, text: &str) -> Redraw {
        self.store.insert_lines(line, 1);
        self.relex(line, text, None)
    }

    /// Line `line` now holds `text`.
    pub fn change_line(&mut self, line: usize, text: &str) -> Redraw {
        let before = Before {
            annotation: self.store.get(line).cloned().unwrap_or_default(),
            digest: self.store.digest(line),
        };
        self.relex(line, text, Some(before))
    }

    /// Line `line` was deleted.
    pub fn delete_line(&mut self, line: usize) -> Redraw {
        let old = self.store.get(line).cloned().unwrap_or_default();
        self.store.remove_lines(line, 1);
        let redraw = if old.differs_structurally(&LineAnnotation::default()) {
            self.store.invalidate_from(line);
            Redraw::View
        } else if old.markers.is_empty() {
            Redraw::None
        } else {
            Redraw::Line
        };
        log::trace!("delete_line({line}) -> {redraw:?}");
        redraw
    }

    /// `count` lines were inserted at `at`; annotations are shifted, the new
    /// lines are left unscanned.
    pub fn insert_lines(&mut self, at: usize, count: usize) {
        self.store.insert_lines(at, count);
    }

    /// `count` lines starting at `at` were deleted.
    pub fn remove_lines(&mut self, at: usize, count: usize) {
        self.store.remove_lines(at, count);
    }

    /// Re-lex an edited line. `before` is `None` for a freshly inserted line,
    /// which is compared against an empty annotation only.
    fn relex(&mut self, line: usize, text: &str, before: Option<Before>) -> Redraw {
        if !self.profile.scan {
            return Redraw::None;
        }
        let chars: Vec<char> = text.chars().collect();
        let mut colors = vec![Color::Text; chars.len()];
        let new = self
            .lex_line(&chars, self.comment_state(line), Some(&mut colors))
            .annotation;
        let digest = color_digest(&colors);
        let recolored = before.as_ref().is_some_and(|b| b.digest != Some(digest));
        let old = before.map(|b| b.annotation).unwrap_or_default();

        let redraw = if old.differs_structurally(&new) {
            self.store.invalidate_from(line + 1);
            Redraw::View
        } else if recolored || old.markers != new.markers {
            Redraw::Line
        } else {
            Redraw::None
        };
        self.store.set(line, new);
        self.store.set_digest(line, digest);
        log::trace!("relex({line}) -> {redraw:?}");
        redraw
    }

    // -- Core ---------------------------------------------------------------

    /// Lex one line starting from `state`. Paints `colors` when given.
    pub(crate) fn lex_line(
        &self,
        chars: &[char],
        mut state: CommentState,
        mut colors: Option<&mut Vec<Color>>,
    ) -> LineLex {
        let scanner = LineScanner::new(chars, &self.classes, &self.markers.toggled);
        let mut annotation = LineAnnotation::default();
        let mut brackets = Vec::new();
        let mut pending = state.quote.take();
        let mut last_class = None;
        let mut pos = 0;

        while let Some(lexeme) = scanner.next_lexeme(pos, &mut pending, !state.in_comment()) {
            if lexeme.class != LexClass::Space {
                last_class = Some(lexeme.class);
            }
            pos = match lexeme.class {
                LexClass::Space => {
                    let color = if state.in_comment() {
                        Color::Comment
                    } else {
                        Color::Text
                    };
                    paint(&mut colors, lexeme.span.start, lexeme.span.end, color);
                    lexeme.span.end
                }
                LexClass::String => {
                    paint(&mut colors, lexeme.span.start, lexeme.span.end, Color::String);
                    lexeme.span.end
                }
                _ => self.track(
                    chars,
                    &lexeme,
                    &mut state,
                    &mut annotation,
                    &mut brackets,
                    &mut colors,
                ),
            };
        }

        if last_class == Some(LexClass::Backslash) {
            annotation.flags.insert(LineFlags::CONTINUATION);
            if state.line_comment {
                annotation.flags.insert(LineFlags::LINE_COMMENT);
            }
        }
        if let Some(quote) = pending {
            annotation.flags.insert(LineFlags::STRING_CONTINUED);
            annotation.quote = Some(quote);
        }
        if state.toggled && annotation.comment_markers().any(|m| m == TOGGLE) {
            annotation.toggle = Some(state.toggle);
        }
        if state.is_balanced() {
            annotation.flags.insert(LineFlags::BALANCED);
        }

        LineLex {
            annotation,
            brackets,
        }
    }

    /// Apply comment markers inside one non-space, non-string lexeme.
    /// Returns where lexing resumes (past any marker that overran the lexeme).
    fn track(
        &self,
        chars: &[char],
        lexeme: &Lexeme,
        state: &mut CommentState,
        annotation: &mut LineAnnotation,
        brackets: &mut Vec<(usize, char)>,
        colors: &mut Option<&mut Vec<Color>>,
    ) -> usize {
        let start = lexeme.span.start;
        let mut end = lexeme.span.end;
        let token = self.token_color(chars, lexeme);

        if !state.in_comment() {
            if let Some(len) = find_marker(chars, start, &self.markers.special) {
                end = end.max(start + len);
                paint(colors, start, end, token);
                return end;
            }
        }

        let anywhere = matches!(lexeme.class, LexClass::Punct | LexClass::Toggle);
        let recursive = self.profile.recursive_comment;
        let mut painted = start;
        let mut at = start;

        while self.comments && at < end && !state.line_comment {
            // A special prefix inside a punctuation run is plain content too.
            if at > start && !state.in_comment() {
                if let Some(len) = find_marker(chars, at, &self.markers.special) {
                    at += len;
                    end = end.max(at);
                    continue;
                }
            }
            let may_open = at == start || anywhere;
            let hit = if state.toggled {
                let opener = self
                    .markers
                    .toggled
                    .get(state.toggle..=state.toggle)
                    .unwrap_or_default();
                find_marker(chars, at, opener).map(|n| (Hit::Toggle(state.toggle), n))
            } else if state.depth > 0 {
                find_marker(chars, at, &self.markers.close)
                    .map(|n| (Hit::Close, n))
                    .or_else(|| {
                        (recursive && may_open)
                            .then(|| find_marker(chars, at, &self.markers.open))
                            .flatten()
                            .map(|n| (Hit::Open, n))
                    })
            } else if may_open {
                find_toggle(chars, at, &self.markers.toggled)
                    .map(|(index, n)| (Hit::Toggle(index), n))
                    .or_else(|| find_marker(chars, at, &self.markers.open).map(|n| (Hit::Open, n)))
                    .or_else(|| find_marker(chars, at, &self.markers.line).map(|n| (Hit::Line, n)))
            } else {
                None
            };

            let Some((hit, len)) = hit else {
                at += 1;
                continue;
            };

            let before = if state.in_comment() { Color::Comment } else { token };
            paint(colors, painted, at, before);
            paint(colors, at, at + len, Color::Comment);
            match hit {
                Hit::Line => state.line_comment = true,
                Hit::Open => {
                    state.apply(OPEN, recursive);
                    annotation.push_marker(OPEN);
                }
                Hit::Close => {
                    state.apply(CLOSE, recursive);
                    annotation.push_marker(CLOSE);
                }
                Hit::Toggle(index) => {
                    state.apply(TOGGLE, recursive);
                    state.toggle = index;
                    annotation.push_marker(TOGGLE);
                }
            }
            at += len;
            painted = at;
            end = end.max(at);
        }

        let rest = if state.in_comment() { Color::Comment } else { token };
        paint(colors, painted, end, rest);

        // A delimiter untouched by markers and outside comments may be a bracket.
        if lexeme.class == LexClass::Delimiter && painted == start && !state.in_comment() {
            let ch = chars[start];
            if bracket_partner(ch).is_some() {
                annotation.push_bracket(ch);
                brackets.push((start, ch));
            }
        }
        end
    }

    /// Color of a lexeme outside comments.
    fn token_color(&self, chars: &[char], lexeme: &Lexeme) -> Color {
        match lexeme.class {
            LexClass::Name => {
                let text = &chars[lexeme.span.clone()];
                if text.first().is_some_and(char::is_ascii_digit) {
                    Color::Number
                } else if self.is_keyword(text) {
                    Color::Keyword
                } else {
                    Color::Text
                }
            }
            LexClass::Punct | LexClass::Backslash | LexClass::Toggle => Color::Operator,
            LexClass::Delimiter => Color::Delimiter,
            LexClass::String => Color::String,
            LexClass::Space | LexClass::Control | LexClass::Other => Color::Text,
        }
    }

    fn is_keyword(&self, text: &[char]) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let word: String = if self.profile.case_insensitive {
            text.iter().flat_map(|c| c.to_lowercase()).collect()
        } else {
            text.iter().collect()
        };
        self.keywords.contains(&word)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use pretty_assertions::assert_eq;

    fn lexer(profile: LanguageProfile) -> Lexer {
        Lexer::new(Arc::new(profile))
    }

    /// Run-length summary: (text, color) per maximal same-color run.
    fn runs(text: &str, colors: &[Color]) -> Vec<(String, Color)> {
        let mut out: Vec<(String, Color)> = Vec::new();
        for (ch, &color) in text.chars().zip(colors) {
            match out.last_mut() {
                Some((s, c)) if *c == color => s.push(ch),
                _ => out.push((ch.to_string(), color)),
            }
        }
        out
    }

    fn r(text: &str, color: Color) -> (String, Color) {
        (text.to_owned(), color)
    }

    fn color_lines(lx: &mut Lexer, lines: &[&str]) -> Vec<Vec<Color>> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| lx.get_color(i, l, l.chars().count()))
            .collect()
    }

    #[test]
    fn line_comment_and_tokens() {
        let mut lx = lexer(builtin::c());
        let text = "int x; // note";
        let colors = lx.get_color(0, text, text.len());
        assert_eq!(
            runs(text, &colors),
            vec![
                r("int", Color::Keyword),
                r(" x", Color::Text),
                r(";", Color::Delimiter),
                r(" ", Color::Text),
                r("// note", Color::Comment),
            ]
        );
    }

    #[test]
    fn identifiers_are_separate_lexemes() {
        let mut lx = lexer(builtin::c());
        let text = "int x";
        let colors = lx.get_color(0, text, 5);
        assert_eq!(colors[0], Color::Keyword);
        assert_eq!(colors[4], Color::Text);
    }

    #[test]
    fn open_block_colors_following_lines() {
        let mut lx = lexer(builtin::c());
        let lines = ["a = 1; /* start", "int \"s\" { x }", "end */ b"];
        let colors = color_lines(&mut lx, &lines);
        assert!(colors[1].iter().all(|&c| c == Color::Comment));
        assert_eq!(
            runs(lines[2], &colors[2]),
            vec![r("end */", Color::Comment), r(" b", Color::Text)]
        );
    }

    #[test]
    fn unterminated_block_comment_persists() {
        let mut lx = lexer(builtin::c());
        lx.get_color(0, "/* never closed", 15);
        for line in 1..20 {
            let text = "if (x) { return \"y\"; } // z";
            let colors = lx.get_color(line, text, text.chars().count());
            assert!(colors.iter().all(|&c| c == Color::Comment), "line {line}");
        }
    }

    #[test]
    fn marker_inside_punct_run() {
        let mut lx = lexer(builtin::c());
        let text = "a=/*b*/c";
        let colors = lx.get_color(0, text, 8);
        assert_eq!(
            runs(text, &colors),
            vec![
                r("a", Color::Text),
                r("=", Color::Operator),
                r("/*b*/", Color::Comment),
                r("c", Color::Text),
            ]
        );
        assert!(lx.comment_state(1).is_balanced());
    }

    #[test]
    fn markers_inside_strings_are_ignored() {
        let mut lx = lexer(builtin::c());
        let text = "s = \"/* not */\";";
        let colors = lx.get_color(0, text, text.len());
        assert!(!colors.contains(&Color::Comment));
        assert!(lx.annotations().is_empty());
    }

    #[test]
    fn quotes_inside_comments_do_not_open_strings() {
        let mut lx = lexer(builtin::c());
        let text = "/* it's */ x";
        let colors = lx.get_color(0, text, text.len());
        assert_eq!(
            runs(text, &colors),
            vec![r("/* it's */", Color::Comment), r(" x", Color::Text)]
        );
    }

    #[test]
    fn non_recursive_close_resets_depth() {
        let mut lx = lexer(builtin::c());
        lx.get_color(0, "/* a /* b */", 12);
        assert!(lx.comment_state(1).is_balanced());
    }

    #[test]
    fn recursive_comments_nest() {
        let mut lx = lexer(builtin::rust());
        lx.get_color(0, "/* a /* b */", 12);
        assert_eq!(lx.comment_state(1).depth, 1);
        let colors = lx.get_color(1, "x */ y", 6);
        assert_eq!(colors[5], Color::Text);
        assert!(lx.comment_state(2).is_balanced());
    }

    #[test]
    fn toggled_comment_region() {
        let mut lx = lexer(builtin::python());
        let lines = ["x = 1", "\"\"\"doc", "still doc", "end\"\"\" y"];
        let colors = color_lines(&mut lx, &lines);
        assert!(colors[1].iter().all(|&c| c == Color::Comment));
        assert!(colors[2].iter().all(|&c| c == Color::Comment));
        assert_eq!(
            runs(lines[3], &colors[3]),
            vec![r("end\"\"\"", Color::Comment), r(" y", Color::Text)]
        );
        assert!(lx.comment_state(2).toggled);
        assert!(lx.comment_state(4).is_balanced());
    }

    #[test]
    fn special_prefix_suppresses_comment() {
        let mut lx = lexer(builtin::shell());
        let colors = lx.get_color(0, "#!/bin/sh", 9);
        assert!(!colors.contains(&Color::Comment));

        let text = "echo $# # count";
        let colors = lx.get_color(1, text, text.len());
        assert_eq!(colors[5], Color::Operator);
        assert_eq!(colors[6], Color::Operator);
        assert_eq!(colors[8], Color::Comment);
    }

    #[test]
    fn special_prefix_inside_punct_run() {
        let mut lx = lexer(builtin::shell());
        let text = "x=$# y";
        let colors = lx.get_color(0, text, text.len());
        assert_eq!(
            runs(text, &colors),
            vec![r("x", Color::Text), r("=$#", Color::Operator), r(" y", Color::Text)]
        );

        let text = "n=$#  # args";
        let colors = lx.get_color(1, text, text.len());
        assert_eq!(colors[3], Color::Operator);
        assert_eq!(colors[6], Color::Comment);
    }

    #[test]
    fn toggled_region_closes_only_on_its_own_marker() {
        let mut lx = lexer(builtin::python());
        let lines = ["'''doc", "\"\"\" still doc", "end''' y"];
        let colors = color_lines(&mut lx, &lines);
        assert!(colors[1].iter().all(|&c| c == Color::Comment));
        assert!(lx.comment_state(2).toggled);
        assert_eq!(lx.comment_state(2).toggle, 1);
        assert_eq!(
            runs(lines[2], &colors[2]),
            vec![r("end'''", Color::Comment), r(" y", Color::Text)]
        );
        assert!(lx.comment_state(3).is_balanced());
    }

    #[test]
    fn profile_without_comments_skips_markers() {
        let mut lx = lexer(LanguageProfile {
            name: "conf".to_owned(),
            delimiters: "()".to_owned(),
            ..LanguageProfile::default()
        });
        let text = "/* x */ (y";
        let colors = lx.get_color(0, text, text.len());
        assert!(!colors.contains(&Color::Comment));
        assert_eq!(lx.annotations().get(0).map(|a| a.markers.as_str()), Some("("));
        assert!(lx.comment_state(1).is_balanced());
    }

    #[test]
    fn marker_overrunning_delimiter() {
        let mut lx = lexer(builtin::pascal());
        let text = "(* note *) Begin";
        let colors = lx.get_color(0, text, text.len());
        assert_eq!(
            runs(text, &colors),
            vec![r("(* note *)", Color::Comment), r(" ", Color::Text), r("Begin", Color::Keyword)]
        );
        assert!(lx.comment_state(1).is_balanced());
    }

    #[test]
    fn numbers_and_operators() {
        let mut lx = lexer(builtin::c());
        let text = "x+=42";
        let colors = lx.get_color(0, text, 5);
        assert_eq!(
            runs(text, &colors),
            vec![r("x", Color::Text), r("+=", Color::Operator), r("42", Color::Number)]
        );
    }

    #[test]
    fn string_continuation_across_lines() {
        let mut lx = lexer(builtin::c());
        let lines = ["s = \"abc\\", "def\"; int"];
        let colors = color_lines(&mut lx, &lines);
        assert_eq!(colors[0][4], Color::String);
        assert_eq!(
            runs(lines[1], &colors[1]),
            vec![
                r("def\"", Color::String),
                r(";", Color::Delimiter),
                r(" ", Color::Text),
                r("int", Color::Keyword),
            ]
        );
    }

    #[test]
    fn line_comment_continuation() {
        let mut lx = lexer(builtin::c());
        let lines = ["// comment \\", "still comment", "code"];
        let colors = color_lines(&mut lx, &lines);
        assert!(colors[1].iter().all(|&c| c == Color::Comment));
        assert!(colors[2].iter().all(|&c| c == Color::Text));
    }

    #[test]
    fn scan_disabled_is_uniform() {
        let mut lx = lexer(builtin::plain());
        let colors = lx.get_color(0, "/* int */", 12);
        assert_eq!(colors, vec![Color::Text; 12]);
        assert_eq!(lx.change_line(0, "/*"), Redraw::None);
        assert!(lx.annotations().is_empty());
    }

    #[test]
    fn length_pads_and_truncates() {
        let mut lx = lexer(builtin::c());
        let colors = lx.get_color(0, "// x", 6);
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[3], Color::Comment);
        assert_eq!(colors[5], Color::Text);
        assert_eq!(lx.get_color(0, "// x", 2).len(), 2);
    }

    #[test]
    fn case_insensitive_keywords() {
        let mut lx = lexer(builtin::pascal());
        let colors = lx.get_color(0, "BEGIN end", 9);
        assert_eq!(colors[0], Color::Keyword);
        assert_eq!(colors[6], Color::Keyword);
        let mut lx = lexer(builtin::c());
        assert_eq!(lx.get_color(0, "INT", 3)[0], Color::Text);
    }

    // -- Edits --------------------------------------------------------------

    #[test]
    fn change_line_identical_is_none() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "f(x) { /* a");
        let before = lx.annotations().get(0).cloned();
        assert_eq!(lx.change_line(0, "f(x) { /* a"), Redraw::None);
        assert_eq!(lx.annotations().get(0).cloned(), before);
    }

    #[test]
    fn change_line_bracket_only_is_line() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "if (x) {");
        assert_eq!(lx.change_line(0, "if (x) {{"), Redraw::Line);
    }

    #[test]
    fn change_line_same_colors_is_none() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "int x = 1;");
        assert_eq!(lx.change_line(0, "int y = 2;"), Redraw::None);
    }

    #[test]
    fn change_line_recolored_tokens_is_line() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "in x;");
        assert_eq!(lx.change_line(0, "int x;"), Redraw::Line);
        assert_eq!(lx.change_line(0, "int x;"), Redraw::None);
        assert_eq!(lx.change_line(0, "int x = 22;"), Redraw::Line);

        lx.get_color(1, "a", 1);
        assert_eq!(lx.change_line(1, "12"), Redraw::Line);
        assert_eq!(lx.change_line(5, "never lexed"), Redraw::Line);
    }

    #[test]
    fn change_line_comment_marker_is_view() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "int x;");
        assert_eq!(lx.change_line(0, "int x; /*"), Redraw::View);
        assert_eq!(lx.comment_state(1).depth, 1);
        assert_eq!(lx.change_line(0, "int x;"), Redraw::View);
        assert!(lx.comment_state(1).is_balanced());
    }

    #[test]
    fn continuation_change_is_view() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "#define X 1");
        assert_eq!(lx.change_line(0, "#define X 1 \\"), Redraw::View);
    }

    #[test]
    fn add_line_shifts_and_reports() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "{");
        lx.scan(1, "/* x */");
        lx.scan(2, "}");
        assert_eq!(lx.add_line(1, "int y;"), Redraw::None);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(lx.add_line(0, "/*"), Redraw::View);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
        assert_eq!(lx.add_line(5, "f()"), Redraw::None);
        assert_eq!(lx.add_line(5, "g("), Redraw::Line);
    }

    #[test]
    fn delete_line_shifts_and_reports() {
        let mut lx = lexer(builtin::c());
        for (i, l) in ["{", "x", "/*", "*/", "}"].iter().enumerate() {
            lx.scan(i, l);
        }
        assert_eq!(lx.delete_line(1), Redraw::None);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(lx.delete_line(1), Redraw::View);
        assert_eq!(lx.delete_line(2), Redraw::Line);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn bulk_insert_and_remove_shift_by_count() {
        let mut lx = lexer(builtin::c());
        lx.scan(0, "{");
        lx.scan(3, "}");
        lx.insert_lines(2, 4);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 7]);
        lx.remove_lines(1, 6);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn switching_language_clears_cache() {
        let registry = ProfileRegistry::with_builtins();
        let mut lx = Lexer::for_language(&registry, "c");
        lx.scan(0, "/*");
        assert!(!lx.annotations().is_empty());
        lx.set_language(&registry, "python");
        assert!(lx.annotations().is_empty());
        assert_eq!(lx.profile().name, "python");
        lx.set_language(&registry, "klingon");
        assert_eq!(lx.profile().name, "plain");
    }

    #[test]
    fn index_scans_eager_profiles_only() {
        let source = vec!["fn f() {", "  /* c", "*/ }"];
        let mut lx = lexer(builtin::rust());
        lx.index(&source);
        assert_eq!(lx.annotations().lines().collect::<Vec<_>>(), vec![0, 1, 2]);

        let mut lx = lexer(builtin::python());
        lx.index(&source);
        assert!(lx.annotations().is_empty());
    }
}
