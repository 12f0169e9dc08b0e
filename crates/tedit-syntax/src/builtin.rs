//! Built-in language profiles.
//!
//! Each preset covers the comment and quoting rules of a language family well
//! enough for highlighting and bracket matching. Users extend or override them
//! through TOML profile files.

use crate::profile::{LanguageProfile, PLAIN};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// The fallback profile: no lexing, one color.
#[must_use]
pub fn plain() -> LanguageProfile {
    LanguageProfile {
        name: PLAIN.to_owned(),
        quotes: String::new(),
        scan: false,
        ..LanguageProfile::default()
    }
}

/// Every built-in profile except `plain`, in lookup priority order.
#[must_use]
pub fn builtin_profiles() -> Vec<LanguageProfile> {
    vec![c(), rust(), python(), shell(), pascal()]
}

/// C and C++.
#[must_use]
pub fn c() -> LanguageProfile {
    LanguageProfile {
        name: "c".to_owned(),
        masks: strings(&["*.c", "*.h", "*.cc", "*.cpp", "*.cxx", "*.hpp", "*.c++"]),
        delimiters: "(){}[];,".to_owned(),
        special: strings(&["#!"]),
        line_comments: strings(&["//"]),
        open_comments: strings(&["/*"]),
        close_comments: strings(&["*/"]),
        keywords: strings(&[
            "auto", "break", "case", "char", "class", "const", "continue", "default",
            "delete", "do", "double", "else", "enum", "extern", "float", "for", "goto",
            "if", "inline", "int", "long", "namespace", "new", "private", "protected",
            "public", "register", "return", "short", "signed", "sizeof", "static",
            "struct", "switch", "template", "this", "typedef", "union", "unsigned",
            "virtual", "void", "volatile", "while",
        ]),
        eager_scan: true,
        ..LanguageProfile::default()
    }
}

/// Rust: block comments nest.
#[must_use]
pub fn rust() -> LanguageProfile {
    LanguageProfile {
        name: "rust".to_owned(),
        masks: strings(&["*.rs"]),
        delimiters: "(){}[];,".to_owned(),
        quotes: "\"".to_owned(),
        special: strings(&["#!["]),
        line_comments: strings(&["//"]),
        open_comments: strings(&["/*"]),
        close_comments: strings(&["*/"]),
        recursive_comment: true,
        keywords: strings(&[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
            "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop",
            "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self",
            "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
            "where", "while",
        ]),
        eager_scan: true,
        ..LanguageProfile::default()
    }
}

/// Python: `#` comments, triple-quoted docstrings as toggled comments.
#[must_use]
pub fn python() -> LanguageProfile {
    LanguageProfile {
        name: "python".to_owned(),
        masks: strings(&["*.py", "*.pyw"]),
        delimiters: "()[]{},:".to_owned(),
        special: strings(&["#!"]),
        line_comments: strings(&["#"]),
        toggled_comments: strings(&["\"\"\"", "'''"]),
        keywords: strings(&[
            "and", "as", "assert", "break", "class", "continue", "def", "del", "elif",
            "else", "except", "False", "finally", "for", "from", "global", "if",
            "import", "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass",
            "raise", "return", "True", "try", "while", "with", "yield",
        ]),
        ..LanguageProfile::default()
    }
}

/// POSIX shells.
#[must_use]
pub fn shell() -> LanguageProfile {
    LanguageProfile {
        name: "shell".to_owned(),
        masks: strings(&["*.sh", "*.bash", ".bashrc", ".profile"]),
        delimiters: "(){}[];|&".to_owned(),
        special: strings(&["#!", "$#", "${#"]),
        line_comments: strings(&["#"]),
        keywords: strings(&[
            "case", "do", "done", "elif", "else", "esac", "export", "fi", "for",
            "function", "if", "in", "local", "return", "then", "until", "while",
        ]),
        tab_size: 8,
        ..LanguageProfile::default()
    }
}

/// Pascal / Delphi: two block comment styles, case-insensitive keywords.
#[must_use]
pub fn pascal() -> LanguageProfile {
    LanguageProfile {
        name: "pascal".to_owned(),
        masks: strings(&["*.pas", "*.pp", "*.dpr"]),
        delimiters: "()[];,".to_owned(),
        quotes: "'".to_owned(),
        line_comments: strings(&["//"]),
        open_comments: strings(&["{", "(*"]),
        close_comments: strings(&["}", "*)"]),
        case_insensitive: true,
        keywords: strings(&[
            "and", "array", "begin", "case", "const", "do", "downto", "else", "end",
            "for", "function", "if", "in", "not", "of", "or", "procedure", "program",
            "record", "repeat", "then", "to", "type", "until", "uses", "var", "while",
        ]),
        ..LanguageProfile::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
