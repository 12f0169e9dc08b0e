// SPDX-License-Identifier: MIT
//
// tedit — command-line front end for the tedit engines.
//
// The binary wires the three library crates together:
//
//   tedit-text   → file buffers and the line access contract
//   tedit-syntax → language profiles, incremental lexer, bracket matching
//   tedit-diff   → line-level comparison of two files
//
// Commands:
//
//   tedit show FILE              colorized listing (ANSI), lexer picked by file name
//   tedit match FILE LINE COL    position of the bracket matching LINE:COL (1-based)
//   tedit diff A B               line diff report, exit status 1 when files differ
//
// Options: --lang NAME forces a profile, --profiles FILE loads extra profiles
// from TOML, -w ignores whitespace when comparing. TEDIT_LOG=debug turns on
// engine logging on stderr.

mod logger;

use std::env;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use tedit_diff::{DiffOptions, DiffResult, LineStatus, Side, compare};
use tedit_syntax::{Color, Lexer, ProfileError, ProfileRegistry, expand_cells};
use tedit_text::{Buffer, Position, TextSource};

const USAGE: &str = "\
usage: tedit show FILE [--lang NAME] [--profiles FILE]
       tedit match FILE LINE COL [--lang NAME] [--profiles FILE]
       tedit diff A B [-w]";

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("write failed: {0}")]
    Output(#[from] io::Error),
}

fn usage(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct LexOptions {
    lang: Option<String>,
    profiles: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show { file: PathBuf, lex: LexOptions },
    Match { file: PathBuf, pos: Position, lex: LexOptions },
    Diff { a: PathBuf, b: PathBuf, ignore_whitespace: bool },
    Help,
}

/// Parse a 1-based line or column number.
fn parse_index(what: &str, value: &str) -> Result<usize, CliError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(usage(format!("{what} must be a positive number, got '{value}'"))),
    }
}

fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut positional: Vec<&str> = Vec::new();
    let mut lex = LexOptions {
        lang: None,
        profiles: None,
    };
    let mut ignore_whitespace = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-w" | "--ignore-whitespace" => ignore_whitespace = true,
            "--lang" => {
                let name = iter.next().ok_or_else(|| usage("--lang needs a profile name"))?;
                lex.lang = Some(name.clone());
            }
            "--profiles" => {
                let path = iter.next().ok_or_else(|| usage("--profiles needs a file"))?;
                lex.profiles = Some(PathBuf::from(path));
            }
            s if s.len() > 1 && s.starts_with('-') => {
                return Err(usage(format!("unknown option '{s}'")));
            }
            s => positional.push(s),
        }
    }

    match positional.as_slice() {
        [] => Ok(Command::Help),
        ["show", file] => Ok(Command::Show {
            file: PathBuf::from(file),
            lex,
        }),
        ["match", file, line, col] => Ok(Command::Match {
            file: PathBuf::from(file),
            pos: Position::new(parse_index("LINE", line)?, parse_index("COL", col)?),
            lex,
        }),
        ["diff", a, b] => Ok(Command::Diff {
            a: PathBuf::from(a),
            b: PathBuf::from(b),
            ignore_whitespace,
        }),
        [cmd, ..] => Err(usage(format!("bad arguments for '{cmd}'"))),
    }
}

// ─── Setup ──────────────────────────────────────────────────────────────────

fn open(path: &Path) -> Result<Buffer, CliError> {
    Buffer::from_file(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Lines worth showing: the empty line after a final line break is dropped,
/// and an empty file has none.
fn text_lines(buffer: &Buffer) -> usize {
    if buffer.is_empty() {
        return 0;
    }
    let count = buffer.line_count();
    if count > 1 && buffer.line(count - 1).is_empty() {
        count - 1
    } else {
        count
    }
}

/// A lexer for `buffer`, indexed when its profile asks for it.
fn lexer_for(buffer: &Buffer, lex: &LexOptions) -> Result<Lexer, CliError> {
    let mut registry = ProfileRegistry::with_builtins();
    if let Some(path) = &lex.profiles {
        let count = registry.load_file(path)?;
        log::info!("loaded {count} profiles from {}", path.display());
    }
    let profile = match (&lex.lang, buffer.path()) {
        (Some(name), _) => registry.resolve(name),
        (None, Some(path)) => registry.find_for_path(path),
        (None, None) => registry.plain(),
    };
    let mut lexer = Lexer::new(profile);
    lexer.index(buffer);
    Ok(lexer)
}

// ─── show ───────────────────────────────────────────────────────────────────

/// SGR parameters for a color class.
const fn sgr(color: Color) -> &'static str {
    match color {
        Color::Text => "0",
        Color::Keyword => "1;34",
        Color::Number => "35",
        Color::String => "32",
        Color::Comment => "2;37",
        Color::Operator => "33",
        Color::Delimiter => "36",
    }
}

fn show(out: &mut impl Write, buffer: &Buffer, lexer: &mut Lexer) -> io::Result<()> {
    let count = text_lines(buffer);
    let gutter = count.to_string().len();
    let tab_size = lexer.profile().tab_size;

    for line in 0..count {
        let text = buffer.line(line);
        let colors = lexer.get_color(line, &text, text.chars().count());
        write!(out, "{:>gutter$} ", line + 1)?;
        let mut current = None;
        for cell in expand_cells(&text, &colors, tab_size) {
            // The right half of a wide char is drawn by the terminal.
            let Some(ch) = cell.ch else { continue };
            if current != Some(cell.color) {
                write!(out, "\x1b[{}m", sgr(cell.color))?;
                current = Some(cell.color);
            }
            write!(out, "{ch}")?;
        }
        writeln!(out, "\x1b[0m")?;
    }
    Ok(())
}

// ─── match ──────────────────────────────────────────────────────────────────

fn find_pair(out: &mut impl Write, buffer: &Buffer, lexer: &Lexer, pos: Position) -> io::Result<bool> {
    match lexer.get_lex_pair(buffer, pos) {
        Some(pair) => {
            writeln!(out, "{pos} -> {pair}")?;
            Ok(true)
        }
        None => {
            writeln!(out, "{pos}: no matching bracket")?;
            Ok(false)
        }
    }
}

// ─── diff ───────────────────────────────────────────────────────────────────

/// Number of changed blocks on `side`.
fn blocks(result: &DiffResult, side: Side) -> usize {
    let leading = usize::from(result.changed(side).first() == Some(&true));
    let rest = std::iter::successors(result.next_change(side, 0), |&i| {
        result.next_change(side, i)
    });
    leading + rest.count()
}

fn report(
    out: &mut impl Write,
    (name_a, a): (&str, &Buffer),
    (name_b, b): (&str, &Buffer),
    result: &DiffResult,
) -> io::Result<()> {
    if result.is_identical() {
        return writeln!(out, "{name_a} and {name_b} are identical");
    }
    writeln!(out, "--- {name_a}")?;
    writeln!(out, "+++ {name_b}")?;

    let (n, m) = (result.changed_a.len(), result.changed_b.len());
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && result.line_status(Side::A, i) == LineStatus::Changed {
            writeln!(out, "-{:>5}       {}", i + 1, a.line(i))?;
            i += 1;
        } else if j < m && result.line_status(Side::B, j) == LineStatus::Changed {
            writeln!(out, "+      {:>5} {}", j + 1, b.line(j))?;
            j += 1;
        } else {
            writeln!(out, " {:>5} {:>5} {}", i + 1, j + 1, a.line(i))?;
            i += 1;
            j += 1;
        }
    }

    writeln!(
        out,
        "{} lines in {} blocks changed in {name_a}, {} lines in {} blocks in {name_b}{}",
        result.changed_count(Side::A),
        blocks(result, Side::A),
        result.changed_count(Side::B),
        blocks(result, Side::B),
        if result.approximate { " (approximate)" } else { "" }
    )
}

// ─── Main ───────────────────────────────────────────────────────────────────

/// Run one command; the value is the process exit status.
fn run(command: Command, out: &mut impl Write) -> Result<i32, CliError> {
    match command {
        Command::Help => {
            writeln!(out, "{USAGE}")?;
            Ok(0)
        }
        Command::Show { file, lex } => {
            let buffer = open(&file)?;
            let mut lexer = lexer_for(&buffer, &lex)?;
            show(out, &buffer, &mut lexer)?;
            Ok(0)
        }
        Command::Match { file, pos, lex } => {
            let buffer = open(&file)?;
            let lexer = lexer_for(&buffer, &lex)?;
            let found = find_pair(out, &buffer, &lexer, pos)?;
            Ok(i32::from(!found))
        }
        Command::Diff {
            a,
            b,
            ignore_whitespace,
        } => {
            let (buf_a, buf_b) = (open(&a)?, open(&b)?);
            let options = DiffOptions {
                ignore_whitespace,
                ..DiffOptions::default()
            };
            let result = compare(
                &buf_a,
                0..text_lines(&buf_a),
                &buf_b,
                0..text_lines(&buf_b),
                &options,
            );
            let (name_a, name_b) = (a.display().to_string(), b.display().to_string());
            report(out, (&name_a, &buf_a), (&name_b, &buf_b), &result)?;
            Ok(i32::from(!result.is_identical()))
        }
    }
}

fn main() {
    logger::init();
    let args: Vec<String> = env::args().skip(1).collect();

    let outcome = parse_args(&args).and_then(|command| {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let status = run(command, &mut out)?;
        out.flush()?;
        Ok(status)
    });

    match outcome {
        Ok(status) => process::exit(status),
        Err(CliError::Usage(msg)) => {
            eprintln!("tedit: {msg}\n\n{USAGE}");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("tedit: {e}");
            process::exit(2);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn c_lexer(buffer: &Buffer) -> Lexer {
        let lex = LexOptions {
            lang: Some("c".into()),
            profiles: None,
        };
        lexer_for(buffer, &lex).unwrap()
    }

    // ── Arguments ─────────────────────────────────────────────────────────

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_args(&args(&["show", "a.c", "--lang", "rust"])).unwrap(),
            Command::Show {
                file: PathBuf::from("a.c"),
                lex: LexOptions {
                    lang: Some("rust".into()),
                    profiles: None,
                },
            }
        );
        assert_eq!(
            parse_args(&args(&["-w", "diff", "a", "b"])).unwrap(),
            Command::Diff {
                a: PathBuf::from("a"),
                b: PathBuf::from("b"),
                ignore_whitespace: true,
            }
        );
        let Command::Match { pos, .. } = parse_args(&args(&["match", "f.rs", "3", "7"])).unwrap()
        else {
            panic!("expected match command");
        };
        assert_eq!(pos, Position::new(2, 6));
        assert_eq!(parse_args(&[]).unwrap(), Command::Help);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(parse_args(&args(&["show"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args(&["--bogus"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args(&["show", "f", "--lang"])), Err(CliError::Usage(_))));
        assert!(matches!(
            parse_args(&args(&["match", "f", "0", "1"])),
            Err(CliError::Usage(_))
        ));
    }

    // ── show ──────────────────────────────────────────────────────────────

    #[test]
    fn show_colors_comments_and_keywords() {
        let buffer = Buffer::from_text("int x; // note\n");
        let mut lexer = c_lexer(&buffer);
        let text = render(|out| show(out, &buffer, &mut lexer));
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("1 \x1b[1;34mint"));
        assert!(text.contains("\x1b[2;37m// note"));
        assert!(text.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn show_expands_tabs() {
        let buffer = Buffer::from_text("\tx");
        let mut lexer = c_lexer(&buffer);
        let text = render(|out| show(out, &buffer, &mut lexer));
        assert!(text.contains("    x"));
    }

    // ── match ─────────────────────────────────────────────────────────────

    #[test]
    fn match_reports_pair() {
        let buffer = Buffer::from_text("f(a) {\n}\n");
        let lexer = c_lexer(&buffer);
        let text = render(|out| find_pair(out, &buffer, &lexer, Position::new(0, 5)).map(|_| ()));
        assert_eq!(text, "1:6 -> 2:1\n");
        let text = render(|out| find_pair(out, &buffer, &lexer, Position::new(0, 0)).map(|_| ()));
        assert_eq!(text, "1:1: no matching bracket\n");
    }

    // ── diff ──────────────────────────────────────────────────────────────

    #[test]
    fn report_aligns_both_sides() {
        let a = Buffer::from_text("a\nb\nc\n");
        let b = Buffer::from_text("a\nx\nc\nd\n");
        let result = compare(&a, 0..text_lines(&a), &b, 0..text_lines(&b), &DiffOptions::default());
        let text = render(|out| report(out, ("A", &a), ("B", &b), &result));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- A");
        assert_eq!(lines[1], "+++ B");
        assert_eq!(lines[2], "     1     1 a");
        assert_eq!(lines[3], "-    2       b");
        assert_eq!(lines[4], "+          2 x");
        assert_eq!(lines[5], "     3     3 c");
        assert_eq!(lines[6], "+          4 d");
        assert_eq!(lines[7], "1 lines in 1 blocks changed in A, 2 lines in 2 blocks in B");
    }

    #[test]
    fn report_identical() {
        let a = Buffer::from_text("same\n");
        let result = compare(&a, 0..1, &a, 0..1, &DiffOptions::default());
        let text = render(|out| report(out, ("A", &a), ("B", &a), &result));
        assert_eq!(text, "A and B are identical\n");
    }

    #[test]
    fn block_counting() {
        let result = DiffResult {
            changed_a: vec![true, false, true, true, false, true],
            changed_b: vec![],
            approximate: false,
        };
        assert_eq!(blocks(&result, Side::A), 3);
        assert_eq!(blocks(&result, Side::B), 0);
    }

    #[test]
    fn text_lines_drops_trailing_empty_line() {
        assert_eq!(text_lines(&Buffer::from_text("a\nb\n")), 2);
        assert_eq!(text_lines(&Buffer::from_text("a\nb")), 2);
        assert_eq!(text_lines(&Buffer::from_text("")), 0);
    }
}
