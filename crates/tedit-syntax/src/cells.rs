//! Terminal cell expansion for colored lines.
//!
//! [`Lexer::get_color`](crate::Lexer::get_color) colors chars; a terminal
//! paints cells. Tabs expand to the next tab stop, wide chars take two cells
//! (the second is a continuation), zero-width chars take none.

use unicode_width::UnicodeWidthChar;

use crate::lexer::Color;

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The char painted here, or `None` for the right half of a wide char.
    pub ch: Option<char>,
    pub color: Color,
}

impl Cell {
    const fn new(ch: char, color: Color) -> Self {
        Self {
            ch: Some(ch),
            color,
        }
    }
}

/// Display width of `ch` in terminal columns (control chars count as 0).
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Display width of `text` with tabs expanded to `tab_size` stops.
#[must_use]
pub fn display_width(text: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    text.chars().fold(0, |col, ch| {
        if ch == '\t' {
            col + tab_size - col % tab_size
        } else {
            col + char_width(ch)
        }
    })
}

/// Map per-char `colors` (as returned by `get_color`) onto terminal cells.
/// Chars without a color entry are painted [`Color::Text`].
#[must_use]
pub fn expand_cells(text: &str, colors: &[Color], tab_size: usize) -> Vec<Cell> {
    let tab_size = tab_size.max(1);
    let mut cells = Vec::with_capacity(text.len());
    for (i, ch) in text.chars().enumerate() {
        let color = colors.get(i).copied().unwrap_or_default();
        if ch == '\t' {
            let stop = tab_size - cells.len() % tab_size;
            cells.extend(std::iter::repeat_n(Cell::new(' ', color), stop));
            continue;
        }
        match char_width(ch) {
            0 => {}
            1 => cells.push(Cell::new(ch, color)),
            _ => {
                cells.push(Cell::new(ch, color));
                cells.push(Cell { ch: None, color });
            }
        }
    }
    cells
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
