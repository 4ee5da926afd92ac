//! Rendering seams: the drawing surface and the line highlighter
//!
//! The engine never talks to a terminal directly. Views write styled text
//! through [`Surface`]; the binary supplies a crossterm-backed one and tests
//! use [`MemorySurface`].

use std::io;

use serde::{Deserialize, Serialize};

/// Terminal palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    pub const PLAIN: Style = Style {
        fg: Color::Default,
        bg: Color::Default,
    };

    pub fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    pub fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Default,
        }
    }
}

/// A colored run of a single line; `start..end` are byte offsets into the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
    pub start: usize,
    pub end: usize,
}

/// Splits a line into colored spans
///
/// Returning no spans means "draw the line plain".
pub trait Highlighter {
    fn highlight(&self, line: &str) -> Vec<Span>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _line: &str) -> Vec<Span> {
        Vec::new()
    }
}

/// A grid of character cells addressed by `(row, col)`
pub trait Surface {
    /// `(rows, cols)`
    fn size(&self) -> (usize, usize);
    fn move_to(&mut self, row: usize, col: usize) -> io::Result<()>;
    /// Write at the current position, advancing it
    fn write(&mut self, text: &str, style: Style) -> io::Result<()>;
    /// Place the visible cursor, or hide it with `None`
    fn show_cursor(&mut self, position: Option<(usize, usize)>) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// In-memory surface, used headless and in tests
#[derive(Debug, Clone)]
pub struct MemorySurface {
    cells: Vec<Vec<(char, Style)>>,
    rows: usize,
    cols: usize,
    position: (usize, usize),
    cursor: Option<(usize, usize)>,
    flushes: usize,
}

impl MemorySurface {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![(' ', Style::PLAIN); cols]; rows],
            rows,
            cols,
            position: (0, 0),
            cursor: None,
            flushes: 0,
        }
    }

    /// Text of one row, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().map(|&(c, _)| c).collect::<String>())
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default()
    }

    pub fn style_at(&self, row: usize, col: usize) -> Option<Style> {
        self.cells.get(row)?.get(col).map(|&(_, style)| style)
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Change the reported size, clearing the grid
    pub fn resize(&mut self, rows: usize, cols: usize) {
        *self = Self {
            flushes: self.flushes,
            ..Self::new(rows, cols)
        };
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn move_to(&mut self, row: usize, col: usize) -> io::Result<()> {
        self.position = (row, col);
        Ok(())
    }

    fn write(&mut self, text: &str, style: Style) -> io::Result<()> {
        let (row, mut col) = self.position;
        if let Some(cells) = self.cells.get_mut(row) {
            for c in text.chars() {
                if let Some(cell) = cells.get_mut(col) {
                    *cell = (c, style);
                }
                col += 1;
            }
        }
        self.position = (row, col);
        Ok(())
    }

    fn show_cursor(&mut self, position: Option<(usize, usize)>) -> io::Result<()> {
        self.cursor = position;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface_clips_writes() {
        let mut surface = MemorySurface::new(2, 4);
        surface.move_to(1, 2).unwrap();
        surface.write("abcdef", Style::fg(Color::Red)).unwrap();
        assert_eq!(surface.row_text(1), "  ab");
        assert_eq!(surface.style_at(1, 3), Some(Style::fg(Color::Red)));
        assert_eq!(surface.row_text(5), "");
    }

    #[test]
    fn test_plain_highlighter_yields_no_spans() {
        assert!(PlainHighlighter.highlight("fn main() {}").is_empty());
    }
}
