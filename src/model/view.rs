//! Buffer view - one pane's cursor, viewport and pending repaints
//!
//! A view never owns its buffer. Every operation that needs content takes
//! the buffer by reference, so several views can share one buffer through
//! the view tree's arena.

use std::collections::BTreeSet;
use std::io;

use super::buffer::{BufferListener, DirtyLines, TextBuffer};
use super::view_tree::BufferId;
use crate::render::{Color, Highlighter, Style, Surface};

/// Cell rectangle on the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Rect {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self {
            row,
            col,
            rows,
            cols,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row
            && row < self.row + self.rows
            && col >= self.col
            && col < self.col + self.cols
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

/// Visible window onto the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub top_line: usize,
    /// Inclusive; `top_line + rows - 1`
    pub bottom_line: usize,
    /// Horizontal scroll, in columns
    pub left_column: usize,
}

impl Viewport {
    fn contains_line(&self, line: usize) -> bool {
        line >= self.top_line && line <= self.bottom_line
    }
}

#[derive(Debug, Clone)]
pub struct BufferView {
    buffer_id: BufferId,
    cursor: Cursor,
    /// Column to return to when moving vertically through shorter lines
    target_column: usize,
    viewport: Viewport,
    focused: bool,
    rect: Rect,
    gutter_width: usize,
    gutter_color: Color,
    /// Pane rows waiting to be painted
    pending: BTreeSet<usize>,
}

impl BufferView {
    pub fn new(buffer_id: BufferId, gutter_width: usize) -> Self {
        Self {
            buffer_id,
            cursor: Cursor::default(),
            target_column: 0,
            viewport: Viewport::default(),
            focused: true,
            rect: Rect::default(),
            gutter_width,
            gutter_color: Color::Yellow,
            pending: BTreeSet::new(),
        }
    }

    pub fn with_gutter_color(mut self, color: Color) -> Self {
        self.gutter_color = color;
        self
    }

    pub fn buffer_id(&self) -> BufferId {
        self.buffer_id
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn target_column(&self) -> usize {
        self.target_column
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Columns left for text after the gutter and its one-column margin
    pub fn text_columns(&self) -> usize {
        self.rect.cols.saturating_sub(self.gutter_width + 1)
    }

    /// Pane rows scheduled for the next render
    pub fn pending_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter().copied()
    }

    /// Show a different buffer from its first line
    pub fn attach(&mut self, buffer_id: BufferId, buffer: &TextBuffer) {
        self.buffer_id = buffer_id;
        self.target_column = 0;
        self.set_top_line(0);
        self.set_cursor(buffer, 0, 0);
        self.invalidate();
    }

    /// Move the cursor, clamping through the buffer, and scroll it into view
    pub fn set_cursor(&mut self, buffer: &TextBuffer, line: isize, column: isize) {
        let offset = buffer.offset(line, column);
        let offset = isize::try_from(offset).unwrap_or(isize::MAX);
        let (line, column) = buffer.line_and_column(offset);
        self.cursor = Cursor { line, column };

        if line > self.viewport.bottom_line {
            self.set_top_line(self.viewport.top_line + (line - self.viewport.bottom_line));
        } else if line < self.viewport.top_line {
            self.set_top_line(line);
        }
        self.reveal_column();
    }

    pub fn move_cursor_line(&mut self, buffer: &TextBuffer, delta: isize) {
        let line = (self.cursor.line as isize).saturating_add(delta);
        self.set_cursor(buffer, line, 0);
        let length = buffer.line_length(self.cursor.line).unwrap_or(0);
        self.set_cursor(
            buffer,
            self.cursor.line as isize,
            length.min(self.target_column) as isize,
        );
    }

    pub fn move_cursor_offset(&mut self, buffer: &TextBuffer, delta: isize) {
        let column = (self.cursor.column as isize).saturating_add(delta);
        self.set_cursor(buffer, self.cursor.line as isize, column);
        self.target_column = self.cursor.column;
    }

    /// Remember the current column for subsequent vertical moves
    pub fn sync_target_column(&mut self) {
        self.target_column = self.cursor.column;
    }

    /// Scroll so that `line` is the first visible line
    pub fn set_top_line(&mut self, line: usize) {
        if line == self.viewport.top_line {
            return;
        }
        self.viewport.top_line = line;
        self.viewport.bottom_line = line + self.rect.rows.saturating_sub(1);
        self.invalidate();
    }

    /// Take a new screen rectangle, keeping the cursor visible
    pub fn resize(&mut self, rect: Rect) {
        self.rect = rect;
        self.viewport.bottom_line = self.viewport.top_line + rect.rows.saturating_sub(1);
        if self.cursor.line > self.viewport.bottom_line {
            let deficit = self.cursor.line - self.viewport.bottom_line;
            self.viewport.top_line += deficit;
            self.viewport.bottom_line += deficit;
        }
        self.reveal_column();
        self.invalidate();
    }

    /// Schedule every pane row for repaint
    pub fn invalidate(&mut self) {
        self.pending.extend(0..self.rect.rows);
    }

    fn reveal_column(&mut self) {
        let width = self.text_columns().max(1);
        let left = self.viewport.left_column;
        let left = if self.cursor.column < left {
            self.cursor.column
        } else if self.cursor.column >= left + width {
            self.cursor.column + 1 - width
        } else {
            left
        };
        if left != self.viewport.left_column {
            self.viewport.left_column = left;
            self.invalidate();
        }
    }

    /// Screen position of the cursor when this view has focus
    pub fn cursor_screen_position(&self) -> Option<(usize, usize)> {
        if !self.focused || !self.viewport.contains_line(self.cursor.line) {
            return None;
        }
        let row = self.rect.row + self.cursor.line - self.viewport.top_line;
        let col = self.rect.col + self.gutter_width + 1 + self.cursor.column
            - self.viewport.left_column;
        Some((row, col.min(self.rect.col + self.rect.cols.saturating_sub(1))))
    }

    /// Map a screen cell inside this pane to a `(line, column)` in the buffer
    pub fn position_at(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        if !self.rect.contains(row, col) {
            return None;
        }
        let line = self.viewport.top_line + (row - self.rect.row);
        let text_col = (col - self.rect.col).saturating_sub(self.gutter_width + 1);
        Some((line, self.viewport.left_column + text_col))
    }

    /// Paint every pending row, then clear the schedule
    pub fn render(
        &mut self,
        buffer: &TextBuffer,
        surface: &mut dyn Surface,
        highlighter: &dyn Highlighter,
    ) -> io::Result<()> {
        let rows = std::mem::take(&mut self.pending);
        for row in rows.into_iter().filter(|&row| row < self.rect.rows) {
            self.render_row(buffer, surface, highlighter, row)?;
        }
        Ok(())
    }

    fn render_row(
        &self,
        buffer: &TextBuffer,
        surface: &mut dyn Surface,
        highlighter: &dyn Highlighter,
        row: usize,
    ) -> io::Result<()> {
        let line_index = self.viewport.top_line + row;
        let line = buffer.line(line_index);

        surface.move_to(self.rect.row + row, self.rect.col)?;

        let label = match line {
            Some(_) => (line_index + 1).to_string(),
            None => "~".to_string(),
        };
        let gutter = format!("{:>width$} ", label, width = self.gutter_width);
        let gutter: String = gutter.chars().take(self.rect.cols).collect();
        surface.write(&gutter, Style::fg(self.gutter_color))?;

        let width = self.text_columns();
        if width == 0 {
            return Ok(());
        }

        let text = line.unwrap_or("");
        let left = self.viewport.left_column;
        let right = left + width;
        let mut written = 0;

        let spans = highlighter.highlight(text);
        if spans.is_empty() {
            let visible = clip(text, left, right);
            surface.write(&visible, Style::PLAIN)?;
            written += visible.len();
        } else {
            for span in spans {
                let start = span.start.max(left);
                let end = span.end.min(right).min(text.len());
                if start >= end {
                    continue;
                }
                let visible = clip(text, start, end);
                surface.write(&visible, Style::new(span.fg, span.bg))?;
                written += visible.len();
            }
        }

        if written < width {
            surface.write(&" ".repeat(width - written), Style::PLAIN)?;
        }
        Ok(())
    }
}

/// Bytes `start..end` of an ASCII line, with tabs drawn as single spaces
fn clip(text: &str, start: usize, end: usize) -> String {
    let end = end.min(text.len());
    if start >= end {
        return String::new();
    }
    text[start..end].replace('\t', " ")
}

impl BufferListener for BufferView {
    fn on_dirty_lines(&mut self, buffer: &TextBuffer, dirty: DirtyLines) {
        let top = self.viewport.top_line;
        let bottom = self.viewport.bottom_line;

        let first = dirty.start.max(top);
        let last = dirty.end.min(bottom);
        if first <= last {
            self.pending.extend((first..=last).map(|line| line - top));
        }

        if dirty.line_count_decreased {
            let first_absent = buffer.line_count().max(top);
            if first_absent <= bottom {
                self.pending.extend((first_absent..=bottom).map(|line| line - top));
            }
        }
        self.pending.retain(|&row| row < self.rect.rows);
    }
}
