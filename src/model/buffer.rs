//! Text buffer - flat ASCII content with a line-start index
//!
//! Coordinates come in two flavours: absolute byte offsets and
//! `(line, column)` pairs. Both conversions clamp instead of failing, so
//! callers can pass arbitrary (even negative) values and always land on a
//! valid position.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// Inclusive range of lines touched by a splice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyLines {
    pub start: usize,
    pub end: usize,
    /// Set when the splice removed lines; rows past the new last line need clearing
    pub line_count_decreased: bool,
}

impl DirtyLines {
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}

/// Result of a splice: where the edit ended and which lines changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub dirty: DirtyLines,
}

/// Receives dirty-line notifications after a splice has been applied
pub trait BufferListener {
    fn on_dirty_lines(&mut self, buffer: &TextBuffer, dirty: DirtyLines);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    /// Byte offset of the first character of each line; `line_offsets[0] == 0`
    line_offsets: Vec<usize>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            line_offsets: vec![0],
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load(text);
        buffer
    }

    /// Replace the whole content, normalizing line endings and characters
    pub fn load(&mut self, text: &str) {
        self.content = normalize(text);
        self.rebuild_line_offsets();
        tracing::debug!(
            bytes = self.content.len(),
            lines = self.line_offsets.len(),
            "buffer loaded"
        );
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    pub fn char_count(&self) -> usize {
        self.content.len()
    }

    /// Convert an absolute offset into `(line, column)`
    pub fn line_and_column(&self, offset: isize) -> (usize, usize) {
        if offset < 1 {
            return (0, 0);
        }
        let offset = offset as usize;

        // offsets[0] == 0 <= offset, so `next` is at least 1
        let next = self.line_offsets.partition_point(|&start| start <= offset);
        if next < self.line_offsets.len() {
            let line = next - 1;
            return (line, offset - self.line_offsets[line]);
        }

        let last = self.line_offsets.len() - 1;
        let start = self.line_offsets[last];
        (last, (offset - start).min(self.content.len() - start))
    }

    /// Convert `(line, column)` into an absolute offset
    ///
    /// Unknown lines map to the end of the buffer. The column is not
    /// clamped to the line, so it may spill into following lines.
    pub fn offset(&self, line: isize, column: isize) -> usize {
        if line < 0 {
            return 0;
        }
        match self.line_offsets.get(line as usize) {
            Some(&start) => (start as isize).saturating_add(column).max(0) as usize,
            None => self.content.len(),
        }
    }

    /// Insert `insert` at `(line, column)` after deleting `delete` bytes there
    pub fn splice(&mut self, line: isize, column: isize, insert: &str, delete: isize) -> Splice {
        let len = self.content.len();
        let start = self.offset(line, column).min(len);
        let end = if delete > 0 {
            start.saturating_add(delete as usize).min(len)
        } else {
            start
        };

        let (old_line, _) = self.line_and_column(to_signed(start));
        let old_count = self.line_count();

        let insert = normalize(insert);
        self.content.replace_range(start..end, &insert);
        self.rebuild_line_offsets();

        let offset = start + insert.len();
        let (new_line, new_column) = self.line_and_column(to_signed(offset));
        let new_count = self.line_count();

        let first = old_line.min(new_line);
        let dirty = if new_count == old_count {
            DirtyLines {
                start: first,
                end: old_line.max(new_line),
                line_count_decreased: false,
            }
        } else {
            DirtyLines {
                start: first,
                end: new_count - 1,
                line_count_decreased: new_count < old_count,
            }
        };

        tracing::debug!(
            start,
            removed = end - start,
            inserted = insert.len(),
            dirty_start = dirty.start,
            dirty_end = dirty.end,
            "splice"
        );

        Splice {
            line: new_line,
            column: new_column,
            offset,
            dirty,
        }
    }

    /// Splice, then notify each listener once with the dirty range
    pub fn splice_with(
        &mut self,
        line: isize,
        column: isize,
        insert: &str,
        delete: isize,
        listeners: &mut [&mut dyn BufferListener],
    ) -> Splice {
        let splice = self.splice(line, column, insert, delete);
        for listener in listeners.iter_mut() {
            listener.on_dirty_lines(self, splice.dirty);
        }
        splice
    }

    /// Line text without its trailing newline
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_offsets.get(line)?;
        let end = match self.line_offsets.get(line + 1) {
            Some(&next) => next - 1,
            None => self.content.len(),
        };
        Some(&self.content[start..end])
    }

    pub fn line_length(&self, line: usize) -> Option<usize> {
        self.line(line).map(str::len)
    }

    /// Lines `start..=end`; positions past the last line are `None`
    pub fn lines(&self, start: usize, end: usize) -> Vec<Option<&str>> {
        if end < start {
            return Vec::new();
        }
        (start..=end).map(|line| self.line(line)).collect()
    }

    fn rebuild_line_offsets(&mut self) {
        self.line_offsets.clear();
        self.line_offsets.push(0);
        self.line_offsets.extend(
            self.content
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

fn to_signed(offset: usize) -> isize {
    isize::try_from(offset).unwrap_or(isize::MAX)
}

/// Fold arbitrary text into the buffer's character set
///
/// Line endings become `\n`. Non-ASCII characters are decomposed and their
/// ASCII base kept; characters without one become `?`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            c if c.is_ascii() => out.push(c),
            c => transliterate(c, &mut out),
        }
    }
    out
}

fn transliterate(c: char, out: &mut String) {
    if let Some(replacement) = punctuation(c) {
        out.push_str(replacement);
        return;
    }
    let before = out.len();
    out.extend(std::iter::once(c).nfkd().filter(char::is_ascii));
    if out.len() == before {
        out.push('?');
    }
}

fn punctuation(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => "-",
        '\u{00AB}' => "<<",
        '\u{00BB}' => ">>",
        '\u{2022}' | '\u{00B7}' => "*",
        '\u{00D7}' => "x",
        '\u{00DF}' => "ss",
        '\u{00C6}' => "AE",
        '\u{00E6}' => "ae",
        '\u{00D8}' => "O",
        '\u{00F8}' => "o",
        '\u{20AC}' => "EUR",
        _ => return None,
    };
    Some(replacement)
}
