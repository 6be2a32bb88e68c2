//! The document being edited: an ordered list of byte lines.
//!
//! A [`LineBuffer`] always holds at least one line. Indices are checked
//! by the caller; an out-of-range index trips a `debug_assert!` and is a
//! no-op in release builds.

use alloc::vec;
use alloc::vec::Vec;

/// A single line without its terminating newline
pub type Line = Vec<u8>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Line>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    /// Create buffer holding a single empty line
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
        }
    }

    /// Create buffer from lines. An empty list becomes one empty line.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        if lines.is_empty() {
            Self::new()
        } else {
            Self { lines }
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&[u8]> {
        self.lines.get(index).map(|line| line.as_slice())
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Length of line in bytes, 0 if out of range
    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |line| line.len())
    }

    pub fn insert_line(&mut self, index: usize, text: &[u8]) {
        debug_assert!(index <= self.lines.len(), "insert_line out of range");

        if index <= self.lines.len() {
            self.lines.insert(index, text.to_vec());
        }
    }

    /// Remove line. Removing the last remaining line leaves a single
    /// empty line behind.
    pub fn delete_line(&mut self, index: usize) {
        debug_assert!(index < self.lines.len(), "delete_line out of range");

        if index < self.lines.len() {
            self.lines.remove(index);

            if self.lines.is_empty() {
                self.lines.push(Line::new());
            }
        }
    }

    pub fn insert_char(&mut self, row: usize, col: usize, ch: u8) {
        debug_assert!(col <= self.line_len(row), "insert_char out of range");

        if let Some(line) = self.lines.get_mut(row) {
            if col <= line.len() {
                line.insert(col, ch);
            }
        }
    }

    pub fn delete_char(&mut self, row: usize, col: usize) {
        debug_assert!(col < self.line_len(row), "delete_char out of range");

        if let Some(line) = self.lines.get_mut(row) {
            if col < line.len() {
                line.remove(col);
            }
        }
    }

    /// Split line at `col`. The head stays at `row`, the tail becomes a
    /// new line at `row + 1`.
    pub fn split_line(&mut self, row: usize, col: usize) -> (&[u8], &[u8]) {
        debug_assert!(col <= self.line_len(row), "split_line out of range");

        let Some(line) = self.lines.get_mut(row) else {
            return (&[][..], &[][..]);
        };

        let tail = line.split_off(col.min(line.len()));
        self.lines.insert(row + 1, tail);

        let (head, tail) = self.lines.split_at(row + 1);
        (head[row].as_slice(), tail[0].as_slice())
    }

    /// Append line `row + 1` to line `row`. Returns the column where the
    /// two lines were joined.
    pub fn join_with_next(&mut self, row: usize) -> usize {
        debug_assert!(row + 1 < self.lines.len(), "join_with_next out of range");

        if row + 1 >= self.lines.len() {
            return self.line_len(row);
        }

        let next = self.lines.remove(row + 1);
        let line = &mut self.lines[row];
        let col = line.len();
        line.extend_from_slice(&next);

        col
    }
}

/// Split file content into lines. Trailing `\r` and `\n` bytes are
/// stripped from every line and a final newline does not produce an
/// extra empty line.
pub fn split_lines(content: &[u8]) -> Vec<Line> {
    let mut lines: Vec<Line> = content
        .split_inclusive(|&b| b == b'\n')
        .map(|line| {
            let end = line
                .iter()
                .rposition(|&b| b != b'\n' && b != b'\r')
                .map_or(0, |i| i + 1);
            line[..end].to_vec()
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::new());
    }

    lines
}

/// Join lines, terminating each one with `\n`
pub fn join_lines(lines: &[Line]) -> Vec<u8> {
    let mut content = Vec::with_capacity(lines.iter().map(|line| line.len() + 1).sum());

    for line in lines {
        content.extend_from_slice(line);
        content.push(b'\n');
    }

    content
}
