//! Cursor and scroll origin over a [`LineBuffer`].

use crate::line_buffer::LineBuffer;
use crate::mode::Mode;

fn distance_from_window(start: usize, len: usize, point: usize) -> isize {
    if point < start {
        point as isize - start as isize
    } else if point >= start + len {
        (point + 1 - (start + len)) as isize
    } else {
        0
    }
}

/// Terminal size in character cells
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScreenSize {
    pub rows: usize,
    pub cols: usize,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

impl ScreenSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Rows available for text, the last row is the status line
    pub fn text_rows(&self) -> usize {
        self.rows.max(2) - 1
    }

    pub fn text_cols(&self) -> usize {
        self.cols.max(2)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Force cursor back inside the buffer. In insert mode the column may
    /// sit one past the last byte, otherwise it rests on the last byte.
    pub fn clamp(&mut self, buffer: &LineBuffer, mode: Mode) {
        self.row = self.row.min(buffer.line_count() - 1);

        let len = buffer.line_len(self.row);
        let max_col = match mode {
            Mode::Insert => len,
            Mode::Normal | Mode::Command => len.saturating_sub(1),
        };

        self.col = self.col.min(max_col);
    }
}

/// Scroll origin: first visible line and column
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    pub top_line: usize,
    pub left_col: usize,
}

impl Viewport {
    /// Scroll just enough to make `cursor` visible
    pub fn adjust(&mut self, cursor: Cursor, size: ScreenSize) {
        let rows = distance_from_window(self.top_line, size.text_rows(), cursor.row);
        let cols = distance_from_window(self.left_col, size.text_cols(), cursor.col);

        self.top_line = self.top_line.saturating_add_signed(rows);
        self.left_col = self.left_col.saturating_add_signed(cols);
    }

    /// Cursor position in screen coordinates
    pub fn screen_position(&self, cursor: Cursor) -> Cursor {
        Cursor::new(
            cursor.row.saturating_sub(self.top_line),
            cursor.col.saturating_sub(self.left_col),
        )
    }
}
