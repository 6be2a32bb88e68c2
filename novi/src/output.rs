//! Full-screen rendering.
//!
//! [`render`] turns the editor state into one complete frame of
//! terminal output. Nothing is diffed: every text row and the status
//! line are rewritten, so rendering the same state twice yields the same
//! bytes.

use alloc::vec::Vec;

use crate::core::Editor;
use crate::mode::Mode;
use crate::viewport::ScreenSize;

/// Written once when the session starts
pub const ENTER_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

/// Written once when the session ends
pub const LEAVE_SCREEN: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h\x1b[0m";

const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
const INVERSE: &[u8] = b"\x1b[7m";
const RESET: &[u8] = b"\x1b[0m";

/// Placeholder for rows past the end of the document
const EMPTY_ROW: u8 = b'~';

#[cfg_attr(test, derive(Debug))]
#[derive(Copy, Clone)]
pub struct UintToBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> UintToBytes<N> {
    pub fn from_uint<I: Into<usize>>(n: I) -> Option<Self> {
        let mut n: usize = n.into();

        if N >= 20 || n < 10_usize.pow(N as u32) {
            let mut bytes = [0; N];

            for i in (0..N).rev() {
                bytes[i] = 0x30 + (n % 10) as u8;
                n /= 10;

                if n == 0 {
                    break;
                }
            }

            Some(Self { bytes })
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        let start = self.bytes.iter().take_while(|&&b| b == 0).count();
        &self.bytes[start..]
    }
}

/// Wide enough for any `usize`
type Decimal = UintToBytes<20>;

struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn put_uint(&mut self, n: usize) {
        if let Some(decimal) = Decimal::from_uint(n) {
            self.put(decimal.as_bytes());
        }
    }

    /// Move cursor to 0-based `row`, `col`
    fn goto(&mut self, row: usize, col: usize) {
        self.put(b"\x1b[");
        self.put_uint(row + 1);
        self.put(b";");
        self.put_uint(col + 1);
        self.put(b"H");
    }

    /// Write `text` truncated and space padded to exactly `width` bytes
    fn put_padded(&mut self, text: &[u8], width: usize) {
        let text = &text[..text.len().min(width)];
        self.put(text);
        self.bytes
            .extend(core::iter::repeat(b' ').take(width - text.len()));
    }
}

fn status_left(editor: &Editor) -> Vec<u8> {
    let mut left = Vec::new();

    if editor.mode() == Mode::Command {
        left.extend_from_slice(editor.mode().indicator().as_bytes());
        left.extend_from_slice(editor.command_line().as_bytes());
    } else if !editor.status().is_empty() {
        left.extend_from_slice(editor.status().as_bytes());
    } else {
        if editor.mode() == Mode::Insert {
            left.extend_from_slice(editor.mode().indicator().as_bytes());
            left.push(b' ');
        }

        left.extend_from_slice(editor.path().unwrap_or("[No Name]").as_bytes());

        if editor.is_modified() {
            left.extend_from_slice(b" [+]");
        }
    }

    left
}

fn status_right(editor: &Editor) -> Vec<u8> {
    let cursor = editor.cursor();
    let mut right = Vec::new();

    if let Some(row) = Decimal::from_uint(cursor.row + 1) {
        right.extend_from_slice(row.as_bytes());
    }
    right.push(b',');
    if let Some(col) = Decimal::from_uint(cursor.col + 1) {
        right.extend_from_slice(col.as_bytes());
    }

    right
}

/// Render one frame for a screen of `size`. The editor viewport is
/// expected to have been adjusted for `size` already.
pub fn render(editor: &Editor, size: ScreenSize) -> Vec<u8> {
    let text_rows = size.text_rows();
    let text_cols = size.text_cols();
    let viewport = editor.viewport();
    let buffer = editor.buffer();

    let mut frame = Frame::new();
    frame.put(HIDE_CURSOR);

    for screen_row in 0..text_rows {
        frame.goto(screen_row, 0);

        match buffer.line(viewport.top_line + screen_row) {
            Some(line) => {
                let visible = line.get(viewport.left_col..).unwrap_or_default();
                frame.put_padded(visible, text_cols);
            }
            None => frame.put_padded(&[EMPTY_ROW], text_cols),
        }
    }

    // The last column is never written
    let width = text_cols - 1;
    let left = status_left(editor);
    let right = status_right(editor);
    let padding = width.saturating_sub(left.len() + right.len());

    let mut status = left;
    status.extend(core::iter::repeat(b' ').take(padding));
    status.extend_from_slice(&right);
    status.truncate(width);

    frame.goto(text_rows, 0);
    frame.put(INVERSE);
    frame.put(&status);
    frame.put(RESET);

    let position = viewport.screen_position(editor.cursor());
    frame.goto(position.row, position.col);
    frame.put(SHOW_CURSOR);

    frame.bytes
}
