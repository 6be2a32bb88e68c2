//! Modal editing state machine.
//!
//! [`Editor`] owns the whole session state: document, cursor, viewport,
//! mode, command line and file metadata. Keys from the
//! [`crate::input::Decoder`] are applied with [`Editor::handle_key`].
//! The editor never touches the filesystem itself, a save is handed back
//! to the caller as a [`SaveRequest`] and the outcome reported through
//! [`Editor::finish_save`].

use alloc::format;
use alloc::string::String;

use crate::command::{parse_command, Command};
use crate::error::FileError;
use crate::input::Key;
use crate::io::FileStore;
use crate::line_buffer::{Line, LineBuffer};
use crate::mode::Mode;
use crate::viewport::{Cursor, ScreenSize, Viewport};

/// Maximum number of bytes held by the command line
pub const COMMAND_CAPACITY: usize = 63;

const UNSAVED_QUIT: &str = "No write since last change (add ! to override)";

/// Save requested by a command, to be carried out by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub path: String,
    /// Quit once the save succeeded
    pub quit: bool,
}

#[derive(Debug)]
pub struct Editor {
    buffer: LineBuffer,
    cursor: Cursor,
    viewport: Viewport,
    mode: Mode,
    command: heapless::Vec<u8, COMMAND_CAPACITY>,
    path: Option<String>,
    modified: bool,
    status: String,
    running: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Unnamed editor with an empty document
    pub fn new() -> Self {
        let mut editor = Self::with_buffer(LineBuffer::new(), None);
        editor.status.push_str("[No Name]");
        editor
    }

    pub fn with_buffer(buffer: LineBuffer, path: Option<String>) -> Self {
        Self {
            buffer,
            cursor: Cursor::default(),
            viewport: Viewport::default(),
            mode: Mode::Normal,
            command: heapless::Vec::new(),
            path,
            modified: false,
            status: String::new(),
            running: true,
        }
    }

    /// Load `path` through `files`. A missing or unreadable file starts
    /// an empty document that will be saved to `path`.
    pub fn open<F: FileStore>(path: &str, files: &mut F) -> Self {
        let (buffer, status) = match files.load_text(path) {
            Ok(lines) => {
                let buffer = LineBuffer::from_lines(lines);
                let status = format!("\"{}\" {} lines", path, buffer.line_count());
                tracing::info!(path, lines = buffer.line_count(), "loaded file");
                (buffer, status)
            }
            Err(FileError::NotFound) => (LineBuffer::new(), String::from("[New File]")),
            Err(err) => {
                tracing::warn!(path, %err, "failed to load file");
                (LineBuffer::new(), format!("Cannot read: {}", path))
            }
        };

        let mut editor = Self::with_buffer(buffer, Some(String::from(path)));
        editor.status = status;
        editor
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn lines(&self) -> &[Line] {
        self.buffer.lines()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move cursor, clamped to the current mode
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.clamp_cursor();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Content typed after `:`
    pub fn command_line(&self) -> &str {
        core::str::from_utf8(&self.command).unwrap_or_default()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Scroll the viewport so the cursor is visible on a screen of `size`
    pub fn adjust_viewport(&mut self, size: ScreenSize) {
        self.viewport.adjust(self.cursor, size);
    }

    pub fn handle_key(&mut self, key: Key) -> Option<SaveRequest> {
        tracing::trace!(?key, mode = ?self.mode, "key");

        match self.mode {
            Mode::Normal => {
                self.handle_normal(key);
                None
            }
            Mode::Insert => {
                self.handle_insert(key);
                None
            }
            Mode::Command => self.handle_command(key),
        }
    }

    /// Report the outcome of a [`SaveRequest`]
    pub fn finish_save(&mut self, request: SaveRequest, result: Result<(), FileError>) {
        match result {
            Ok(()) => {
                tracing::info!(path = %request.path, lines = self.buffer.line_count(), "saved file");

                self.modified = false;
                self.status = format!(
                    "\"{}\" {} lines written",
                    request.path,
                    self.buffer.line_count()
                );
                self.path = Some(request.path);

                if request.quit {
                    self.running = false;
                }
            }
            Err(err) => {
                tracing::warn!(path = %request.path, %err, "failed to save file");
                self.status = format!("Cannot write: {}", request.path);
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        tracing::trace!(from = ?self.mode, to = ?mode, "mode change");
        self.mode = mode;
    }

    fn clamp_cursor(&mut self) {
        self.cursor.clamp(&self.buffer, self.mode);
    }

    fn current_line_len(&self) -> usize {
        self.buffer.line_len(self.cursor.row)
    }

    fn mark_modified(&mut self) {
        self.modified = true;
        self.status.clear();
    }

    fn move_left(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
        self.clamp_cursor();
    }

    fn move_right(&mut self) {
        self.cursor.col += 1;
        self.clamp_cursor();
    }

    fn move_up(&mut self) {
        self.cursor.row = self.cursor.row.saturating_sub(1);
        self.clamp_cursor();
    }

    fn move_down(&mut self) {
        self.cursor.row += 1;
        self.clamp_cursor();
    }

    fn handle_normal(&mut self, key: Key) {
        self.status.clear();

        match key {
            Key::Char(b'h') | Key::Left => self.move_left(),
            Key::Char(b'j') | Key::Down => self.move_down(),
            Key::Char(b'k') | Key::Up => self.move_up(),
            Key::Char(b'l') | Key::Right => self.move_right(),
            Key::Char(b'0') | Key::Home => self.cursor.col = 0,
            Key::Char(b'$') | Key::End => {
                self.cursor.col = self.current_line_len();
                self.clamp_cursor();
            }
            Key::Char(b'i') => self.set_mode(Mode::Insert),
            Key::Char(b'a') => {
                self.set_mode(Mode::Insert);
                self.move_right();
            }
            Key::Char(b'A') => {
                self.set_mode(Mode::Insert);
                self.cursor.col = self.current_line_len();
            }
            Key::Char(b'o') => {
                self.buffer.insert_line(self.cursor.row + 1, b"");
                self.cursor = Cursor::new(self.cursor.row + 1, 0);
                self.set_mode(Mode::Insert);
                self.mark_modified();
            }
            Key::Char(b'O') => {
                self.buffer.insert_line(self.cursor.row, b"");
                self.cursor.col = 0;
                self.set_mode(Mode::Insert);
                self.mark_modified();
            }
            Key::Char(b'x') | Key::Delete => {
                if self.current_line_len() > 0 {
                    self.buffer.delete_char(self.cursor.row, self.cursor.col);
                    self.mark_modified();
                    self.clamp_cursor();
                }
            }
            Key::Char(b'd') => {
                self.buffer.delete_line(self.cursor.row);
                self.mark_modified();
                self.clamp_cursor();
            }
            Key::Char(b'G') => {
                self.cursor.row = self.buffer.line_count() - 1;
                self.clamp_cursor();
            }
            Key::Char(b'g') => self.cursor = Cursor::new(0, 0),
            Key::Char(b':') => {
                self.command.clear();
                self.set_mode(Mode::Command);
            }
            _ => (),
        }
    }

    fn handle_insert(&mut self, key: Key) {
        match key {
            Key::Esc => {
                self.set_mode(Mode::Normal);
                self.move_left();
            }
            Key::Up => self.move_up(),
            Key::Down => self.move_down(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.cursor.col = 0,
            Key::End => self.cursor.col = self.current_line_len(),
            Key::Char(ch) => {
                self.buffer.insert_char(self.cursor.row, self.cursor.col, ch);
                self.cursor.col += 1;
                self.mark_modified();
            }
            Key::Enter => {
                self.buffer.split_line(self.cursor.row, self.cursor.col);
                self.cursor = Cursor::new(self.cursor.row + 1, 0);
                self.mark_modified();
            }
            Key::Backspace => {
                if self.cursor.col > 0 {
                    self.cursor.col -= 1;
                    self.buffer.delete_char(self.cursor.row, self.cursor.col);
                    self.mark_modified();
                } else if self.cursor.row > 0 {
                    let row = self.cursor.row - 1;
                    let col = self.buffer.join_with_next(row);
                    self.cursor = Cursor::new(row, col);
                    self.mark_modified();
                }
            }
            Key::Delete => {
                if self.cursor.col < self.current_line_len() {
                    self.buffer.delete_char(self.cursor.row, self.cursor.col);
                    self.mark_modified();
                }
            }
        }
    }

    fn handle_command(&mut self, key: Key) -> Option<SaveRequest> {
        match key {
            Key::Esc => {
                self.command.clear();
                self.status.clear();
                self.set_mode(Mode::Normal);
                None
            }
            Key::Enter => {
                let request = self.execute_command();
                self.command.clear();
                self.set_mode(Mode::Normal);
                request
            }
            Key::Backspace => {
                if self.command.pop().is_none() {
                    self.set_mode(Mode::Normal);
                }
                None
            }
            Key::Char(ch) => {
                // Input beyond capacity is dropped
                let _ = self.command.push(ch);
                None
            }
            _ => None,
        }
    }

    fn execute_command(&mut self) -> Option<SaveRequest> {
        let input = String::from(self.command_line());
        tracing::debug!(command = %input, "executing command");

        match parse_command(&input) {
            Command::Empty => None,
            Command::Quit { force } => {
                if self.modified && !force {
                    self.status = String::from(UNSAVED_QUIT);
                } else {
                    self.running = false;
                }
                None
            }
            Command::Write(path) => self.save_request(path, false),
            Command::WriteQuit => self.save_request(None, true),
            Command::Unknown(cmd) => {
                self.status = format!("Unknown command: {}", cmd);
                None
            }
        }
    }

    fn save_request(&mut self, path: Option<&str>, quit: bool) -> Option<SaveRequest> {
        let path = path.map(String::from).or_else(|| self.path.clone());

        if path.is_none() {
            self.status = String::from("No filename");
        }

        path.map(|path| SaveRequest { path, quit })
    }
}
