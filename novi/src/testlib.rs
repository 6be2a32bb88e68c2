use std::collections::BTreeMap;
use std::string::{String, ToString};
use std::vec::Vec;

use crossbeam::channel::{unbounded, Receiver, Sender, TryRecvError};
use embedded_io::ErrorKind;

use crate::core::Editor;
use crate::error::{FileError, NoviError};
use crate::input::Key;
use crate::io::{FileStore, TerminalIo};
use crate::line_buffer::{Line, LineBuffer};
use crate::viewport::ScreenSize;

pub mod csi {
    pub const UP: &str = "\x1b[A";
    pub const DOWN: &str = "\x1b[B";
    pub const RIGHT: &str = "\x1b[C";
    pub const DELETE: &str = "\x1b[3~";
}

pub fn editor_with(lines: &[&str]) -> Editor {
    Editor::with_buffer(
        LineBuffer::from_lines(lines.iter().map(|s| s.as_bytes().to_vec()).collect()),
        None,
    )
}

/// Feed every byte of `keys` as a [`Key::Char`]
pub fn type_keys(editor: &mut Editor, keys: &str) {
    for b in keys.bytes() {
        editor.handle_key(Key::Char(b));
    }
}

pub fn lines_as_strings(editor: &Editor) -> Vec<String> {
    editor
        .lines()
        .iter()
        .map(|line| String::from_utf8_lossy(line).to_string())
        .collect()
}

/// In-memory [`FileStore`]
#[derive(Default)]
pub struct MemFiles {
    files: BTreeMap<String, Vec<Line>>,
    failure: Option<ErrorKind>,
    pub saves: usize,
}

impl MemFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, lines: &[&str]) {
        self.files.insert(
            path.to_string(),
            lines.iter().map(|s| s.as_bytes().to_vec()).collect(),
        );
    }

    /// Make every following load and save fail with `kind`
    pub fn fail_with(&mut self, kind: ErrorKind) {
        self.failure = Some(kind);
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|lines| String::from_utf8_lossy(&crate::line_buffer::join_lines(lines)).to_string())
    }
}

impl FileStore for MemFiles {
    fn load_text(&mut self, path: &str) -> Result<Vec<Line>, FileError> {
        if let Some(kind) = self.failure {
            return Err(FileError::from(kind));
        }

        self.files.get(path).cloned().ok_or(FileError::NotFound)
    }

    fn save_text(&mut self, path: &str, lines: &[Line]) -> Result<(), FileError> {
        if let Some(kind) = self.failure {
            return Err(FileError::from(kind));
        }

        self.saves += 1;
        self.files.insert(path.to_string(), lines.to_vec());
        Ok(())
    }
}

/// Scripted terminal. Keyboard bytes arrive over a channel, a `None`
/// entry is a pause where no byte is available. Once the channel is
/// drained and every sender is gone reads fail, which ends a session
/// that forgot to quit.
pub struct MockTerminal {
    pub keyboard_tx: Sender<Option<u8>>,
    keyboard_rx: Receiver<Option<u8>>,
    pub output: Vec<u8>,
    pub flushed: usize,
    pub idles: usize,
    pub size: ScreenSize,
}

impl MockTerminal {
    pub fn new(rows: usize, cols: usize) -> Self {
        let (keyboard_tx, keyboard_rx) = unbounded();

        Self {
            keyboard_tx,
            keyboard_rx,
            output: Vec::new(),
            flushed: 0,
            idles: 0,
            size: ScreenSize::new(rows, cols),
        }
    }

    /// Queue `keys` followed by a pause
    pub fn send(&self, keys: &str) {
        for b in keys.bytes() {
            self.keyboard_tx.send(Some(b)).unwrap();
        }
        self.keyboard_tx.send(None).unwrap();
    }

    /// Drop our own sender so reads fail once the script is consumed
    pub fn close(&mut self) {
        let (tx, _) = unbounded();
        self.keyboard_tx = tx;
    }

    pub fn output_as_string(&self) -> String {
        String::from_utf8_lossy(&self.output).to_string()
    }
}

impl TerminalIo for MockTerminal {
    fn read_byte(&mut self) -> Result<Option<u8>, NoviError> {
        match self.keyboard_rx.try_recv() {
            Ok(byte) => Ok(byte),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(NoviError::ReadError(ErrorKind::BrokenPipe)),
        }
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), NoviError> {
        self.output.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), NoviError> {
        self.flushed += 1;
        Ok(())
    }

    fn screen_size(&mut self) -> Result<ScreenSize, NoviError> {
        Ok(self.size)
    }

    fn idle(&mut self) {
        self.idles += 1;
    }
}
