//! The editing session loop.
//!
//! Each cycle renders the editor state, reads at most one key and
//! applies it. Saves requested by the editor are carried out through the
//! [`FileStore`] here, so the editor itself stays free of IO.

use alloc::vec::Vec;

use crate::core::Editor;
use crate::error::NoviError;
use crate::input::Decoder;
use crate::io::{FileStore, TerminalIo};
use crate::output::{render, ENTER_SCREEN, LEAVE_SCREEN};

pub struct Session {
    editor: Editor,
    decoder: Decoder,
    last_frame: Vec<u8>,
}

impl Session {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            decoder: Decoder::new(),
            last_frame: Vec::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Run until the editor stops. The screen is cleared on entry and
    /// restored on exit, also when a terminal error ends the loop early.
    pub fn run<T, F>(&mut self, io: &mut T, files: &mut F) -> Result<(), NoviError>
    where
        T: TerminalIo,
        F: FileStore,
    {
        io.write_bytes(ENTER_SCREEN)?;
        io.flush()?;

        let result = self.run_loop(io, files);

        if let Err(err) = &result {
            tracing::warn!(%err, "session aborted");
        }

        io.write_bytes(LEAVE_SCREEN)?;
        io.flush()?;

        result
    }

    fn run_loop<T, F>(&mut self, io: &mut T, files: &mut F) -> Result<(), NoviError>
    where
        T: TerminalIo,
        F: FileStore,
    {
        while self.editor.is_running() {
            self.redraw(io)?;

            match self.decoder.next_key(|| io.read_byte())? {
                Some(key) => {
                    if let Some(request) = self.editor.handle_key(key) {
                        let result = files.save_text(&request.path, self.editor.lines());
                        self.editor.finish_save(request, result);
                    }
                }
                None => io.idle(),
            }
        }

        tracing::debug!("session finished");
        Ok(())
    }

    fn redraw<T: TerminalIo>(&mut self, io: &mut T) -> Result<(), NoviError> {
        let size = io.screen_size()?;
        self.editor.adjust_viewport(size);

        let frame = render(&self.editor, size);

        if frame != self.last_frame {
            io.write_bytes(&frame)?;
            io.flush()?;
            self.last_frame = frame;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_buffer::LineBuffer;
    use crate::mode::Mode;
    use crate::testlib::{csi, editor_with, lines_as_strings, MemFiles, MockTerminal};
    use crate::viewport::Cursor;
    use embedded_io::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::string::String;
    use std::thread;

    fn run_script(editor: Editor, files: &mut MemFiles, chunks: &[&str]) -> (Session, MockTerminal) {
        let mut term = MockTerminal::new(5, 20);
        for chunk in chunks {
            term.send(chunk);
        }
        term.close();

        let mut session = Session::new(editor);
        assert_eq!(session.run(&mut term, files), Ok(()));

        (session, term)
    }

    #[test]
    fn write_then_quit() {
        let mut files = MemFiles::new();

        let (session, _) = run_script(Editor::new(), &mut files, &["ihi", "\x1b", ":w out.txt\r:q\r"]);

        assert_eq!(files.content("out.txt").as_deref(), Some("hi\n"));
        assert_eq!(session.editor().path(), Some("out.txt"));
        assert!(!session.editor().is_running());
    }

    #[test]
    fn write_quit_existing_file() {
        let mut files = MemFiles::new();
        files.insert("a.txt", &["one", "two"]);
        let editor = Editor::open("a.txt", &mut files);

        run_script(editor, &mut files, &["jdOzero", "\x1b", ":wq\r"]);

        assert_eq!(files.content("a.txt").as_deref(), Some("zero\none\n"));
    }

    #[test]
    fn failed_save_keeps_running() {
        let mut files = MemFiles::new();
        files.fail_with(ErrorKind::PermissionDenied);

        let editor = Editor::with_buffer(LineBuffer::new(), Some(String::from("ro.txt")));
        let (session, _) = run_script(editor, &mut files, &["ix", "\x1b", ":wq\r", ":q!\r"]);

        assert_eq!(files.saves, 0);
        assert!(!session.editor().is_running());
        assert!(session.editor().is_modified());
    }

    #[test]
    fn arrow_keys_in_insert_mode() {
        let mut files = MemFiles::new();
        let editor = editor_with(&["ac", "x"]);

        let keys = std::format!("i{}{}b{}{}", csi::DOWN, csi::UP, csi::RIGHT, csi::DELETE);
        let (session, _) = run_script(editor, &mut files, &[keys.as_str(), "\x1b", ":q!\r"]);

        assert_eq!(lines_as_strings(session.editor()), ["ba", "x"]);
        assert_eq!(session.editor().mode(), Mode::Normal);
    }

    #[test]
    fn screen_entered_and_restored() {
        let mut files = MemFiles::new();
        let (_, term) = run_script(editor_with(&["text"]), &mut files, &[":q\r"]);

        assert!(term.output.starts_with(ENTER_SCREEN));
        assert!(term.output.ends_with(LEAVE_SCREEN));
        assert!(term.output_as_string().contains("text"));
        assert!(term.flushed >= 3);
    }

    #[test]
    fn unchanged_frames_not_rewritten() {
        let mut files = MemFiles::new();
        let mut term = MockTerminal::new(5, 20);
        for _ in 0..10 {
            term.send("");
        }
        term.send(":q\r");
        term.close();

        let mut session = Session::new(editor_with(&["text"]));
        session.run(&mut term, &mut files).unwrap();

        // Initial frame, then one per key that changed the command line
        assert_eq!(term.output_as_string().matches("\x1b[1;1Htext").count(), 3);
        assert_eq!(term.idles, 10);
    }

    #[test]
    fn read_error_restores_screen() {
        let mut files = MemFiles::new();
        let mut term = MockTerminal::new(5, 20);
        term.send("ix");
        term.close();

        let mut session = Session::new(Editor::new());
        let result = session.run(&mut term, &mut files);

        assert_eq!(result, Err(NoviError::ReadError(ErrorKind::BrokenPipe)));
        assert!(term.output.ends_with(LEAVE_SCREEN));
        assert_eq!(lines_as_strings(session.editor()), ["x"]);
    }

    #[test]
    fn scrolls_to_cursor() {
        let lines: std::vec::Vec<String> = (0..50).map(|i| std::format!("line {}", i)).collect();
        let lines: std::vec::Vec<&str> = lines.iter().map(|s| s.as_str()).collect();

        let mut editor = editor_with(&lines);
        editor.set_cursor(Cursor::new(30, 0));

        let mut files = MemFiles::new();
        let (session, term) = run_script(editor, &mut files, &[":q\r"]);

        let viewport = session.editor().viewport();
        assert!(viewport.top_line <= 30 && 30 < viewport.top_line + term.size.text_rows());
        assert!(term.output_as_string().contains("line 30"));
    }

    #[test]
    fn threaded_session() {
        let term = MockTerminal::new(5, 20);
        let keyboard = term.keyboard_tx.clone();

        let handle = thread::spawn(move || {
            let mut term = term;
            let mut files = MemFiles::new();
            let mut session = Session::new(Editor::new());

            session.run(&mut term, &mut files).map(|_| files)
        });

        for &b in b"iabc" {
            keyboard.send(Some(b)).unwrap();
        }
        keyboard.send(None).unwrap();
        keyboard.send(Some(0x1b)).unwrap();
        keyboard.send(None).unwrap();
        for &b in b":w t.txt\r:q\r" {
            keyboard.send(Some(b)).unwrap();
        }

        let files = handle.join().unwrap().unwrap();
        assert_eq!(files.content("t.txt").as_deref(), Some("abc\n"));
    }
}
