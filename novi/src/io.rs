//! Capabilities the editor needs from its host.
//!
//! The terminal is reached through [`TerminalIo`] and the filesystem
//! through [`FileStore`]. [`IO`] adapts any [`embedded_io`] reader and
//! writer pair into a [`TerminalIo`].

use alloc::vec::Vec;

use embedded_io::Error;

use crate::error::{FileError, NoviError};
use crate::line_buffer::Line;
use crate::viewport::ScreenSize;

pub trait TerminalIo {
    /// Read one byte without blocking. `Ok(None)` when nothing is
    /// available right now.
    fn read_byte(&mut self) -> Result<Option<u8>, NoviError>;
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), NoviError>;
    fn flush(&mut self) -> Result<(), NoviError>;
    fn screen_size(&mut self) -> Result<ScreenSize, NoviError>;

    /// Called when no key was available, hosts with a clock should
    /// sleep briefly here
    fn idle(&mut self) {}
}

pub trait FileStore {
    fn load_text(&mut self, path: &str) -> Result<Vec<Line>, FileError>;
    fn save_text(&mut self, path: &str, lines: &[Line]) -> Result<(), FileError>;
}

pub struct IO<R, W>
where
    R: embedded_io::Read + embedded_io::ReadReady,
    W: embedded_io::Write,
{
    input: R,
    output: W,
    size: ScreenSize,
}

impl<R, W> IO<R, W>
where
    R: embedded_io::Read + embedded_io::ReadReady,
    W: embedded_io::Write,
{
    /// Create IO wrapper from input and output
    pub fn new(input: R, output: W, size: ScreenSize) -> Self {
        Self {
            input,
            output,
            size,
        }
    }

    /// Update the size reported to the editor
    pub fn resize(&mut self, size: ScreenSize) {
        self.size = size;
    }

    /// Consume wrapper and return input and output as tuple
    pub fn take(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R, W> TerminalIo for IO<R, W>
where
    R: embedded_io::Read + embedded_io::ReadReady,
    W: embedded_io::Write,
{
    fn read_byte(&mut self) -> Result<Option<u8>, NoviError> {
        let ready = self
            .input
            .read_ready()
            .map_err(|e| NoviError::ReadError(e.kind()))?;

        if !ready {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        let len = self
            .input
            .read(&mut buf)
            .map_err(|e| NoviError::ReadError(e.kind()))?;

        Ok((len == 1).then_some(buf[0]))
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), NoviError> {
        self.output
            .write_all(buf)
            .map_err(|e| NoviError::WriteError(e.kind()))
    }

    fn flush(&mut self) -> Result<(), NoviError> {
        self.output
            .flush()
            .map_err(|e| NoviError::WriteError(e.kind()))
    }

    fn screen_size(&mut self) -> Result<ScreenSize, NoviError> {
        Ok(self.size)
    }
}

#[cfg(any(test, feature = "std"))]
pub mod std_io {
    //! [`FileStore`] on top of `std::fs`. Requires feature `std`.

    use super::*;
    use crate::line_buffer::{join_lines, split_lines};
    use embedded_io::ErrorKind;
    use std::fs;

    #[derive(Debug, Default, Clone, Copy)]
    pub struct StdFiles;

    impl StdFiles {
        pub fn new() -> Self {
            Self
        }
    }

    impl FileStore for StdFiles {
        fn load_text(&mut self, path: &str) -> Result<Vec<Line>, FileError> {
            let content = fs::read(path).map_err(|e| FileError::from(ErrorKind::from(e.kind())))?;
            Ok(split_lines(&content))
        }

        fn save_text(&mut self, path: &str, lines: &[Line]) -> Result<(), FileError> {
            fs::write(path, join_lines(lines))
                .map_err(|e| FileError::from(ErrorKind::from(e.kind())))
        }
    }

}
