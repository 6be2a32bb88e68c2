//! Novi is an IO-agnostic `#[no_std]` modal text editor in the vi
//! tradition. The core functionality is IO-free, so it can be driven by
//! a raw terminal, a serial port or a test harness alike.
//!
//! Features:
//! - IO-free core, terminal and filesystem are reached through traits
//! - Normal, Insert and Command modes
//! - `:q`, `:q!`, `:w [path]`, `:wq` and `:x`
//! - Arrow, Home, End and Delete keys in both `CSI` and `SS3` form
//! - Full-screen rendering with horizontal and vertical scrolling
//!
//! The API should be considered experimental and will change in the
//! future.
//!
//! The core consists of a byte decoder producing [`input::Key`]s, the
//! modal [`Editor`] state machine and a renderer producing complete
//! terminal frames. [`session::Session`] ties them together over a
//! [`io::TerminalIo`] and a [`io::FileStore`].
//!
//! # Example
//! ```
//! use novi::{input::Key, Editor};
//!
//! let mut editor = Editor::new();
//!
//! for &b in b"ihello" {
//!     editor.handle_key(Key::Char(b));
//! }
//! editor.handle_key(Key::Esc);
//!
//! assert_eq!(editor.lines()[0], b"hello");
//! assert!(editor.is_modified());
//! ```

#![no_std]

extern crate alloc;

#[cfg(any(test, doc, feature = "std"))]
#[macro_use]
extern crate std;

pub mod command;
mod core;
pub mod error;
pub mod input;
pub mod io;
pub mod line_buffer;
pub mod mode;
pub mod output;
pub mod session;
pub mod viewport;

pub use crate::core::{Editor, SaveRequest, COMMAND_CAPACITY};

#[cfg(test)]
pub(crate) mod testlib;
