//! Decoding of raw terminal bytes into logical keys.
//!
//! [`Decoder`] is a small state machine fed one byte at a time. Plain
//! bytes are decoded immediately, an `ESC` starts collecting an escape
//! sequence which is matched against [`SEQUENCES`].

use heapless::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Capacity of the escape sequence accumulator
pub const ESCAPE_CAPACITY: usize = 8;

/// Logical key produced by the [`Decoder`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Key {
    /// Printable ASCII byte
    Char(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    Backspace,
    Enter,
    Esc,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ControlCharacter {
    CtrlH = 0x8,
    LineFeed = 0xA,
    CarriageReturn = 0xD,
    Escape = 0x1B,
    Backspace = 0x7F,
}

/// Recognized escape sequences, both the `CSI` and `SS3` forms.
pub const SEQUENCES: &[(&[u8], Key)] = &[
    (b"\x1b[A", Key::Up),
    (b"\x1b[B", Key::Down),
    (b"\x1b[C", Key::Right),
    (b"\x1b[D", Key::Left),
    (b"\x1b[H", Key::Home),
    (b"\x1b[F", Key::End),
    (b"\x1bOA", Key::Up),
    (b"\x1bOB", Key::Down),
    (b"\x1bOC", Key::Right),
    (b"\x1bOD", Key::Left),
    (b"\x1bOH", Key::Home),
    (b"\x1bOF", Key::End),
    (b"\x1b[1~", Key::Home),
    (b"\x1b[3~", Key::Delete),
    (b"\x1b[4~", Key::End),
];

fn lookup(sequence: &[u8]) -> Option<Key> {
    SEQUENCES
        .iter()
        .find(|(candidate, _)| *candidate == sequence)
        .map(|&(_, key)| key)
}

#[derive(Debug, Eq, PartialEq)]
enum State {
    Idle,
    CollectingEscape(Vec<u8, ESCAPE_CAPACITY>),
}

/// Result of feeding one byte to the [`Decoder`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Decoded {
    Key(Key),
    /// Byte consumed, no key yet
    Pending,
    /// Byte (and any collected sequence) discarded
    Ignored,
}

impl Decoded {
    pub fn key(self) -> Option<Key> {
        match self {
            Decoded::Key(key) => Some(key),
            Decoded::Pending | Decoded::Ignored => None,
        }
    }
}

pub struct Decoder {
    state: State,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// True right after a lone `ESC`, before any follow-up byte arrived
    fn is_lone_escape(&self) -> bool {
        matches!(&self.state, State::CollectingEscape(buf) if buf.len() == 1)
    }

    pub fn advance(&mut self, byte: u8) -> Decoded {
        match self.state {
            State::Idle => match ControlCharacter::try_from(byte) {
                Ok(ControlCharacter::Escape) => {
                    let mut buf = Vec::new();
                    let _ = buf.push(byte);
                    self.state = State::CollectingEscape(buf);
                    Decoded::Pending
                }
                Ok(ControlCharacter::Backspace | ControlCharacter::CtrlH) => {
                    Decoded::Key(Key::Backspace)
                }
                Ok(ControlCharacter::CarriageReturn | ControlCharacter::LineFeed) => {
                    Decoded::Key(Key::Enter)
                }
                Err(_) => match byte {
                    0x20..=0x7e => Decoded::Key(Key::Char(byte)),
                    _ => Decoded::Ignored,
                },
            },
            State::CollectingEscape(ref mut buf) => {
                if buf.push(byte).is_err() {
                    self.state = State::Idle;
                    return Decoded::Ignored;
                }

                if let Some(key) = lookup(buf) {
                    self.state = State::Idle;
                    Decoded::Key(key)
                } else if buf.is_full() {
                    tracing::trace!(len = buf.len(), "discarding unrecognized escape sequence");
                    self.state = State::Idle;
                    Decoded::Ignored
                } else {
                    Decoded::Pending
                }
            }
        }
    }

    /// Decode at most one key, pulling bytes from `read_byte`.
    ///
    /// `read_byte` must not block; `Ok(None)` means no byte is available
    /// right now. After a lone `ESC` exactly one more read is attempted,
    /// and if that yields nothing a plain [`Key::Esc`] is emitted.
    pub fn next_key<E>(
        &mut self,
        mut read_byte: impl FnMut() -> Result<Option<u8>, E>,
    ) -> Result<Option<Key>, E> {
        let Some(byte) = read_byte()? else {
            return Ok(None);
        };

        let decoded = self.advance(byte);

        if self.is_lone_escape() {
            return Ok(match read_byte()? {
                Some(byte) => self.advance(byte).key(),
                None => {
                    self.state = State::Idle;
                    Some(Key::Esc)
                }
            });
        }

        Ok(decoded.key())
    }
}
