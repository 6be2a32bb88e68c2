//! Editor modes

/// Exactly one mode is active at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Navigation and single-key commands
    #[default]
    Normal,
    /// Text entry
    Insert,
    /// Typing an ex command after `:`
    Command,
}

impl Mode {
    /// Indicator shown on the status line
    pub fn indicator(&self) -> &'static str {
        match self {
            Mode::Normal => "",
            Mode::Insert => "-- INSERT --",
            Mode::Command => ":",
        }
    }
}
