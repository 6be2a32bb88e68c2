//! Parsing of command-line input typed after `:`

/// Parsed ex command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `q`, or `q!` when forced
    Quit { force: bool },
    /// `w`, or `w <path>`
    Write(Option<&'a str>),
    /// `wq` and `x`
    WriteQuit,
    /// Nothing typed
    Empty,
    Unknown(&'a str),
}

/// Parse command line content (without the leading `:`). Leading spaces
/// are ignored, anything else must match exactly.
pub fn parse_command(input: &str) -> Command<'_> {
    let cmd = input.trim_start_matches(' ');

    match cmd {
        "" => Command::Empty,
        "q" => Command::Quit { force: false },
        "q!" => Command::Quit { force: true },
        "w" => Command::Write(None),
        "wq" | "x" => Command::WriteQuit,
        _ => match cmd.strip_prefix("w ") {
            Some(path) => {
                let path = path.trim_matches(' ');
                Command::Write((!path.is_empty()).then_some(path))
            }
            None => Command::Unknown(cmd),
        },
    }
}
