use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Stdout, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use embedded_io::ErrorKind;
use novi::error::NoviError;
use novi::input::ControlCharacter;
use novi::io::std_io::StdFiles;
use novi::io::TerminalIo;
use novi::session::Session;
use novi::viewport::ScreenSize;
use novi::Editor;
use termion::raw::{IntoRawMode, RawTerminal};
use termion::AsyncReader;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Sleep between polls when no key is pending
const IDLE_DELAY: Duration = Duration::from_millis(10);

/// How long to wait for the rest of a sequence after `ESC`
const ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);
const ESCAPE_POLL: Duration = Duration::from_millis(2);

/// Environment variable naming the log file
const LOG_ENV: &str = "NOVI_LOG";

#[derive(Parser, Debug)]
#[command(name = "novi", version, about = "A small modal text editor")]
struct Args {
    /// File to edit, created on first write if missing
    path: Option<String>,
}

/// Raw mode terminal on stdin and stdout. Raw mode ends when dropped.
struct Tty<R: Read, W: Write> {
    input: R,
    output: W,
    after_escape: bool,
}

impl Tty<AsyncReader, RawTerminal<Stdout>> {
    fn new() -> io::Result<Self> {
        Ok(Self::with(termion::async_stdin(), io::stdout().into_raw_mode()?))
    }
}

impl<R: Read, W: Write> Tty<R, W> {
    fn with(input: R, output: W) -> Self {
        Self {
            input,
            output,
            after_escape: false,
        }
    }

    fn try_read(&mut self) -> Result<Option<u8>, NoviError> {
        let mut buf = [0u8; 1];

        match self.input.read(&mut buf) {
            Ok(1) => Ok(Some(buf[0])),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(NoviError::ReadError(err.kind().into())),
        }
    }
}

impl<R: Read, W: Write> TerminalIo for Tty<R, W> {
    /// Non-blocking, except right after an `ESC` where the rest of an
    /// escape sequence gets `ESCAPE_TIMEOUT` to arrive
    fn read_byte(&mut self) -> Result<Option<u8>, NoviError> {
        let follows_escape = std::mem::take(&mut self.after_escape);
        let deadline = Instant::now() + ESCAPE_TIMEOUT;

        loop {
            let byte = self.try_read()?;

            if byte.is_some() || !follows_escape || Instant::now() >= deadline {
                self.after_escape = byte == Some(ControlCharacter::Escape.into());
                return Ok(byte);
            }

            thread::sleep(ESCAPE_POLL);
        }
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), NoviError> {
        self.output
            .write_all(buf)
            .map_err(|err| NoviError::WriteError(ErrorKind::from(err.kind())))
    }

    fn flush(&mut self) -> Result<(), NoviError> {
        self.output
            .flush()
            .map_err(|err| NoviError::WriteError(ErrorKind::from(err.kind())))
    }

    fn screen_size(&mut self) -> Result<ScreenSize, NoviError> {
        Ok(termion::terminal_size()
            .map(|(cols, rows)| ScreenSize::new(rows.into(), cols.into()))
            .unwrap_or_default())
    }

    fn idle(&mut self) {
        thread::sleep(IDLE_DELAY);
    }
}

/// Log to the file named by `NOVI_LOG`, filtered by `RUST_LOG`
/// (default `debug`). Nothing is logged when `NOVI_LOG` is unset, the
/// terminal belongs to the editor.
fn init_tracing() {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return;
    };

    let log_file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("novi: cannot create log file {:?}: {}", path, err);
            return;
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut files = StdFiles::new();

    let editor = match args.path.as_deref() {
        Some(path) => Editor::open(path, &mut files),
        None => Editor::new(),
    };

    let mut tty = Tty::new()?;
    Session::new(editor).run(&mut tty, &mut files)?;

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    tracing::info!(path = ?args.path, "starting");

    // The terminal is restored once `run` returns
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::warn!(%err, "terminal failure");
            eprintln!("novi: {}", err);
            ExitCode::FAILURE
        }
    }
}
