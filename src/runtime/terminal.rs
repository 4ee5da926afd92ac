use std::io::{self, BufWriter, Read, Stdout, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use quill::input::{CodeSource, RESIZE_CODE};
use quill::render::{Color, Style, Surface};

/// X10 mouse reporting: `ESC [ M` followed by three bytes per event
const ENABLE_MOUSE: &str = "\x1b[?1000h";
const DISABLE_MOUSE: &str = "\x1b[?1000l";

/// How long to wait for input before checking the terminal size
const SIZE_POLL: Duration = Duration::from_millis(100);

const FALLBACK_SIZE: (usize, usize) = (24, 80);

/// Raw mode, alternate screen and mouse reporting for as long as it lives
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            Clear(ClearType::All),
            Print(ENABLE_MOUSE)
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Print(DISABLE_MOUSE), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// [`Surface`] drawing to stdout through crossterm
///
/// Output is queued and only reaches the terminal on `flush`.
pub struct TerminalSurface {
    out: BufWriter<Stdout>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            out: BufWriter::new(io::stdout()),
        }
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (usize, usize) {
        match terminal::size() {
            Ok((cols, rows)) => (rows as usize, cols as usize),
            Err(e) => {
                tracing::warn!("Could not read terminal size: {}", e);
                FALLBACK_SIZE
            }
        }
    }

    fn move_to(&mut self, row: usize, col: usize) -> io::Result<()> {
        queue!(self.out, MoveTo(cell(col), cell(row)))
    }

    fn write(&mut self, text: &str, style: Style) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(to_crossterm(style.fg)),
            SetBackgroundColor(to_crossterm(style.bg)),
            Print(text),
            ResetColor
        )
    }

    fn show_cursor(&mut self, position: Option<(usize, usize)>) -> io::Result<()> {
        match position {
            Some((row, col)) => queue!(self.out, MoveTo(cell(col), cell(row)), Show),
            None => queue!(self.out, Hide),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn cell(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn to_crossterm(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Default => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::White => C::Grey,
    }
}

/// Raw stdin bytes as input codes, plus [`RESIZE_CODE`] when the size changes
///
/// A reader thread feeds a channel; between bytes the source polls the
/// terminal size.
pub struct StdinSource {
    codes: Receiver<i32>,
    size: (u16, u16),
}

impl StdinSource {
    pub fn spawn() -> io::Result<Self> {
        let size = terminal::size()?;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut byte = [0u8; 1];
                loop {
                    match stdin.read(&mut byte) {
                        Ok(0) => break,
                        Ok(_) => {
                            if tx.send(i32::from(byte[0])).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::error!("stdin read failed: {}", e);
                            break;
                        }
                    }
                }
            })?;

        Ok(Self { codes: rx, size })
    }
}

impl CodeSource for StdinSource {
    fn read_code(&mut self) -> Option<i32> {
        loop {
            match self.codes.recv_timeout(SIZE_POLL) {
                Ok(code) => return Some(code),
                Err(RecvTimeoutError::Timeout) => {
                    if let Ok(size) = terminal::size() {
                        if size != self.size {
                            self.size = size;
                            return Some(RESIZE_CODE);
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}
