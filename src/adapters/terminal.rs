use crate::error::TitleError;
use crate::ports::TitleSurface;
use std::io::{self, Stdout, Write};

/// Terminal window title set through the xterm `OSC 2` sequence.
///
/// Terminals do not report their title back, so `read_title` is always `None`
/// and the synchronizer falls back to the title it last applied.
pub struct TerminalTitle<W: Write> {
    out: W,
}

impl TerminalTitle<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalTitle<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Control characters would end the sequence early
fn sanitize(title: &str) -> String {
    title.chars().filter(|c| !c.is_control()).collect()
}

impl<W: Write> TitleSurface for TerminalTitle<W> {
    fn read_title(&self) -> Option<String> {
        None
    }

    fn write_title(&mut self, _current: &str, new_title: &str) -> Result<(), TitleError> {
        write!(self.out, "\x1b]2;{}\x07", sanitize(new_title))
            .and_then(|_| self.out.flush())
            .map_err(|source| TitleError::Io { source })
    }
}
