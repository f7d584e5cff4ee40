// Single-line progress status on the terminal
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Where transient progress messages go. Not part of the report.
pub trait ProgressSink {
    fn status(&mut self, message: &str);
    fn clear(&mut self);
}

/// Overwrites one line of a terminal stream, stderr by default.
pub struct TerminalStatus<W: Write> {
    out: W,
}

impl TerminalStatus<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> TerminalStatus<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for TerminalStatus<W> {
    fn status(&mut self, message: &str) {
        // Best effort: a broken terminal must not stop the analysis
        let _ = execute!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(message));
    }

    fn clear(&mut self) {
        let _ = execute!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine));
    }
}

/// Drops every message.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn status(&mut self, _message: &str) {}
    fn clear(&mut self) {}
}

/// Keeps messages in order; handy for asserting on progress.
impl ProgressSink for Vec<String> {
    fn status(&mut self, message: &str) {
        self.push(message.to_string());
    }

    fn clear(&mut self) {}
}
