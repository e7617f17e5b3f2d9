// ABOUTME: Leveled console output for export progress
// ABOUTME: Passed explicitly to the exporter; debug lines only when verbose

use indicatif::ProgressBar;
use std::io::{self, Write};

pub struct Logger {
    verbose: bool,
    sink: Box<dyn Write>,
}

impl Logger {
    pub fn new(verbose: bool, sink: Box<dyn Write>) -> Self {
        Logger { verbose, sink }
    }

    /// Writes to stdout through `bar`, clearing it for each line so a
    /// ticking spinner never overdraws log output.
    pub fn with_progress(verbose: bool, bar: ProgressBar) -> Self {
        Logger::new(verbose, Box::new(ProgressSink::new(bar, io::stdout())))
    }

    /// Discards everything; handy for library callers that report on their own.
    pub fn silent() -> Self {
        Logger::new(false, Box::new(io::sink()))
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    // Console output is best effort; a closed stdout must not abort an export.
    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.sink, "{}", text);
    }

    pub fn info(&mut self, message: &str) {
        self.line(format_args!("ℹ {}", message));
    }

    pub fn success(&mut self, message: &str) {
        self.line(format_args!("✓ {}", message));
    }

    pub fn warn(&mut self, message: &str) {
        self.line(format_args!("⚠ {}", message));
    }

    pub fn error(&mut self, message: &str) {
        self.line(format_args!("✗ {}", message));
    }

    pub fn debug(&mut self, message: &str) {
        if self.verbose {
            self.line(format_args!("  → {}", message));
        }
    }

    pub fn plain(&mut self, message: &str) {
        self.line(format_args!("{}", message));
    }

    pub fn blank(&mut self) {
        self.line(format_args!(""));
    }

    pub fn header(&mut self, message: &str) {
        self.blank();
        self.line(format_args!("{}", message));
        self.line(format_args!("{}", "─".repeat(40)));
    }

    pub fn stats(&mut self, label: &str, value: impl std::fmt::Display) {
        self.line(format_args!("  {}: {}", label, value));
    }
}

/// Line-buffered writer that hides a progress bar while each complete line
/// is written to `inner`.
pub struct ProgressSink<W: Write> {
    bar: ProgressBar,
    inner: W,
    pending: Vec<u8>,
}

impl<W: Write> ProgressSink<W> {
    pub fn new(bar: ProgressBar, inner: W) -> Self {
        ProgressSink {
            bar,
            inner,
            pending: Vec::new(),
        }
    }

    fn write_out(&mut self, len: usize) -> io::Result<()> {
        let chunk: Vec<u8> = self.pending.drain(..len).collect();
        let inner = &mut self.inner;
        self.bar.suspend(|| {
            inner.write_all(&chunk)?;
            inner.flush()
        })
    }
}

impl<W: Write> Write for ProgressSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(last) = self.pending.iter().rposition(|b| *b == b'\n') {
            self.write_out(last + 1)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.write_out(self.pending.len())?;
        }
        Ok(())
    }
}
