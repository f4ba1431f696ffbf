// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The categorized log sink that run output is written to.
//!
//! Every line carries a [`LogLevel`]. Lines are written to stderr (or a buffer, in tests), and
//! optionally mirrored without color to a log file.

use camino::Utf8Path;
use owo_colors::{OwoColorize, Style, style};
use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
};

/// The category of a line written to a [`LogSink`].
///
/// Levels are ordered: `Text < Info < Warning < Error`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Raw simulator output.
    Text,

    /// Progress and status lines.
    Info,

    /// Something that did not stop the run but deserves attention.
    Warning,

    /// A failure.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Text => write!(f, "text"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Where the log sink writes its primary output.
pub enum SinkOutput<'a> {
    /// Produce output on the (possibly piped) terminal's stderr.
    Terminal,

    /// Write output to a buffer.
    Buffer(&'a mut Vec<u8>),
}

/// Writes categorized lines to the console and, optionally, a log file.
pub struct LogSink<'a> {
    output: SinkOutputImpl<'a>,
    tee: Option<BufWriter<File>>,
    styles: Box<Styles>,
}

impl<'a> LogSink<'a> {
    /// Creates a new sink writing to the given output.
    pub fn new(output: SinkOutput<'a>) -> Self {
        let output = match output {
            SinkOutput::Terminal => SinkOutputImpl::Terminal(io::stderr()),
            SinkOutput::Buffer(buf) => SinkOutputImpl::Buffer(buf),
        };
        Self {
            output,
            tee: None,
            styles: Box::default(),
        }
    }

    /// Colorizes lines written to the primary output. The log file is never colorized.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Mirrors every line written from now on to the file at `path`, truncating it first.
    pub fn tee_to_file(&mut self, path: &Utf8Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.tee = Some(BufWriter::new(file));
        Ok(())
    }

    /// Writes a single line at the given level.
    pub fn write_line(&mut self, level: LogLevel, line: impl fmt::Display) -> io::Result<()> {
        let line = line.to_string();
        let style = self.styles.for_level(level);
        writeln!(self.output, "{}", line.style(style))?;
        if let Some(tee) = &mut self.tee {
            writeln!(tee, "{line}")?;
        }
        Ok(())
    }

    /// Writes a block of text, one line at a time, at the given level.
    pub fn write_lines(&mut self, level: LogLevel, text: &str) -> io::Result<()> {
        for line in text.lines() {
            self.write_line(level, line)?;
        }
        Ok(())
    }

    /// Writes an empty separator line.
    pub fn write_blank(&mut self) -> io::Result<()> {
        self.write_line(LogLevel::Text, "")
    }

    /// Flushes the primary output and the log file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()?;
        if let Some(tee) = &mut self.tee {
            tee.flush()?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("tee", &self.tee.is_some())
            .finish_non_exhaustive()
    }
}

enum SinkOutputImpl<'a> {
    Terminal(io::Stderr),
    Buffer(&'a mut Vec<u8>),
}

impl Write for SinkOutputImpl<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            Self::Terminal(stderr) => stderr.write(data),
            Self::Buffer(buf) => buf.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Terminal(stderr) => stderr.flush(),
            Self::Buffer(_) => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
struct Styles {
    text: Style,
    info: Style,
    warning: Style,
    error: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.info = style().bold();
        self.warning = style().yellow().bold();
        self.error = style().red().bold();
    }

    fn for_level(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Text => self.text,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
        }
    }
}
