use color_print::cprintln;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::Error;

/// Receiver for problems found while assembling.
/// Line numbers are 1-based.
pub trait Diagnostics {
    fn error(&mut self, line: usize, message: String);
    fn warn(&mut self, line: usize, message: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warn => write!(f, "warn"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msg {
    pub level: Level,
    pub line: usize,
    pub text: String,
}

// ----------------------------------------------------------------------------
// Collector

#[derive(Debug, Default)]
pub struct Msgs(pub Vec<Msg>);

impl Msgs {
    pub fn new() -> Self {
        Msgs(vec![])
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|msg| msg.level == Level::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter().filter(|msg| msg.level == Level::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter().filter(|msg| msg.level == Level::Warn)
    }
}

impl Diagnostics for Msgs {
    fn error(&mut self, line: usize, text: String) {
        self.0.push(Msg {
            level: Level::Error,
            line,
            text,
        });
    }

    fn warn(&mut self, line: usize, text: String) {
        self.0.push(Msg {
            level: Level::Warn,
            line,
            text,
        });
    }
}

// ----------------------------------------------------------------------------
// Console

/// Prints messages with the offending source line, and optionally appends
/// them to a log file.
pub struct Console<'a> {
    path: &'a str,
    source: Vec<&'a str>,
    quiet: bool,
    log: Option<(String, BufWriter<File>)>,
    log_err: Option<Error>,
    errors: usize,
    warnings: usize,
}

impl<'a> Console<'a> {
    pub fn new(path: &'a str, source: &'a str) -> Self {
        Console {
            path,
            source: source.lines().collect(),
            quiet: false,
            log: None,
            log_err: None,
            errors: 0,
            warnings: 0,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn log_to(mut self, path: &str) -> Result<Self, Error> {
        let file = File::create(path).map_err(|e| Error::FileCreate(path.to_string(), e))?;
        self.log = Some((path.to_string(), BufWriter::new(file)));
        Ok(self)
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Flushes the log file and surfaces the first write failure, if any.
    pub fn finish(mut self) -> Result<(), Error> {
        if let Some(err) = self.log_err.take() {
            return Err(err);
        }
        if let Some((path, mut log)) = self.log.take() {
            log.flush().map_err(|e| Error::FileWrite(path, e))?;
        }
        Ok(())
    }

    fn emit(&mut self, level: Level, line: usize, text: &str) {
        let raw = line
            .checked_sub(1)
            .and_then(|idx| self.source.get(idx))
            .copied()
            .unwrap_or("");

        if !self.quiet {
            match level {
                Level::Error => cprintln!("<red,bold>error</>: {}", text),
                Level::Warn => cprintln!("<yellow,bold>warn</>: {}", text),
            }
            cprintln!("     <blue>--></> <underline>{}:{}</>", self.path, line);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", line, raw);
            cprintln!("      <blue>|</>");
        }

        if self.log_err.is_some() {
            return;
        }
        if let Some((path, log)) = &mut self.log {
            if let Err(e) = writeln!(log, "{}: {}:{}: {}\n    {}", level, self.path, line, text, raw) {
                self.log_err = Some(Error::FileWrite(path.clone(), e));
            }
        }
    }
}

impl Diagnostics for Console<'_> {
    fn error(&mut self, line: usize, text: String) {
        self.errors += 1;
        self.emit(Level::Error, line, &text);
    }

    fn warn(&mut self, line: usize, text: String) {
        self.warnings += 1;
        self.emit(Level::Warn, line, &text);
    }
}
