//! Result Output
//!
//! Writes each operation's result after its fixed label.

use std::io::{self, Stdout, Write};

/// Label printed before the report for the conformant document
pub const VALID_LABEL: &str = "Valid XML → ";

/// Label printed before the report for the faulty document
pub const FAULTY_LABEL: &str = "Faulty XML → ";

/// Label printed before the converted JSON
pub const JSON_LABEL: &str = "\nJSON output:\n";

/// Text sink for the labelled results
pub struct Output<W: Write> {
    writer: W,
}

impl Output<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Output<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write `label` followed by `text` and a newline, then flush
    pub fn write_result(&mut self, label: &str, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}{}", label, text)?;
        self.writer.flush()
    }

    pub fn valid_result(&mut self, report: &str) -> io::Result<()> {
        self.write_result(VALID_LABEL, report)
    }

    pub fn faulty_result(&mut self, report: &str) -> io::Result<()> {
        self.write_result(FAULTY_LABEL, report)
    }

    pub fn json_result(&mut self, json: &str) -> io::Result<()> {
        self.write_result(JSON_LABEL, json)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
