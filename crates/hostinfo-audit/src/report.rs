//! # Reporting Sink
//!
//! Where violations go. The auditor hands each violation to the sink as it
//! is found.
//!
//! | Sink | Output |
//! |------|--------|
//! | `Vec<Violation>` | Collected in memory |
//! | [`TextSink`] | `host key=value not in {a,b}` per line |
//! | [`JsonLinesSink`] | One JSON object per line |

use std::io::Write;

use crate::error::Result;
use crate::violation::Violation;

/// Receives violations from an audit.
pub trait ViolationSink {
    /// Accepts one violation.
    fn report(&mut self, violation: Violation) -> Result<()>;

    /// Called once after the last pass.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ViolationSink for Vec<Violation> {
    fn report(&mut self, violation: Violation) -> Result<()> {
        self.push(violation);
        Ok(())
    }
}

impl<T: ViolationSink + ?Sized> ViolationSink for &mut T {
    fn report(&mut self, violation: Violation) -> Result<()> {
        (**self).report(violation)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Human-readable report lines.
///
/// # Example
///
/// ```rust
/// use hostinfo_audit::{TextSink, Violation, ViolationSink};
///
/// let mut sink = TextSink::new(Vec::new());
/// sink.report(Violation::multiple_values("alpha", "os", "linux,aix")).unwrap();
/// assert_eq!(
///     String::from_utf8(sink.into_inner()).unwrap(),
///     "alpha os=linux,aix has multiple values\n"
/// );
/// ```
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> TextSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ViolationSink for TextSink<W> {
    fn report(&mut self, violation: Violation) -> Result<()> {
        writeln!(self.writer, "{}", violation)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Machine-readable report, one serialized [`Violation`] per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ViolationSink for JsonLinesSink<W> {
    fn report(&mut self, violation: Violation) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &violation)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
