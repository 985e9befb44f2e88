//! Line-oriented output for matched pairs and announcements.
//!
//! Field order is stable and space-separated:
//!
//! - [`RecordStyle::Sequenced`]: `seq site first second`
//! - [`RecordStyle::Contextual`]: `site context first second`
//!
//! Announcement text is emitted verbatim, one line per occurrence,
//! interleaved with records in arrival order. Diagnostics never travel
//! through this channel.

use std::io::{self, Write};

use crate::dispatch::RecordStyle;
use crate::scalar::Scalar;

/// One matched pair, ready for rendering. Ephemeral: produced by the
/// flusher and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    /// 1-based, block-local sequence number.
    pub seq: u32,
    /// Site identifier, sentinel already applied.
    pub site: &'a str,
    /// Secondary context, sentinel already applied.
    pub context: &'a str,
    pub first: Scalar,
    pub second: Scalar,
}

/// Destination for records and announcement lines.
pub trait Sink {
    fn record(&mut self, record: &Record<'_>) -> io::Result<()>;
    fn announcement(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn record(&mut self, record: &Record<'_>) -> io::Result<()> {
        (**self).record(record)
    }

    fn announcement(&mut self, text: &str) -> io::Result<()> {
        (**self).announcement(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes one line per record to any `Write`.
pub struct LineSink<W: Write> {
    out: W,
    style: RecordStyle,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W, style: RecordStyle) -> Self {
        Self { out, style }
    }
}

impl<W: Write> Sink for LineSink<W> {
    fn record(&mut self, record: &Record<'_>) -> io::Result<()> {
        match self.style {
            RecordStyle::Sequenced => writeln!(
                self.out,
                "{} {} {} {}",
                record.seq, record.site, record.first, record.second
            ),
            RecordStyle::Contextual => writeln!(
                self.out,
                "{} {} {} {}",
                record.site, record.context, record.first, record.second
            ),
        }
    }

    fn announcement(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
