//! Shared test helpers: a scripted event source and a capturing sink.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use sitepair_core::{Cursor, EventSource, Record, Scalar, Sink, SourceError};

/// One scripted cursor step.
#[derive(Debug, Clone)]
pub enum Step {
    Start {
        name: &'static str,
        text: Option<&'static str>,
        attrs: Vec<(&'static str, &'static str)>,
    },
    End(&'static str),
    Other,
    Fail(&'static str),
}

/// Leaf element with text content.
pub fn leaf(name: &'static str, text: &'static str) -> Step {
    Step::Start {
        name,
        text: Some(text),
        attrs: Vec::new(),
    }
}

/// Start tag with neither text nor attributes.
pub fn start(name: &'static str) -> Step {
    Step::Start {
        name,
        text: None,
        attrs: Vec::new(),
    }
}

/// Start tag carrying one attribute.
pub fn start_attr(name: &'static str, key: &'static str, value: &'static str) -> Step {
    Step::Start {
        name,
        text: None,
        attrs: vec![(key, value)],
    }
}

pub fn end(name: &'static str) -> Step {
    Step::End(name)
}

/// Event source driven by a fixed step list; `Eof` once exhausted.
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    current: Option<Step>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            current: None,
        }
    }
}

impl EventSource for ScriptedSource {
    fn advance(&mut self) -> Result<Cursor, SourceError> {
        self.current = None;
        match self.steps.pop_front() {
            None => Ok(Cursor::Eof),
            Some(step @ Step::Start { name, .. }) => {
                let cursor = Cursor::Start(name.to_owned());
                self.current = Some(step);
                Ok(cursor)
            }
            Some(Step::End(name)) => Ok(Cursor::End(name.to_owned())),
            Some(Step::Other) => Ok(Cursor::Other),
            Some(Step::Fail(message)) => Err(SourceError::Malformed(message.to_owned())),
        }
    }

    fn read_text(&mut self) -> Result<Option<String>, SourceError> {
        match &self.current {
            Some(Step::Start { text, .. }) => Ok(text.map(str::to_owned)),
            _ => Ok(None),
        }
    }

    fn attribute(&mut self, name: &str) -> Result<Option<String>, SourceError> {
        match &self.current {
            Some(Step::Start { attrs, .. }) => Ok(attrs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())),
            _ => Ok(None),
        }
    }
}

/// One captured output line, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Out {
    Record {
        seq: u32,
        site: String,
        context: String,
        first: Scalar,
        second: Scalar,
    },
    Announcement(String),
}

/// Sink collecting records and announcements interleaved.
#[derive(Default)]
pub struct VecSink {
    pub lines: Vec<Out>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the records, in order.
    pub fn records(&self) -> Vec<(u32, String, Scalar, Scalar)> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Out::Record {
                    seq,
                    site,
                    first,
                    second,
                    ..
                } => Some((*seq, site.clone(), *first, *second)),
                Out::Announcement(_) => None,
            })
            .collect()
    }
}

impl Sink for VecSink {
    fn record(&mut self, record: &Record<'_>) -> io::Result<()> {
        self.lines.push(Out::Record {
            seq: record.seq,
            site: record.site.to_owned(),
            context: record.context.to_owned(),
            first: record.first,
            second: record.second,
        });
        Ok(())
    }

    fn announcement(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(Out::Announcement(text.to_owned()));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
