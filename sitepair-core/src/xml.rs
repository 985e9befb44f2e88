//! quick-xml backed [`EventSource`] reading from any `BufRead`.
//!
//! Whitespace-only text nodes are trimmed away (the blank-node stripping
//! the extraction relies on). Self-closing tags surface as a `Start`
//! followed by a synthesized `End`, so the engine sees one uniform shape.
//! `read_text` consumes everything up to and including the matching close
//! tag; the swallowed end tag is never a block boundary for a leaf read.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::source::{Cursor, EventSource, SourceError};

/// Attributes and shape of the start tag the cursor sits on.
struct Held {
    attrs: Vec<(String, String)>,
    empty: bool,
}

/// Streaming XML event source.
pub struct XmlSource<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    current: Option<Held>,
    queued_end: Option<String>,
}

impl<R: BufRead> XmlSource<R> {
    /// Wrap a buffered reader positioned at the start of a document.
    pub fn new(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            current: None,
            queued_end: None,
        }
    }

    fn hold(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<String, SourceError> {
        let name = local_name(start.name().local_name().as_ref());
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| SourceError::Malformed(e.to_string()))?;
            let key = local_name(attr.key.local_name().as_ref());
            let value = attr
                .unescape_value()
                .map_err(|e| SourceError::Malformed(e.to_string()))?
                .into_owned();
            attrs.push((key, value));
        }
        self.current = Some(Held { attrs, empty });
        Ok(name)
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

impl<R: BufRead> EventSource for XmlSource<R> {
    fn advance(&mut self) -> Result<Cursor, SourceError> {
        self.current = None;
        if let Some(name) = self.queued_end.take() {
            return Ok(Cursor::End(name));
        }
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf) {
            Ok(Event::Start(e)) => {
                let e = e.into_owned();
                let name = self.hold(&e, false)?;
                Ok(Cursor::Start(name))
            }
            Ok(Event::Empty(e)) => {
                let e = e.into_owned();
                let name = self.hold(&e, true)?;
                self.queued_end = Some(name.clone());
                Ok(Cursor::Start(name))
            }
            Ok(Event::End(e)) => Ok(Cursor::End(local_name(e.name().local_name().as_ref()))),
            Ok(Event::Eof) => Ok(Cursor::Eof),
            Ok(_) => Ok(Cursor::Other),
            Err(err) => Err(SourceError::Malformed(err.to_string())),
        }
    }

    fn read_text(&mut self) -> Result<Option<String>, SourceError> {
        let Some(held) = self.current.take() else {
            return Ok(None);
        };
        if held.empty {
            self.current = Some(held);
            return Ok(None);
        }
        // Concatenate text/CDATA up to the matching close tag. Nested
        // markup contributes its text the way a flattened leaf read does.
        let mut text: Option<String> = None;
        let mut depth = 0usize;
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Text(t)) => {
                    let chunk = t
                        .unescape()
                        .map_err(|e| SourceError::Malformed(e.to_string()))?;
                    text.get_or_insert_with(String::new).push_str(&chunk);
                }
                Ok(Event::CData(t)) => {
                    let chunk = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    text.get_or_insert_with(String::new).push_str(&chunk);
                }
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(SourceError::Malformed(err.to_string())),
            }
        }
        Ok(text)
    }

    fn attribute(&mut self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self.current.as_ref().and_then(|held| {
            held.attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        }))
    }
}
