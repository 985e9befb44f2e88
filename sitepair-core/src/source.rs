//! Event source abstraction: a forward-only cursor over a markup stream.
//!
//! The pairing engine never looks ahead or rewinds; it advances the cursor
//! one step at a time and, while positioned on a start tag, may consume the
//! element's text content or read one attribute.

use thiserror::Error;

/// A failure reported by the underlying tokenizer. Any source error stops
/// the main loop; already-emitted output remains valid.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The byte stream is not well-formed markup (or was truncated).
    #[error("malformed document: {0}")]
    Malformed(String),
    /// The underlying reader failed.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of the cursor. Element names are local (namespace-stripped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// A start tag.
    Start(String),
    /// An end tag.
    End(String),
    /// Anything the pairing engine does not care about (text, comments,
    /// declarations, processing instructions).
    Other,
    /// End of the document.
    Eof,
}

/// Forward-only markup cursor.
pub trait EventSource {
    /// Move to the next event.
    fn advance(&mut self) -> Result<Cursor, SourceError>;

    /// Consume the current element's text content. Valid only right after
    /// a [`Cursor::Start`] for a leaf element; returns `None` when the
    /// element is empty (absence, not the empty string).
    fn read_text(&mut self) -> Result<Option<String>, SourceError>;

    /// Read an attribute of the current start tag, `None` when absent.
    fn attribute(&mut self, name: &str) -> Result<Option<String>, SourceError>;
}
