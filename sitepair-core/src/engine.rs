//! The pairing engine: a forward-only event consumer.
//!
//! Pulls cursor steps from an [`EventSource`], dispatches each start tag
//! through the profile's element table, buffers decoded scalars, and emits
//! a record as soon as both queues hold at least one entry. A block
//! boundary end tag triggers a final flush followed by a reset.
//!
//! Error policy: per-value failures (malformed numbers, queue overflow,
//! allocation failure) are absorbed where they occur and logged through
//! `tracing`; a source read error stops the loop and is recorded in the
//! [`Summary`]; only sink I/O errors propagate out of [`Engine::run`].

use std::io;

use tracing::{debug, error, trace, warn};

use crate::block::BlockState;
use crate::dispatch::{ElementKind, Profile};
use crate::emit::Sink;
use crate::queue::CapacityPolicy;
use crate::scalar::{self, TextPolicy};
use crate::source::{Cursor, EventSource, SourceError};

/// Engine tuning knobs. Defaults reproduce the dynamic variant: growable
/// queues and exact text capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub queue_policy: CapacityPolicy,
    pub text_policy: TextPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            queue_policy: CapacityPolicy::Growable,
            text_policy: TextPolicy::Dynamic,
        }
    }
}

/// Block lifecycle. No nested blocks: a block-start while `InBlock` is an
/// implicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    InBlock,
}

/// What a run did. `source_error` is set when the tokenizer gave up;
/// everything emitted before that point remains valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub pairs: u64,
    pub announcements: u64,
    pub blocks: u64,
    /// Values lost to queue overflow or allocation failure.
    pub dropped_values: u64,
    /// Elements skipped because their text did not decode.
    pub malformed_values: u64,
    pub source_error: Option<String>,
}

/// Engine-internal step failure. Source errors end the run gracefully;
/// sink errors are fatal.
enum StepError {
    Io(io::Error),
    Source(SourceError),
}

impl From<io::Error> for StepError {
    fn from(err: io::Error) -> Self {
        StepError::Io(err)
    }
}

impl From<SourceError> for StepError {
    fn from(err: SourceError) -> Self {
        StepError::Source(err)
    }
}

/// Forward-only pairing engine bound to one profile, one source, one sink.
pub struct Engine<'p, S: EventSource, K: Sink> {
    source: S,
    sink: K,
    profile: &'p Profile,
    options: Options,
    state: BlockState,
    phase: Phase,
    summary: Summary,
}

impl<'p, S: EventSource, K: Sink> Engine<'p, S, K> {
    pub fn new(profile: &'p Profile, source: S, sink: K) -> Self {
        Self::with_options(profile, source, sink, Options::default())
    }

    pub fn with_options(profile: &'p Profile, source: S, sink: K, options: Options) -> Self {
        Self {
            source,
            sink,
            profile,
            options,
            state: BlockState::new(options.queue_policy),
            phase: Phase::Idle,
            summary: Summary::default(),
        }
    }

    /// Consume the source to exhaustion. Reaching end-of-input while a
    /// block is still open performs no implicit flush: buffered unmatched
    /// values are silently lost, a known property of truncated documents.
    pub fn run(mut self) -> io::Result<Summary> {
        loop {
            match self.source.advance() {
                Ok(Cursor::Start(name)) => match self.on_start(&name) {
                    Ok(true) => {}
                    Ok(false) => trace!(element = %name, "unhandled element"),
                    Err(err) => {
                        if let Some(fatal) = self.absorb(err) {
                            return Err(fatal);
                        }
                        break;
                    }
                },
                Ok(Cursor::End(name)) => {
                    if let Err(err) = self.on_end(&name) {
                        if let Some(fatal) = self.absorb(err) {
                            return Err(fatal);
                        }
                        break;
                    }
                }
                Ok(Cursor::Other) => {}
                Ok(Cursor::Eof) => break,
                Err(err) => {
                    error!("{err}");
                    self.summary.source_error = Some(err.to_string());
                    break;
                }
            }
        }
        self.sink.flush()?;
        Ok(self.summary)
    }

    /// Record a source error for the summary; return the error when it is
    /// a fatal sink failure instead.
    fn absorb(&mut self, err: StepError) -> Option<io::Error> {
        match err {
            StepError::Io(err) => Some(err),
            StepError::Source(err) => {
                error!("{err}");
                self.summary.source_error = Some(err.to_string());
                None
            }
        }
    }

    /// Dispatch one start tag. The flag is diagnostic only: unrecognized
    /// (or out-of-block) elements are a no-op, not an error.
    fn on_start(&mut self, name: &str) -> Result<bool, StepError> {
        let Some(kind) = self.profile.lookup(name) else {
            return Ok(false);
        };
        match kind {
            // Announcements are block-independent: echoed wherever seen.
            ElementKind::Announcement => {
                let text = self.source.read_text()?;
                if let Some(text) = scalar::capture(text.as_deref(), self.options.text_policy) {
                    self.sink.announcement(&text)?;
                    self.summary.announcements += 1;
                }
            }
            ElementKind::BlockBoundary => {
                if self.phase == Phase::InBlock {
                    let (first, second) = self.state.pending();
                    if first + second > 0 {
                        debug!(first, second, "implicit reset discarding unmatched values");
                    }
                }
                self.state.reset();
                self.phase = Phase::InBlock;
                self.summary.blocks += 1;
            }
            ElementKind::SiteReference { attr } => {
                if self.phase != Phase::InBlock {
                    return Ok(false);
                }
                let raw = self.source.attribute(attr)?;
                self.state
                    .set_site_id(scalar::capture(raw.as_deref(), self.options.text_policy));
            }
            ElementKind::Context => {
                if self.phase != Phase::InBlock {
                    return Ok(false);
                }
                let raw = self.source.read_text()?;
                self.state
                    .set_context(scalar::capture(raw.as_deref(), self.options.text_policy));
            }
            ElementKind::Value { slot, kind } => {
                if self.phase != Phase::InBlock {
                    return Ok(false);
                }
                let Some(text) = self.source.read_text()? else {
                    return Ok(true);
                };
                let Some(value) = scalar::decode(kind, &text) else {
                    self.summary.malformed_values += 1;
                    debug!(element = %name, text = %text, "skipping undecodable value");
                    return Ok(true);
                };
                match self.state.push(slot, value) {
                    Ok(()) => {
                        let emitted = self.state.flush_pairs(&mut self.sink)?;
                        self.summary.pairs += emitted as u64;
                    }
                    Err(err) => {
                        self.summary.dropped_values += 1;
                        warn!(element = %name, "{err}");
                    }
                }
            }
        }
        Ok(true)
    }

    /// Only the block boundary end tag matters: final flush, then reset.
    fn on_end(&mut self, name: &str) -> Result<bool, StepError> {
        if self.phase != Phase::InBlock || !self.profile.is_block_boundary(name) {
            return Ok(false);
        }
        let emitted = self.state.flush_pairs(&mut self.sink)?;
        self.summary.pairs += emitted as u64;
        let (first, second) = self.state.pending();
        if first + second > 0 {
            debug!(first, second, "block end discarding unmatched values");
        }
        self.state.reset();
        self.phase = Phase::Idle;
        Ok(true)
    }
}
