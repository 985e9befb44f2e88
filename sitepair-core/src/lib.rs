//! sitepair core
//!
//! Streaming pairing engine for traffic-sensor markup documents. Consumes
//! a forward-only event stream and emits one line per matched pair of
//! observations, in arrival order, without loading the document.
//!
//! # Architecture
//!
//! - **queue.rs** - bounded / growable FIFO value queues
//! - **scalar.rs** - strict-prefix numeric decoding, text capture
//! - **block.rs** - per-block state, pair flusher
//! - **dispatch.rs** - element tables, built-in profiles
//! - **source.rs** - forward-only event source trait
//! - **xml.rs** - quick-xml event source adapter
//! - **emit.rs** - record/announcement line sink
//! - **engine.rs** - the main pull loop

pub mod block;
pub mod dispatch;
pub mod emit;
pub mod engine;
pub mod queue;
pub mod scalar;
pub mod source;
pub mod xml;

pub use block::{BlockState, UNKNOWN_CONTEXT, UNKNOWN_SITE};
pub use dispatch::{ElementKind, Profile, RecordStyle, ValueSlot, SITE_TABLE, TRAFFIC_FLOW};
pub use emit::{LineSink, Record, Sink};
pub use engine::{Engine, Options, Summary};
pub use queue::{CapacityPolicy, PushError, ValueQueue};
pub use scalar::{Scalar, ScalarKind, TextPolicy};
pub use source::{Cursor, EventSource, SourceError};
pub use xml::XmlSource;
