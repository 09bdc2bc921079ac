//! Incremental JSON parsing for text that arrives in fragments, with a
//! path-subscribed listener layer for progressive consumers.
//!
//! The pipeline has three layers, each usable on its own:
//!
//! 1. [`StateMachine`] — a character-driven recognizer for the full JSON
//!    grammar that carries no values.
//! 2. [`StreamingParser`] — buffers token payloads, tracks the root-relative
//!    path, and emits [`ParseEvent`]s as chunks arrive.
//! 3. [`PathListener`] — materializes minimal partial values and fires
//!    callbacks when subscribed sub-trees mutate or finalize.
//!
//! The primary consumers are interactive front-ends for generative models
//! whose output arrives token by token and must be rendered progressively.
#![no_std]
#![allow(missing_docs)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod chunk_utils;
mod error;
mod escape_buffer;
mod event;
mod listener;
mod machine;
mod parser;
mod value;

pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use error::ParseError;
#[doc(hidden)]
pub use event::{PathComponentFrom, path_from};
pub use event::{ANY_INDEX, ParseEvent, PathComponent};
pub use listener::PathListener;
pub use machine::{ContainerKind, State, StateMachine};
pub use parser::{StreamingParser, WriteEvents};
pub use value::{Array, Map, Value};

#[cfg(test)]
mod tests;
