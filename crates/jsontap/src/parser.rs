//! The streaming JSON parser.
//!
//! [`StreamingParser`] drives a [`StateMachine`] over chunked input and
//! translates state transitions into [`ParseEvent`]s while buffering token
//! payloads. Input arrives through [`write`](StreamingParser::write), which
//! returns a lazy iterator over the events the chunk produces.
//!
//! # Examples
//!
//! ```rust
//! use jsontap::StreamingParser;
//!
//! let mut parser = StreamingParser::new();
//! for event in parser.write(r#"{"key": [null, true, 3.14]}"#, true) {
//!     let event = event.unwrap();
//!     println!("{event:?}");
//! }
//! ```
#![allow(clippy::enum_glob_use)]

use alloc::{
    collections::VecDeque,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    buffer::Buffer,
    error::ParseError,
    escape_buffer::UnicodeEscapeBuffer,
    event::{ParseEvent, PathComponent},
    machine::{State, StateMachine},
};

/// Incremental JSON parser emitting path-tagged events.
///
/// The parser is created once per document, fed chunks via
/// [`write`](Self::write), and sealed by passing `terminate = true` with the
/// final chunk. String content is buffered and flushed as one delta per
/// chunk per string rather than one event per character; numbers are
/// re-announced at chunk boundaries so consumers always hold the latest
/// numeric interpretation.
///
/// # Examples
///
/// ```rust
/// use jsontap::{ParseEvent, StreamingParser, path};
///
/// let mut parser = StreamingParser::new();
/// let first: Vec<_> = parser
///     .write("[\"pa", false)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// let second: Vec<_> = parser
///     .write("rt\"]", true)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     first,
///     vec![
///         ParseEvent::ArrayOpen { path: path![] },
///         ParseEvent::StringOpen { path: path![0] },
///         ParseEvent::StringAppend {
///             path: path![0],
///             delta: "pa".to_string(),
///         },
///     ]
/// );
/// assert_eq!(
///     second,
///     vec![
///         ParseEvent::StringAppend {
///             path: path![0],
///             delta: "rt".to_string(),
///         },
///         ParseEvent::StringClose { path: path![0] },
///         ParseEvent::ArrayClose { path: path![] },
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct StreamingParser {
    machine: StateMachine,
    source: Buffer,
    events: VecDeque<ParseEvent>,

    /// Root-relative location of the node under construction.
    path: Vec<PathComponent>,

    /// Decoded text of the current string, key, or number literal.
    buffer: String,
    /// Start of the not-yet-emitted fragment within `buffer`.
    fragment_start: usize,
    /// Whether the current string or key has emitted at least one fragment.
    fragment_emitted: bool,
    unicode: UnicodeEscapeBuffer,

    terminated: bool,
    errored: bool,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
            source: Buffer::new(),
            events: VecDeque::new(),
            path: Vec::new(),
            buffer: String::new(),
            fragment_start: 0,
            fragment_emitted: false,
            unicode: UnicodeEscapeBuffer::new(),
            terminated: false,
            errored: false,
        }
    }

    /// Feeds a chunk of JSON text and returns the events it produces.
    ///
    /// Events materialize lazily as the returned iterator is driven; any
    /// pending string fragment or in-progress number is flushed when the
    /// chunk is exhausted. With `terminate = true` the parser additionally
    /// seals the underlying machine after draining the chunk, surfacing a
    /// [`ParseError::PrematureTermination`] if the document is incomplete.
    ///
    /// Errors are terminal. Events yielded before an error remain valid, but
    /// the parser must not be written to again.
    pub fn write(&mut self, text: &str, terminate: bool) -> WriteEvents<'_> {
        self.source.push(text);
        WriteEvents {
            parser: self,
            terminate,
            flushed: false,
        }
    }

    /// Consume one character, updating path, buffers, and the event queue.
    fn step(&mut self, c: char) -> Result<(), ParseError> {
        let prev = self.machine.state();
        let next = self.machine.write_char(c)?;

        // A number has no terminator character; leaving the number family is
        // what finalizes it.
        if prev.is_number() && !next.is_number() {
            self.flush_number(true);
        }

        match next {
            State::ObjectOpen => self.emit(ParseEvent::ObjectOpen {
                path: self.path.clone(),
            }),

            State::ObjectClose => {
                if matches!(self.path.last(), Some(PathComponent::Key(_))) {
                    self.path.pop();
                }
                self.emit(ParseEvent::ObjectClose {
                    path: self.path.clone(),
                });
            }

            State::ObjectComma => {
                self.path.pop();
            }

            State::ArrayOpen => {
                self.emit(ParseEvent::ArrayOpen {
                    path: self.path.clone(),
                });
                self.path.push(PathComponent::Index(0));
            }

            State::ArrayClose => {
                self.path.pop();
                self.emit(ParseEvent::ArrayClose {
                    path: self.path.clone(),
                });
            }

            State::ArrayComma => match self.path.last_mut() {
                Some(PathComponent::Index(index)) => *index += 1,
                _ => unreachable!("array context always ends the path with an index"),
            },

            State::StringOpen => {
                self.buffer.clear();
                self.fragment_start = 0;
                self.fragment_emitted = false;
                if self.machine.is_in_key() {
                    self.emit(ParseEvent::KeyOpen {
                        path: self.path.clone(),
                    });
                } else {
                    self.emit(ParseEvent::StringOpen {
                        path: self.path.clone(),
                    });
                }
            }

            State::StringChar => self.buffer.push(c),

            State::StringEscapedChar => self.buffer.push(decode_escape(c)),

            State::StringEscapeUnicodeOpen => self.unicode.reset(),

            State::StringEscapeUnicode2 | State::StringEscapeUnicode3
            | State::StringEscapeUnicode4 => {
                self.unicode.feed(c);
            }

            State::StringEscapeUnicodeClose => {
                if let Some(decoded) = self.unicode.feed(c) {
                    self.buffer.push(decoded);
                }
            }

            State::KeyClose => {
                self.flush_fragment(true);
                let key = core::mem::take(&mut self.buffer);
                self.fragment_start = 0;
                self.path.push(PathComponent::Key(key.clone()));
                self.emit(ParseEvent::KeyClose {
                    path: self.path.clone(),
                    key,
                });
            }

            State::StringClose => {
                self.flush_fragment(true);
                self.buffer.clear();
                self.fragment_start = 0;
                self.emit(ParseEvent::StringClose {
                    path: self.path.clone(),
                });
            }

            State::TrueOpen => self.emit(ParseEvent::BooleanOpen {
                path: self.path.clone(),
                value: true,
            }),
            State::FalseOpen => self.emit(ParseEvent::BooleanOpen {
                path: self.path.clone(),
                value: false,
            }),
            State::NullOpen => self.emit(ParseEvent::NullOpen {
                path: self.path.clone(),
            }),

            State::TrueClose => self.emit(ParseEvent::BooleanClose {
                path: self.path.clone(),
                value: true,
            }),
            State::FalseClose => self.emit(ParseEvent::BooleanClose {
                path: self.path.clone(),
                value: false,
            }),
            State::NullClose => self.emit(ParseEvent::NullClose {
                path: self.path.clone(),
            }),

            s if s.is_number() => {
                if !prev.is_number() {
                    self.buffer.clear();
                    self.emit(ParseEvent::NumberOpen {
                        path: self.path.clone(),
                    });
                }
                self.buffer.push(c);
            }

            // ValueClose, NumberClose, ObjectMemberSeparator, StringEscape:
            // no externally observable effect.
            _ => {}
        }

        Ok(())
    }

    fn emit(&mut self, event: ParseEvent) {
        self.events.push_back(event);
    }

    /// Emit the pending string or key fragment, if any. At a closing quote
    /// even an empty delta is emitted when the literal produced no fragment
    /// at all, so every string yields at least one append.
    fn flush_fragment(&mut self, at_close: bool) {
        let delta = &self.buffer[self.fragment_start..];
        if delta.is_empty() && (!at_close || self.fragment_emitted) {
            return;
        }
        let delta = delta.to_string();
        self.fragment_start = self.buffer.len();
        self.fragment_emitted = true;
        if self.machine.is_in_key() {
            self.emit(ParseEvent::KeyAppend {
                path: self.path.clone(),
                delta,
            });
        } else {
            self.emit(ParseEvent::StringAppend {
                path: self.path.clone(),
                delta,
            });
        }
    }

    /// Announce the numeric interpretation of the buffered digits, closing
    /// the number when it has ended.
    fn flush_number(&mut self, close: bool) {
        if self.buffer.is_empty() {
            return;
        }
        let value = self.buffer.parse::<f64>().unwrap();
        self.emit(ParseEvent::NumberValue {
            path: self.path.clone(),
            value,
        });
        if close {
            self.emit(ParseEvent::NumberClose {
                path: self.path.clone(),
            });
            self.buffer.clear();
        }
    }

    /// End-of-chunk flush: pending string fragment or provisional number.
    fn flush_chunk_end(&mut self) {
        let state = self.machine.state();
        if state.in_string() {
            self.flush_fragment(false);
        } else if state.is_digit_terminal() {
            self.flush_number(false);
        }
    }

    /// Seal the machine; an in-progress number becomes final.
    fn finish(&mut self) -> Result<(), ParseError> {
        let state = self.machine.state();
        self.machine.terminate()?;
        if state.is_digit_terminal() && !self.buffer.is_empty() {
            self.emit(ParseEvent::NumberClose {
                path: self.path.clone(),
            });
            self.buffer.clear();
        }
        Ok(())
    }
}

/// Iterator over the events produced by one [`StreamingParser::write`] call.
///
/// Yields `Result<ParseEvent, ParseError>`; after an `Err` the iterator is
/// exhausted and the parser unusable.
#[derive(Debug)]
pub struct WriteEvents<'a> {
    parser: &'a mut StreamingParser,
    terminate: bool,
    flushed: bool,
}

impl Iterator for WriteEvents<'_> {
    type Item = Result<ParseEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.parser.events.pop_front() {
                return Some(Ok(event));
            }
            if self.parser.errored {
                return None;
            }

            match self.parser.source.next() {
                Some(c) => {
                    if let Err(err) = self.parser.step(c) {
                        self.parser.errored = true;
                        return Some(Err(err));
                    }
                }
                None => {
                    if !self.flushed {
                        self.flushed = true;
                        self.parser.flush_chunk_end();
                        continue;
                    }
                    if self.terminate && !self.parser.terminated {
                        self.parser.terminated = true;
                        if let Err(err) = self.parser.finish() {
                            self.parser.errored = true;
                            return Some(Err(err));
                        }
                        continue;
                    }
                    return None;
                }
            }
        }
    }
}

fn decode_escape(c: char) -> char {
    match c {
        'b' => '\u{0008}',
        'f' => '\u{000C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        // '"', '\\' and '/' escape to themselves
        _ => c,
    }
}
