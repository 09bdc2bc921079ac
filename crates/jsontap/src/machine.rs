//! The character-level JSON grammar recognizer.
//!
//! [`StateMachine`] consumes one character at a time and advances through a
//! finite set of [`State`]s recognizing the full JSON grammar. It carries no
//! values: the machine only validates transitions, tracks the stack of open
//! containers, and maintains the [`is_in_key`](StateMachine::is_in_key) flag
//! so the layer above can tell object keys apart from string values.
//!
//! # Examples
//!
//! ```
//! use jsontap::{State, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! for c in "[true]".chars() {
//!     machine.write_char(c).unwrap();
//! }
//! assert_eq!(machine.state(), State::ArrayClose);
//! machine.terminate().unwrap();
//! assert_eq!(machine.state(), State::End);
//! ```
#![allow(clippy::enum_glob_use)]

use alloc::vec::Vec;
use core::fmt;

use crate::error::ParseError;

/// Kind of an open container on the machine's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
}

/// A state of the JSON grammar recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    // ── structural ─────────────────────────────────────────────────────
    Open,
    ValueClose,
    ArrayOpen,
    ArrayComma,
    ArrayClose,
    ObjectOpen,
    ObjectComma,
    ObjectMemberSeparator,
    ObjectClose,
    KeyClose,
    End,

    // ── strings ────────────────────────────────────────────────────────
    StringOpen,
    StringChar,
    StringClose,
    StringEscape,
    StringEscapedChar,
    StringEscapeUnicodeOpen,
    StringEscapeUnicode2,
    StringEscapeUnicode3,
    StringEscapeUnicode4,
    StringEscapeUnicodeClose,

    // ── numbers ────────────────────────────────────────────────────────
    NumberSign,
    NumberInteger,
    NumberIntegerZero,
    NumberDecimal,
    NumberDecimalDigit,
    NumberExponent,
    NumberExponentSign,
    NumberExponentDigit,
    NumberClose,

    // ── literals ───────────────────────────────────────────────────────
    TrueOpen,
    True2,
    True3,
    TrueClose,
    FalseOpen,
    False2,
    False3,
    False4,
    FalseClose,
    NullOpen,
    Null2,
    Null3,
    NullClose,
}

impl State {
    pub(crate) fn name(self) -> &'static str {
        use State::*;
        match self {
            Open => "open",
            ValueClose => "value-close",
            ArrayOpen => "array-open",
            ArrayComma => "array-comma",
            ArrayClose => "array-close",
            ObjectOpen => "object-open",
            ObjectComma => "object-comma",
            ObjectMemberSeparator => "object-member-separator",
            ObjectClose => "object-close",
            KeyClose => "key-close",
            End => "end",
            StringOpen => "string-open",
            StringChar => "string-char",
            StringClose => "string-close",
            StringEscape => "string-escape",
            StringEscapedChar => "string-escaped-char",
            StringEscapeUnicodeOpen => "string-escape-unicode-open",
            StringEscapeUnicode2 => "string-escape-unicode-2",
            StringEscapeUnicode3 => "string-escape-unicode-3",
            StringEscapeUnicode4 => "string-escape-unicode-4",
            StringEscapeUnicodeClose => "string-escape-unicode-close",
            NumberSign => "number-sign",
            NumberInteger => "number-integer",
            NumberIntegerZero => "number-integer-zero",
            NumberDecimal => "number-decimal",
            NumberDecimalDigit => "number-decimal-digit",
            NumberExponent => "number-exponent",
            NumberExponentSign => "number-exponent-sign",
            NumberExponentDigit => "number-exponent-digit",
            NumberClose => "number-close",
            TrueOpen => "true-open",
            True2 => "true-2",
            True3 => "true-3",
            TrueClose => "true-close",
            FalseOpen => "false-open",
            False2 => "false-2",
            False3 => "false-3",
            False4 => "false-4",
            FalseClose => "false-close",
            NullOpen => "null-open",
            Null2 => "null-2",
            Null3 => "null-3",
            NullClose => "null-close",
        }
    }

    /// `true` for every state of the number family, sign and separators
    /// included.
    pub(crate) fn is_number(self) -> bool {
        use State::*;
        matches!(
            self,
            NumberSign
                | NumberInteger
                | NumberIntegerZero
                | NumberDecimal
                | NumberDecimalDigit
                | NumberExponent
                | NumberExponentSign
                | NumberExponentDigit
        )
    }

    /// Number states that may legally end the number: the buffered text parses
    /// as a complete numeric literal.
    pub(crate) fn is_digit_terminal(self) -> bool {
        use State::*;
        matches!(
            self,
            NumberInteger | NumberIntegerZero | NumberDecimalDigit | NumberExponentDigit
        )
    }

    /// `true` while the machine is inside a string literal, escapes included.
    pub(crate) fn in_string(self) -> bool {
        use State::*;
        matches!(
            self,
            StringOpen
                | StringChar
                | StringEscape
                | StringEscapedChar
                | StringEscapeUnicodeOpen
                | StringEscapeUnicode2
                | StringEscapeUnicode3
                | StringEscapeUnicode4
                | StringEscapeUnicodeClose
        )
    }

    /// States from which [`StateMachine::terminate`] may succeed, provided the
    /// container stack is empty.
    pub(crate) fn is_terminally_valid(self) -> bool {
        use State::*;
        matches!(
            self,
            ValueClose
                | ArrayClose
                | ObjectClose
                | StringClose
                | NumberClose
                | TrueClose
                | FalseClose
                | NullClose
        ) || self.is_digit_terminal()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Character-driven recognizer for the JSON grammar.
///
/// The machine is created once per document, advanced monotonically with
/// [`write_char`](Self::write_char), and sealed with
/// [`terminate`](Self::terminate). It rejects any input after termination.
#[derive(Debug)]
pub struct StateMachine {
    state: State,
    stack: Vec<ContainerKind>,
    is_in_key: bool,
    offset: usize,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Open,
            stack: Vec::with_capacity(16),
            is_in_key: false,
            offset: 0,
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of currently open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// `true` from the opening quote of an object key up to and including the
    /// key's closing quote.
    #[must_use]
    pub fn is_in_key(&self) -> bool {
        self.is_in_key
    }

    /// Number of characters consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Advances the machine by one character and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidCharacter`] when no transition accepts
    /// `c`, and [`ParseError::WriteAfterTermination`] once the machine has
    /// reached [`State::End`]. Errors are fatal; the machine must not be
    /// reused afterwards.
    pub fn write_char(&mut self, c: char) -> Result<State, ParseError> {
        let next = self.step(c)?;
        self.state = next;
        self.offset += 1;
        Ok(next)
    }

    /// Seals the machine after the last character of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::PrematureTermination`] unless the current state
    /// is terminally valid and no containers remain open.
    pub fn terminate(&mut self) -> Result<(), ParseError> {
        if self.state == State::End {
            return Ok(());
        }
        if self.state.is_terminally_valid() && self.stack.is_empty() {
            self.state = State::End;
            return Ok(());
        }
        Err(ParseError::PrematureTermination {
            state: self.state,
            offset: self.offset,
        })
    }

    fn step(&mut self, c: char) -> Result<State, ParseError> {
        use State::*;

        match self.state {
            Open | ArrayComma | ObjectMemberSeparator => {
                if is_json_whitespace(c) {
                    Ok(self.state)
                } else {
                    self.open_value(c)
                }
            }

            ArrayOpen => match c {
                _ if is_json_whitespace(c) => Ok(ArrayOpen),
                ']' => {
                    self.stack.pop();
                    Ok(ArrayClose)
                }
                _ => self.open_value(c),
            },

            ObjectOpen => match c {
                _ if is_json_whitespace(c) => Ok(ObjectOpen),
                '}' => {
                    self.stack.pop();
                    Ok(ObjectClose)
                }
                '"' => {
                    self.is_in_key = true;
                    Ok(StringOpen)
                }
                _ => Err(self.invalid(c)),
            },

            ObjectComma => match c {
                _ if is_json_whitespace(c) => Ok(ObjectComma),
                '"' => {
                    self.is_in_key = true;
                    Ok(StringOpen)
                }
                _ => Err(self.invalid(c)),
            },

            KeyClose => match c {
                _ if is_json_whitespace(c) => Ok(KeyClose),
                ':' => {
                    self.is_in_key = false;
                    Ok(ObjectMemberSeparator)
                }
                _ => Err(self.invalid(c)),
            },

            // Escapes aside, everything up to the closing quote is content.
            StringOpen | StringChar | StringEscapedChar | StringEscapeUnicodeClose => match c {
                '\\' => Ok(StringEscape),
                '"' => Ok(if self.is_in_key { KeyClose } else { StringClose }),
                _ => Ok(StringChar),
            },

            StringEscape => match c {
                '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => Ok(StringEscapedChar),
                'u' => Ok(StringEscapeUnicodeOpen),
                _ => Err(self.invalid(c)),
            },

            StringEscapeUnicodeOpen if c.is_ascii_hexdigit() => Ok(StringEscapeUnicode2),
            StringEscapeUnicode2 if c.is_ascii_hexdigit() => Ok(StringEscapeUnicode3),
            StringEscapeUnicode3 if c.is_ascii_hexdigit() => Ok(StringEscapeUnicode4),
            StringEscapeUnicode4 if c.is_ascii_hexdigit() => Ok(StringEscapeUnicodeClose),
            StringEscapeUnicodeOpen | StringEscapeUnicode2 | StringEscapeUnicode3
            | StringEscapeUnicode4 => Err(self.invalid(c)),

            NumberSign => match c {
                '0' => Ok(NumberIntegerZero),
                '1'..='9' => Ok(NumberInteger),
                _ => Err(self.invalid(c)),
            },

            // A redundant leading zero is accepted rather than rejected.
            NumberInteger | NumberIntegerZero => match c {
                '0'..='9' => Ok(NumberInteger),
                '.' => Ok(NumberDecimal),
                'e' | 'E' => Ok(NumberExponent),
                _ => self.close_value(c, true),
            },

            NumberDecimal => match c {
                '0'..='9' => Ok(NumberDecimalDigit),
                _ => Err(self.invalid(c)),
            },

            NumberDecimalDigit => match c {
                '0'..='9' => Ok(NumberDecimalDigit),
                'e' | 'E' => Ok(NumberExponent),
                _ => self.close_value(c, true),
            },

            NumberExponent => match c {
                '+' | '-' => Ok(NumberExponentSign),
                '0'..='9' => Ok(NumberExponentDigit),
                _ => Err(self.invalid(c)),
            },

            NumberExponentSign => match c {
                '0'..='9' => Ok(NumberExponentDigit),
                _ => Err(self.invalid(c)),
            },

            NumberExponentDigit => match c {
                '0'..='9' => Ok(NumberExponentDigit),
                _ => self.close_value(c, true),
            },

            TrueOpen if c == 'r' => Ok(True2),
            True2 if c == 'u' => Ok(True3),
            True3 if c == 'e' => Ok(TrueClose),

            FalseOpen if c == 'a' => Ok(False2),
            False2 if c == 'l' => Ok(False3),
            False3 if c == 's' => Ok(False4),
            False4 if c == 'e' => Ok(FalseClose),

            NullOpen if c == 'u' => Ok(Null2),
            Null2 if c == 'l' => Ok(Null3),
            Null3 if c == 'l' => Ok(NullClose),

            TrueOpen | True2 | True3 | FalseOpen | False2 | False3 | False4 | NullOpen | Null2
            | Null3 => Err(self.invalid(c)),

            ValueClose | NumberClose | StringClose | ObjectClose | ArrayClose | TrueClose
            | FalseClose | NullClose => self.close_value(c, false),

            End => Err(ParseError::WriteAfterTermination {
                offset: self.offset,
            }),
        }
    }

    /// Dispatch from a state that expects a value.
    fn open_value(&mut self, c: char) -> Result<State, ParseError> {
        use State::*;
        match c {
            '{' => {
                self.stack.push(ContainerKind::Object);
                Ok(ObjectOpen)
            }
            '[' => {
                self.stack.push(ContainerKind::Array);
                Ok(ArrayOpen)
            }
            '"' => Ok(StringOpen),
            '-' => Ok(NumberSign),
            '0' => Ok(NumberIntegerZero),
            '1'..='9' => Ok(NumberInteger),
            't' => Ok(TrueOpen),
            'f' => Ok(FalseOpen),
            'n' => Ok(NullOpen),
            _ => Err(self.invalid(c)),
        }
    }

    /// Dispatch after a value has completed. Numbers have no terminator
    /// character, so they arrive here directly from their digit states.
    fn close_value(&mut self, c: char, from_number: bool) -> Result<State, ParseError> {
        use State::*;
        if is_json_whitespace(c) {
            return Ok(if from_number { NumberClose } else { ValueClose });
        }
        match (self.stack.last(), c) {
            (Some(ContainerKind::Array), ',') => Ok(ArrayComma),
            (Some(ContainerKind::Array), ']') => {
                self.stack.pop();
                Ok(ArrayClose)
            }
            (Some(ContainerKind::Object), ',') => Ok(ObjectComma),
            (Some(ContainerKind::Object), '}') => {
                self.stack.pop();
                Ok(ObjectClose)
            }
            _ => Err(self.invalid(c)),
        }
    }

    fn invalid(&self, c: char) -> ParseError {
        ParseError::InvalidCharacter {
            ch: c,
            state: self.state,
            offset: self.offset,
        }
    }
}
