use thiserror::Error;

use crate::machine::State;

/// A fatal parse error.
///
/// All errors are terminal: once one has been returned the parser and the
/// machine it wraps must not be reused. Messages name the machine state and
/// the character offset at which the error occurred.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// No transition accepts the character in the current state.
    #[error("invalid character {ch:?} in state {state} at offset {offset}")]
    InvalidCharacter { ch: char, state: State, offset: usize },

    /// Input ended while a value or container was still open.
    #[error("premature termination in state {state} at offset {offset}")]
    PrematureTermination { state: State, offset: usize },

    /// A character arrived after the machine reached its end state.
    #[error("write after termination at offset {offset}")]
    WriteAfterTermination { offset: usize },
}
