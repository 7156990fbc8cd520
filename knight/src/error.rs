use std::fmt::Display;
use std::path::PathBuf;

use crate::types::{BinOp, Key, Type};

/// Marks a position in a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    offset: usize,
    line: u32,
    column: u32,
}

impl Position {
    /// Construct a new position from offset (0-indexed), line and column
    /// (both 1-indexed).
    pub fn new(offset: usize, line: u32, column: u32) -> Position {
        Position {
            offset,
            line,
            column,
        }
    }

    /// Locate the byte `offset` in `source`, counting lines and columns in
    /// characters.
    pub(crate) fn locate(source: &str, offset: usize) -> Position {
        let consumed = &source[..offset];
        let line = consumed.matches('\n').count() as u32 + 1;
        let column = match consumed.rfind('\n') {
            Some(i) => consumed[i + 1..].chars().count(),
            None => consumed.chars().count(),
        } as u32 + 1;
        Position::new(offset, line, column)
    }

    /// Return the zero-indexed offset into the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Return the one-indexed line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Return the one-indexed column number.
    pub fn column(&self) -> u32 {
        self.column
    }
}

/// Enumerates all the possible reasons for a parse error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Syntax {
    /// The source held no expression at all.
    #[error("nothing to parse")]
    Empty,

    /// No value variant or builtin starts with this character.
    #[error("unknown token start '{0}'")]
    UnknownToken(char),

    /// Input ended before the closing quote.
    #[error("unterminated string")]
    UnterminatedString,

    /// A digit run that does not fit in a 64-bit integer.
    #[error("number literal too large: {0}")]
    NumberTooLarge(String),

    /// Input ended before a function received all its arguments.
    #[error("unable to parse argument {index} for function '{tag}'")]
    MissingArgument { tag: char, index: usize },
}

/// Enumerates all the possible reasons for a runtime error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Runtime {
    /// Evaluated a variable that was never assigned.
    #[error("unknown identifier '{0}'")]
    Unbound(Key),

    #[error("cannot divide by zero")]
    DivideByZero,

    #[error("cannot modulo by zero")]
    ModuloByZero,

    #[error("cannot repeat by a negative amount '{0}'")]
    NegativeRepeat(i64),

    /// The left side of `=` was not a variable.
    #[error("cannot assign to non-identifier ({0})")]
    Assign(Type),

    /// An arithmetic operator not defined for the left operand.
    #[error("unsupported operation '{0}' for {1}")]
    Unsupported(BinOp, Type),

    /// Ordering between values of different or unordered variants.
    #[error("cannot compare {0} with {1}")]
    Compare(Type, Type),

    /// Substring bounds fell outside the text.
    #[error("range {start}..{end} out of bounds for text of length {length}")]
    OutOfRange { start: i64, end: i64, length: usize },

    /// The host environment failed to read, write or run a command.
    #[error("i/o failure: {0}")]
    Io(String),
}

/// Grand enumeration of all possible error reasons.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Reason {
    #[error("{0}")]
    Syntax(Syntax),

    #[error("{0}")]
    Runtime(Runtime),

    /// Unable to load a program from disk.
    #[error("couldn't read file {}: {1}", .0.display())]
    Read(PathBuf, String),
}

impl From<Syntax> for Reason {
    fn from(value: Syntax) -> Self {
        Self::Syntax(value)
    }
}

impl From<Runtime> for Reason {
    fn from(value: Runtime) -> Self {
        Self::Runtime(value)
    }
}

/// The general error type of Knight.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Reason for the error.
    reason: Reason,

    /// Where in the source the error was detected, if known.
    position: Option<Position>,
}

impl Error {
    /// Construct a new error without a location.
    pub(crate) fn new<T>(reason: T) -> Self
    where
        Reason: From<T>,
    {
        Self {
            reason: Reason::from(reason),
            position: None,
        }
    }

    /// Attach a source position. Takes ownership and returns the same object,
    /// for ease of use with `Result::map_err`.
    pub(crate) fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// True if the error was raised before evaluation began.
    pub fn is_parse(&self) -> bool {
        matches!(self.reason, Reason::Syntax(_))
    }

    /// True if the error was raised while evaluating.
    pub fn is_runtime(&self) -> bool {
        matches!(self.reason, Reason::Runtime(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => f.write_fmt(format_args!(
                "{} (line {}, column {})",
                self.reason,
                pos.line(),
                pos.column()
            )),
            None => self.reason.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<Syntax> for Error {
    fn from(value: Syntax) -> Self {
        Self::new(value)
    }
}

impl From<Runtime> for Error {
    fn from(value: Runtime) -> Self {
        Self::new(value)
    }
}

/// Abrupt end of evaluation.
///
/// Every recursive frame propagates a `Halt` untouched with `?`. An error
/// aborts the current run; an exit request asks the host to terminate the
/// process with the given status, and is never treated as a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    Error(Error),
    Exit(i32),
}

impl Halt {
    /// The underlying error, unless this is an exit request.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(err),
            Self::Exit(_) => None,
        }
    }
}

impl Display for Halt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error(err) => err.fmt(f),
            Self::Exit(code) => f.write_fmt(format_args!("exit with status {}", code)),
        }
    }
}

impl From<Error> for Halt {
    fn from(value: Error) -> Self {
        Self::Error(value)
    }
}

impl From<Syntax> for Halt {
    fn from(value: Syntax) -> Self {
        Self::Error(Error::new(value))
    }
}

impl From<Runtime> for Halt {
    fn from(value: Runtime) -> Self {
        Self::Error(Error::new(value))
    }
}

impl From<std::io::Error> for Halt {
    fn from(value: std::io::Error) -> Self {
        Self::from(Runtime::Io(value.to_string()))
    }
}
