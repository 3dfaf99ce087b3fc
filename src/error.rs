use std::fmt;

use crate::expression::Function;
use crate::tokenize::Token;

/// Input contains a character that cannot begin any token.
#[derive(Clone, Debug, PartialEq)]
pub enum LexError {
    UnexpectedCharacter {
        character: char,
        /// Byte offset into the input.
        position: usize,
    },
}

/// The token sequence does not match the grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// A production wanted `expected` but found another token, or the end of
    /// input when `found` is `None`.
    UnexpectedToken {
        found: Option<Token>,
        position: usize,
        expected: &'static str,
    },
    UnknownFunction {
        name: String,
        position: usize,
    },
    /// The literal rounds to infinity.
    LiteralTooLarge { position: usize },
    NestingTooDeep { position: usize, limit: usize },
}

/// A well-formed expression has no finite value.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalError {
    DivisionByZero,
    DomainError { function: Function, operand: f64 },
    NumericOverflow,
}

/// Any failure of [`calculate`](crate::calculate), tagged by pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter {
                character,
                position,
            } => write!(f, "unexpected character {character:?} at offset {position}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                found: Some(token),
                position,
                expected,
            } => write!(f, "expected {expected} at offset {position}, found `{token}`"),
            Self::UnexpectedToken {
                found: None,
                expected,
                ..
            } => write!(f, "expected {expected}, found end of input"),
            Self::UnknownFunction { name, position } => {
                write!(f, "unknown function `{name}` at offset {position}")
            }
            Self::LiteralTooLarge { position } => {
                write!(f, "numeric literal at offset {position} is too large")
            }
            Self::NestingTooDeep { position, limit } => write!(
                f,
                "expression nests deeper than {limit} levels at offset {position}"
            ),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::DomainError { function, operand } => {
                write!(f, "{function} is undefined for {operand}")
            }
            Self::NumericOverflow => write!(f, "result is not a finite number"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "lexical error: {e}"),
            Self::Parse(e) => write!(f, "syntax error: {e}"),
            Self::Eval(e) => write!(f, "evaluation error: {e}"),
        }
    }
}

impl Error {
    /// Message shown by a hosting UI, e.g. `Error: syntax error: ...`.
    pub fn host_message(&self) -> String {
        format!("Error: {self}")
    }
}

impl std::error::Error for LexError {}
impl std::error::Error for ParseError {}
impl std::error::Error for EvalError {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Eval(e) => Some(e),
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Self::Eval(e)
    }
}
