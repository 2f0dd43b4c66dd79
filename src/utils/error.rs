//! Error handling for initlang

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No lexical rule matched
    Lex,
    /// Grammar, declaration or block-balance violation
    Parse,
    /// Reading or writing files
    Io,
}

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Lexer Errors ====================

    #[error("Unexpected token: \"{ch}\" at line {line}")]
    UnexpectedChar { ch: char, line: usize },

    // ==================== Parser Errors ====================

    #[error("Unexpected token at line {line}")]
    UnexpectedToken { line: usize },

    #[error("Expected {expected}, but got '{got}' at line {line}")]
    Expected {
        expected: String,
        got: String,
        line: usize,
    },

    #[error("Mismatched init and end blocks. Unexpected 'end' at line {line}")]
    BlockMismatch {
        opened: usize,
        closed: usize,
        line: usize,
    },

    #[error("Expected variable name after '{ty}' at line {line}")]
    ExpectedVariableName { ty: String, line: usize },

    // ==================== Semantic Errors ====================

    #[error("Variable '{name}' is not defined at line {line}")]
    UndefinedVariable { name: String, line: usize },

    #[error("Variable '{name}' is declared as '{declared}', but the assigned value is of type '{got}' at line {line}")]
    TypeMismatch {
        name: String,
        declared: String,
        got: String,
        line: usize,
    },

    #[error("Variable '{name}' is declared as '{declared}', but the value was not assigned at line {line}")]
    MissingValue {
        name: String,
        declared: String,
        line: usize,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Get the 1-based source line associated with this error
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnexpectedChar { line, .. }
            | Self::UnexpectedToken { line }
            | Self::Expected { line, .. }
            | Self::BlockMismatch { line, .. }
            | Self::ExpectedVariableName { line, .. }
            | Self::UndefinedVariable { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::MissingValue { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedChar { .. } => ErrorKind::Lex,
            Self::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Parse,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
