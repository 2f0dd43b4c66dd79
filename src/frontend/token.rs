//! Token definitions for initlang

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: Category,
    /// The exact text the pattern matched
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(category: Category, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            category,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// 1-based line the token starts on
    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn is(&self, category: Category) -> bool {
        self.category == category
    }
}

/// Token categories
///
/// The names returned by [`Category::as_str`] are part of the language: a
/// declaration `int x = 10` is valid because the value's category name
/// (`int`) equals the declared type's lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    // ============ Operators ============
    /// == !=
    #[serde(rename = "EQUALITY_OPERATOR")]
    EqualityOperator,
    /// =
    #[serde(rename = "SIMPLE_ASSIGN")]
    SimpleAssign,
    /// *= /= += -=
    #[serde(rename = "COMPLEX_ASSIGN")]
    ComplexAssign,
    /// +
    #[serde(rename = "ADDITION_OPERATOR")]
    AdditionOperator,
    /// -
    #[serde(rename = "SUBTRACTION_OPERATOR")]
    SubtractionOperator,
    /// /
    #[serde(rename = "DIVISION_OPERATOR")]
    DivisionOperator,
    /// *
    #[serde(rename = "MULTIPLICATION_OPERATOR")]
    MultiplicationOperator,
    /// .
    #[serde(rename = "POINT")]
    Point,
    /// < <= > >=
    #[serde(rename = "RELATIONAL_OPERATOR")]
    RelationalOperator,
    /// and or not
    #[serde(rename = "LOGICAL_OPERATOR")]
    LogicalOperator,

    // ============ Keywords ============
    #[serde(rename = "RESERVED_KEYWORD")]
    ReservedKeyword,
    #[serde(rename = "from")]
    From,
    #[serde(rename = "import")]
    Import,
    /// bol int double char string empty object
    #[serde(rename = "DATA_TYPE")]
    DataType,

    // ============ Literals ============
    /// true / false
    #[serde(rename = "bol")]
    Bol,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "char")]
    Char,
    #[serde(rename = "string")]
    Str,

    // ============ Delimiters ============
    /// init
    #[serde(rename = "OPEN_BLOCK")]
    OpenBlock,
    /// end
    #[serde(rename = "CLOSE_BLOCK")]
    CloseBlock,
    #[serde(rename = "OPEN_PAREN")]
    OpenParen,
    #[serde(rename = "CLOSE_PAREN")]
    CloseParen,
    #[serde(rename = "COMMA")]
    Comma,

    #[serde(rename = "IDENTIFIER")]
    Identifier,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::EqualityOperator => "EQUALITY_OPERATOR",
            Category::SimpleAssign => "SIMPLE_ASSIGN",
            Category::ComplexAssign => "COMPLEX_ASSIGN",
            Category::AdditionOperator => "ADDITION_OPERATOR",
            Category::SubtractionOperator => "SUBTRACTION_OPERATOR",
            Category::DivisionOperator => "DIVISION_OPERATOR",
            Category::MultiplicationOperator => "MULTIPLICATION_OPERATOR",
            Category::Point => "POINT",
            Category::RelationalOperator => "RELATIONAL_OPERATOR",
            Category::LogicalOperator => "LOGICAL_OPERATOR",
            Category::ReservedKeyword => "RESERVED_KEYWORD",
            Category::From => "from",
            Category::Import => "import",
            Category::DataType => "DATA_TYPE",
            Category::Bol => "bol",
            Category::Int => "int",
            Category::Double => "double",
            Category::Char => "char",
            Category::Str => "string",
            Category::OpenBlock => "OPEN_BLOCK",
            Category::CloseBlock => "CLOSE_BLOCK",
            Category::OpenParen => "OPEN_PAREN",
            Category::CloseParen => "CLOSE_PAREN",
            Category::Comma => "COMMA",
            Category::Identifier => "IDENTIFIER",
        }
    }

    /// Check if this category classifies a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Category::Bol | Category::Int | Category::Double | Category::Char | Category::Str
        )
    }

    /// Operators allowed between the terms of a condition
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Category::EqualityOperator | Category::RelationalOperator | Category::LogicalOperator
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
