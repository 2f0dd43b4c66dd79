//! Abstract Syntax Tree definitions for initlang
//!
//! Leaves keep the tokens they were parsed from, so every node can report the
//! line it came from.

use crate::frontend::token::{Category, Token};
use crate::utils::Span;

/// A complete program (compilation unit)
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Statements recorded in the tree
///
/// Block delimiters, parentheses, points and reserved keywords are consumed by
/// the parser without leaving a node behind.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    Conditional(Conditional),
    Expression(Expression),
    Import(Import),
    /// `init ... end` nested inside a structured `if` body
    Block(Block),
}

/// `int age = 10`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The DATA_TYPE token
    pub ty: Token,
    pub name: Ident,
    pub value: Option<Initializer>,
    pub span: Span,
}

impl VariableDeclaration {
    /// The declared type word (`int`, `string`, ...)
    pub fn type_name(&self) -> &str {
        &self.ty.lexeme
    }
}

/// `= <expression>` part of a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub assign: Token,
    pub value: Expression,
}

/// A statement that starts with `=`: `= <target> = <expression>`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub assign: Token,
    /// A literal or DATA_TYPE token
    pub target: Token,
    pub equals: Token,
    pub value: Expression,
    pub span: Span,
}

/// `if (<condition>) init ... end [else init ... end]`
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Condition,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// Terms of a condition; every term after the first carries its joining operator
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub terms: Vec<Expression>,
}

/// Statements between `init` and `end`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// An optional operator followed by an optional operand
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub operator: Option<Token>,
    pub operand: Option<Operand>,
    pub span: Span,
}

impl Expression {
    pub fn literal(token: Token) -> Self {
        let span = token.span;
        Self {
            operator: None,
            operand: Some(Operand::Literal(Literal { token })),
            span,
        }
    }

    /// The token standing for this expression's value, following nested assignments
    pub fn value_token(&self) -> Option<&Token> {
        match self.operand.as_ref()? {
            Operand::Identifier(ident) => Some(&ident.token),
            Operand::Literal(literal) => Some(&literal.token),
            Operand::Assignment { value, .. } => value.value_token(),
        }
    }

    pub fn value_category(&self) -> Option<Category> {
        self.value_token().map(|token| token.category)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Identifier(Ident),
    Literal(Literal),
    /// `name = <expression>` nested inside an expression
    Assignment {
        target: Ident,
        assign: Token,
        value: Box<Expression>,
    },
}

/// An identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub token: Token,
}

impl Ident {
    pub fn new(token: Token) -> Self {
        Self {
            name: token.lexeme.clone(),
            token,
        }
    }
}

/// A literal token (`10`, `'John'`, `true`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub token: Token,
}

/// `import <name> from <module>`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub name: Ident,
    /// An identifier or string token
    pub module: Token,
    pub span: Span,
}
