//! Frontend module - Pattern table, Lexer, Parser

pub mod token;
pub mod patterns;
pub mod lexer;
pub mod ast;
pub mod symbols;
pub mod parser;
