//! Parser bookkeeping: declared names, block balance and declared values
//!
//! Everything here is owned by a single [`ParseContext`], one per parser.
//! Nothing is scoped: a name declared inside a block stays visible for the
//! rest of the parse, and declaring it again is accepted.

use std::collections::{HashMap, HashSet};

use crate::utils::{Error, Result};

// ==================== Symbol Table ====================

/// Set of declared identifier names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    names: HashSet<String>,
}

impl SymbolTable {
    /// Declare a name; redeclaring is not an error
    pub fn declare(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

// ==================== Block Counters ====================

/// Running totals of `init` and `end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockCounters {
    pub opened: usize,
    pub closed: usize,
}

impl BlockCounters {
    pub fn open(&mut self) {
        self.opened += 1;
    }

    /// Count an `end`; every `end` must bring both totals level
    pub fn close(&mut self, line: usize) -> Result<()> {
        self.closed += 1;
        if self.opened != self.closed {
            return Err(Error::BlockMismatch {
                opened: self.opened,
                closed: self.closed,
                line,
            });
        }
        Ok(())
    }

    pub fn is_balanced(&self) -> bool {
        self.opened == self.closed
    }
}

// ==================== Declared Values ====================

/// Identifier -> literal text of its latest declaration
pub type DeclaredVariables = HashMap<String, String>;

// ==================== Parse Context ====================

/// State accumulated over one parse
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub symbols: SymbolTable,
    pub blocks: BlockCounters,
    pub variables: DeclaredVariables,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration and the literal it was initialised with, if any
    pub fn declare(&mut self, name: &str, value: Option<&str>) {
        self.symbols.declare(name);
        match value {
            Some(value) => {
                self.variables.insert(name.to_string(), value.to_string());
            }
            None => {
                self.variables.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeclaration_is_silent() {
        let mut symbols = SymbolTable::default();
        symbols.declare("age");
        symbols.declare("age");
        assert_eq!(symbols.len(), 1);
        assert!(symbols.is_declared("age"));
        assert!(!symbols.is_declared("name"));
    }

    #[test]
    fn test_blocks_balance() {
        let mut blocks = BlockCounters::default();
        blocks.open();
        assert!(!blocks.is_balanced());
        assert!(blocks.close(2).is_ok());
        let err = blocks.close(3).unwrap_err();
        assert_eq!(err, Error::BlockMismatch { opened: 1, closed: 2, line: 3 });
    }

    #[test]
    fn test_close_before_open() {
        let mut blocks = BlockCounters::default();
        assert!(blocks.close(1).is_err());
    }

    #[test]
    fn test_latest_declaration_wins() {
        let mut ctx = ParseContext::new();
        ctx.declare("name", Some("'John'"));
        ctx.declare("name", Some("'Ana'"));
        assert_eq!(ctx.variables.get("name").map(String::as_str), Some("'Ana'"));
        ctx.declare("name", None);
        assert!(ctx.variables.get("name").is_none());
        assert!(ctx.symbols.is_declared("name"));
    }
}
